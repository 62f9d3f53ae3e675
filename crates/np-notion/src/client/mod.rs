//! Notion REST API client.
//!
//! Provides a sync HTTP client authenticated with an internal integration
//! token.

mod blocks;
mod databases;
mod pages;

use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::Agent;
use ureq::http::Response;

use crate::error::NotionError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Maximum page size accepted by list endpoints.
const PAGE_SIZE: u32 = 100;

/// Notion REST API client.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    token: String,
    version: String,
}

impl NotionClient {
    /// Create client from config values.
    ///
    /// # Arguments
    /// * `base_url` - API base URL, e.g. `https://api.notion.com/v1`
    /// * `token` - Integration token
    /// * `version` - Value of the `Notion-Version` header
    #[must_use]
    pub fn new(base_url: &str, token: &str, version: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            version: version.to_owned(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Decode a JSON response, mapping error statuses to [`NotionError::HttpResponse`].
fn read_response<T: DeserializeOwned>(response: Response<ureq::Body>) -> Result<T, NotionError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(NotionError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body_reader.read_json()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = NotionClient::new("https://api.notion.com/v1/", "secret", "2022-06-28");
        assert_eq!(client.base_url, "https://api.notion.com/v1");
        assert_eq!(client.auth_header(), "Bearer secret");
    }
}
