//! Page operations for Notion API.

use tracing::info;

use super::{NotionClient, read_response};
use crate::error::NotionError;
use crate::types::Page;

impl NotionClient {
    /// Retrieve page properties.
    pub(crate) fn get_page(&self, page_id: &str) -> Result<Page, NotionError> {
        let url = format!("{}/pages/{}", self.base_url, page_id);

        info!(page_id, "Retrieving page");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header())
            .header("Notion-Version", &self.version)
            .header("Accept", "application/json")
            .call()?;

        read_response(response)
    }
}
