//! Database operations for Notion API.

use serde_json::json;
use tracing::info;

use super::{NotionClient, PAGE_SIZE, read_response};
use crate::error::NotionError;
use crate::types::{ListResponse, Page};

impl NotionClient {
    /// Query every page of a database, following pagination cursors.
    pub(crate) fn query_all_pages(&self, database_id: &str) -> Result<Vec<Page>, NotionError> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);

        info!(database_id, "Querying database");

        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }

            let response = self
                .agent
                .post(&url)
                .header("Authorization", &self.auth_header())
                .header("Notion-Version", &self.version)
                .header("Accept", "application/json")
                .send_json(&body)?;

            let list: ListResponse<Page> = read_response(response)?;
            pages.extend(list.results);

            match list.next_cursor {
                Some(next) if list.has_more => cursor = Some(next),
                _ => break,
            }
        }

        info!(database_id, count = pages.len(), "Database query complete");
        Ok(pages)
    }
}
