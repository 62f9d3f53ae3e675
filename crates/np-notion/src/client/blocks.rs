//! Block operations for Notion API.

use tracing::info;

use super::{NotionClient, PAGE_SIZE, read_response};
use crate::error::NotionError;
use crate::types::{Block, ListResponse};

impl NotionClient {
    /// Get the immediate children of a page or block.
    ///
    /// Nested children are not expanded; blocks that have them report
    /// `has_children` with `children` unset.
    pub(crate) fn get_block_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
        info!(block_id, "Getting block children");

        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut url = format!(
                "{}/blocks/{}/children?page_size={}",
                self.base_url, block_id, PAGE_SIZE
            );
            if let Some(cursor) = &cursor {
                url.push_str("&start_cursor=");
                url.push_str(cursor);
            }

            let response = self
                .agent
                .get(&url)
                .header("Authorization", &self.auth_header())
                .header("Notion-Version", &self.version)
                .header("Accept", "application/json")
                .call()?;

            let list: ListResponse<Block> = read_response(response)?;
            blocks.extend(list.results);

            match list.next_cursor {
                Some(next) if list.has_more => cursor = Some(next),
                _ => break,
            }
        }

        info!(block_id, count = blocks.len(), "Fetched block children");
        Ok(blocks)
    }
}
