//! Document store abstraction.

use crate::client::NotionClient;
use crate::error::NotionError;
use crate::types::{Block, Page};

/// Read access to a Notion workspace.
///
/// Implementations must be shareable across threads: child blocks of one
/// page are fetched in parallel, and the server resolves pages from a
/// blocking thread pool.
pub trait DocumentStore: Send + Sync {
    /// List every page of a database.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError`] if any request fails or a response cannot be decoded.
    fn query_database(&self, database_id: &str) -> Result<Vec<Page>, NotionError>;

    /// Fetch one page's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError::HttpResponse`] with status 404 if the page does not exist.
    fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError>;

    /// Fetch the immediate children of a page or block.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError`] if any request fails or a block payload is invalid.
    fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError>;
}

impl DocumentStore for NotionClient {
    fn query_database(&self, database_id: &str) -> Result<Vec<Page>, NotionError> {
        self.query_all_pages(database_id)
    }

    fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError> {
        self.get_page(page_id)
    }

    fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
        self.get_block_children(block_id)
    }
}
