//! Mock document store for testing.
//!
//! Provides [`MockStore`] for unit testing without network access.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::error::NotionError;
use crate::store::DocumentStore;
use crate::types::{Block, Page};

fn not_found(id: &str) -> NotionError {
    NotionError::HttpResponse {
        status: 404,
        body: format!("Could not find object with ID: {id}"),
    }
}

/// In-memory document store.
///
/// Use the builder methods to configure the mock with test data. Unknown
/// ids answer like the API does, with a 404.
///
/// # Example
///
/// ```ignore
/// use np_notion::{Block, BlockKind, DocumentStore, MockStore, Page};
///
/// let store = MockStore::new()
///     .with_database("db", vec![Page::new("p1", edited, "Hello")])
///     .with_children("p1", vec![Block::new("b1", BlockKind::Divider)]);
///
/// let blocks = store.list_block_children("p1").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    databases: RwLock<HashMap<String, Vec<Page>>>,
    pages: RwLock<HashMap<String, Page>>,
    children: RwLock<HashMap<String, Vec<Block>>>,
    failing: RwLock<HashSet<String>>,
    requests: RwLock<Vec<String>>,
}

impl MockStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a database. Its pages are also retrievable by id.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_database(self, database_id: impl Into<String>, pages: Vec<Page>) -> Self {
        {
            let mut by_id = self.pages.write().unwrap();
            for page in &pages {
                by_id.insert(page.id.clone(), page.clone());
            }
        }
        self.databases
            .write()
            .unwrap()
            .insert(database_id.into(), pages);
        self
    }

    /// Add a page that is not part of any database.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, page: Page) -> Self {
        self.insert_page(page);
        self
    }

    /// Set the children of a page or block.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_children(self, parent_id: impl Into<String>, blocks: Vec<Block>) -> Self {
        self.set_children(parent_id, blocks);
        self
    }

    /// Make every request for `id` fail with a 502.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, id: impl Into<String>) -> Self {
        self.set_failing(id, true);
        self
    }

    /// Insert or replace a page after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert_page(&self, page: Page) {
        self.pages.write().unwrap().insert(page.id.clone(), page);
    }

    /// Replace the children of a page or block after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_children(&self, parent_id: impl Into<String>, blocks: Vec<Block>) {
        self.children
            .write()
            .unwrap()
            .insert(parent_id.into(), blocks);
    }

    /// Toggle failure injection for `id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_failing(&self, id: impl Into<String>, failing: bool) {
        let mut set = self.failing.write().unwrap();
        let id = id.into();
        if failing {
            set.insert(id);
        } else {
            set.remove(&id);
        }
    }

    /// Ids requested so far, in request order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().unwrap().clone()
    }

    fn record(&self, id: &str) -> Result<(), NotionError> {
        self.requests.write().unwrap().push(id.to_owned());
        if self.failing.read().unwrap().contains(id) {
            return Err(NotionError::HttpResponse {
                status: 502,
                body: "Bad Gateway".to_owned(),
            });
        }
        Ok(())
    }
}

impl DocumentStore for MockStore {
    fn query_database(&self, database_id: &str) -> Result<Vec<Page>, NotionError> {
        self.record(database_id)?;
        self.databases
            .read()
            .unwrap()
            .get(database_id)
            .cloned()
            .ok_or_else(|| not_found(database_id))
    }

    fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError> {
        self.record(page_id)?;
        self.pages
            .read()
            .unwrap()
            .get(page_id)
            .cloned()
            .ok_or_else(|| not_found(page_id))
    }

    fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
        self.record(block_id)?;
        self.children
            .read()
            .unwrap()
            .get(block_id)
            .cloned()
            .ok_or_else(|| not_found(block_id))
    }
}
