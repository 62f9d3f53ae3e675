//! Notion integration for npress.
//!
//! This crate provides:
//! - Typed Notion data model ([`Page`], [`Block`], [`RichText`]) with serde support
//! - [`DocumentStore`] trait for read access to a workspace
//! - [`NotionClient`] REST implementation using a sync HTTP client
//! - [`MockStore`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use np_notion::{DocumentStore, NotionClient};
//!
//! let client = NotionClient::new("https://api.notion.com/v1", &token, "2022-06-28");
//! for page in client.query_database(&database_id)? {
//!     println!("{}", page.id);
//! }
//! ```

mod client;
mod error;
#[cfg(feature = "mock")]
mod mock;
mod store;
mod types;

pub use client::NotionClient;
pub use error::{InvalidBlock, NotionError};
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use store::DocumentStore;
pub use types::*;
