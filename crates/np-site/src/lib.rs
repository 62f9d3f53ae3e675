//! Page assembly and data resolution for npress.
//!
//! This crate provides:
//! - [`resolve`]: fetches listing and post data, backfilling one level of
//!   nested blocks in parallel
//! - [`template`]: full HTML documents for the listing and post pages
//! - [`Site`]: rendered pages cached for a revalidation interval
//! - [`StaticSiteBuilder`]: writes every page and its data to a directory
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use np_notion::NotionClient;
//! use np_site::{Site, SiteConfig};
//!
//! let store = Arc::new(NotionClient::new(base_url, &token, version));
//! let site = Site::new(store, SiteConfig::new(database_id));
//!
//! let index = site.render_index()?;
//! let post = site.render_post("1f2e3d4c-...")?;
//! ```

mod builder;
mod error;
pub mod resolve;
mod site;
pub mod template;

pub use builder::{BuildReport, StaticSiteBuilder};
pub use error::SiteError;
pub use resolve::{IndexProps, PostProps};
pub use site::{Site, SiteConfig};
pub use template::SiteMeta;
