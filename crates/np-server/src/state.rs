//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use np_site::Site;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Site with the revalidating page cache.
    pub(crate) site: Arc<Site>,
    /// Application version, mixed into `ETag`s.
    pub(crate) version: String,
}

impl AppState {
    /// `Cache-Control` value telling shared caches when to revalidate.
    pub(crate) fn cache_control(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate",
            self.site.config().revalidate.as_secs().max(1)
        )
    }
}
