//! Site errors.

use np_notion::NotionError;
use np_renderer::RenderError;

/// Error from resolving, rendering or writing pages.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Fetching from Notion failed.
    #[error(transparent)]
    Notion(#[from] NotionError),

    /// A block could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Writing build output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing page data failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SiteError {
    /// Whether the requested page does not exist in Notion.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Notion(e) if e.is_not_found())
    }
}
