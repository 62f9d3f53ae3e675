//! Error types for Notion integration.

/// Error from Notion API operations.
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

impl NotionError {
    /// Whether the API reported that the requested object does not exist.
    ///
    /// Notion answers 404 both for missing objects and for objects the
    /// integration has not been shared with.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpResponse { status: 404, .. })
    }
}

/// Block payload that does not match the shape of its declared type.
#[derive(Debug, thiserror::Error)]
#[error("invalid `{block_type}` payload in block {block_id}")]
pub struct InvalidBlock {
    /// Block identifier.
    pub block_id: String,
    /// Block discriminant.
    pub block_type: String,
    /// Underlying decoding error.
    pub source: serde_json::Error,
}
