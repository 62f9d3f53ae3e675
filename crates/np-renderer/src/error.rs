//! Render errors.

/// Error raised while rendering a block.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A field the renderer relies on is missing from the payload.
    #[error("malformed `{block_type}` block {block_id}: {reason}")]
    MalformedPayload {
        /// Block identifier.
        block_id: String,
        /// Block discriminant.
        block_type: String,
        /// What is missing.
        reason: &'static str,
    },
}
