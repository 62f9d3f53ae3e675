//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use np_site::SiteError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No post exists for the requested path.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Resolving or rendering the page failed.
    ///
    /// A missing database is a configuration error, so this is always a 500.
    /// Handlers turn a missing post into [`ServerError::PageNotFound`].
    #[error(transparent)]
    Site(#[from] SiteError),

    /// The blocking render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::PageNotFound(_) => StatusCode::NOT_FOUND,
            Self::Site(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let message = if status == StatusCode::NOT_FOUND {
            "This page could not be found."
        } else {
            "An error occurred while generating this page."
        };
        let body = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{code}</title>\n</head>\n<body>\n<h1>{code}</h1>\n<p>{message}</p>\n\
             </body>\n</html>\n",
            code = status.as_u16(),
        );

        (status, Html(body)).into_response()
    }
}
