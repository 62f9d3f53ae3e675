//! Listing and post pages.
//!
//! Rendering blocks on Notion requests, so it runs on the blocking pool.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use md5::{Digest, Md5};
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn get_index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let site = Arc::clone(&state.site);
    let html = tokio::task::spawn_blocking(move || site.render_index()).await??;
    Ok(html_response(&state, &headers, &html))
}

/// Handle GET /{id}.
///
/// Only UUIDs (hyphenated or not) are looked up; anything else is a 404
/// without a Notion request.
pub(crate) async fn get_post(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let Ok(uuid) = Uuid::try_parse(&id) else {
        return Err(ServerError::PageNotFound(id));
    };
    let page_id = uuid.hyphenated().to_string();

    let site = Arc::clone(&state.site);
    let html = tokio::task::spawn_blocking(move || site.render_post(&page_id))
        .await?
        .map_err(|err| {
            if err.is_not_found() {
                ServerError::PageNotFound(id)
            } else {
                ServerError::Site(err)
            }
        })?;
    Ok(html_response(&state, &headers, &html))
}

fn html_response(state: &AppState, headers: &HeaderMap, html: &str) -> Response {
    let etag = compute_etag(&state.version, html);
    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .is_some_and(|value| value.as_bytes() == etag.as_bytes());
    let cache_headers = [
        (header::ETAG, etag),
        (header::CACHE_CONTROL, state.cache_control()),
    ];

    if not_modified {
        return (StatusCode::NOT_MODIFIED, cache_headers).into_response();
    }
    (cache_headers, Html(html.to_owned())).into_response()
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
