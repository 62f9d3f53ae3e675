//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::pages::get_index))
        .route("/{id}", get(handlers::pages::get_post))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer())
                .layer(security::referrer_policy_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::{TimeZone, Utc};
    use np_notion::{Block, BlockKind, DocumentStore, MockStore, Page};
    use np_site::{Site, SiteConfig};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    const POST_ID: &str = "1f2e3d4c-5b6a-4789-8abc-def012345678";

    fn store() -> Arc<MockStore> {
        let edited = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        Arc::new(
            MockStore::new()
                .with_database("db", vec![Page::new(POST_ID, edited, "Hello")])
                .with_children(POST_ID, vec![Block::new("d", BlockKind::Divider)]),
        )
    }

    fn router(store: &Arc<MockStore>) -> Router {
        let mut config = SiteConfig::new("db");
        config.revalidate = Duration::from_secs(60);
        let site = Site::new(Arc::clone(store) as Arc<dyn DocumentStore>, config);
        create_router(Arc::new(AppState {
            site: Arc::new(site),
            version: "test".to_owned(),
        }))
    }

    async fn get(router: Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_lists_posts() {
        let response = get(router(&store()), "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, s-maxage=60, stale-while-revalidate"
        );
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert!(response.headers().contains_key(header::ETAG));

        let body = body_text(response).await;
        assert!(body.contains(&format!("href=\"/{POST_ID}\"")));
    }

    #[tokio::test]
    async fn test_post_accepts_unhyphenated_id() {
        let compact = POST_ID.replace('-', "");
        let response = get(router(&store()), &format!("/{compact}")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<title>Hello</title>"));
        assert!(body.contains("<hr class=\"my-4\">"));
    }

    #[tokio::test]
    async fn test_non_uuid_is_not_found_without_fetching() {
        let store = store();
        let response = get(router(&store), "/favicon.ico").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(store.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_post_is_not_found() {
        let response = get(router(&store()), "/00000000-0000-4000-8000-000000000000").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_server_error() {
        let store = store();
        store.set_failing(POST_ID, true);

        let response = get(router(&store), &format!("/{POST_ID}")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_matching_etag_is_not_modified() {
        let router = router(&store());

        let first = get(router.clone(), "/").await;
        let etag = first.headers()[header::ETAG].clone();

        let second = router
            .oneshot(
                Request::get("/")
                    .header(header::IF_NONE_MATCH, etag.clone())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(second.headers()[header::ETAG], etag);
        assert_eq!(
            second.headers()[header::CACHE_CONTROL],
            "public, s-maxage=60, stale-while-revalidate"
        );
    }

    #[tokio::test]
    async fn test_missing_database_is_server_error() {
        let store = Arc::new(MockStore::new());
        let response = get(router(&store), "/").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.requests(), vec!["db"]);
    }
}
