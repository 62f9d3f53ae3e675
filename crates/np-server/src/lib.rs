//! HTTP server for npress.
//!
//! Serves the blog with on-demand regeneration:
//! - `GET /` renders the post listing
//! - `GET /{id}` renders one post, generating unknown ids on first request
//!
//! Rendered pages are reused for the revalidation interval and advertised
//! to shared caches through `Cache-Control: s-maxage`.
//!
//! # Quick Start
//!
//! ```ignore
//! use np_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         database_id: "1f2e3d4c...".to_owned(),
//!         token: std::env::var("NOTION_TOKEN").unwrap(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (np-server)
//!                        │
//!                        └─► spawn_blocking ──► Site (cache + render)
//!                                                  │
//!                                                  └─► NotionClient ──► api.notion.com
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use np_notion::{DocumentStore, NotionClient};
use np_site::{Site, SiteConfig, SiteMeta};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Notion API base URL.
    pub base_url: String,
    /// Notion integration token.
    pub token: String,
    /// Notion API version header.
    pub notion_version: String,
    /// Database holding the posts.
    pub database_id: String,
    /// Listing page text.
    pub meta: SiteMeta,
    /// Minimum age before a page is regenerated.
    pub revalidate: Duration,
    /// Application version (for `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            base_url: "https://api.notion.com/v1".to_owned(),
            token: String::new(),
            notion_version: "2022-06-28".to_owned(),
            database_id: String::new(),
            meta: SiteMeta::default(),
            revalidate: Duration::from_secs(1),
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn DocumentStore> = Arc::new(NotionClient::new(
        &config.base_url,
        &config.token,
        &config.notion_version,
    ));

    let site_config = SiteConfig {
        database_id: config.database_id.clone(),
        meta: config.meta.clone(),
        revalidate: config.revalidate,
    };
    let site = Arc::new(Site::new(store, site_config));

    let state = Arc::new(AppState {
        site,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from npress config.
///
/// # Arguments
///
/// * `config` - npress configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_np_config(config: &np_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        base_url: config.notion.base_url.clone(),
        token: config.notion.token.clone(),
        notion_version: config.notion.version.clone(),
        database_id: config.notion.database_id.clone(),
        meta: SiteMeta {
            title: config.site.title.clone(),
            description: config.site.description.clone(),
        },
        revalidate: Duration::from_secs(config.site.revalidate_secs),
        version,
    }
}
