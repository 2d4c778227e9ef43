//! HTTP server for flatpage.
//!
//! Binds an axum listener and dispatches request paths to the page
//! resolution pipeline in `flatpage-site`:
//!
//! ```text
//! Browser ──HTTP──► axum router (flatpage-server)
//!                        │
//!                        ├─► /api/health (raw JSON response)
//!                        │
//!                        └─► fallback ──► Site::resolve(page name)
//!                                 │            │
//!                                 │            └─► layout render at write time
//!                                 │
//!                                 └─► public/ static assets (non-page paths)
//! ```
//!
//! The routing layer owns the page-name contract: the root path maps to
//! the page `index`, any other path is a page name when it contains only
//! alphanumerics and slashes, and everything else is tried as a static
//! asset.

mod app;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use flatpage_site::{Site, SiteConfig};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding page sources (`<name>.md`, `<name>.json`).
    pub page_dir: PathBuf,
    /// Directory holding layout templates.
    pub layout_dir: PathBuf,
    /// Directory holding static assets.
    pub public_dir: PathBuf,
    /// Fail requests whose sidecar is present but malformed.
    pub strict_sidecar: bool,
    /// Application version (reported by the health endpoint).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            page_dir: PathBuf::from("page"),
            layout_dir: PathBuf::from("layout"),
            public_dir: PathBuf::from("public"),
            strict_sidecar: false,
            version: String::new(),
        }
    }
}

/// Run the server until shutdown.
///
/// # Errors
///
/// Returns an error if the address is invalid or binding fails.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let site = Site::new(SiteConfig {
        page_dir: config.page_dir.clone(),
        layout_dir: config.layout_dir.clone(),
        strict_sidecar: config.strict_sidecar,
    });

    let state = Arc::new(AppState {
        site,
        public_dir: config.public_dir.clone(),
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
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from a loaded flatpage config.
#[must_use]
pub fn server_config_from_config(config: &flatpage_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        page_dir: config.content.page_dir.clone(),
        layout_dir: config.content.layout_dir.clone(),
        public_dir: config.content.public_dir.clone(),
        strict_sidecar: config.content.strict_sidecar,
        version,
    }
}
