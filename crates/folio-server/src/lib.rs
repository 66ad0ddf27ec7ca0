//! HTTP server for Folio page content.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - `GET /api/pages`: names of persisted pages
//! - `GET /api/pages/{pageName}`: stored document, or the default template
//! - `POST /api/pages/{pageName}`: upsert, optionally conditional on `If-Match`
//! - `GET /ws/changes`: WebSocket feed of content change events
//!
//! # Architecture
//!
//! ```text
//! Editor ──HTTP──► axum server (folio-server)
//!                        │
//!                        ├─► API routes ──► ContentStore (fs or memory)
//!                        │                        │
//!                        │                        └─► ChangeNotifier::emit
//!                        │
//!                        └─► WebSocket ◄── ChangeNotifier::subscribe
//! ```

mod app;
mod changes;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use folio_config::StoreBackend;
use folio_content::ChangeNotifier;
use folio_store::{ContentStore, FsStore, MemoryStore};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Store backend.
    pub backend: StoreBackend,
    /// Content directory (fs backend).
    pub content_dir: PathBuf,
    /// Serve the WebSocket change feed.
    pub changes_enabled: bool,
    /// Bearer token required for writes.
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
            backend: StoreBackend::Fs,
            content_dir: PathBuf::from("content"),
            changes_enabled: true,
            admin_token: None,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn ContentStore> = match config.backend {
        StoreBackend::Fs => {
            tracing::info!(content_dir = %config.content_dir.display(), "Using filesystem store");
            Arc::new(FsStore::new(config.content_dir.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; content is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let state = Arc::new(AppState {
        store,
        notifier: ChangeNotifier::default(),
        changes_enabled: config.changes_enabled,
        admin_token: config.admin_token.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        changes = config.changes_enabled,
        write_gate = config.admin_token.is_some(),
        "Starting server"
    );

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

/// Create server configuration from Folio config.
#[must_use]
pub fn server_config_from_folio_config(config: &folio_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        backend: config.store.backend,
        content_dir: config.store.content_dir.clone(),
        changes_enabled: config.changes.enabled,
        admin_token: config.server.admin_token().map(str::to_owned),
    }
}
