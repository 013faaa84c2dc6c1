//! # Blockpad Server
//!
//! HTTP + JSON binding of the page store.
//!
//! ```text
//! GET    /api/pages            list pages (imports legacy blocks once)
//! POST   /api/pages            create page (client-generated id)
//! PUT    /api/pages            persist sidebar order (permutation only)
//! PUT    /api/pages/:id        replace one page
//! DELETE /api/pages/:id        delete page
//! GET    /api/blocks           list legacy blocks
//! POST   /api/blocks           create legacy block (server-derived id)
//! PUT    /api/blocks/reorder   reorder legacy blocks (permutation only)
//! PUT    /api/blocks/:id       update legacy block
//! DELETE /api/blocks/:id       delete legacy block
//! ```
//!
//! Failures answer with `{"error": "<message>"}` and a 4xx/5xx status.

pub mod config;
mod error;
mod routes;

pub use config::{ConfigError, ServerConfig, DEFAULT_CONFIG_NAME};
pub use error::ApiError;
pub use routes::router;

use blockpad_storage::PageStore;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve the API on an already-bound listener until ctrl-c.
pub async fn serve(listener: TcpListener, store: Arc<PageStore>) -> std::io::Result<()> {
    let app = router(store);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Bind the configured address and serve the configured store.
pub async fn run(config: &ServerConfig) -> std::io::Result<()> {
    let store = Arc::new(config.open_store());
    let listener = TcpListener::bind(config.addr()).await?;

    tracing::info!(
        addr = %listener.local_addr()?,
        data_dir = ?config.data_dir,
        "Blockpad server listening"
    );

    serve(listener, store).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
