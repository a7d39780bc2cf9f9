//! HTTP server startup, lifecycle and graceful shutdown.

mod error;
mod http_server;
mod lifecycle;
mod shutdown;

use axum::Router;

pub use self::error::{ServerError, ServerResult};
use self::shutdown::shutdown_signal;
use crate::config::ServerConfig;

/// Binds the listener and serves `app` until SIGINT or SIGTERM.
///
/// # Errors
///
/// Fails when the address cannot be bound or the server stops with an IO
/// error.
pub async fn serve(app: Router, config: ServerConfig) -> ServerResult<()> {
    http_server::serve_http(app, config).await
}
