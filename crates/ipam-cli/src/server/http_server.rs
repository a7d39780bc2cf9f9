//! HTTP server startup with a bounded graceful shutdown.

use std::future::{IntoFuture, pending};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::lifecycle::serve_with_shutdown;
use super::{ServerError, ServerResult, shutdown_signal};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds to the configured address and serves `app`.
///
/// After a shutdown signal the listener stops accepting connections and
/// in-flight requests get [`ServerConfig::shutdown_timeout`] to finish.
pub(super) async fn serve_http(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    server_config.validate().map_err(|e| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            error = %e,
            "Invalid server configuration"
        );
        ServerError::InvalidConfig(e.to_string())
    })?;

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|e| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %e,
            "Failed to bind to address"
        );
        ServerError::bind_error(server_addr, e)
    })?;

    let shutdown_timeout = server_config.shutdown_timeout();
    serve_with_shutdown(&server_config, || async move {
        let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
        let graceful = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = signalled_tx.send(());
            })
            .into_future();

        let deadline = async move {
            match signalled_rx.await {
                Ok(()) => tokio::time::sleep(shutdown_timeout).await,
                Err(_) => pending::<()>().await,
            }
        };

        tokio::select! {
            result = graceful => result,
            () = deadline => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Graceful shutdown timed out, dropping remaining connections"
                );
                Ok(())
            }
        }
    })
    .await
    .map_err(ServerError::Runtime)
}
