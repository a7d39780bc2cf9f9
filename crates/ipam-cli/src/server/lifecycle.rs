//! Uptime and exit logging around the serve loop.

use std::future::Future;
use std::io;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Awaits `serve` and logs how long the listener was up and how it stopped.
pub async fn serve_with_shutdown<F>(
    server_config: &ServerConfig,
    serve: impl FnOnce() -> F,
) -> io::Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_config.server_addr(),
        all_interfaces = server_config.binds_to_all_interfaces(),
        "Listening for prefix registry requests"
    );

    let started = Instant::now();
    let result = serve().await;
    let uptime_secs = started.elapsed().as_secs();

    match &result {
        Ok(()) => tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            uptime_secs,
            "Server stopped"
        ),
        Err(err) => tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %err,
            uptime_secs,
            "Server stopped with an IO error"
        ),
    }

    result
}
