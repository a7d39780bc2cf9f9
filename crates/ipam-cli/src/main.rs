#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;
mod telemetry;

use std::process;

use anyhow::Context;
use axum::Router;
use ipam_server::handler::routes;
use ipam_server::middleware::{RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt};
use ipam_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig};
use crate::server::ServerError;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "ipam_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "ipam_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "ipam_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );

        if let Some(server_error) = error.downcast_ref::<ServerError>() {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                recoverable = server_error.is_recoverable(),
                suggestion = server_error.suggestion().unwrap_or_default(),
                "server error details"
            );
        }
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
///
/// The listener is bound only after the prefix store has answered a query
/// and its schema is in place.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(&cli.telemetry)?;
    cli.log();
    cli.validate()?;

    let state = ServiceState::from_config(&cli.service)
        .await
        .context("failed to initialize the prefix store")?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;
    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost): timeouts and panics
/// 2. Observability: request ids and tracing spans
/// 3. Security: CORS and body limit
/// 4. Routes (innermost)
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes(state)
        .with_security(&middleware.cors)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
