//! Tracing subscriber setup.

mod tracing;

use anyhow::Context;

use crate::config::TelemetryConfig;

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Fails when `RUST_LOG` cannot be parsed or a subscriber is already set.
pub(crate) fn init_tracing(config: &TelemetryConfig) -> anyhow::Result<()> {
    tracing::init_tracing(config.log_format).context("Failed to initialize tracing")
}
