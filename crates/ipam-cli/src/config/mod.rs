//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, shutdown
//! ├── middleware: MiddlewareConfig  # CORS, request timeout
//! ├── telemetry: TelemetryConfig    # Log format
//! └── service: ServiceConfig        # PostgreSQL
//! ```
//!
//! Every option can be given as a flag or an environment variable.
//!
//! ```bash
//! ipam-cli --postgres-url "postgresql://..." --port 8080
//! POSTGRES_URL="postgresql://..." PORT=8080 ipam-cli
//! ```

mod middleware;
mod server;
mod telemetry;

use std::process;

use anyhow::Context;
use clap::Parser;
use ipam_server::service::ServiceConfig;
pub use middleware::MiddlewareConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
pub use telemetry::{LogFormat, TelemetryConfig};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "ipam")]
#[command(about = "IPAM prefix registry server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Log output configuration.
    #[clap(flatten)]
    pub telemetry: TelemetryConfig,

    /// Prefix store configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads `.env` (if enabled) and parses CLI arguments.
    ///
    /// `.env` is read first so that clap's `env` fallbacks can see it.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values without touching the network.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        self.service
            .validate()
            .context("invalid database configuration")?;
        Ok(())
    }

    /// Logs the configuration. The database password is masked.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        self.server.log();
        self.middleware.log();

        let postgres = &self.service.postgres_config;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            postgres_url = %postgres.database_url_masked(),
            postgres_max_connections = postgres.postgres_max_connections,
            postgres_connection_timeout_secs = ?postgres.postgres_connection_timeout_secs,
            postgres_idle_timeout_secs = ?postgres.postgres_idle_timeout_secs,
            "Database configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;

    const URL: &str = "postgresql://ipam@localhost:5432/ipam";

    #[test]
    fn defaults() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["ipam", "--postgres-url", URL])?;

        assert_eq!(cli.server.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.server.shutdown_timeout, 30);
        assert!(cli.middleware.cors.allowed_origins.is_empty());
        assert!(cli.middleware.cors.allow_credentials);
        assert_eq!(cli.middleware.cors.max_age_seconds, 3600);
        assert_eq!(cli.middleware.recovery.request_timeout, 30);
        assert_eq!(cli.telemetry.log_format, LogFormat::Pretty);
        assert_eq!(cli.service.postgres_config.postgres_max_connections, 10);
        assert!(cli.validate().is_ok());
        Ok(())
    }

    #[test]
    fn parses_overrides() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "ipam",
            "--postgres-url",
            URL,
            "--port",
            "9090",
            "--cors-origins",
            "http://localhost:3000,https://ipam.example",
            "--cors-allow-credentials",
            "false",
            "--request-timeout",
            "0",
            "--log-format",
            "json",
        ])?;

        assert_eq!(cli.server.port, 9090);
        assert_eq!(
            cli.middleware.cors.allowed_origins,
            vec!["http://localhost:3000", "https://ipam.example"]
        );
        assert!(!cli.middleware.cors.allow_credentials);
        assert_eq!(cli.middleware.recovery.request_timeout(), None);
        assert_eq!(cli.telemetry.log_format, LogFormat::Json);
        Ok(())
    }

    #[test]
    fn validation_catches_bad_pool_size() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "ipam",
            "--postgres-url",
            URL,
            "--postgres-max-connections",
            "64",
        ])?;

        assert!(cli.validate().is_err());
        Ok(())
    }
}
