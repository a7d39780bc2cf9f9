#[cfg(feature = "config")]
use clap::Args;
use ipam_postgres::{PgClient, PgClientMigrationExt, PgConfig};
use serde::{Deserialize, Serialize};

use crate::service::{Error, Result, TRACING_TARGET_STATE};

/// Configuration of everything [`ServiceState`] depends on.
///
/// [`ServiceState`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Prefix store connection settings.
    #[cfg_attr(feature = "config", command(flatten))]
    pub postgres_config: PgConfig,
}

impl ServiceConfig {
    /// Creates a configuration for the given connection string.
    pub fn new(postgres_url: impl Into<String>) -> Self {
        Self {
            postgres_config: PgConfig::new(postgres_url),
        }
    }

    /// Checks the configuration without touching the network.
    pub fn validate(&self) -> Result<()> {
        self.postgres_config
            .validate()
            .map_err(|e| Error::config("Invalid postgres configuration").with_source(e))
    }

    /// Connects to Postgres, applies migrations and checks the schema.
    ///
    /// Returns only once the database has answered a query and the
    /// `prefixes` table is known to exist.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        self.validate()?;

        let pg_client = PgClient::connect(self.postgres_config.clone())
            .await
            .map_err(|e| Error::external("postgres", "Failed to connect").with_source(e))?;

        let migrations = pg_client.run_pending_migrations().await.map_err(|e| {
            Error::external("postgres", "Failed to apply database migrations").with_source(e)
        })?;

        pg_client.verify_schema_integrity().await.map_err(|e| {
            Error::external("postgres", "Database schema verification failed").with_source(e)
        })?;

        if migrations.is_no_op() {
            tracing::info!(
                target: TRACING_TARGET_STATE,
                duration = ?migrations.duration,
                "Prefix store ready, schema already current"
            );
        } else {
            tracing::info!(
                target: TRACING_TARGET_STATE,
                applied = migrations.processed_versions.len(),
                version = migrations.last_processed_version().unwrap_or_default(),
                duration = ?migrations.duration,
                "Prefix store ready, migrations applied"
            );
        }

        Ok(pg_client)
    }
}

#[cfg(test)]
mod tests {
    use crate::ErrorKind;

    use super::*;

    #[test]
    fn rejects_empty_url_before_connecting() {
        let config = ServiceConfig::new("");
        let error = config.validate().expect_err("empty url must be rejected");
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn connect_fails_fast_on_invalid_config() {
        let config = ServiceConfig::new("postgresql://ipam@localhost/ipam");
        let config = ServiceConfig {
            postgres_config: config.postgres_config.with_max_connections(0),
        };

        let error = config
            .connect_postgres()
            .await
            .expect_err("invalid pool size must be rejected");
        assert_eq!(error.kind(), ErrorKind::Config);
    }
}
