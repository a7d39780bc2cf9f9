use crate::migrate::{MigrationResult, run_pending_migrations, verify_schema_integrity};
use crate::{PgClient, PgResult};

/// Migration operations available directly on [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies every embedded migration that the database has not seen yet.
    ///
    /// # Errors
    ///
    /// Fails when no connection can be acquired or a migration fails to apply.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>> + Send;

    /// Checks that the tables the registry depends on exist.
    fn verify_schema_integrity(&self) -> impl Future<Output = PgResult<()>> + Send;
}

impl PgClientMigrationExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_pending_migrations(self).await
    }

    async fn verify_schema_integrity(&self) -> PgResult<()> {
        let mut conn = self.get_connection().await?;
        verify_schema_integrity(&mut conn).await
    }
}
