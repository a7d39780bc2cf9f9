use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use super::{MigrationResult, get_migration_status};
use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Applies all pending embedded migrations.
///
/// The diesel migration harness is synchronous, so it runs on a blocking
/// thread over an [`AsyncConnectionWrapper`].
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    let start_time = Instant::now();
    let mut conn = pg.get_pooled_connection().await?;

    let status = get_migration_status(&mut conn).await?;
    if status.is_up_to_date() {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            applied = status.applied_migrations(),
            version = status.last_applied_version().unwrap_or_default(),
            "Database schema is up to date"
        );
        return Ok(MigrationResult::new(start_time.elapsed(), vec![]));
    }

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        pending = status.pending_migrations(),
        next = status.next_pending_version().unwrap_or_default(),
        "Applying pending migrations"
    );

    let mut conn: AsyncConnectionWrapper<_> = conn.into();
    let outcome = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS)
            .map(|applied| applied.iter().map(ToString::to_string).collect::<Vec<_>>())
    })
    .await
    .map_err(|err| {
        tracing::error!(target: TRACING_TARGET_MIGRATION, error = %err, "Migration task did not complete");
        PgError::Migration(err.into())
    })?;

    let duration = start_time.elapsed();
    let versions = outcome.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "Database migration failed"
        );
        PgError::Migration(err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        applied = ?versions,
        "Database migrations applied"
    );

    Ok(MigrationResult::new(duration, versions))
}
