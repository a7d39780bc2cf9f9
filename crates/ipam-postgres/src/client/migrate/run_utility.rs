use diesel::migration::MigrationSource;
use diesel::pg::Pg;
use diesel::sql_query;
use diesel::sql_types::Bool;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use super::MigrationStatus;
use crate::{MIGRATIONS, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Tables the registry cannot run without.
const REQUIRED_TABLES: &[&str] = &["__diesel_schema_migrations", "prefixes"];

#[derive(diesel::QueryableByName)]
struct Exists {
    #[diesel(sql_type = Bool)]
    exists: bool,
}

/// Versions of the migrations compiled into this binary, oldest first.
pub fn embedded_versions() -> PgResult<Vec<String>> {
    let migrations = MigrationSource::<Pg>::migrations(&MIGRATIONS).map_err(PgError::Migration)?;
    let mut versions: Vec<String> = migrations
        .iter()
        .map(|migration| migration.name().version().to_string())
        .collect();

    versions.sort();
    Ok(versions)
}

/// Compares embedded migrations with the ones recorded in the database.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub async fn get_migration_status(conn: &mut AsyncPgConnection) -> PgResult<MigrationStatus> {
    let applied = get_applied_migrations(conn).await?;
    let status = MigrationStatus::from_versions(embedded_versions()?, applied);

    tracing::debug!(
        target: TRACING_TARGET_MIGRATION,
        applied = status.applied_migrations(),
        pending = status.pending_migrations(),
        "Migration status retrieved"
    );

    Ok(status)
}

/// Returns the applied migration versions, or nothing on a fresh database.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub async fn get_applied_migrations(conn: &mut AsyncPgConnection) -> PgResult<Vec<String>> {
    #[derive(diesel::QueryableByName)]
    struct Version {
        #[diesel(sql_type = diesel::sql_types::Text)]
        version: String,
    }

    if !table_exists(conn, "__diesel_schema_migrations").await? {
        return Ok(Vec::new());
    }

    let versions = sql_query("SELECT version FROM __diesel_schema_migrations ORDER BY version")
        .get_results::<Version>(conn)
        .await
        .map_err(|e| PgError::Migration(format!("Failed to read applied migrations: {e}").into()))?
        .into_iter()
        .map(|row| row.version)
        .collect();

    Ok(versions)
}

/// Fails unless the migration bookkeeping table and `prefixes` exist.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub async fn verify_schema_integrity(conn: &mut AsyncPgConnection) -> PgResult<()> {
    for table in REQUIRED_TABLES {
        if !table_exists(conn, table).await? {
            tracing::error!(target: TRACING_TARGET_MIGRATION, table, "Required table is missing");
            return Err(PgError::Migration(
                format!("Required table {table} does not exist").into(),
            ));
        }
    }

    tracing::debug!(target: TRACING_TARGET_MIGRATION, "Schema integrity verified");
    Ok(())
}

/// Resolves the name through the connection's `search_path`.
async fn table_exists(conn: &mut AsyncPgConnection, table: &str) -> PgResult<bool> {
    let row = sql_query("SELECT to_regclass($1) IS NOT NULL AS exists")
        .bind::<diesel::sql_types::Text, _>(table)
        .get_result::<Exists>(conn)
        .await
        .map_err(|e| PgError::Migration(format!("Failed to look up table {table}: {e}").into()))?;

    Ok(row.exists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_the_prefixes_migration() {
        let versions = embedded_versions().expect("embedded migrations should load");
        assert_eq!(versions.len(), 1);
        assert!(versions[0].starts_with("2025"));
    }
}
