//! Pooled PostgreSQL client for the prefix store.
//!
//! [`PgConfig`] describes how to reach the database, [`PgClient`] owns the
//! connection pool, and the [`migrate`] module provisions the `prefixes` table.

pub(crate) mod custom_hooks;
pub mod migrate;
mod pg_client;
mod pg_config;
mod pool_status;

use deadpool::managed::{Object, Pool};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
pub use migrate::{
    MigrationResult, MigrationStatus, PgClientMigrationExt, get_applied_migrations,
    get_migration_status, run_pending_migrations, verify_schema_integrity,
};
pub use pg_client::{PgClient, PgConn};
pub use pg_config::PgConfig;
pub use pool_status::PgPoolStatus;

/// Connection pool shared by every request handled by the registry.
pub type ConnectionPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// A connection checked out of [`ConnectionPool`].
pub type PooledConnection = Object<AsyncDieselConnectionManager<AsyncPgConnection>>;
