//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary and applied at startup through
//! [`PgClientMigrationExt::run_pending_migrations`]. Applying them twice is a
//! no-op, and a `prefixes` table created by an earlier deployment is adopted
//! as-is.

mod client_ext;
mod migrate_result;
mod run_migration;
mod run_utility;

pub use client_ext::PgClientMigrationExt;
pub use migrate_result::{MigrationResult, MigrationStatus};
pub use run_migration::run_pending_migrations;
pub use run_utility::{
    embedded_versions, get_applied_migrations, get_migration_status, verify_schema_integrity,
};
