use std::borrow::Cow;

use ipam_postgres::PgError;
use ipam_postgres::model::{NewPrefix, Prefix};

/// Failure reported by a [`PrefixStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The Postgres store failed.
    #[error(transparent)]
    Postgres(#[from] PgError),

    /// The store refused or could not complete the operation.
    #[error("prefix store unavailable: {0}")]
    Unavailable(Cow<'static, str>),
}

impl StoreError {
    /// Creates an [`StoreError::Unavailable`] error.
    pub fn unavailable(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Unavailable(reason.into())
    }
}

/// Specialized [`Result`] type for store operations.
pub type StoreResult<T, E = StoreError> = Result<T, E>;

/// Persistence behind the prefix registry.
///
/// Implementations must release any per-call resource, such as a pooled
/// connection or an open row cursor, before returning on every path.
#[async_trait::async_trait]
pub trait PrefixStore: Send + Sync + 'static {
    /// Persists one record with a single insert.
    async fn insert_prefix(&self, prefix: NewPrefix) -> StoreResult<()>;

    /// Reads every stored record in store-defined order.
    async fn list_prefixes(&self) -> StoreResult<Vec<Prefix>>;
}
