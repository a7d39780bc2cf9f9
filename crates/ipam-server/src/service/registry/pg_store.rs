use ipam_postgres::PgClient;
use ipam_postgres::model::{NewPrefix, Prefix};
use ipam_postgres::query::PrefixRepository;

use super::{PrefixStore, StoreResult};

/// Each call checks out its own pooled connection and returns it on drop.
#[async_trait::async_trait]
impl PrefixStore for PgClient {
    async fn insert_prefix(&self, prefix: NewPrefix) -> StoreResult<()> {
        let mut conn = self.get_connection().await?;
        conn.create_prefix(prefix).await?;
        Ok(())
    }

    async fn list_prefixes(&self) -> StoreResult<Vec<Prefix>> {
        let mut conn = self.get_connection().await?;
        let prefixes = conn.list_prefixes().await?;
        Ok(prefixes)
    }
}
