use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use futures::TryStreamExt;

use crate::model::{NewPrefix, Prefix};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Insert and list operations over the `prefixes` table.
pub trait PrefixRepository {
    /// Inserts one record; the generated id is not read back.
    fn create_prefix(&mut self, new_prefix: NewPrefix) -> impl Future<Output = PgResult<()>> + Send;

    /// Returns every stored prefix in the order the database yields them.
    ///
    /// No ordering is requested. The row stream lives only for the duration
    /// of this call and is dropped on both the success and the error path.
    fn list_prefixes(&mut self) -> impl Future<Output = PgResult<Vec<Prefix>>> + Send;
}

impl PrefixRepository for PgConnection {
    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY, fields(cidr = %new_prefix.cidr))]
    async fn create_prefix(&mut self, new_prefix: NewPrefix) -> PgResult<()> {
        use schema::prefixes;

        let inserted = diesel::insert_into(prefixes::table)
            .values(&new_prefix)
            .execute(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, inserted, "Prefix inserted");
        Ok(())
    }

    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY)]
    async fn list_prefixes(&mut self) -> PgResult<Vec<Prefix>> {
        use schema::prefixes;

        let rows = prefixes::table
            .select(Prefix::as_select())
            .load_stream::<Prefix>(self)
            .await
            .map_err(PgError::from)?;

        let prefixes: Vec<Prefix> = rows.try_collect().await.map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, count = prefixes.len(), "Prefixes listed");
        Ok(prefixes)
    }
}
