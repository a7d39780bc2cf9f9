use std::fmt;
use std::sync::Arc;

use ipam_postgres::model::{NewPrefix, Prefix};
use serde_json::Value;

use super::{PrefixStore, StoreResult};
use crate::service::TRACING_TARGET_REGISTRY;

/// Registers prefixes and lists them back.
///
/// There is no allocation logic: the CIDR is stored verbatim, never parsed,
/// and duplicates or overlaps are accepted.
#[derive(Clone)]
pub struct PrefixRegistry {
    store: Arc<dyn PrefixStore>,
}

impl PrefixRegistry {
    pub fn new(store: Arc<dyn PrefixStore>) -> Self {
        Self { store }
    }

    /// Records `cidr` with the given tags and status `active`.
    ///
    /// The generated id is not read back.
    #[tracing::instrument(skip(self, tags), target = TRACING_TARGET_REGISTRY)]
    pub async fn allocate(&self, cidr: &str, tags: Option<Value>) -> StoreResult<()> {
        let new_prefix = NewPrefix::new(cidr, tags);
        self.store.insert_prefix(new_prefix).await?;

        tracing::info!(target: TRACING_TARGET_REGISTRY, cidr, "Prefix allocated");
        Ok(())
    }

    /// Returns every registered prefix in store order.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_REGISTRY)]
    pub async fn list(&self) -> StoreResult<Vec<Prefix>> {
        let prefixes = self.store.list_prefixes().await?;

        tracing::debug!(target: TRACING_TARGET_REGISTRY, count = prefixes.len(), "Prefixes listed");
        Ok(prefixes)
    }
}

impl fmt::Debug for PrefixRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::service::{MockPrefixStore, StoreError};

    fn registry(store: &MockPrefixStore) -> PrefixRegistry {
        PrefixRegistry::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn allocate_then_list_returns_the_record() -> anyhow::Result<()> {
        let store = MockPrefixStore::new();
        let registry = registry(&store);

        registry
            .allocate("10.0.0.0/24", Some(json!({"segment": "finance"})))
            .await?;

        let prefixes = registry.list().await?;
        assert_eq!(prefixes.len(), 1);
        assert_eq!(prefixes[0].cidr, "10.0.0.0/24");
        assert_eq!(prefixes[0].tags, Some(json!({"segment": "finance"})));
        Ok(())
    }

    #[tokio::test]
    async fn allocated_records_are_active() -> anyhow::Result<()> {
        let store = MockPrefixStore::new();
        let registry = registry(&store);

        registry.allocate("10.0.0.0/24", None).await?;
        registry.allocate("10.0.1.0/24", Some(json!([]))).await?;

        let statuses = store.statuses().await;
        assert_eq!(statuses, vec!["active".to_owned(), "active".to_owned()]);
        Ok(())
    }

    #[tokio::test]
    async fn duplicates_are_accepted() -> anyhow::Result<()> {
        let store = MockPrefixStore::new();
        let registry = registry(&store);

        registry.allocate("10.0.0.0/24", None).await?;
        registry.allocate("10.0.0.0/24", None).await?;

        let prefixes = registry.list().await?;
        assert_eq!(prefixes.len(), 2);
        assert_ne!(prefixes[0].id, prefixes[1].id);
        Ok(())
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() -> anyhow::Result<()> {
        let store = MockPrefixStore::new();
        assert!(registry(&store).list().await?.is_empty());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_allocations_get_distinct_ids() -> anyhow::Result<()> {
        let store = MockPrefixStore::new();
        let registry = registry(&store);

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .allocate(&format!("10.{i}.0.0/16"), Some(json!({"i": i})))
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await??;
        }

        let prefixes = registry.list().await?;
        let ids: HashSet<i32> = prefixes.iter().map(|p| p.id).collect();
        assert_eq!(prefixes.len(), 32);
        assert_eq!(ids.len(), 32);
        Ok(())
    }

    #[tokio::test]
    async fn insert_failure_is_reported() {
        let store = MockPrefixStore::new();
        store.fail_inserts(true);

        let result = registry(&store).allocate("10.0.0.0/24", None).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn list_failure_releases_the_cursor() -> anyhow::Result<()> {
        let store = MockPrefixStore::new();
        let registry = registry(&store);
        registry.allocate("10.0.0.0/24", None).await?;
        registry.allocate("10.0.1.0/24", None).await?;

        store.fail_lists_after(1);
        assert!(registry.list().await.is_err());
        assert_eq!(store.open_cursors(), 0);

        store.fail_lists_after(usize::MAX);
        assert_eq!(registry.list().await?.len(), 2);
        assert_eq!(store.open_cursors(), 0);
        Ok(())
    }
}
