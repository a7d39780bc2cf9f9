//! Application state and dependency injection.

use std::sync::Arc;

use crate::service::{PrefixRegistry, PrefixStore, Result, ServiceConfig, TRACING_TARGET_STATE};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    prefix_registry: PrefixRegistry,
}

impl ServiceState {
    /// Connects to the prefix store described by `config`.
    ///
    /// Fails when the database is unreachable or cannot be migrated.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let pg_client = config.connect_postgres().await?;
        tracing::debug!(target: TRACING_TARGET_STATE, client = ?pg_client, "Service state initialized");
        Ok(Self::from_store(pg_client))
    }

    /// Builds the state around an already constructed store.
    pub fn from_store(store: impl PrefixStore) -> Self {
        Self {
            prefix_registry: PrefixRegistry::new(Arc::new(store)),
        }
    }

    #[inline]
    pub fn prefix_registry(&self) -> &PrefixRegistry {
        &self.prefix_registry
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(prefix_registry: PrefixRegistry);
