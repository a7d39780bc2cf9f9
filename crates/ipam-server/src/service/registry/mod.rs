//! Prefix allocation and retrieval on top of a pluggable store.

#[cfg(any(test, feature = "mock"))]
mod mock_store;
mod pg_store;
mod prefix_registry;
mod prefix_store;

#[cfg(any(test, feature = "mock"))]
pub use mock_store::MockPrefixStore;
pub use prefix_registry::PrefixRegistry;
pub use prefix_store::{PrefixStore, StoreError, StoreResult};
