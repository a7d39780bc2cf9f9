//! Application state and dependency injection.

mod config;
mod registry;
mod state;

pub use crate::service::config::ServiceConfig;
#[cfg(any(test, feature = "mock"))]
pub use crate::service::registry::MockPrefixStore;
pub use crate::service::registry::{PrefixRegistry, PrefixStore, StoreError, StoreResult};
pub use crate::service::state::ServiceState;
pub use crate::{Error, Result};

/// Tracing target for the prefix registry.
pub const TRACING_TARGET_REGISTRY: &str = "ipam_server::service::registry";

/// Tracing target for service state construction.
pub const TRACING_TARGET_STATE: &str = "ipam_server::service::state";
