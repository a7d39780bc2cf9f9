//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use ipam_server::handler::routes;
//! use ipam_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example(config: ServiceConfig) -> anyhow::Result<()> {
//! let state = ServiceState::from_config(&config).await?;
//! let router = routes(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod monitors;
mod prefixes;
pub mod request;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with every route, the 404 fallback and `state`.
pub fn routes(state: ServiceState) -> Router {
    Router::new()
        .merge(prefixes::routes())
        .merge(monitors::routes())
        .fallback(handler)
        .with_state(state)
}

#[cfg(test)]
mod test {
    use axum_test::TestServer;
    use serde_json::json;

    use crate::handler::routes;
    use crate::service::{MockPrefixStore, ServiceState};

    /// Returns a new [`TestServer`] over the given store.
    pub fn create_test_server_with_store(store: MockPrefixStore) -> anyhow::Result<TestServer> {
        let state = ServiceState::from_store(store);
        let server = TestServer::new(routes(state))?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] over an empty in-memory store.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_store(MockPrefixStore::new())
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server()?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/ipam/unknown").expect_failure().await;
        response.assert_status_not_found();
        response.assert_json(&json!({"error": "Resource not found."}));
        Ok(())
    }
}
