//! Liveness handler.

use axum::Router;
use axum::routing::get;

use crate::extract::Json;
use crate::handler::response::MonitorStatus;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "ipam_server::handler::monitors";

/// Reports that the process is up. The database is not consulted.
async fn health_status() -> Json<MonitorStatus> {
    tracing::trace!(target: TRACING_TARGET, "Health status requested");
    Json(MonitorStatus::ok())
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn health_is_ok() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({"status": "ok"}));
        Ok(())
    }

    #[tokio::test]
    async fn health_ignores_store_failures() -> anyhow::Result<()> {
        let store = crate::service::MockPrefixStore::new();
        store.fail_lists(true);
        store.fail_inserts(true);
        let server = crate::handler::test::create_test_server_with_store(store)?;

        server.get("/health").await.assert_status_ok();
        Ok(())
    }
}
