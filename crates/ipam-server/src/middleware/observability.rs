//! Request ids, request/response tracing and header redaction.

use axum::Router;
use axum::http::header::{self, HeaderName};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Header carrying the per-request id, generated when the client sends none.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers request tracing and logging.
    ///
    /// Every request gets an `x-request-id` (kept when supplied), one span
    /// with the method, URI and request headers, and a completion event with
    /// status and latency. The id is echoed on the response, and credential
    /// headers are redacted from logs.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(true))
            .on_response(DefaultOnResponse::new().level(Level::INFO));

        self.layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetSensitiveRequestHeadersLayer::new([
                header::AUTHORIZATION,
                header::COOKIE,
            ]))
            .layer(trace_layer)
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    fn server() -> anyhow::Result<TestServer> {
        let router = Router::new()
            .route("/health", get(|| async { "ok" }))
            .with_observability();
        Ok(TestServer::new(router)?)
    }

    #[tokio::test]
    async fn generates_request_id() -> anyhow::Result<()> {
        let server = server()?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let request_id = response.header(REQUEST_ID_HEADER);
        assert!(!request_id.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn generated_ids_are_unique() -> anyhow::Result<()> {
        let server = server()?;

        let first = server.get("/health").await.header(REQUEST_ID_HEADER);
        let second = server.get("/health").await.header(REQUEST_ID_HEADER);
        assert_ne!(first, second);
        Ok(())
    }
}
