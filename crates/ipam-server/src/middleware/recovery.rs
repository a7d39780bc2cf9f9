//! Request timeout and panic recovery.

use std::any::Any;
use std::future::ready;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
#[cfg(feature = "config")]
use clap::Args;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{Error, ErrorKind};

/// Tracing target for error recovery.
const TRACING_TARGET_ERROR: &str = "ipam_server::recovery::error";

/// Tracing target for panic recovery.
const TRACING_TARGET_PANIC: &str = "ipam_server::recovery::panic";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

type ResponseFut = BoxFuture<'static, Response>;
type Panic = Box<dyn Any + Send + 'static>;

/// Configuration for recovery middleware behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Seconds a request may run before it is answered with 504 (0 disables)
    #[cfg_attr(
        feature = "config",
        arg(
            long = "request-timeout",
            env = "REQUEST_TIMEOUT",
            default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
        )
    )]
    pub request_timeout: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RecoveryConfig {
    /// Creates a new configuration with the specified request timeout in seconds.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            request_timeout: secs,
        }
    }

    /// Returns the request timeout, or `None` when timeouts are disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout > 0).then(|| Duration::from_secs(self.request_timeout))
    }
}

/// Extension trait for `axum::`[`Router`] to apply recovery middleware.
pub trait RouterRecoveryExt<S> {
    /// Layers timeout and panic recovery with the provided configuration.
    ///
    /// A request that exceeds the timeout is answered with 504; a handler
    /// panic is answered with 500 and the process keeps serving.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        let Some(timeout) = config.request_timeout() else {
            return self.layer(CatchPanicLayer::custom(catch_panic));
        };

        let middlewares = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_error))
            .layer(CatchPanicLayer::custom(catch_panic))
            .layer(TimeoutLayer::new(timeout));

        self.layer(middlewares)
    }
}

fn handle_error(err: tower::BoxError) -> ResponseFut {
    use tower::timeout::error::Elapsed;

    let error = if err.is::<Elapsed>() {
        tracing::error!(
            target: TRACING_TARGET_ERROR,
            error = %err,
            "request timeout exceeded"
        );

        ErrorKind::GatewayTimeout.with_context("request exceeded the configured timeout")
    } else {
        tracing::error!(
            target: TRACING_TARGET_ERROR,
            error = %err,
            "unknown middleware error"
        );

        ErrorKind::InternalServerError.with_context(err.to_string())
    };

    ready(error.into_response()).boxed()
}

fn catch_panic(err: Panic) -> Response {
    if let Some(error) = err.downcast_ref::<Error<'static>>() {
        tracing::error!(
            target: TRACING_TARGET_PANIC,
            error = %error,
            "service panic"
        );
        return error.clone().into_response();
    }

    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    tracing::error!(
        target: TRACING_TARGET_PANIC,
        message = %message,
        "service panic"
    );

    ErrorKind::InternalServerError.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;
    use serde_json::json;

    use super::*;

    async fn panicking() -> &'static str {
        panic!("handler exploded")
    }

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "done"
    }

    fn server(config: &RecoveryConfig) -> anyhow::Result<TestServer> {
        let router = Router::new()
            .route("/panic", get(panicking))
            .route("/slow", get(slow))
            .route("/ok", get(|| async { "ok" }))
            .with_recovery(config);
        Ok(TestServer::new(router)?)
    }

    #[test]
    fn zero_disables_timeout() {
        assert_eq!(RecoveryConfig::with_timeout_secs(0).request_timeout(), None);
        assert_eq!(
            RecoveryConfig::default().request_timeout(),
            Some(Duration::from_secs(30))
        );
    }

    #[tokio::test]
    async fn panic_becomes_internal_error() -> anyhow::Result<()> {
        let server = server(&RecoveryConfig::default())?;

        let response = server.get("/panic").expect_failure().await;
        response.assert_status_internal_server_error();
        response.assert_json(&json!({"error": "Internal server error."}));

        server.get("/ok").await.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn panic_is_caught_without_timeout() -> anyhow::Result<()> {
        let server = server(&RecoveryConfig::with_timeout_secs(0))?;

        let response = server.get("/panic").expect_failure().await;
        response.assert_status_internal_server_error();
        Ok(())
    }

    #[tokio::test]
    async fn slow_request_times_out() -> anyhow::Result<()> {
        let server = server(&RecoveryConfig::with_timeout_secs(1))?;

        let response = server.get("/slow").expect_failure().await;
        response.assert_status(StatusCode::GATEWAY_TIMEOUT);
        response.assert_json(&json!({"error": "Request timed out."}));
        Ok(())
    }
}
