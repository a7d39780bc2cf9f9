//! Cross-origin policy and request body limit.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{self, HeaderValue};
use axum::http::Method;
#[cfg(feature = "config")]
use clap::{ArgAction, Args};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::TRACING_TARGET_MIDDLEWARE;
use crate::{Error, Result};

/// Largest accepted request body in bytes (1 MiB).
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Wildcard entry of [`CorsConfig::allowed_origins`].
const ANY_ORIGIN: &str = "*";

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers the cross-origin policy and the body size limit.
    fn with_security(self, cors: &CorsConfig) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig) -> Self {
        let cors_layer = CorsLayer::new()
            .allow_origin(cors.allow_origin())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::ORIGIN, header::CONTENT_TYPE])
            .allow_credentials(cors.allow_credentials)
            .max_age(cors.max_age());

        self.layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
            .layer(cors_layer)
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
///
/// An empty origin list, or one containing `*`, admits every origin. The
/// request origin is mirrored back instead of answering with a literal `*`,
/// which browsers reject when credentials are allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// Allowed CORS origins, comma separated (empty or `*` allows any)
    #[cfg_attr(
        feature = "config",
        arg(long = "cors-origins", env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "cors-max-age", env = "CORS_MAX_AGE", default_value_t = 3600)
    )]
    pub max_age_seconds: u64,

    /// Whether to allow credentials in CORS requests
    #[cfg_attr(
        feature = "config",
        arg(
            long = "cors-allow-credentials",
            env = "CORS_ALLOW_CREDENTIALS",
            default_value_t = true,
            action = ArgAction::Set
        )
    )]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Restricts cross-origin access to the given origins.
    pub fn with_origins<I, O>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the CORS max age as a Duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Whether every origin is admitted.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty()
            || self
                .allowed_origins
                .iter()
                .any(|origin| origin.trim() == ANY_ORIGIN)
    }

    /// Checks that every configured origin is a valid header value.
    pub fn validate(&self) -> Result<()> {
        for origin in &self.allowed_origins {
            let origin = origin.trim();
            if origin != ANY_ORIGIN && HeaderValue::from_str(origin).is_err() {
                return Err(Error::config(format!("Invalid CORS origin: {origin:?}")));
            }
        }

        Ok(())
    }

    /// Builds the origin policy for [`CorsLayer`].
    pub fn allow_origin(&self) -> AllowOrigin {
        if self.allows_any_origin() {
            return AllowOrigin::mirror_request();
        }

        let origins = self
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(
                        target: TRACING_TARGET_MIDDLEWARE,
                        origin = %origin,
                        "Ignoring invalid CORS origin"
                    );
                    None
                }
            })
            .collect::<Vec<_>>();

        AllowOrigin::list(origins)
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, post};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::extract::Json;

    fn router(cors: &CorsConfig) -> Router {
        Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/echo", post(|Json(body): Json<Value>| async move { Json(body) }))
            .with_security(cors)
    }

    fn post_echo(body: Vec<u8>) -> anyhow::Result<Request<Body>> {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;
        Ok(request)
    }

    fn preflight(origin: &str) -> anyhow::Result<Request<Body>> {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/health")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())?;
        Ok(request)
    }

    #[test]
    fn empty_or_wildcard_allows_any_origin() {
        assert!(CorsConfig::default().allows_any_origin());
        assert!(CorsConfig::default().with_origins(["*"]).allows_any_origin());
        assert!(
            !CorsConfig::default()
                .with_origins(["http://localhost:3000"])
                .allows_any_origin()
        );
    }

    #[test]
    fn validate_rejects_garbage_origins() {
        let config = CorsConfig::default().with_origins(["http://ok.example", "bad\norigin"]);
        assert!(config.validate().is_err());
        assert!(CorsConfig::default().with_origins(["*"]).validate().is_ok());
    }

    #[tokio::test]
    async fn any_origin_is_mirrored_with_credentials() -> anyhow::Result<()> {
        let response = router(&CorsConfig::default())
            .oneshot(preflight("http://frontend.example")?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://frontend.example"))
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            Some(&HeaderValue::from_static("true"))
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_MAX_AGE),
            Some(&HeaderValue::from_static("3600"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn listed_origin_is_allowed() -> anyhow::Result<()> {
        let config = CorsConfig::default().with_origins(["http://localhost:3000"]);
        let response = router(&config)
            .oneshot(preflight("http://localhost:3000")?)
            .await?;

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:3000"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_cors_headers() -> anyhow::Result<()> {
        let config = CorsConfig::default().with_origins(["http://localhost:3000"]);
        let response = router(&config)
            .oneshot(preflight("http://evil.example")?)
            .await?;

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
        Ok(())
    }

    #[tokio::test]
    async fn credentials_can_be_disabled() -> anyhow::Result<()> {
        let config = CorsConfig {
            allow_credentials: false,
            ..CorsConfig::default()
        };
        let response = router(&config)
            .oneshot(preflight("http://frontend.example")?)
            .await?;

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .is_none()
        );
        Ok(())
    }

    #[tokio::test]
    async fn body_within_limit_is_accepted() -> anyhow::Result<()> {
        let response = router(&CorsConfig::default())
            .oneshot(post_echo(br#"{"cidr": "10.0.0.0/24"}"#.to_vec())?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() -> anyhow::Result<()> {
        let mut body = br#"{"cidr": ""#.to_vec();
        body.extend(std::iter::repeat_n(b'a', MAX_BODY_SIZE));
        body.extend_from_slice(br#""}"#);

        let response = router(&CorsConfig::default())
            .oneshot(post_echo(body)?)
            .await?;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        Ok(())
    }
}
