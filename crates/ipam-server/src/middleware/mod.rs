//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Security: cross-origin policy and request body limit.
//! - Observability: request ids, request/response tracing, header redaction.
//! - Recovery: request timeout and panic handling.
//!
//! ```rust,no_run
//! use axum::Router;
//! use ipam_server::middleware::{
//!     CorsConfig, RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_security(&CorsConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;
mod security;

pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, MAX_BODY_SIZE, RouterSecurityExt};

/// Tracing target for middleware that rejects or recovers requests.
pub const TRACING_TARGET_MIDDLEWARE: &str = "ipam_server::middleware";
