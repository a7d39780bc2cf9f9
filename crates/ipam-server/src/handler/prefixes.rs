//! Prefix allocation and listing handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;

use crate::extract::Json;
use crate::handler::request::AllocatePrefix;
use crate::handler::response::{AllocatedPrefix, Prefix, Prefixes};
use crate::handler::{Error, Result};
use crate::service::{PrefixRegistry, ServiceState};

/// Tracing target for prefix operations.
const TRACING_TARGET: &str = "ipam_server::handler::prefixes";

/// Registers a prefix.
#[tracing::instrument(skip_all)]
async fn allocate_prefix(
    State(prefix_registry): State<PrefixRegistry>,
    Json(request): Json<AllocatePrefix>,
) -> Result<(StatusCode, Json<AllocatedPrefix>)> {
    tracing::debug!(target: TRACING_TARGET, cidr = %request.cidr, "Allocating prefix");

    prefix_registry
        .allocate(&request.cidr, request.tags)
        .await
        .map_err(|e| Error::from(e).with_message("Failed to allocate prefix"))?;

    tracing::info!(target: TRACING_TARGET, cidr = %request.cidr, "Prefix allocated");
    Ok((StatusCode::CREATED, Json(AllocatedPrefix::new(request.cidr))))
}

/// Lists every registered prefix.
#[tracing::instrument(skip_all)]
async fn list_prefixes(
    State(prefix_registry): State<PrefixRegistry>,
) -> Result<(StatusCode, Json<Prefixes>)> {
    let prefixes = prefix_registry
        .list()
        .await
        .map_err(|e| Error::from(e).with_message("Failed to retrieve prefixes"))?;

    let response: Prefixes = prefixes.into_iter().map(Prefix::from).collect();

    tracing::debug!(target: TRACING_TARGET, count = response.len(), "Prefixes retrieved");
    Ok((StatusCode::OK, Json(response)))
}

/// Returns a [`Router`] with all prefix routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/ipam/prefixes", get(list_prefixes).post(allocate_prefix))
}
