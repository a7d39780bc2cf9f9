//! Conversion of store failures into HTTP errors.

use ipam_postgres::PgError;

use crate::handler::{Error, ErrorKind};
use crate::service::StoreError;

/// Tracing target for store failures seen at the HTTP boundary.
const TRACING_TARGET: &str = "ipam_server::handler::store_error";

/// Logs the underlying cause and hides it from the client.
impl From<StoreError> for Error<'static> {
    fn from(error: StoreError) -> Self {
        match &error {
            StoreError::Postgres(pg_error) => log_pg_error(pg_error),
            StoreError::Unavailable(reason) => {
                tracing::error!(target: TRACING_TARGET, reason = %reason, "prefix store unavailable");
            }
        }

        ErrorKind::InternalServerError
            .into_error()
            .with_context(error.to_string())
    }
}

impl From<PgError> for Error<'static> {
    #[inline]
    fn from(error: PgError) -> Self {
        StoreError::from(error).into()
    }
}

fn log_pg_error(error: &PgError) {
    tracing::error!(
        target: TRACING_TARGET,
        error = %error,
        transient = error.is_transient(),
        hint = error.hint().as_deref().unwrap_or_default(),
        "database error"
    );
}
