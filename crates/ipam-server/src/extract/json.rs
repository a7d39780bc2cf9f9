//! JSON extractor whose rejections render as `{"error": ...}`.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Json as AxumJson, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Deref, DerefMut, From};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::handler::{Error, ErrorKind};

/// Upper bound on the length of a parse-error description sent to clients.
const MAX_REJECTION_MESSAGE_LEN: usize = 200;

/// Drop-in replacement for [`axum::Json`].
///
/// The body is decoded as JSON whatever `Content-Type` the client sent. A
/// body that is not JSON or does not match `T` is rejected with 400 and a
/// short description of the parse error. A body over the configured limit is
/// rejected with 413.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Json<T>
where
    T: DeserializeOwned,
{
    /// Decodes `T` from raw body bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error<'static>> {
        serde_json::from_slice(bytes)
            .map(Self::new)
            .map_err(rejection_from_serde)
    }
}

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = <Bytes as FromRequest<S>>::from_request(req, state).await?;
        Self::from_bytes(&bytes)
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    #[inline]
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<BytesRejection> for Error<'static> {
    fn from(rejection: BytesRejection) -> Self {
        let kind = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ErrorKind::PayloadTooLarge
        } else {
            ErrorKind::BadRequest
        };

        kind.with_message(sanitize_error_message(&rejection.body_text()))
            .with_context("failed to buffer request body")
    }
}

fn rejection_from_serde(err: serde_json::Error) -> Error<'static> {
    let context = match err.classify() {
        Category::Data => "JSON data does not match the expected shape",
        Category::Syntax | Category::Eof => "JSON syntax error",
        Category::Io => "failed to read JSON body",
    };

    ErrorKind::BadRequest
        .with_message(sanitize_error_message(&err.to_string()))
        .with_context(context)
}

/// Keeps the first lines of a rejection message, bounded in length.
fn sanitize_error_message(message: &str) -> String {
    let lines = message.lines().take(3).collect::<Vec<_>>();
    lines.join(" ").chars().take(MAX_REJECTION_MESSAGE_LEN).collect()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        cidr: String,
    }

    #[test]
    fn sanitize_joins_and_truncates() {
        assert_eq!(sanitize_error_message("a\nb\nc\nd"), "a b c");

        let long = "x".repeat(500);
        assert_eq!(sanitize_error_message(&long).len(), MAX_REJECTION_MESSAGE_LEN);
    }

    #[test]
    fn json_wraps_and_unwraps() {
        let json = Json::new(7);
        assert_eq!(*json, 7);
        assert_eq!(json.into_inner(), 7);
    }

    #[test]
    fn decodes_from_bytes() {
        let body = Json::<Body>::from_bytes(br#"{"cidr": "10.0.0.0/8"}"#).expect("valid body");
        assert_eq!(body.cidr, "10.0.0.0/8");
    }

    #[test]
    fn syntax_and_data_errors_are_bad_requests() {
        let syntax = Json::<Body>::from_bytes(b"{not json").expect_err("syntax error");
        assert_eq!(syntax.kind(), ErrorKind::BadRequest);
        assert_eq!(syntax.context(), Some("JSON syntax error"));

        let empty = Json::<Body>::from_bytes(b"").expect_err("empty body");
        assert_eq!(empty.kind(), ErrorKind::BadRequest);

        let data = Json::<Body>::from_bytes(br#"{"tags": {}}"#).expect_err("missing field");
        assert_eq!(data.kind(), ErrorKind::BadRequest);
        assert!(data.message().is_some_and(|m| m.contains("cidr")));
    }
}
