//! Request extractors that reject with the crate's HTTP [`Error`].
//!
//! [`Error`]: crate::handler::Error

mod json;

pub use crate::extract::json::Json;
