//! Request types for HTTP handlers.

mod prefixes;

pub use prefixes::*;
