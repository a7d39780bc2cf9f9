//! Response types for HTTP handlers.

mod errors;
mod monitors;
mod prefixes;

pub use errors::*;
pub use monitors::*;
pub use prefixes::*;
