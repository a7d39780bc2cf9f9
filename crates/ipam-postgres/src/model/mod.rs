//! Diesel models for the `prefixes` table.

mod prefix;

pub use prefix::{NewPrefix, Prefix};
