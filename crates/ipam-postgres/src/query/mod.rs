//! Repository traits implemented for [`PgConnection`].
//!
//! [`PgConnection`]: crate::PgConnection

mod prefix;

pub use prefix::PrefixRepository;
