//! Value types shared between the models and their callers.

mod prefix_status;

pub use prefix_status::PrefixStatus;
