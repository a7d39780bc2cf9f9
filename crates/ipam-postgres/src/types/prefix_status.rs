use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Lifecycle state stored in `prefixes.status`.
///
/// Only [`PrefixStatus::Active`] is ever written; the column is not updated
/// after insertion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PrefixStatus {
    /// The prefix is registered and in use.
    #[default]
    Active,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn active_renders_lowercase() {
        assert_eq!(PrefixStatus::Active.to_string(), "active");
        assert_eq!(PrefixStatus::Active.as_ref(), "active");
        assert_eq!(PrefixStatus::default(), PrefixStatus::Active);
    }

    #[test]
    fn parses_stored_value() {
        assert_eq!(PrefixStatus::from_str("active").ok(), Some(PrefixStatus::Active));
        assert!(PrefixStatus::from_str("retired").is_err());
    }
}
