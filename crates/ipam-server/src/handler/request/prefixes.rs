use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /ipam/prefixes`.
///
/// `cidr` is required but never validated as an address block. `tags` may be
/// any JSON value, or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatePrefix {
    pub cidr: String,
    #[serde(default)]
    pub tags: Option<Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tags_are_optional() {
        let request: AllocatePrefix =
            serde_json::from_value(json!({"cidr": "10.0.0.0/24"})).expect("should parse");
        assert_eq!(request.tags, None);
    }

    #[test]
    fn tags_accept_any_json() {
        let request: AllocatePrefix =
            serde_json::from_value(json!({"cidr": "x", "tags": [1, "two", null]}))
                .expect("should parse");
        assert_eq!(request.tags, Some(json!([1, "two", null])));
    }

    #[test]
    fn cidr_is_required() {
        let result = serde_json::from_value::<AllocatePrefix>(json!({"tags": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn cidr_must_be_a_string() {
        let result = serde_json::from_value::<AllocatePrefix>(json!({"cidr": 10}));
        assert!(result.is_err());
    }
}
