use ipam_postgres::model;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Acknowledgement of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedPrefix {
    /// Always `"Prefix allocated"`.
    pub message: String,
    /// The CIDR exactly as submitted.
    pub cidr: String,
}

impl AllocatedPrefix {
    pub fn new(cidr: impl Into<String>) -> Self {
        Self {
            message: "Prefix allocated".to_owned(),
            cidr: cidr.into(),
        }
    }
}

/// One entry of the prefix listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefix {
    pub id: i32,
    pub cidr: String,
    /// `null` when the prefix was registered without tags.
    pub tags: Option<Value>,
}

impl From<model::Prefix> for Prefix {
    fn from(prefix: model::Prefix) -> Self {
        Self {
            id: prefix.id,
            cidr: prefix.cidr,
            tags: prefix.tags,
        }
    }
}

/// Response body of `GET /ipam/prefixes`.
pub type Prefixes = Vec<Prefix>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn allocated_prefix_body() {
        let value = serde_json::to_value(AllocatedPrefix::new("10.0.0.0/24"))
            .expect("response should serialize");
        assert_eq!(
            value,
            json!({"message": "Prefix allocated", "cidr": "10.0.0.0/24"})
        );
    }

    #[test]
    fn prefix_entry_body() {
        let prefix = Prefix::from(model::Prefix {
            id: 1,
            cidr: "10.0.0.0/24".to_owned(),
            tags: Some(json!({"segment": "finance"})),
        });

        let value = serde_json::to_value(&prefix).expect("response should serialize");
        assert_eq!(
            value,
            json!({"id": 1, "cidr": "10.0.0.0/24", "tags": {"segment": "finance"}})
        );
    }

    #[test]
    fn untagged_prefix_renders_null_tags() {
        let prefix = Prefix::from(model::Prefix {
            id: 2,
            cidr: "192.168.0.0/16".to_owned(),
            tags: None,
        });

        let value = serde_json::to_value(&prefix).expect("response should serialize");
        assert_eq!(value["tags"], Value::Null);
    }
}
