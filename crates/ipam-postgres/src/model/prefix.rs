use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::prefixes;
use crate::types::PrefixStatus;

/// A registered prefix as returned by the list query.
///
/// `status` is stored but intentionally not selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = prefixes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Prefix {
    /// Identifier assigned by the database.
    pub id: i32,
    /// Address block exactly as submitted.
    pub cidr: String,
    /// Caller metadata, stored and returned without inspection.
    pub tags: Option<Value>,
}

/// A prefix about to be inserted.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = prefixes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPrefix {
    pub cidr: String,
    pub tags: Option<Value>,
    status: String,
}

impl NewPrefix {
    /// Creates an insertable record; the status is always [`PrefixStatus::Active`].
    ///
    /// A JSON `null` for `tags` is stored as SQL `NULL`.
    pub fn new(cidr: impl Into<String>, tags: Option<Value>) -> Self {
        Self {
            cidr: cidr.into(),
            tags: tags.filter(|tags| !tags.is_null()),
            status: PrefixStatus::Active.to_string(),
        }
    }

    /// Status the record will be written with.
    pub fn status(&self) -> &str {
        &self.status
    }
}
