use serde::{Deserialize, Serialize};

/// Liveness response: `{"status":"ok"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub status: String,
}

impl MonitorStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_owned(),
        }
    }
}
