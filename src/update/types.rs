use serde::{Deserialize, Serialize};

/// On-demand snapshot of ingestion progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceStats {
    pub words_total: u64,
    pub words_unique: u64,
    pub comics_fetched: u64,
    /// Comics the source says exist (`last_id - 1`, there is no comic 0).
    pub comics_total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Idle,
    Running,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: UpdateStatus,
}

/// Body returned by the update and drop endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn ok(status: &str) -> Self {
        Self {
            status: status.to_string(),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            status: "failed".to_string(),
            error: Some(error.to_string()),
        }
    }
}
