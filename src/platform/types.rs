use chrono::{DateTime, Utc};

/// Status string GitHub reports once a run has reached a terminal state.
pub const STATUS_COMPLETED: &str = "completed";

/// A request to start a new run of a workflow on a branch.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub workflow_id: u64,
}

/// Snapshot of a single workflow run as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub id: u64,
    pub workflow_id: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub status: String,
    pub conclusion: Option<String>,
}

impl RunRecord {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}
