use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::platform::types::RunRecord;

/// `GET /repos/{owner}/{repo}/actions/workflows/{workflow}`
#[derive(Debug, Deserialize)]
pub struct WorkflowPayload {
    pub id: Option<u64>,
}

/// `GET /repos/{owner}/{repo}/actions/runs`
#[derive(Debug, Deserialize)]
pub struct RunListPayload {
    #[serde(default)]
    pub workflow_runs: Vec<RunPayload>,
}

/// A single workflow run, as embedded in listings or fetched by id.
#[derive(Debug, Deserialize)]
pub struct RunPayload {
    pub id: u64,
    pub workflow_id: u64,
    pub run_started_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub conclusion: Option<String>,
}

/// Map an API run payload to our platform RunRecord type.
pub fn map_run(run: RunPayload) -> RunRecord {
    RunRecord {
        id: run.id,
        workflow_id: run.workflow_id,
        started_at: run.run_started_at,
        status: run.status.unwrap_or_default(),
        conclusion: run.conclusion,
    }
}

pub fn map_run_list(list: RunListPayload) -> Vec<RunRecord> {
    list.workflow_runs.into_iter().map(map_run).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_map_run_list() {
        let body = r#"{
            "total_count": 2,
            "workflow_runs": [
                {
                    "id": 555,
                    "workflow_id": 42,
                    "run_started_at": "2026-10-15T12:00:02Z",
                    "status": "queued",
                    "conclusion": null,
                    "head_branch": "main"
                },
                {
                    "id": 554,
                    "workflow_id": 7,
                    "run_started_at": "2026-10-15T11:00:00Z",
                    "status": "completed",
                    "conclusion": "failure"
                }
            ]
        }"#;

        let list: RunListPayload = serde_json::from_str(body).unwrap();
        let runs = map_run_list(list);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].id, 555);
        assert_eq!(runs[0].workflow_id, 42);
        assert_eq!(
            runs[0].started_at,
            Some(Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 2).unwrap())
        );
        assert!(!runs[0].is_completed());
        assert!(runs[1].is_completed());
        assert_eq!(runs[1].conclusion.as_deref(), Some("failure"));
    }

    #[test]
    fn test_missing_status_maps_to_empty() {
        let body = r#"{"id": 1, "workflow_id": 2}"#;
        let run = map_run(serde_json::from_str(body).unwrap());
        assert_eq!(run.status, "");
        assert_eq!(run.started_at, None);
        assert!(!run.is_completed());
    }

    #[test]
    fn test_workflow_without_id() {
        let body = r#"{"message": "Not Found"}"#;
        let workflow: WorkflowPayload = serde_json::from_str(body).unwrap();
        assert!(workflow.id.is_none());
    }
}
