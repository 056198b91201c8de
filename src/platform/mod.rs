pub mod github;
pub mod types;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;

use crate::error::Result;
use types::*;

#[async_trait]
pub trait Platform: Send + Sync {
    /// Resolve a workflow file name or id to its numeric workflow id.
    async fn resolve_workflow_id(&self, owner: &str, repo: &str, workflow: &str) -> Result<u64>;

    /// List the most recent runs across all workflows. Order is not guaranteed.
    async fn list_recent_runs(&self, owner: &str, repo: &str) -> Result<Vec<RunRecord>>;

    /// Request a new run. The API accepts asynchronously and returns no run id.
    async fn dispatch_run(&self, request: &DispatchRequest) -> Result<()>;

    /// Fetch the current state of a single run.
    async fn get_run(&self, owner: &str, repo: &str, run_id: u64) -> Result<RunRecord>;
}
