use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::platform::types::*;
use crate::platform::Platform;

use super::mapper::{self, RunListPayload, RunPayload, WorkflowPayload};

/// Runs requested per listing. A freshly dispatched run sits near the top,
/// so one page is enough even on busy repositories.
const RUNS_PER_PAGE: u8 = 50;

#[derive(Serialize)]
struct ListRunsQuery {
    per_page: u8,
}

pub struct GitHubPlatform {
    client: Octocrab,
}

impl GitHubPlatform {
    /// Build a client against `api_url` that sends `token` as a bearer credential.
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .base_uri(api_url)
            .map_err(|e| AppError::Config(format!("Invalid API URL '{api_url}': {e}")))?
            .personal_token(token.to_string())
            .build()
            .map_err(|e| AppError::GitHubApi(format!("Failed to build octocrab client: {e}")))?;

        Ok(Self { client })
    }
}

fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(error, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

#[async_trait]
impl Platform for GitHubPlatform {
    async fn resolve_workflow_id(&self, owner: &str, repo: &str, workflow: &str) -> Result<u64> {
        let not_found = || AppError::WorkflowNotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
            workflow: workflow.to_string(),
        };

        let url = format!(
            "/repos/{owner}/{repo}/actions/workflows/{}",
            urlencoding::encode(workflow)
        );
        let response: WorkflowPayload = match self.client.get(&url, None::<&()>).await {
            Ok(response) => response,
            Err(e) if is_not_found(&e) => return Err(not_found()),
            Err(e) => {
                return Err(AppError::GitHubApi(format!(
                    "Failed to look up workflow '{workflow}': {e}"
                )))
            }
        };

        response.id.ok_or_else(not_found)
    }

    async fn list_recent_runs(&self, owner: &str, repo: &str) -> Result<Vec<RunRecord>> {
        let url = format!("/repos/{owner}/{repo}/actions/runs");
        let response: RunListPayload = self
            .client
            .get(
                &url,
                Some(&ListRunsQuery {
                    per_page: RUNS_PER_PAGE,
                }),
            )
            .await
            .map_err(|e| AppError::GitHubApi(format!("Failed to list workflow runs: {e}")))?;

        Ok(mapper::map_run_list(response))
    }

    async fn dispatch_run(&self, request: &DispatchRequest) -> Result<()> {
        self.client
            .actions()
            .create_workflow_dispatch(
                &request.owner,
                &request.repo,
                request.workflow_id.to_string(),
                &request.branch,
            )
            .send()
            .await
            .map_err(|e| AppError::Dispatch {
                workflow_id: request.workflow_id,
                branch: request.branch.clone(),
                message: e.to_string(),
            })
    }

    async fn get_run(&self, owner: &str, repo: &str, run_id: u64) -> Result<RunRecord> {
        let url = format!("/repos/{owner}/{repo}/actions/runs/{run_id}");
        let response: RunPayload = self
            .client
            .get(&url, None::<&()>)
            .await
            .map_err(|e| AppError::GitHubApi(format!("Failed to fetch run {run_id}: {e}")))?;

        Ok(mapper::map_run(response))
    }
}
