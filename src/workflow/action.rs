use chrono::Utc;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::platform::types::DispatchRequest;
use crate::platform::Platform;
use crate::poll::{Deadline, Poller};
use crate::workflow::completion::await_completion;
use crate::workflow::correlate::correlate;
use crate::workflow::types::{ActionOutcome, Conclusion};

/// Dispatch the configured workflow and wait for the resulting run to finish.
///
/// Returns the run's conclusion whatever it is; use
/// [`ActionOutcome::ensure_success`] to turn a non-success conclusion into an
/// error.
pub async fn run_action(platform: &dyn Platform, config: &AppConfig) -> Result<ActionOutcome> {
    let owner = config.owner.as_str();
    let repo = config.repository.as_str();
    let poller = Poller::new(config.poll_interval()?, config.retry_transport_errors);

    tracing::info!(
        owner = owner,
        repo = repo,
        workflow = %config.workflow,
        branch = %config.branch,
        "Triggering workflow"
    );

    let workflow_id = platform
        .resolve_workflow_id(owner, repo, &config.workflow)
        .await?;

    let request = DispatchRequest {
        owner: owner.to_string(),
        repo: repo.to_string(),
        branch: config.branch.clone(),
        workflow_id,
    };

    // Captured before the dispatch so the new run is guaranteed to start after it
    let valid_after = Utc::now();
    platform.dispatch_run(&request).await?;

    let run = correlate(
        platform,
        owner,
        repo,
        workflow_id,
        valid_after,
        &poller,
        Deadline::after(config.correlation_timeout()?),
    )
    .await?;

    tracing::info!(
        workflow_id = workflow_id,
        run_id = run.id,
        "Obtained run, awaiting completion"
    );

    let conclusion = await_completion(
        platform,
        owner,
        repo,
        run.id,
        &poller,
        Deadline::after(config.completion_timeout()?),
    )
    .await?;

    Ok(ActionOutcome {
        workflow_id,
        run_id: run.id,
        conclusion,
    })
}

impl ActionOutcome {
    /// Succeed only when the run concluded with exactly `success`.
    pub fn ensure_success(self) -> Result<Self> {
        if self.conclusion.is_success() {
            tracing::info!(run_id = self.run_id, "Workflow run successfully completed");
            return Ok(self);
        }

        match self.conclusion {
            Conclusion::TimedOut => {
                tracing::warn!(run_id = self.run_id, "Workflow run timed out");
                Err(AppError::RunTimedOut {
                    run_id: self.run_id,
                    sentinel: Conclusion::TimedOut.to_string(),
                })
            }
            Conclusion::Reported(conclusion) => {
                tracing::warn!(
                    run_id = self.run_id,
                    conclusion = %conclusion,
                    "Workflow run conclusion does not indicate success"
                );
                Err(AppError::RunFailed {
                    run_id: self.run_id,
                    conclusion,
                })
            }
        }
    }
}
