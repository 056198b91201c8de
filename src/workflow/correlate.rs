use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::platform::types::RunRecord;
use crate::platform::Platform;
use crate::poll::{Deadline, PollOutcome, Poller};

/// Find the run a dispatch produced.
///
/// The dispatch API returns no run id, so the only disambiguator is the
/// start time: the run must belong to `workflow_id` and have started strictly
/// after `valid_after`. When several runs qualify the first one in listing
/// order wins; GitHub does not document that order, so this is a best effort.
///
/// `run_started_at` has whole-second precision and `valid_after` does not,
/// so a run started within the same wall-clock second as the dispatch never
/// matches and correlation times out.
pub fn find_matching_run(
    runs: &[RunRecord],
    workflow_id: u64,
    valid_after: DateTime<Utc>,
) -> Option<&RunRecord> {
    runs.iter().find(|run| {
        run.workflow_id == workflow_id
            && run.started_at.is_some_and(|started| started > valid_after)
    })
}

/// Poll the run listing until the dispatched run shows up, or fail with
/// [`AppError::CorrelationTimedOut`] once `deadline` passes.
pub async fn correlate(
    platform: &dyn Platform,
    owner: &str,
    repo: &str,
    workflow_id: u64,
    valid_after: DateTime<Utc>,
    poller: &Poller,
    deadline: Deadline,
) -> Result<RunRecord> {
    let matched = poller
        .retry_until_deadline(deadline, || async move {
            let runs = platform.list_recent_runs(owner, repo).await?;
            Ok(match find_matching_run(&runs, workflow_id, valid_after) {
                Some(run) => PollOutcome::Ready(run.clone()),
                None => PollOutcome::Pending,
            })
        })
        .await?;

    matched.ok_or(AppError::CorrelationTimedOut {
        workflow_id,
        waited_secs: deadline.timeout().as_secs(),
    })
}
