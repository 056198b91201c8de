use crate::error::Result;
use crate::platform::types::RunRecord;
use crate::platform::Platform;
use crate::poll::{Deadline, PollOutcome, Poller};
use crate::workflow::types::Conclusion;

/// `Ready` with the reported conclusion once the run is `completed`.
pub fn check_completion(run: &RunRecord) -> PollOutcome<Conclusion> {
    if run.is_completed() {
        PollOutcome::Ready(Conclusion::Reported(
            run.conclusion.clone().unwrap_or_default(),
        ))
    } else {
        PollOutcome::Pending
    }
}

/// Poll a run until it completes. Once `deadline` passes this yields
/// [`Conclusion::TimedOut`] without fetching the run again.
pub async fn await_completion(
    platform: &dyn Platform,
    owner: &str,
    repo: &str,
    run_id: u64,
    poller: &Poller,
    deadline: Deadline,
) -> Result<Conclusion> {
    let conclusion = poller
        .retry_until_deadline(deadline, || async move {
            let run = platform.get_run(owner, repo, run_id).await?;
            tracing::debug!(run_id = run_id, status = %run.status, "Polled run");
            Ok(check_completion(&run))
        })
        .await?;

    Ok(conclusion.unwrap_or(Conclusion::TimedOut))
}
