use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::Result;

/// Result of a single probe: either the value being waited for, or a signal
/// to try again after the poll interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready(T),
    Pending,
}

/// Point in time after which a polling phase gives up.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    /// `None` when `timeout` reaches past what `Instant` can represent.
    at: Option<Instant>,
    timeout: Duration,
}

impl Deadline {
    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(timeout),
            timeout,
        }
    }

    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() > at)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Fixed-interval retry loop shared by correlation and completion polling.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    retry_transport_errors: bool,
}

impl Poller {
    pub fn new(interval: Duration, retry_transport_errors: bool) -> Self {
        Self {
            interval,
            retry_transport_errors,
        }
    }

    /// Invoke `probe` until it returns `Ready`, sleeping for the poll
    /// interval between attempts. There is no attempt limit; use
    /// [`Poller::retry_until_deadline`] for a bounded wait.
    ///
    /// Errors end the loop unless transport retries are enabled and the
    /// error is a transport error, in which case it is logged and the next
    /// tick proceeds as if the probe had returned `Pending`.
    pub async fn retry_until<T, F, Fut>(&self, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PollOutcome<T>>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match probe().await {
                Ok(PollOutcome::Ready(value)) => return Ok(value),
                Ok(PollOutcome::Pending) => {
                    tracing::debug!(attempt = attempt, "Not ready yet");
                }
                Err(e) if self.retry_transport_errors && e.is_transport() => {
                    tracing::warn!(attempt = attempt, error = %e, "Transport error while polling, retrying");
                }
                Err(e) => return Err(e),
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    /// Like [`Poller::retry_until`], but checks `deadline` before every
    /// probe. Returns `Ok(None)` once the deadline has passed, without
    /// invoking the probe again.
    pub async fn retry_until_deadline<T, F, Fut>(
        &self,
        deadline: Deadline,
        mut probe: F,
    ) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PollOutcome<T>>>,
    {
        self.retry_until(|| {
            let next = if deadline.expired() {
                None
            } else {
                Some(probe())
            };
            async move {
                let Some(next) = next else {
                    return Ok(PollOutcome::Ready(None));
                };
                Ok(match next.await? {
                    PollOutcome::Ready(value) => PollOutcome::Ready(Some(value)),
                    PollOutcome::Pending => PollOutcome::Pending,
                })
            }
        })
        .await
    }
}
