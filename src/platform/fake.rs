//! In-memory `Platform` used by the polling tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::error::{AppError, Result};
use crate::platform::types::*;
use crate::platform::Platform;

#[derive(Default)]
pub struct FakePlatform {
    /// workflow name or id -> numeric id
    pub workflows: HashMap<String, u64>,
    /// Successive responses to `list_recent_runs`; the last one repeats.
    pub listings: Mutex<VecDeque<Result<Vec<RunRecord>>>>,
    /// Successive responses to `get_run`; the last one repeats.
    pub run_states: Mutex<VecDeque<Result<RunRecord>>>,
    /// Run (id, delay) that appears in listings once a dispatch succeeds.
    pub dispatched_run: Option<(u64, Duration)>,
    pub fail_dispatch: bool,
    pub dispatches: Mutex<Vec<DispatchRequest>>,
    pub list_calls: Mutex<u32>,
    pub get_calls: Mutex<u32>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workflow(mut self, name: &str, id: u64) -> Self {
        self.workflows.insert(name.to_string(), id);
        self
    }

    pub fn with_listing(self, runs: Vec<RunRecord>) -> Self {
        self.listings.lock().unwrap().push_back(Ok(runs));
        self
    }

    pub fn with_listing_error(self, message: &str) -> Self {
        self.listings
            .lock()
            .unwrap()
            .push_back(Err(AppError::GitHubApi(message.to_string())));
        self
    }

    pub fn with_run_state(self, status: &str, conclusion: Option<&str>) -> Self {
        self.run_states.lock().unwrap().push_back(Ok(RunRecord {
            id: 0,
            workflow_id: 0,
            started_at: None,
            status: status.to_string(),
            conclusion: conclusion.map(str::to_string),
        }));
        self
    }

    pub fn with_run_error(self, message: &str) -> Self {
        self.run_states
            .lock()
            .unwrap()
            .push_back(Err(AppError::GitHubApi(message.to_string())));
        self
    }

    pub fn with_dispatched_run(mut self, run_id: u64, delay: Duration) -> Self {
        self.dispatched_run = Some((run_id, delay));
        self
    }

    pub fn failing_dispatch(mut self) -> Self {
        self.fail_dispatch = true;
        self
    }

    pub fn list_calls(&self) -> u32 {
        *self.list_calls.lock().unwrap()
    }

    pub fn get_calls(&self) -> u32 {
        *self.get_calls.lock().unwrap()
    }
}

/// Pop the next scripted response, repeating the final one forever.
fn next_scripted<T: Clone>(queue: &Mutex<VecDeque<Result<T>>>, what: &str) -> Result<T> {
    let mut queue = queue.lock().unwrap();
    let next = if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().map(|r| match r {
            Ok(v) => Ok(v.clone()),
            Err(e) => Err(AppError::GitHubApi(e.to_string())),
        })
    };
    next.unwrap_or_else(|| Err(AppError::GitHubApi(format!("no scripted {what}"))))
}

pub fn run(id: u64, workflow_id: u64, started_at: Option<chrono::DateTime<Utc>>) -> RunRecord {
    RunRecord {
        id,
        workflow_id,
        started_at,
        status: "queued".to_string(),
        conclusion: None,
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn resolve_workflow_id(&self, owner: &str, repo: &str, workflow: &str) -> Result<u64> {
        self.workflows
            .get(workflow)
            .copied()
            .ok_or_else(|| AppError::WorkflowNotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                workflow: workflow.to_string(),
            })
    }

    async fn list_recent_runs(&self, _owner: &str, _repo: &str) -> Result<Vec<RunRecord>> {
        *self.list_calls.lock().unwrap() += 1;
        next_scripted(&self.listings, "listing")
    }

    async fn dispatch_run(&self, request: &DispatchRequest) -> Result<()> {
        if self.fail_dispatch {
            return Err(AppError::Dispatch {
                workflow_id: request.workflow_id,
                branch: request.branch.clone(),
                message: "422 Unprocessable Entity".to_string(),
            });
        }
        self.dispatches.lock().unwrap().push(request.clone());

        if let Some((run_id, delay)) = self.dispatched_run {
            let started = Utc::now() + delay;
            self.listings
                .lock()
                .unwrap()
                .push_back(Ok(vec![run(run_id, request.workflow_id, Some(started))]));
        }
        Ok(())
    }

    async fn get_run(&self, _owner: &str, _repo: &str, run_id: u64) -> Result<RunRecord> {
        *self.get_calls.lock().unwrap() += 1;
        next_scripted(&self.run_states, "run state").map(|mut run| {
            run.id = run_id;
            run
        })
    }
}
