use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Workflow '{workflow}' not found in {owner}/{repo}")]
    WorkflowNotFound {
        owner: String,
        repo: String,
        workflow: String,
    },

    #[error("Failed to dispatch workflow {workflow_id} on '{branch}': {message}")]
    Dispatch {
        workflow_id: u64,
        branch: String,
        message: String,
    },

    #[error("No run of workflow {workflow_id} appeared within {waited_secs}s of dispatch")]
    CorrelationTimedOut { workflow_id: u64, waited_secs: u64 },

    #[error("Workflow run {run_id} did not complete in time: '{sentinel}'")]
    RunTimedOut { run_id: u64, sentinel: String },

    #[error("Workflow run {run_id} status '{conclusion}' does not indicate success")]
    RunFailed { run_id: u64, conclusion: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Errors caused by the network or the remote API rather than by the
    /// state of the run itself. Only these are eligible for retry while polling.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::GitHubApi(_))
    }
}

impl From<octocrab::Error> for AppError {
    fn from(e: octocrab::Error) -> Self {
        AppError::GitHubApi(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
