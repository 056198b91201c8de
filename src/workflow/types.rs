use std::fmt;

/// Conclusion GitHub reports for a run that finished successfully.
pub const CONCLUSION_SUCCESS: &str = "success";

/// Text reported in place of a conclusion when the completion deadline passes.
pub const TIMEOUT_SENTINEL: &str = "run-workflow-and-yield action timeout.";

/// Terminal value of the completion phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conclusion {
    /// The run completed and reported this conclusion, verbatim.
    Reported(String),
    /// The deadline passed before the run reported `completed`.
    TimedOut,
}

impl Conclusion {
    pub fn as_str(&self) -> &str {
        match self {
            Conclusion::Reported(conclusion) => conclusion,
            Conclusion::TimedOut => TIMEOUT_SENTINEL,
        }
    }

    pub fn is_success(&self) -> bool {
        self.as_str() == CONCLUSION_SUCCESS
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one dispatch-and-yield invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub workflow_id: u64,
    pub run_id: u64,
    pub conclusion: Conclusion,
}
