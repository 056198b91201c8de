//! GitHub Actions workflow-command plumbing: step outputs and error
//! annotations.

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::workflow::ActionOutcome;

/// Append `run-id` and `conclusion` to the step output file (`$GITHUB_OUTPUT`).
pub fn write_outputs(path: &Path, outcome: &ActionOutcome) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    writeln!(file, "run-id={}", outcome.run_id)?;
    writeln!(file, "conclusion={}", outcome.conclusion.as_str())?;
    Ok(())
}

/// Format `message` as an `::error::` workflow command.
pub fn error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}

/// The single line reported for a failed invocation: the whole error chain
/// as one `::error::` annotation.
pub fn failure_annotation(error: &anyhow::Error) -> String {
    error_annotation(&format!("{error:#}"))
}
