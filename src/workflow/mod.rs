pub mod action;
pub mod completion;
pub mod correlate;
pub mod types;

pub use action::run_action;
pub use types::{ActionOutcome, Conclusion, TIMEOUT_SENTINEL};
