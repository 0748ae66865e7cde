//! Registration submission pipeline
//!
//! Validates a submission, uploads both documents concurrently, and appends
//! one row to the registration table only after both uploads produced a
//! public link.

mod orchestrator;
mod types;

pub use orchestrator::SubmissionService;
pub use types::{Submission, SubmissionSettings, SubmissionStage};
