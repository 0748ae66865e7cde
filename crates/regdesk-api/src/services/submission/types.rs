use std::fmt;
use std::time::Duration;

use regdesk_core::{Config, FilePayload, RawRegistration};

/// A submission as extracted from the multipart body, not yet validated.
#[derive(Debug, Clone)]
pub struct Submission {
    pub fields: RawRegistration,
    pub cv: FilePayload,
    pub transcript: FilePayload,
}

/// Pipeline knobs taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionSettings {
    pub max_file_size_bytes: usize,
    /// Overall budget for validation and both uploads
    pub deadline: Duration,
    /// Delete already stored objects when the pipeline fails
    pub cleanup_orphans: bool,
}

impl SubmissionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_file_size_bytes: config.max_file_size_bytes(),
            deadline: Duration::from_secs(config.submission_timeout_secs()),
            cleanup_orphans: config.cleanup_orphans(),
        }
    }
}

/// Stages a submission moves through. Terminal stages are `Rejected`,
/// `Failed` and `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Received,
    Validating,
    Rejected,
    FilesValidated,
    Uploading,
    BothUploaded,
    Appending,
    Failed,
    Completed,
}

impl SubmissionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStage::Received => "received",
            SubmissionStage::Validating => "validating",
            SubmissionStage::Rejected => "rejected",
            SubmissionStage::FilesValidated => "files_validated",
            SubmissionStage::Uploading => "uploading",
            SubmissionStage::BothUploaded => "both_uploaded",
            SubmissionStage::Appending => "appending",
            SubmissionStage::Failed => "failed",
            SubmissionStage::Completed => "completed",
        }
    }
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
