//! Application state shared by every handler.

use regdesk_core::Config;

use crate::services::submission::SubmissionService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub submissions: SubmissionService,
}

impl AppState {
    pub fn new(config: Config, submissions: SubmissionService) -> Self {
        Self {
            config,
            submissions,
        }
    }
}
