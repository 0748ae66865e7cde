//! Regdesk API Library
//!
//! HTTP surface of the registration intake service: the multipart endpoint,
//! API key authentication, the submission pipeline and application setup.

mod api_doc;
mod handlers;
mod utils;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::submission::{Submission, SubmissionService, SubmissionSettings};
pub use state::AppState;
