//! Regdesk Core Library
//!
//! Domain models, error taxonomy, configuration and the registration validator
//! shared by every regdesk crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IntakeConfig, RetryConfig};
pub use error::{AppError, ErrorMetadata, FieldError, LogLevel};
pub use models::{
    FilePayload, FileRole, RegistrationFields, RegistrationRequest, RegistrationResponse,
    RegistrationRow, StoredFile,
};
pub use storage_types::{StorageBackend, TableBackend};
pub use validation::{RawRegistration, ValidationError};
