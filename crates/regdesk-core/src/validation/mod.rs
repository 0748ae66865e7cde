//! Validation modules
//!
//! A submission is checked in a fixed order: text fields, then the cv file,
//! then the transcript file. The first stage that fails decides the error.

pub mod fields;
pub mod file;

pub use fields::{RawRegistration, FIELD_ORDER};
pub use file::{essence, validate_file};

use crate::error::{AppError, FieldError};
use crate::models::{FilePayload, FileRole, RegistrationRequest};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid fields: {0:?}")]
    Fields(Vec<FieldError>),

    #[error("{role} must be a PDF file (got {content_type})")]
    UnsupportedMediaType { role: FileRole, content_type: String },

    #[error("{role} too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge {
        role: FileRole,
        size: usize,
        max: usize,
    },

    #[error("{role} is empty")]
    EmptyFile { role: FileRole },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Fields(errors) => AppError::Validation(errors),
            ValidationError::UnsupportedMediaType { role, content_type } => {
                AppError::UnsupportedMediaType(format!(
                    "{} must be a PDF file (got {})",
                    role, content_type
                ))
            }
            ValidationError::FileTooLarge { role, max, .. } => AppError::PayloadTooLarge(
                format!("{} exceeds the maximum size of {} MB", role, max / (1024 * 1024)),
            ),
            ValidationError::EmptyFile { role } => {
                AppError::Validation(vec![FieldError::new(role.tag(), "must not be empty")])
            }
        }
    }
}

/// Validate a whole submission and produce the normalized request.
pub fn validate_registration(
    raw: &RawRegistration,
    cv: FilePayload,
    transcript: FilePayload,
    max_file_size: usize,
) -> Result<RegistrationRequest, ValidationError> {
    let fields = raw.normalize().map_err(ValidationError::Fields)?;
    validate_file(&cv, max_file_size)?;
    validate_file(&transcript, max_file_size)?;

    Ok(RegistrationRequest {
        fields,
        cv,
        transcript,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_MAX_FILE_SIZE_BYTES;
    use crate::ErrorMetadata;
    use bytes::Bytes;

    fn raw() -> RawRegistration {
        RawRegistration {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            student_id: "12345678901".to_string(),
            program: "cs".to_string(),
            class_section: "a".to_string(),
        }
    }

    fn pdf(role: FileRole, size: usize) -> FilePayload {
        FilePayload::new(role, "application/pdf", Bytes::from(vec![b'%'; size]))
    }

    #[test]
    fn test_valid_submission() {
        let request = validate_registration(
            &raw(),
            pdf(FileRole::Cv, 10),
            pdf(FileRole::Transcript, 10),
            DEFAULT_MAX_FILE_SIZE_BYTES,
        )
        .unwrap();
        assert_eq!(request.fields.program(), "Cs");
        assert_eq!(request.fields.class_section(), "A");
        assert_eq!(request.cv.role, FileRole::Cv);
    }

    #[test]
    fn test_field_errors_win_over_file_errors() {
        let mut raw = raw();
        raw.name = "john3".to_string();
        let cv = FilePayload::new(FileRole::Cv, "image/png", Bytes::from_static(b"png"));
        let err = validate_registration(
            &raw,
            cv,
            pdf(FileRole::Transcript, 10),
            DEFAULT_MAX_FILE_SIZE_BYTES,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::Fields(_)));
    }

    #[test]
    fn test_cv_errors_win_over_transcript_errors() {
        let transcript =
            FilePayload::new(FileRole::Transcript, "text/plain", Bytes::from_static(b"x"));
        let err = validate_registration(
            &raw(),
            pdf(FileRole::Cv, DEFAULT_MAX_FILE_SIZE_BYTES + 1),
            transcript,
            DEFAULT_MAX_FILE_SIZE_BYTES,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::FileTooLarge {
                role: FileRole::Cv,
                ..
            }
        ));
    }

    #[test]
    fn test_app_error_mapping() {
        let too_large: AppError = ValidationError::FileTooLarge {
            role: FileRole::Transcript,
            size: DEFAULT_MAX_FILE_SIZE_BYTES + 1,
            max: DEFAULT_MAX_FILE_SIZE_BYTES,
        }
        .into();
        assert_eq!(too_large.http_status_code(), 413);
        assert!(too_large.client_message().contains("5 MB"));

        let media: AppError = ValidationError::UnsupportedMediaType {
            role: FileRole::Cv,
            content_type: "image/png".to_string(),
        }
        .into();
        assert_eq!(media.http_status_code(), 415);

        let empty: AppError = ValidationError::EmptyFile {
            role: FileRole::Cv,
        }
        .into();
        assert_eq!(empty.http_status_code(), 422);
        assert_eq!(empty.field_errors().unwrap()[0].field, "cv");
    }
}
