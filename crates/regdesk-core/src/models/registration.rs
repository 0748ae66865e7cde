use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::file::{FilePayload, StoredFile};
use crate::constants::REGISTRATION_COLUMNS;

/// Normalized applicant data.
///
/// Only the validator constructs this, so holding one means every field
/// passed its rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationFields {
    name: String,
    email: String,
    student_id: String,
    program: String,
    class_section: String,
}

impl RegistrationFields {
    pub(crate) fn new(
        name: String,
        email: String,
        student_id: String,
        program: String,
        class_section: String,
    ) -> Self {
        Self {
            name,
            email,
            student_id,
            program,
            class_section,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn class_section(&self) -> &str {
        &self.class_section
    }
}

/// A submission that passed validation, ready for upload.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub fields: RegistrationFields,
    pub cv: FilePayload,
    pub transcript: FilePayload,
}

/// One table row: name, email, student_id, program, class_section, cv link, transcript link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRow([String; REGISTRATION_COLUMNS]);

impl RegistrationRow {
    pub const COLUMN_NAMES: [&'static str; REGISTRATION_COLUMNS] = [
        "name",
        "email",
        "student_id",
        "program",
        "class_section",
        "cv_reference",
        "transcript_reference",
    ];

    pub fn new(fields: &RegistrationFields, cv: &StoredFile, transcript: &StoredFile) -> Self {
        Self([
            fields.name.clone(),
            fields.email.clone(),
            fields.student_id.clone(),
            fields.program.clone(),
            fields.class_section.clone(),
            cv.url.clone(),
            transcript.url.clone(),
        ])
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn into_values(self) -> Vec<String> {
        self.0.into()
    }
}

/// Body of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    #[schema(example = "Success")]
    pub message: String,
    pub cv_link: String,
    pub transcript_link: String,
}

impl RegistrationResponse {
    pub fn success(cv: &StoredFile, transcript: &StoredFile) -> Self {
        Self {
            message: "Success".to_string(),
            cv_link: cv.url.clone(),
            transcript_link: transcript.url.clone(),
        }
    }
}
