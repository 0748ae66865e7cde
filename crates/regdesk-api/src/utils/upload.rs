//! Multipart extraction for the registration form

use axum::extract::Multipart;
use regdesk_core::{AppError, FilePayload, FileRole, RawRegistration};

use crate::error::multipart_error;
use crate::services::submission::Submission;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Form parts the endpoint understands, keyed by their canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormPart {
    Name,
    Email,
    StudentId,
    Program,
    ClassSection,
    File(FileRole),
}

impl FormPart {
    const ALL: [FormPart; 7] = [
        FormPart::Name,
        FormPart::Email,
        FormPart::StudentId,
        FormPart::Program,
        FormPart::ClassSection,
        FormPart::File(FileRole::Cv),
        FormPart::File(FileRole::Transcript),
    ];

    /// Indonesian field names (`nama`, `nim`, `prodi`, `kelas`) are accepted too.
    fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "name" | "nama" => Some(FormPart::Name),
            "email" => Some(FormPart::Email),
            "student_id" | "nim" => Some(FormPart::StudentId),
            "program" | "prodi" => Some(FormPart::Program),
            "class_section" | "kelas" => Some(FormPart::ClassSection),
            "cv" => Some(FormPart::File(FileRole::Cv)),
            "transcript" => Some(FormPart::File(FileRole::Transcript)),
            _ => None,
        }
    }

    fn canonical_name(&self) -> &'static str {
        match self {
            FormPart::Name => "name",
            FormPart::Email => "email",
            FormPart::StudentId => "student_id",
            FormPart::Program => "program",
            FormPart::ClassSection => "class_section",
            FormPart::File(role) => role.form_field(),
        }
    }

    fn slot(&self) -> usize {
        match self {
            FormPart::Name => 0,
            FormPart::Email => 1,
            FormPart::StudentId => 2,
            FormPart::Program => 3,
            FormPart::ClassSection => 4,
            FormPart::File(FileRole::Cv) => 5,
            FormPart::File(FileRole::Transcript) => 6,
        }
    }
}

#[derive(Default)]
struct FormParts {
    text: [Option<String>; 5],
    cv: Option<FilePayload>,
    transcript: Option<FilePayload>,
}

impl FormParts {
    fn is_set(&self, part: FormPart) -> bool {
        match part {
            FormPart::File(FileRole::Cv) => self.cv.is_some(),
            FormPart::File(FileRole::Transcript) => self.transcript.is_some(),
            text => self.text[text.slot()].is_some(),
        }
    }

    fn take_text(&mut self, part: FormPart) -> String {
        self.text[part.slot()].take().unwrap_or_default()
    }
}

/// Read every part of a registration form.
///
/// Each field may appear once, under its name or its alias. A missing or
/// repeated part rejects the request; unknown parts are ignored. Field
/// content is not validated here.
pub async fn extract_registration_form(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut parts = FormParts::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
        let Some(part) = FormPart::from_field_name(&field_name) else {
            tracing::debug!(field = %field_name, "Ignoring unknown form field");
            continue;
        };

        if parts.is_set(part) {
            return Err(AppError::BadRequest(format!(
                "Duplicate form field: {}",
                part.canonical_name()
            )));
        }

        match part {
            FormPart::File(role) => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
                let data = field.bytes().await.map_err(multipart_error)?;
                let payload = FilePayload::new(role, content_type, data);
                match role {
                    FileRole::Cv => parts.cv = Some(payload),
                    FileRole::Transcript => parts.transcript = Some(payload),
                }
            }
            text => {
                let value = field.text().await.map_err(multipart_error)?;
                parts.text[text.slot()] = Some(value);
            }
        }
    }

    let missing: Vec<&str> = FormPart::ALL
        .iter()
        .filter(|part| !parts.is_set(**part))
        .map(FormPart::canonical_name)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing form field(s): {}",
            missing.join(", ")
        )));
    }

    let fields = RawRegistration {
        name: parts.take_text(FormPart::Name),
        email: parts.take_text(FormPart::Email),
        student_id: parts.take_text(FormPart::StudentId),
        program: parts.take_text(FormPart::Program),
        class_section: parts.take_text(FormPart::ClassSection),
    };
    let (Some(cv), Some(transcript)) = (parts.cv, parts.transcript) else {
        return Err(AppError::Internal("form files vanished after check".to_string()));
    };

    Ok(Submission {
        fields,
        cv,
        transcript,
    })
}
