//! Shared object naming for storage backends.

use regdesk_core::{FilePayload, RegistrationFields};

use crate::traits::{StorageError, StorageResult};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Storage name for one document of a registration.
///
/// `{student_id}_{NameWithoutSpaces}_{CLASS}_{role}_{timestamp}.pdf`. The
/// timestamp is when the payload was read, so two submissions by the same
/// student never collide. Every segment passes through [`sanitize_segment`],
/// so the result always satisfies [`validate_object_name`].
pub fn generate_storage_name(fields: &RegistrationFields, file: &FilePayload) -> String {
    let compact_name: String = fields.name().split_whitespace().collect();
    format!(
        "{}_{}_{}_{}_{}.pdf",
        sanitize_segment(fields.student_id()),
        sanitize_segment(&compact_name),
        sanitize_segment(fields.class_section()),
        file.role.tag(),
        file.created_at.format(TIMESTAMP_FORMAT)
    )
}

/// Map path separators and control characters to `-` and collapse dot runs.
fn sanitize_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        let mapped = if c == '/' || c == '\\' || c.is_control() {
            '-'
        } else {
            c
        };
        if mapped == '.' && out.ends_with('.') {
            continue;
        }
        out.push(mapped);
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

/// Reject names that could escape a directory or are otherwise unusable.
pub fn validate_object_name(name: &str) -> StorageResult<()> {
    if name.is_empty()
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.chars().any(char::is_control)
    {
        return Err(StorageError::InvalidKey(format!(
            "Object name contains invalid characters: {:?}",
            name
        )));
    }
    Ok(())
}
