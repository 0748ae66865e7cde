//! Constants shared across the workspace.

/// The only media type accepted for uploaded documents.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Default per-file upload limit (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Default range the registration rows are appended to.
pub const DEFAULT_SHEET_RANGE: &str = "Sheet1!A:G";

/// Number of columns in a registration row.
pub const REGISTRATION_COLUMNS: usize = 7;

/// Exact length of a student identification number.
pub const STUDENT_ID_LENGTH: usize = 11;

/// Longest backend error text that may reach a client-visible message.
pub const MAX_BACKEND_MESSAGE_LEN: usize = 200;

/// Truncate a backend error message so raw payloads never leak in full.
pub fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_BACKEND_MESSAGE_LEN {
        return message.to_string();
    }
    let truncated: String = message.chars().take(MAX_BACKEND_MESSAGE_LEN).collect();
    format!("{}...", truncated)
}
