use super::ValidationError;
use crate::constants::PDF_MEDIA_TYPE;
use crate::models::FilePayload;

/// Strip parameters (`; charset=...`) and surrounding whitespace, lowercased.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Validate one uploaded document: media type first, then size.
pub fn validate_file(file: &FilePayload, max_file_size: usize) -> Result<(), ValidationError> {
    if essence(&file.content_type) != PDF_MEDIA_TYPE {
        return Err(ValidationError::UnsupportedMediaType {
            role: file.role,
            content_type: file.content_type.clone(),
        });
    }

    let size = file.len();
    if size > max_file_size {
        return Err(ValidationError::FileTooLarge {
            role: file.role,
            size,
            max: max_file_size,
        });
    }

    if size == 0 {
        return Err(ValidationError::EmptyFile { role: file.role });
    }

    Ok(())
}
