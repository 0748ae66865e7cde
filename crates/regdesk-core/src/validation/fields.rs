//! Text field rules for a registration form.

use std::borrow::Cow;

use serde::Deserialize;
use validator::Validate;

use crate::constants::STUDENT_ID_LENGTH;
use crate::error::FieldError;
use crate::models::RegistrationFields;

/// Order in which failing fields are reported.
pub const FIELD_ORDER: [&str; 5] = ["name", "email", "student_id", "program", "class_section"];

/// The five text fields exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RawRegistration {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(
        email(message = "must be a valid email address"),
        custom(function = "validate_email_domain")
    )]
    pub email: String,
    #[validate(custom(function = "validate_student_id"))]
    pub student_id: String,
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub program: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub class_section: String,
}

fn rule_error(code: &'static str, message: &'static str) -> validator::ValidationError {
    validator::ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_name(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_error("name_empty", "must not be empty"));
    }
    if value.chars().any(|c| c.is_ascii_digit()) {
        return Err(rule_error("name_digits", "must not contain digits"));
    }
    if !value.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        return Err(rule_error(
            "name_charset",
            "must contain only letters and spaces",
        ));
    }
    Ok(())
}

fn validate_email_domain(value: &str) -> Result<(), validator::ValidationError> {
    match value.rsplit_once('@') {
        Some((_, domain)) if domain.contains('.') => Ok(()),
        _ => Err(rule_error(
            "email_domain",
            "must be a valid email address",
        )),
    }
}

fn validate_student_id(value: &str) -> Result<(), validator::ValidationError> {
    if value.len() != STUDENT_ID_LENGTH || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(rule_error("student_id", "must be exactly 11 digits"));
    }
    Ok(())
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl RawRegistration {
    /// Trimmed copy the rules run against. The student id is kept verbatim.
    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            student_id: self.student_id.clone(),
            program: self.program.trim().to_string(),
            class_section: self.class_section.trim().to_string(),
        }
    }

    /// Check every field and return the normalized values, or one
    /// [`FieldError`] per failing field in [`FIELD_ORDER`].
    pub fn normalize(&self) -> Result<RegistrationFields, Vec<FieldError>> {
        let input = self.trimmed();

        if let Err(errors) = input.validate() {
            let by_field = errors.field_errors();
            let failures: Vec<FieldError> = FIELD_ORDER
                .iter()
                .filter_map(|field| {
                    let first = by_field.get(*field)?.first()?;
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "is invalid".to_string());
                    Some(FieldError::new(*field, message))
                })
                .collect();
            return Err(failures);
        }

        Ok(RegistrationFields::new(
            title_case(&input.name),
            input.email.to_lowercase(),
            input.student_id,
            title_case(&input.program),
            input.class_section.to_uppercase(),
        ))
    }
}
