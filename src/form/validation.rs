//! Contact form field validation.

use thiserror::Error;

use crate::config::FormConfig;
use crate::submission::SubmissionRequest;

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Missing(String),

    #[error("{0} is not a valid email address")]
    InvalidEmail(String),
}

impl FieldError {
    pub fn field(&self) -> &str {
        match self {
            FieldError::Missing(f) | FieldError::InvalidEmail(f) => f,
        }
    }
}

/// Check required and email fields, reporting every failing field once.
pub fn validate_fields(fields: &SubmissionRequest, form: &FormConfig) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    for name in &form.required_fields {
        if fields.non_blank(name).is_none() {
            errors.push(FieldError::Missing(name.clone()));
        }
    }

    for name in &form.email_fields {
        if let Some(value) = fields.non_blank(name) {
            if !looks_like_email(value) {
                errors.push(FieldError::InvalidEmail(name.clone()));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `local@domain.tld`: no whitespace anywhere, exactly one `@` with text
/// before it, and some dot in the domain with text on both sides.
pub fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .match_indices('.')
        .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
}
