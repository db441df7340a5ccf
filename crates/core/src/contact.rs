//! Contact form payload and its validation rules.

use serde::Deserialize;
use validator::{Validate, ValidateEmail};

use crate::error::CoreError;

/// Inbound message from the public contact form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub subject: Option<String>,
    #[validate(length(min = 10, max = 5000, message = "must be between 10 and 5000 characters"))]
    pub message: String,
}

impl ContactForm {
    /// Trim every field, then run the declarative rules.
    ///
    /// Errors list each failing field as `field: message`, sorted by field
    /// name so the output is stable.
    pub fn normalized(self) -> Result<Self, CoreError> {
        let form = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self
                .subject
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            message: self.message.trim().to_string(),
        };

        form.validate().map_err(|errors| {
            let mut details: Vec<String> = errors
                .field_errors()
                .into_iter()
                .map(|(field, errs)| {
                    let reason = errs
                        .first()
                        .and_then(|e| e.message.as_ref())
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "is invalid".to_string());
                    format!("{field}: {reason}")
                })
                .collect();
            details.sort();
            CoreError::Validation(details.join("; "))
        })?;

        Ok(form)
    }
}

/// Check a standalone address, reporting failures under `field`.
pub fn validate_email(field: &str, email: &str) -> Result<(), CoreError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field}: must be a valid email address"
        )))
    }
}
