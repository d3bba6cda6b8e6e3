use voxgate_core::{AppError, AppResult, NonEmptyString};

use crate::EmailAddress;

/// Maximum accepted contact message length in characters.
pub const CONTACT_MESSAGE_MAX_LENGTH: usize = 5_000;

/// Validated contact-form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    email: EmailAddress,
    message: NonEmptyString,
}

impl ContactMessage {
    /// Validates the sender address and message body.
    pub fn new(email: &str, message: &str) -> AppResult<Self> {
        let email = EmailAddress::new(email)?;
        let message = NonEmptyString::new(message.trim())
            .map_err(|_| AppError::Validation("message is required".to_owned()))?;

        if message.as_str().chars().count() > CONTACT_MESSAGE_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "message must not exceed {CONTACT_MESSAGE_MAX_LENGTH} characters"
            )));
        }

        Ok(Self { email, message })
    }

    /// Returns the sender address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the trimmed message body.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}
