/// Input validation utilities
use crate::error::HubmailError;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

pub fn validate_email_address(email: &str) -> Result<(), HubmailError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(HubmailError::Validation(format!(
            "Invalid email address: {}",
            crate::utils::logging::redact_email(email)
        )))
    }
}
