/// Logging utilities for PII redaction
///
/// Recipient addresses are logged by domain only; verification codes and
/// generated passwords are never logged.
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

/// Redacts email addresses from text, preserving domain for debugging
///
/// # Examples
/// ```
/// use hubmail_core::utils::logging::redact_email;
///
/// assert_eq!(redact_email("user@example.com"), "***@example.com");
/// assert_eq!(redact_email("Sent to test@acme.com"), "Sent to ***@acme.com");
/// ```
pub fn redact_email(text: &str) -> String {
    EMAIL_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            let email = &caps[0];
            match email.find('@') {
                Some(at_pos) => format!("***{}", &email[at_pos..]),
                None => "***@***".to_string(),
            }
        })
        .to_string()
}

/// Describes a secret value by length only
pub fn redact_secret(value: &str) -> String {
    format!("[{} chars]", value.chars().count())
}

/// Domain part of an address, for structured log fields
pub fn email_domain(email: &str) -> &str {
    email.split('@').nth(1).unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_email() {
        assert_eq!(redact_email("user@example.com"), "***@example.com");
        assert_eq!(
            redact_email("From: alice@foo.com To: bob@bar.com"),
            "From: ***@foo.com To: ***@bar.com"
        );
        assert_eq!(redact_email("no address here"), "no address here");
    }

    #[test]
    fn test_redact_secret() {
        assert_eq!(redact_secret("Ab3$efgh"), "[8 chars]");
        assert_eq!(redact_secret(""), "[0 chars]");
    }

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("user@example.com"), "example.com");
        assert_eq!(email_domain("invalid"), "unknown");
    }
}
