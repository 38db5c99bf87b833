/// Error types for the Hubmail email sender
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubmailError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decryption error: {0}")]
    Decrypt(String),

    #[error("Credential reset error: {0}")]
    CredentialReset(String),

    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    #[error("Secret retrieval error: {0}")]
    SecretRetrieval(String),

    #[error("Template render error: {0}")]
    Render(String),

    #[error("Mail delivery error: {0}")]
    MailDelivery(String),
}

impl HubmailError {
    /// Short stable name used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::Decrypt(_) => "decrypt",
            Self::CredentialReset(_) => "credential_reset",
            Self::SecretNotFound(_) => "secret_not_found",
            Self::SecretRetrieval(_) => "secret_retrieval",
            Self::Render(_) => "render",
            Self::MailDelivery(_) => "mail_delivery",
        }
    }
}

impl From<serde_json::Error> for HubmailError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<base64::DecodeError> for HubmailError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decrypt(format!("invalid base64 ciphertext: {}", err))
    }
}

impl From<handlebars::RenderError> for HubmailError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Render(err.to_string())
    }
}
