/// SendGrid v3 mail API client
use crate::constants::{MAX_ERROR_BODY_CHARS, SENDGRID_SEND_PATH};
use crate::error::HubmailError;
use crate::models::EmailMessage;
use crate::utils::logging::{email_domain, redact_email};
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

#[async_trait]
pub trait MailSender: Send + Sync {
    /// Submits one HTML email; returns the provider message id when it sends one
    async fn send(
        &self,
        message: &EmailMessage,
        api_key: &str,
    ) -> Result<Option<String>, HubmailError>;
}

pub struct SendGridMailSender {
    client: reqwest::Client,
    base_url: String,
}

impl SendGridMailSender {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, SENDGRID_SEND_PATH)
    }

    fn payload(message: &EmailMessage) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": message.from },
            "subject": message.subject,
            "content": [{ "type": "text/html", "value": message.html }],
        })
    }
}

#[async_trait]
impl MailSender for SendGridMailSender {
    async fn send(
        &self,
        message: &EmailMessage,
        api_key: &str,
    ) -> Result<Option<String>, HubmailError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&Self::payload(message))
            .send()
            .await
            .map_err(|e| {
                HubmailError::MailDelivery(format!(
                    "Request to mail API failed: {}",
                    redact_email(&e.to_string())
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(HubmailError::MailDelivery(format!(
                "Mail API returned {}: {}",
                status,
                redact_email(&body)
            )));
        }

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        info!(
            recipient_domain = %email_domain(&message.to),
            message_id = message_id.as_deref().unwrap_or("unknown"),
            "Email accepted by mail API"
        );
        Ok(message_id)
    }
}
