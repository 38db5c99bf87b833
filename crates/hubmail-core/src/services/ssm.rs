/// Secret retrieval from SSM Parameter Store
use crate::error::HubmailError;
use async_trait::async_trait;
use tracing::{debug, error};

#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetches and decrypts a secret; a missing or empty value is an error
    async fn get_secret(&self, name: &str) -> Result<String, HubmailError>;
}

pub struct SsmSecretStore {
    client: aws_sdk_ssm::Client,
}

impl SsmSecretStore {
    pub fn new(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SsmSecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, HubmailError> {
        let response = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                error!(parameter = %name, error = %e, "Error retrieving SSM parameter");
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_parameter_not_found())
                    .unwrap_or(false);
                if not_found {
                    HubmailError::SecretNotFound(name.to_string())
                } else {
                    HubmailError::SecretRetrieval(format!("GetParameter {} failed: {}", name, e))
                }
            })?;

        let value = response
            .parameter()
            .and_then(|p| p.value())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                HubmailError::SecretNotFound(format!("SSM parameter {} is empty or not found", name))
            })?;

        debug!(parameter = %name, value = %crate::utils::redact_secret(value), "Fetched secret");
        Ok(value.to_string())
    }
}
