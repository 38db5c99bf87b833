/// Cognito user pool credential management
use crate::error::HubmailError;
use crate::utils::logging::redact_email;
use async_trait::async_trait;

#[async_trait]
pub trait PasswordAssigner: Send + Sync {
    /// Sets `password` as the user's permanent password (no forced change)
    async fn set_permanent_password(
        &self,
        user_pool_id: &str,
        username: &str,
        password: &str,
    ) -> Result<(), HubmailError>;
}

pub struct CognitoPasswordAssigner {
    client: aws_sdk_cognitoidentityprovider::Client,
}

impl CognitoPasswordAssigner {
    pub fn new(client: aws_sdk_cognitoidentityprovider::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PasswordAssigner for CognitoPasswordAssigner {
    async fn set_permanent_password(
        &self,
        user_pool_id: &str,
        username: &str,
        password: &str,
    ) -> Result<(), HubmailError> {
        self.client
            .admin_set_user_password()
            .user_pool_id(user_pool_id)
            .username(username)
            .password(password)
            .permanent(true)
            .send()
            .await
            .map_err(|e| {
                HubmailError::CredentialReset(format!(
                    "AdminSetUserPassword failed for {}: {}",
                    redact_email(username),
                    e
                ))
            })?;

        tracing::info!(
            user_pool_id = %user_pool_id,
            username = %redact_email(username),
            "Permanent password set"
        );
        Ok(())
    }
}
