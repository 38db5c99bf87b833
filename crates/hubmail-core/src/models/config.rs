/// Sender configuration, loaded once at process start
use crate::constants::*;
use crate::error::HubmailError;
use std::path::PathBuf;

/// What the invite workflow does when the permanent password cannot be set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvitePasswordPolicy {
    /// Fail the invocation without sending the invite
    #[default]
    Abort,
    /// Log the failure and send the invite anyway
    Continue,
}

impl std::str::FromStr for InvitePasswordPolicy {
    type Err = HubmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            other => Err(HubmailError::Config(format!(
                "Invalid {}: {} (expected abort or continue)",
                ENV_INVITE_PASSWORD_FAILURE_POLICY, other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderConfig {
    pub kms_key_arn: String,
    pub no_reply_address: String,
    pub verification_subject: String,
    pub invite_subject: String,
    pub sendgrid_api_key_param: String,
    pub region: Option<String>,
    pub templates_dir: PathBuf,
    pub sendgrid_base_url: String,
    pub invite_password_policy: InvitePasswordPolicy,
}

impl SenderConfig {
    pub fn from_env() -> Result<Self, HubmailError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HubmailError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let kms_key_arn = get(ENV_KMS_KEY_ARN)
            .map(|v| v.trim().to_string())
            .ok_or_else(|| {
                HubmailError::Config(format!("Invalid KMS key ARN: {} is not set", ENV_KMS_KEY_ARN))
            })?;

        let sendgrid_api_key_param = get(ENV_SENDGRID_API_KEY_PARAM).ok_or_else(|| {
            HubmailError::Config(format!("Missing {} env var", ENV_SENDGRID_API_KEY_PARAM))
        })?;

        let templates_dir = match get(ENV_TEMPLATES_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => match get(ENV_LAMBDA_TASK_ROOT) {
                Some(root) => PathBuf::from(root).join(DEFAULT_TEMPLATES_DIR),
                None => PathBuf::from(DEFAULT_TEMPLATES_DIR),
            },
        };

        let invite_password_policy = match get(ENV_INVITE_PASSWORD_FAILURE_POLICY) {
            Some(value) => value.parse()?,
            None => InvitePasswordPolicy::default(),
        };

        let config = Self {
            kms_key_arn,
            no_reply_address: get(ENV_NO_REPLY_ADDRESS)
                .unwrap_or_else(|| DEFAULT_NO_REPLY_ADDRESS.to_string()),
            verification_subject: get(ENV_VERIFICATION_SUBJECT)
                .unwrap_or_else(|| DEFAULT_VERIFICATION_SUBJECT.to_string()),
            invite_subject: get(ENV_INVITE_SUBJECT)
                .unwrap_or_else(|| DEFAULT_INVITE_SUBJECT.to_string()),
            sendgrid_api_key_param,
            region: get(ENV_REGION),
            templates_dir,
            sendgrid_base_url: get(ENV_SENDGRID_BASE_URL)
                .unwrap_or_else(|| DEFAULT_SENDGRID_BASE_URL.to_string()),
            invite_password_policy,
        };

        config.validate()?;
        tracing::info!("Configuration validated successfully");

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HubmailError> {
        if self.kms_key_arn.trim().is_empty() {
            return Err(HubmailError::Config("KMS key ARN is empty".to_string()));
        }

        crate::utils::validate_email_address(&self.no_reply_address)
            .map_err(|e| HubmailError::Config(format!("Invalid no-reply address: {}", e)))?;

        if self.verification_subject.trim().is_empty() || self.invite_subject.trim().is_empty() {
            return Err(HubmailError::Config("Email subjects must not be empty".to_string()));
        }

        if !self.sendgrid_base_url.starts_with("http://")
            && !self.sendgrid_base_url.starts_with("https://")
        {
            return Err(HubmailError::Config(format!(
                "Invalid SendGrid base URL: {}",
                self.sendgrid_base_url
            )));
        }

        Ok(())
    }
}
