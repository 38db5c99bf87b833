/// Cognito custom email sender event models
use crate::error::HubmailError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Trigger source tag sent by the Cognito custom email sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TriggerSource {
    SignUp,
    ResendCode,
    ForgotPassword,
    UpdateUserAttribute,
    VerifyUserAttribute,
    AdminCreateUser,
    AccountTakeOverNotification,
    /// Any tag this sender does not know about
    Unknown(String),
}

/// Workflow selected for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Verification,
    Invite,
    NoOp,
}

impl TriggerSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::SignUp => "CustomEmailSender_SignUp",
            Self::ResendCode => "CustomEmailSender_ResendCode",
            Self::ForgotPassword => "CustomEmailSender_ForgotPassword",
            Self::UpdateUserAttribute => "CustomEmailSender_UpdateUserAttribute",
            Self::VerifyUserAttribute => "CustomEmailSender_VerifyUserAttribute",
            Self::AdminCreateUser => "CustomEmailSender_AdminCreateUser",
            Self::AccountTakeOverNotification => "CustomEmailSender_AccountTakeOverNotification",
            Self::Unknown(tag) => tag,
        }
    }

    pub fn workflow(&self) -> Workflow {
        match self {
            Self::SignUp | Self::ForgotPassword | Self::ResendCode => Workflow::Verification,
            Self::AdminCreateUser => Workflow::Invite,
            _ => Workflow::NoOp,
        }
    }
}

impl From<String> for TriggerSource {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "CustomEmailSender_SignUp" => Self::SignUp,
            "CustomEmailSender_ResendCode" => Self::ResendCode,
            "CustomEmailSender_ForgotPassword" => Self::ForgotPassword,
            "CustomEmailSender_UpdateUserAttribute" => Self::UpdateUserAttribute,
            "CustomEmailSender_VerifyUserAttribute" => Self::VerifyUserAttribute,
            "CustomEmailSender_AdminCreateUser" => Self::AdminCreateUser,
            "CustomEmailSender_AccountTakeOverNotification" => Self::AccountTakeOverNotification,
            _ => Self::Unknown(tag),
        }
    }
}

impl From<TriggerSource> for String {
    fn from(source: TriggerSource) -> Self {
        match source {
            TriggerSource::Unknown(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Custom email sender event, as delivered by the user pool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
    #[serde(default)]
    pub version: String,
    pub trigger_source: TriggerSource,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub user_pool_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub caller_context: Option<CallerContext>,
    #[serde(default)]
    pub request: LifecycleRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerContext {
    #[serde(default)]
    pub aws_sdk_version: String,
    #[serde(default)]
    pub client_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleRequest {
    #[serde(default, rename = "type")]
    pub request_type: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub client_metadata: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_attributes: HashMap<String, String>,
}

impl LifecycleEvent {
    /// Recipient address from the `email` user attribute
    pub fn email(&self) -> Result<&str, HubmailError> {
        self.request
            .user_attributes
            .get("email")
            .map(String::as_str)
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| {
                HubmailError::Validation(format!(
                    "Event for {} has no email user attribute",
                    self.trigger_source
                ))
            })
    }

    /// Ciphertext code, if the trigger carried a non-empty one
    pub fn code(&self) -> Option<&str> {
        self.request
            .code
            .as_deref()
            .filter(|code| !code.is_empty())
    }

    pub fn workflow(&self) -> Workflow {
        self.trigger_source.workflow()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}
