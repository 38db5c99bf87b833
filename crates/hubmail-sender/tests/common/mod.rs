//! Common test utilities and helpers for integration tests
#![allow(dead_code)]

pub mod mock_aws;

use hubmail_core::models::{InvitePasswordPolicy, SenderConfig};
use hubmail_sender::SenderContext;
use lambda_runtime::{Context, LambdaEvent};
use mock_aws::*;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;

pub const KEY_ARN: &str =
    "arn:aws:kms:eu-west-1:123456789012:key/1234abcd-12ab-34cd-56ef-1234567890ab";
pub const API_KEY_PARAM: &str = "/hub/sendgrid-api-key";
pub const API_KEY: &str = "SG.test-api-key";
pub const USER_POOL_ID: &str = "eu-west-1_XXXXXXXX";
pub const NO_REPLY: &str = "noreply@acme.com";
pub const PLACEHOLDER: &str = "Error - Contact Administrator";

/// Templates bundled with the core crate
pub fn templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../hubmail-core/templates")
}

pub fn test_config() -> SenderConfig {
    SenderConfig {
        kms_key_arn: KEY_ARN.to_string(),
        no_reply_address: NO_REPLY.to_string(),
        verification_subject: "Your Verification Code".to_string(),
        invite_subject: "Your ACME Hub registration details".to_string(),
        sendgrid_api_key_param: API_KEY_PARAM.to_string(),
        region: Some("eu-west-1".to_string()),
        templates_dir: templates_dir(),
        sendgrid_base_url: "https://api.sendgrid.com".to_string(),
        invite_password_policy: InvitePasswordPolicy::Abort,
    }
}

/// Custom email sender event as the user pool delivers it
pub fn trigger_event(trigger_source: &str, code: Option<&str>, email: Option<&str>) -> Value {
    let mut attributes = json!({
        "sub": "b2c53424-50c1-7026-e27a-000000000000",
        "email_verified": "true",
        "cognito:user_status": "FORCE_CHANGE_PASSWORD",
    });
    if let Some(email) = email {
        attributes["email"] = json!(email);
    }

    json!({
        "version": "1",
        "triggerSource": trigger_source,
        "region": "eu-west-1",
        "userPoolId": USER_POOL_ID,
        "userName": email.unwrap_or("no-email-user"),
        "callerContext": {
            "awsSdkVersion": "aws-sdk-unknown-unknown",
            "clientId": "CLIENT_ID_NOT_APPLICABLE"
        },
        "request": {
            "type": "customEmailSenderRequestV1",
            "code": code,
            "clientMetadata": null,
            "userAttributes": attributes
        }
    })
}

pub fn lambda_event(payload: Value) -> LambdaEvent<Value> {
    LambdaEvent::new(payload, Context::default())
}

/// Mock collaborators sharing one call log
pub struct Harness {
    pub log: CallLog,
    pub decryptor: MockDecryptor,
    pub passwords: MockPasswordAssigner,
    pub secrets: MockSecretStore,
    pub renderer: RecordingRenderer,
    pub mailer: MockMailSender,
}

impl Harness {
    pub fn new() -> Self {
        let log = CallLog::default();
        let secrets = MockSecretStore::new(log.clone());
        secrets.put(API_KEY_PARAM, API_KEY);

        let templates = templates_dir();
        Self {
            decryptor: MockDecryptor::new(log.clone()),
            passwords: MockPasswordAssigner::new(log.clone()),
            secrets,
            renderer: RecordingRenderer::new(log.clone(), templates.to_str().unwrap()),
            mailer: MockMailSender::new(log.clone()),
            log,
        }
    }

    pub fn context(&self) -> SenderContext {
        self.context_with(test_config())
    }

    pub fn context_with(&self, config: SenderConfig) -> SenderContext {
        SenderContext::new(
            config,
            Arc::new(self.decryptor.clone()),
            Arc::new(self.passwords.clone()),
            Arc::new(self.secrets.clone()),
            Arc::new(self.renderer.clone()),
            Arc::new(self.mailer.clone()),
        )
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
