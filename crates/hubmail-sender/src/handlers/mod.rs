/// Lambda event handlers
pub mod invite;
pub mod verification;

use hubmail_core::HubmailError;
use hubmail_core::crypto::{CodeDecryptor, EnvelopeCodeDecryptor};
use hubmail_core::email::{HandlebarsTemplateRenderer, TemplateRenderer};
use hubmail_core::models::{EmailMessage, LifecycleEvent, SenderConfig, Workflow};
use hubmail_core::services::aws::load_aws_config;
use hubmail_core::services::cognito::CognitoPasswordAssigner;
use hubmail_core::services::kms::KmsDataKeyDecryptor;
use hubmail_core::services::sendgrid::SendGridMailSender;
use hubmail_core::services::ssm::SsmSecretStore;
use hubmail_core::services::{MailSender, PasswordAssigner, SecretStore};
use hubmail_core::utils::logging::{email_domain, redact_email};
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// Collaborators shared read-only by every invocation
pub struct SenderContext {
    pub(crate) config: SenderConfig,
    pub(crate) decryptor: Arc<dyn CodeDecryptor>,
    pub(crate) passwords: Arc<dyn PasswordAssigner>,
    pub(crate) secrets: Arc<dyn SecretStore>,
    pub(crate) renderer: Arc<dyn TemplateRenderer>,
    pub(crate) mailer: Arc<dyn MailSender>,
}

impl SenderContext {
    pub fn new(
        config: SenderConfig,
        decryptor: Arc<dyn CodeDecryptor>,
        passwords: Arc<dyn PasswordAssigner>,
        secrets: Arc<dyn SecretStore>,
        renderer: Arc<dyn TemplateRenderer>,
        mailer: Arc<dyn MailSender>,
    ) -> Self {
        Self {
            config,
            decryptor,
            passwords,
            secrets,
            renderer,
            mailer,
        }
    }

    /// Builds the production context from the process environment
    pub async fn from_env() -> Result<Self, HubmailError> {
        let config = SenderConfig::from_env()?;
        let aws_config = load_aws_config(config.region.as_deref()).await;

        let kms_client = aws_sdk_kms::Client::new(&aws_config);
        let ssm_client = aws_sdk_ssm::Client::new(&aws_config);
        let cognito_client = aws_sdk_cognitoidentityprovider::Client::new(&aws_config);

        let decryptor = EnvelopeCodeDecryptor::new(
            config.kms_key_arn.clone(),
            Arc::new(KmsDataKeyDecryptor::new(kms_client)),
        )?;

        info!(
            region = config.region.as_deref().unwrap_or("default"),
            templates_dir = %config.templates_dir.display(),
            invite_password_policy = ?config.invite_password_policy,
            "Sender context initialized"
        );

        Ok(Self {
            decryptor: Arc::new(decryptor),
            passwords: Arc::new(CognitoPasswordAssigner::new(cognito_client)),
            secrets: Arc::new(SsmSecretStore::new(ssm_client)),
            renderer: Arc::new(HandlebarsTemplateRenderer::new(config.templates_dir.clone())),
            mailer: Arc::new(SendGridMailSender::new(
                reqwest::Client::new(),
                config.sendgrid_base_url.clone(),
            )),
            config,
        })
    }
}

/// Main Lambda handler - routes the trigger to its workflow.
///
/// On success the original payload is returned unchanged.
pub async fn handler(ctx: &SenderContext, event: LambdaEvent<Value>) -> Result<Value, Error> {
    let payload = event.payload;

    let lifecycle: LifecycleEvent = serde_json::from_value(payload.clone()).map_err(|e| {
        error!("Failed to parse custom email sender event: {}", e);
        HubmailError::from(e)
    })?;

    info!(
        trigger_source = %lifecycle.trigger_source,
        user_pool_id = %lifecycle.user_pool_id,
        "Received custom email sender event"
    );

    let result = match lifecycle.workflow() {
        Workflow::Verification => verification::handle(ctx, &lifecycle).await,
        Workflow::Invite => invite::handle(ctx, &lifecycle).await,
        Workflow::NoOp => {
            info!(
                trigger_source = %lifecycle.trigger_source,
                "No workflow for trigger source, nothing to do"
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        error!(
            trigger_source = %lifecycle.trigger_source,
            error_kind = e.kind(),
            error = %redact_email(&e.to_string()),
            "Custom email sender workflow failed"
        );
        return Err(e.into());
    }

    Ok(payload)
}

/// Fetches the API key, renders `template` and sends it to `to`.
///
/// Shared tail of both workflows. Every failure here aborts the invocation.
pub(crate) async fn render_and_send(
    ctx: &SenderContext,
    to: &str,
    subject: &str,
    template: &str,
    context: HashMap<String, String>,
) -> Result<(), HubmailError> {
    let api_key = ctx
        .secrets
        .get_secret(&ctx.config.sendgrid_api_key_param)
        .await?;

    let html = ctx.renderer.render(template, &context)?;

    let message = EmailMessage::builder()
        .to(to)
        .from(ctx.config.no_reply_address.as_str())
        .subject(subject)
        .html(html)
        .build();

    let message_id = ctx.mailer.send(&message, &api_key).await?;

    info!(
        recipient_domain = %email_domain(to),
        template = %template,
        message_id = message_id.as_deref().unwrap_or("unknown"),
        "Email sent"
    );
    Ok(())
}
