/// Verification workflow - SignUp, ForgotPassword and ResendCode
use super::{SenderContext, render_and_send};
use hubmail_core::HubmailError;
use hubmail_core::constants::{CODE_PLACEHOLDER, VERIFICATION_TEMPLATE};
use hubmail_core::models::LifecycleEvent;
use hubmail_core::utils::logging::redact_email;
use std::collections::HashMap;
use tracing::{debug, warn};

#[tracing::instrument(
    name = "verification.handle",
    skip(ctx, event),
    fields(trigger_source = %event.trigger_source)
)]
pub async fn handle(ctx: &SenderContext, event: &LifecycleEvent) -> Result<(), HubmailError> {
    // 1. Resolve recipient
    let email = event.email()?;

    // 2. Recover the code, degrading to the placeholder
    let code = recover_code(ctx, event).await;
    let verification_code = code.unwrap_or_else(|| CODE_PLACEHOLDER.to_string());

    // 3. Render and send
    let mut context = HashMap::new();
    context.insert("verification_code".to_string(), verification_code);

    render_and_send(
        ctx,
        email,
        &ctx.config.verification_subject,
        VERIFICATION_TEMPLATE,
        context,
    )
    .await
}

/// Decrypted code, or `None` when the event had none or it could not be recovered
#[tracing::instrument(name = "verification.decrypt_code", skip(ctx, event))]
async fn recover_code(ctx: &SenderContext, event: &LifecycleEvent) -> Option<String> {
    let Some(ciphertext) = event.code() else {
        debug!("Event carries no code");
        return None;
    };

    match ctx.decryptor.decrypt(ciphertext).await {
        Ok(plaintext) => match String::from_utf8(plaintext) {
            Ok(code) => Some(code),
            Err(_) => {
                warn!("Decrypted code is not valid UTF-8, using placeholder");
                None
            }
        },
        Err(e) => {
            warn!(
                error_kind = e.kind(),
                error = %redact_email(&e.to_string()),
                "Failed to decrypt code, using placeholder"
            );
            None
        }
    }
}
