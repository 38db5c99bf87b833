/// Invite workflow - AdminCreateUser
///
/// The invitee cannot see the temporary password Cognito generated, so a
/// random permanent password is set first. The invite then points the user
/// at the forgot-password flow to choose their own.
use super::{SenderContext, render_and_send};
use hubmail_core::HubmailError;
use hubmail_core::constants::{DEFAULT_PASSWORD_LENGTH, INVITE_TEMPLATE};
use hubmail_core::models::{InvitePasswordPolicy, LifecycleEvent};
use hubmail_core::utils::logging::redact_email;
use hubmail_core::utils::password::generate_password;
use std::collections::HashMap;
use tracing::{error, warn};

#[tracing::instrument(
    name = "invite.handle",
    skip(ctx, event),
    fields(user_pool_id = %event.user_pool_id)
)]
pub async fn handle(ctx: &SenderContext, event: &LifecycleEvent) -> Result<(), HubmailError> {
    // 1. Resolve recipient and target user
    let email = event.email()?;
    if event.user_pool_id.is_empty() || event.user_name.is_empty() {
        return Err(HubmailError::Validation(
            "Invite event is missing userPoolId or userName".to_string(),
        ));
    }

    // 2. Set a permanent password before any mail goes out
    if let Err(e) = reset_credential(ctx, event).await {
        match ctx.config.invite_password_policy {
            InvitePasswordPolicy::Abort => {
                error!(
                    error = %redact_email(&e.to_string()),
                    "Failed to set permanent password, invite not sent"
                );
                return Err(e);
            }
            InvitePasswordPolicy::Continue => {
                warn!(
                    error = %redact_email(&e.to_string()),
                    "Failed to set permanent password, sending invite anyway"
                );
            }
        }
    }

    // 3. Render and send
    let mut context = HashMap::new();
    context.insert("user_identifier".to_string(), email.to_string());

    render_and_send(
        ctx,
        email,
        &ctx.config.invite_subject,
        INVITE_TEMPLATE,
        context,
    )
    .await
}

#[tracing::instrument(name = "invite.reset_credential", skip(ctx, event))]
async fn reset_credential(ctx: &SenderContext, event: &LifecycleEvent) -> Result<(), HubmailError> {
    let password = generate_password(DEFAULT_PASSWORD_LENGTH)?;
    ctx.passwords
        .set_permanent_password(&event.user_pool_id, &event.user_name, &password)
        .await
}
