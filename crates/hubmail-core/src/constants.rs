/// Application constants
///
/// Defaults and fixed values used across the sender. Environment-driven
/// settings live in `models::config`.
// ============================================================================
// Environment Variable Names
// ============================================================================
pub const ENV_KMS_KEY_ARN: &str = "KMS_KEYS_COGNITO_TRIGGERS_CMK_NAME";
pub const ENV_NO_REPLY_ADDRESS: &str = "EMAIL_NO_REPLY_ADDRESS";
pub const ENV_VERIFICATION_SUBJECT: &str = "EMAIL_USER_VERIFICATION_SUBJECT";
pub const ENV_INVITE_SUBJECT: &str = "EMAIL_USER_INVITE_SUBJECT";
pub const ENV_SENDGRID_API_KEY_PARAM: &str = "SSM_KEY_SENDGRID_API_KEY_ARN";
pub const ENV_REGION: &str = "ENV_REGION";
pub const ENV_TEMPLATES_DIR: &str = "TEMPLATES_DIR";
pub const ENV_LAMBDA_TASK_ROOT: &str = "LAMBDA_TASK_ROOT";
pub const ENV_SENDGRID_BASE_URL: &str = "SENDGRID_API_BASE_URL";
pub const ENV_INVITE_PASSWORD_FAILURE_POLICY: &str = "INVITE_PASSWORD_FAILURE_POLICY";

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_NO_REPLY_ADDRESS: &str = "noreply@email.com";
pub const DEFAULT_VERIFICATION_SUBJECT: &str = "Your Verification Code";
pub const DEFAULT_INVITE_SUBJECT: &str = "Your ACME Hub registration details";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const DEFAULT_SENDGRID_BASE_URL: &str = "https://api.sendgrid.com";

// ============================================================================
// Templates
// ============================================================================

pub const VERIFICATION_TEMPLATE: &str = "user_verification.hbs";
pub const INVITE_TEMPLATE: &str = "user_invite.hbs";

/// Shown in place of the verification code when none could be recovered
pub const CODE_PLACEHOLDER: &str = "Error - Contact Administrator";

// ============================================================================
// Passwords
// ============================================================================

pub const DEFAULT_PASSWORD_LENGTH: usize = 8;

pub const PASSWORD_UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const PASSWORD_LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const PASSWORD_DIGITS: &str = "0123456789";
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+[]{}|;:,.<>?";

// ============================================================================
// Mail API
// ============================================================================

pub const SENDGRID_SEND_PATH: &str = "/v3/mail/send";

/// Response bodies longer than this are cut before they land in an error
pub const MAX_ERROR_BODY_CHARS: usize = 512;
