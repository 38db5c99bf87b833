/// Hubmail Core - Shared library for the Cognito custom email sender
///
/// Event models, configuration, envelope decryption and the service clients
/// used by the sender Lambda.
pub mod constants;
pub mod crypto;
pub mod email;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::HubmailError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
