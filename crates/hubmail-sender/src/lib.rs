/// Hubmail Sender - Cognito custom email sender Lambda
///
/// The binary in `main.rs` wires AWS clients into a [`SenderContext`] once and
/// serves every invocation through [`handler`].
pub mod handlers;

pub use handlers::{SenderContext, handler};
