/// Data models for the Hubmail sender
pub mod config;
pub mod email;
pub mod events;

// Re-export commonly used types
pub use config::*;
pub use email::*;
pub use events::*;
