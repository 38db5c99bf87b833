/// AWS service clients and the mail API client
pub mod aws;
pub mod cognito;
pub mod kms;
pub mod sendgrid;
pub mod ssm;

// Re-export service traits
pub use cognito::PasswordAssigner;
pub use sendgrid::MailSender;
pub use ssm::SecretStore;
