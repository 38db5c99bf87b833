/// Rendered email handed to the mail dispatcher
use serde::Serialize;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TypedBuilder)]
pub struct EmailMessage {
    #[builder(setter(into))]
    pub to: String,
    #[builder(setter(into))]
    pub from: String,
    #[builder(setter(into))]
    pub subject: String,
    #[builder(setter(into))]
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accepts_str() {
        let message = EmailMessage::builder()
            .to("a@x.com")
            .from("noreply@acme.com")
            .subject("Your Verification Code")
            .html("<p>123456</p>")
            .build();

        assert_eq!(message.to, "a@x.com");
        assert_eq!(message.from, "noreply@acme.com");
        assert!(message.html.contains("123456"));
    }
}
