//! Outgoing messages and their lettre envelope

use crate::{PostmanError, PostmanResult};
use lettre::message::{header::ContentType, Mailbox};
use lettre::Message;

/// Body content type used when the caller gives none
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// An email address with an optional display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub address: String,
    pub name: Option<String>,
}

impl Contact {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    /// Set the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn to_mailbox(&self) -> PostmanResult<Mailbox> {
        let address = self
            .address
            .parse()
            .map_err(|e| PostmanError::InvalidAddress(format!("{}: {}", self.address, e)))?;

        Ok(Mailbox::new(self.name.clone(), address))
    }
}

impl From<&str> for Contact {
    fn from(address: &str) -> Self {
        Contact::new(address)
    }
}

impl From<String> for Contact {
    fn from(address: String) -> Self {
        Contact::new(address)
    }
}

/// `(address, name)`
impl From<(&str, &str)> for Contact {
    fn from((address, name): (&str, &str)) -> Self {
        Contact::new(address).named(name)
    }
}

impl From<(String, String)> for Contact {
    fn from((address, name): (String, String)) -> Self {
        Contact::new(address).named(name)
    }
}

/// Email message to send
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub from: Contact,
    pub to: Contact,
    pub subject: String,
    pub body: String,
    /// MIME type of the body (e.g., "text/plain")
    pub content_type: String,
}

impl OutgoingMessage {
    /// Create a message with an HTML body
    pub fn new(
        from: impl Into<Contact>,
        to: impl Into<Contact>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// Set the body content type
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Build a lettre Message from an OutgoingMessage
pub fn enclose(msg: &OutgoingMessage) -> PostmanResult<Message> {
    let content_type = ContentType::parse(&msg.content_type)
        .map_err(|e| PostmanError::InvalidContentType(format!("{}: {}", msg.content_type, e)))?;

    Message::builder()
        .subject(&msg.subject)
        .from(msg.from.to_mailbox()?)
        .to(msg.to.to_mailbox()?)
        .header(content_type)
        .body(msg.body.clone())
        .map_err(|e| PostmanError::MessageBuildError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aloha() -> OutgoingMessage {
        OutgoingMessage::new("john@doe.net", "jannet@dublin.com", "Aloha!", "wanna cyber?")
    }

    #[test]
    fn test_enclose_message() {
        let message = enclose(&aloha()).unwrap();

        let envelope = message.envelope();
        assert_eq!(
            envelope.from().map(|a| a.to_string()),
            Some("john@doe.net".to_string())
        );
        assert_eq!(
            envelope.to().iter().map(|a| a.to_string()).collect::<Vec<_>>(),
            vec!["jannet@dublin.com".to_string()]
        );
        assert_eq!(message.headers().get_raw("Subject"), Some("Aloha!"));

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Content-Type: text/html"));
        assert!(formatted.contains("wanna cyber?"));
    }

    #[test]
    fn test_enclose_named_contacts() {
        let msg = OutgoingMessage::new(
            ("john@doe.net", "John Doe"),
            Contact::new("jannet@dublin.com").named("Jannet"),
            "Aloha!",
            "wanna cyber?",
        )
        .content_type("text/plain");

        let message = enclose(&msg).unwrap();
        let from = message.headers().get_raw("From").unwrap();
        assert!(from.contains("John Doe"));
        assert!(from.contains("john@doe.net"));

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Content-Type: text/plain"));
    }

    #[test]
    fn test_enclose_invalid_address() {
        let msg = OutgoingMessage::new("not an address", "jannet@dublin.com", "Aloha!", "hi");

        let err = enclose(&msg).unwrap_err();
        assert!(matches!(err, PostmanError::InvalidAddress(a) if a.starts_with("not an address")));
    }

    #[test]
    fn test_enclose_invalid_content_type() {
        let msg = aloha().content_type("definitely not a mime type");

        assert!(matches!(
            enclose(&msg),
            Err(PostmanError::InvalidContentType(_))
        ));
    }
}
