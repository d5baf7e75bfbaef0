//! Mailer clients

use crate::{PostmanResult, Transport};
use lettre::Message;
use std::sync::Arc;
use tracing::debug;

/// Sends enclosed messages.
///
/// Returns `true` when the message was accepted for delivery.
pub trait MailerClient: Send + Sync {
    fn send(&self, message: &Message) -> PostmanResult<bool>;
}

/// Default client, bound to a single transport
pub struct Mailer {
    transport: Arc<Transport>,
}

impl Mailer {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

impl MailerClient for Mailer {
    fn send(&self, message: &Message) -> PostmanResult<bool> {
        debug!("Delivering message via {:?}", self.transport.kind());
        self.transport.deliver(message)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{enclose, OutgoingMessage, PostmanError};
    use lettre::transport::stub::StubTransport;

    fn message() -> Message {
        enclose(&OutgoingMessage::new(
            "john@doe.net",
            "jannet@dublin.com",
            "Aloha!",
            "wanna cyber?",
        ))
        .unwrap()
    }

    #[test]
    fn test_send_through_stub() {
        let mailer = Mailer::new(Arc::new(Transport::Stub(StubTransport::new_ok())));

        assert!(mailer.send(&message()).unwrap());

        match mailer.transport() {
            Transport::Stub(stub) => {
                let sent = stub.messages();
                assert_eq!(sent.len(), 1);
                assert!(sent[0].1.contains("Subject: Aloha!"));
            }
            other => panic!("expected stub transport, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_error_propagates() {
        let mailer = Mailer::new(Arc::new(Transport::Stub(StubTransport::new_error())));

        let err = mailer.send(&message()).unwrap_err();
        assert!(matches!(err, PostmanError::Stub(_)));
    }
}
