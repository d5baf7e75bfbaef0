//! The mail adapter

use crate::settings::Configuration;
use crate::{
    enclose, Contact, Mailer, MailerClient, OutgoingMessage, PostmanOptions, PostmanResult,
    Transport, DEFAULT_CONTENT_TYPE,
};
use lettre::Message;
use postman_config::ConfigSource;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Sends mail through the transport selected by the `mail` configuration
pub struct Postman {
    environment: String,
    configuration: Configuration,
    transport: Arc<Transport>,
    mailer: OnceLock<Arc<dyn MailerClient>>,
    status: bool,
}

impl Postman {
    /// Load the configuration and set up the transport
    pub fn new(mut options: PostmanOptions) -> PostmanResult<Self> {
        let source = options.config_source();
        let configuration = Self::configure(source.as_ref())?;
        let transport = Transport::set_up(&configuration, options.transport.take())?;

        let mailer: OnceLock<Arc<dyn MailerClient>> =
            options.mailer.take().map(OnceLock::from).unwrap_or_default();
        if mailer.get().is_some() {
            debug!("Using injected mailer client");
        }

        info!(
            "Postman ready: driver {} via {:?} ({} environment)",
            configuration.driver,
            transport.kind(),
            options.environment
        );

        Ok(Self {
            environment: options.environment,
            configuration,
            transport: Arc::new(transport),
            mailer,
            status: false,
        })
    }

    /// Postman for `environment` with every collaborator at its default
    pub fn from_environment(environment: impl Into<String>) -> PostmanResult<Self> {
        Self::new(PostmanOptions::new().environment(environment))
    }

    fn configure(source: &dyn ConfigSource) -> PostmanResult<Configuration> {
        let configuration = Configuration::from_source(source)?;
        debug!("Configured mail driver '{}'", configuration.driver);
        Ok(configuration)
    }

    /// Send an HTML message
    pub fn send(
        &mut self,
        from: impl Into<Contact>,
        to: impl Into<Contact>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> PostmanResult<&mut Self> {
        self.send_with_content_type(from, to, subject, body, DEFAULT_CONTENT_TYPE)
    }

    /// Send a message with an explicit body content type
    pub fn send_with_content_type(
        &mut self,
        from: impl Into<Contact>,
        to: impl Into<Contact>,
        subject: impl Into<String>,
        body: impl Into<String>,
        content_type: impl Into<String>,
    ) -> PostmanResult<&mut Self> {
        let message = OutgoingMessage::new(from, to, subject, body).content_type(content_type);
        self.transmit(message)
    }

    /// Enclose and send a message, recording the outcome in [`status`](Self::status).
    ///
    /// The status is `false` whenever the send fails.
    pub fn transmit(&mut self, message: OutgoingMessage) -> PostmanResult<&mut Self> {
        self.status = false;

        let enclosed = self.enclose(&message)?;
        info!("Sending \"{}\" to {}", message.subject, message.to.address);

        match self.mailer_client().send(&enclosed) {
            Ok(sent) => {
                self.status = sent;
                debug!("Mailer client returned {}", sent);
                Ok(self)
            }
            Err(e) => {
                warn!("Failed to send \"{}\": {}", message.subject, e);
                Err(e)
            }
        }
    }

    /// Build the lettre message for an outgoing message
    pub fn enclose(&self, message: &OutgoingMessage) -> PostmanResult<Message> {
        enclose(message)
    }

    /// The mailer client, created on first use and reused afterwards
    pub fn mailer_client(&self) -> Arc<dyn MailerClient> {
        self.mailer
            .get_or_init(|| {
                debug!("Creating mailer client for {:?} transport", self.transport.kind());
                let client: Arc<dyn MailerClient> =
                    Arc::new(Mailer::new(Arc::clone(&self.transport)));
                client
            })
            .clone()
    }

    /// Result of the most recent send
    pub fn status(&self) -> bool {
        self.status
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn driver(&self) -> &str {
        &self.configuration.driver
    }

    pub fn host(&self) -> Option<&str> {
        self.configuration.smtp.as_ref().map(|s| s.host.as_str())
    }

    pub fn port(&self) -> Option<u16> {
        self.configuration.smtp.as_ref().map(|s| s.port)
    }

    pub fn encryption(&self) -> Option<&str> {
        self.configuration
            .smtp
            .as_ref()
            .and_then(|s| s.encryption.as_deref())
    }

    pub fn username(&self) -> Option<&str> {
        self.configuration.smtp.as_ref().map(|s| s.username.as_str())
    }

    pub fn password(&self) -> Option<&str> {
        self.configuration.smtp.as_ref().map(|s| s.password.as_str())
    }

    pub fn sendmail_command(&self) -> Option<&str> {
        self.configuration.sendmail_command.as_deref()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}
