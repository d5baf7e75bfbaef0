//! Delivery transports

use crate::settings::Configuration;
use crate::{
    Driver, Encryption, PostmanError, PostmanResult, SmtpSettings, DEFAULT_SENDMAIL_COMMAND,
};
use lettre::{
    transport::{smtp::authentication::Credentials, stub::StubTransport},
    Message, SendmailTransport, SmtpTransport, Transport as _,
};
use std::fmt;
use tracing::{debug, info};

/// Which kind of transport a [`Transport`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Direct,
    Sendmail,
    Smtp,
    Stub,
}

/// A configured delivery mechanism
#[derive(Clone)]
pub enum Transport {
    /// System mail path: the `sendmail` binary found on `PATH`
    Direct(SendmailTransport),
    /// An explicit sendmail command
    Sendmail {
        command: String,
        transport: SendmailTransport,
    },
    /// SMTP client
    Smtp(SmtpTransport),
    /// In-memory transport that records messages instead of delivering them
    Stub(StubTransport),
}

impl Transport {
    /// Transport used by the `mail` driver
    pub fn direct() -> Self {
        Transport::Direct(SendmailTransport::new())
    }

    /// Transport used by the `sendmail` driver.
    ///
    /// Only the program of `command` is run; arguments such as `-bs` are
    /// replaced by the ones lettre passes to sendmail.
    pub fn sendmail(command: impl Into<String>) -> Self {
        let command = command.into();
        let program = command
            .split_whitespace()
            .next()
            .or_else(|| DEFAULT_SENDMAIL_COMMAND.split_whitespace().next())
            .unwrap_or("sendmail")
            .to_string();

        debug!("Using sendmail program {}", program);
        Transport::Sendmail {
            transport: SendmailTransport::new_with_command(program),
            command,
        }
    }

    /// Transport used by the `smtp` driver
    pub fn smtp(settings: &SmtpSettings) -> PostmanResult<Self> {
        let encryption = Encryption::from_config(settings.encryption.as_deref())?;

        let builder = match encryption {
            Encryption::Ssl => SmtpTransport::relay(&settings.host)?,
            Encryption::Tls => SmtpTransport::starttls_relay(&settings.host)?,
            Encryption::None => SmtpTransport::builder_dangerous(&settings.host),
        };

        let mut builder = builder.port(settings.port);
        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Transport::Smtp(builder.build()))
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            Transport::Direct(_) => TransportKind::Direct,
            Transport::Sendmail { .. } => TransportKind::Sendmail,
            Transport::Smtp(_) => TransportKind::Smtp,
            Transport::Stub(_) => TransportKind::Stub,
        }
    }

    /// Deliver a message, blocking until the transport is done
    pub fn deliver(&self, message: &Message) -> PostmanResult<()> {
        match self {
            Transport::Direct(transport) => transport.send(message)?,
            Transport::Sendmail { transport, .. } => transport.send(message)?,
            Transport::Smtp(transport) => {
                let response = transport.send(message)?;
                debug!("SMTP server replied {}", response.code());
            }
            Transport::Stub(transport) => transport.send(message)?,
        }

        Ok(())
    }

    /// Build the transport for a configuration.
    ///
    /// An injected transport replaces the one the driver would build, but
    /// the driver still has to be recognized.
    pub(crate) fn set_up(
        configuration: &Configuration,
        injected: Option<Transport>,
    ) -> PostmanResult<Self> {
        let driver: Driver = configuration.driver.parse()?;

        if let Some(transport) = injected {
            info!("Using injected {:?} transport for driver {}", transport.kind(), driver);
            return Ok(transport);
        }

        let transport = match driver {
            Driver::Mail => Transport::direct(),
            Driver::Smtp => {
                let settings = configuration
                    .smtp
                    .as_ref()
                    .ok_or(PostmanError::MissingField {
                        driver: "smtp",
                        field: "host",
                    })?;
                Transport::smtp(settings)?
            }
            // the configured `sendmail` value is informational only
            Driver::Sendmail => Transport::sendmail(DEFAULT_SENDMAIL_COMMAND),
        };

        info!("Set up {:?} transport for driver {}", transport.kind(), driver);
        Ok(transport)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Sendmail { command, .. } => {
                f.debug_struct("Sendmail").field("command", command).finish()
            }
            other => write!(f, "{:?}", other.kind()),
        }
    }
}
