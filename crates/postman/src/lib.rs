//! Postman - configuration-driven mail sending
//!
//! Reads the `mail` configuration group, builds the matching transport
//! (`mail`, `sendmail` or `smtp`) and sends messages through a lazily
//! created mailer client.
//!
//! ```no_run
//! use postman::{Postman, PostmanOptions};
//!
//! let mut postman = Postman::new(PostmanOptions::new().environment("production"))?;
//! postman.send("app@host.com", ("jane@doe.net", "Jane"), "Welcome", "<p>Hello</p>")?;
//! assert!(postman.status());
//! # Ok::<(), postman::PostmanError>(())
//! ```

mod error;
mod mailer;
mod message;
mod options;
mod postman;
mod settings;
mod transport;

pub use error::{PostmanError, PostmanResult};
pub use mailer::{Mailer, MailerClient};
pub use message::{enclose, Contact, OutgoingMessage, DEFAULT_CONTENT_TYPE};
pub use options::{PostmanOptions, CONFIG_DIR_ENV, DEFAULT_CONFIG_DIR};
pub use postman::Postman;
pub use settings::{
    Driver, Encryption, SmtpSettings, DEFAULT_SENDMAIL_COMMAND, MAIL_CONFIG_KEY,
};
pub use transport::{Transport, TransportKind};

/// Re-exported configuration plumbing, for injecting sources and filesystems
pub mod config {
    pub use postman_config::*;
}
