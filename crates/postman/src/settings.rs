//! Mail driver configuration

use crate::{PostmanError, PostmanResult};
use postman_config::{get_typed, ConfigError, ConfigSource};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Configuration key holding the mail settings
pub const MAIL_CONFIG_KEY: &str = "mail";

/// Command run by the sendmail driver
pub const DEFAULT_SENDMAIL_COMMAND: &str = "/usr/sbin/sendmail -bs";

/// Mail delivery mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// The system mail path
    Mail,
    /// An explicit sendmail command
    Sendmail,
    /// An SMTP server
    Smtp,
}

impl Driver {
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Mail => "mail",
            Driver::Sendmail => "sendmail",
            Driver::Smtp => "smtp",
        }
    }
}

impl FromStr for Driver {
    type Err = PostmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mail" => Ok(Driver::Mail),
            "sendmail" => Ok(Driver::Sendmail),
            "smtp" => Ok(Driver::Smtp),
            other => Err(PostmanError::UnrecognizedDriver(other.to_string())),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SMTP connection security
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encryption {
    /// Plaintext connection
    None,
    /// Implicit TLS (`ssl`, usually port 465)
    Ssl,
    /// STARTTLS upgrade (`tls`, usually port 587 or 25)
    Tls,
}

impl Encryption {
    /// Parse a configured value; `null` means no encryption
    pub fn from_config(value: Option<&str>) -> PostmanResult<Self> {
        value.unwrap_or_default().parse()
    }
}

impl FromStr for Encryption {
    type Err = PostmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Encryption::None),
            "ssl" => Ok(Encryption::Ssl),
            "tls" | "starttls" => Ok(Encryption::Tls),
            _ => Err(PostmanError::UnsupportedEncryption(s.to_string())),
        }
    }
}

/// Everything the SMTP driver needs
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// `None` when configured as `null`
    pub encryption: Option<String>,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("encryption", &self.encryption)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Ports are written either as numbers or as numeric strings
#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

impl TryFrom<PortValue> for u16 {
    type Error = PostmanError;

    fn try_from(value: PortValue) -> Result<Self, Self::Error> {
        match value {
            PortValue::Number(port) => Ok(port),
            PortValue::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| PostmanError::InvalidPort(text)),
        }
    }
}

/// Reads single entries of the `mail` group, so a driver never touches
/// fields it does not use
struct MailFields<'a> {
    source: &'a dyn ConfigSource,
}

impl MailFields<'_> {
    fn key(field: &str) -> String {
        format!("{}.{}", MAIL_CONFIG_KEY, field)
    }

    /// Raw entry; `None` when the key is absent
    fn raw(&self, field: &str) -> PostmanResult<Option<Value>> {
        Ok(self.source.get(&Self::key(field))?)
    }

    /// Entry that may be absent or `null`
    fn optional<T: DeserializeOwned>(&self, field: &str) -> PostmanResult<Option<T>> {
        Ok(get_typed::<Option<T>>(self.source, &Self::key(field))?.flatten())
    }

    /// Entry the smtp driver cannot work without
    fn required<T: DeserializeOwned>(&self, field: &'static str) -> PostmanResult<T> {
        self.optional(field)?.ok_or(PostmanError::MissingField {
            driver: "smtp",
            field,
        })
    }
}

/// Driver fields read from the `mail` group.
///
/// The driver string is kept as written; it is only validated when the
/// transport is set up.
#[derive(Debug, Clone)]
pub(crate) struct Configuration {
    pub(crate) driver: String,
    pub(crate) smtp: Option<SmtpSettings>,
    pub(crate) sendmail_command: Option<String>,
}

impl Configuration {
    pub(crate) fn from_source(source: &dyn ConfigSource) -> PostmanResult<Self> {
        let fields = MailFields { source };

        if fields.source.get(MAIL_CONFIG_KEY)?.is_none() {
            return Err(ConfigError::MissingKey(MAIL_CONFIG_KEY.to_string()).into());
        }

        let driver: String = fields
            .optional("driver")?
            .ok_or_else(|| ConfigError::MissingKey(format!("{}.driver", MAIL_CONFIG_KEY)))?;

        let mut configuration = Self {
            driver,
            smtp: None,
            sendmail_command: None,
        };

        match configuration.driver.as_str() {
            "smtp" => {
                // the key must be present, but null means plaintext
                if fields.raw("encryption")?.is_none() {
                    return Err(PostmanError::MissingField {
                        driver: "smtp",
                        field: "encryption",
                    });
                }

                configuration.smtp = Some(SmtpSettings {
                    host: fields.required("host")?,
                    port: fields.required::<PortValue>("port")?.try_into()?,
                    encryption: fields.optional("encryption")?,
                    username: fields.required("username")?,
                    password: fields.required("password")?,
                });
            }
            "sendmail" => {
                configuration.sendmail_command = fields.optional("sendmail")?;
            }
            _ => {}
        }

        Ok(configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postman_config::MemorySource;
    use serde_json::json;

    fn configuration(mail: Value) -> PostmanResult<Configuration> {
        Configuration::from_source(&MemorySource::new().with("mail", mail))
    }

    #[test]
    fn test_driver_parsing() {
        assert_eq!("mail".parse::<Driver>().unwrap(), Driver::Mail);
        assert_eq!("sendmail".parse::<Driver>().unwrap(), Driver::Sendmail);
        assert_eq!("smtp".parse::<Driver>().unwrap(), Driver::Smtp);

        let err = "mailgun".parse::<Driver>().unwrap_err();
        assert!(matches!(err, PostmanError::UnrecognizedDriver(d) if d == "mailgun"));
    }

    #[test]
    fn test_encryption_parsing() {
        assert_eq!(Encryption::from_config(None).unwrap(), Encryption::None);
        assert_eq!("".parse::<Encryption>().unwrap(), Encryption::None);
        assert_eq!("SSL".parse::<Encryption>().unwrap(), Encryption::Ssl);
        assert_eq!("tls".parse::<Encryption>().unwrap(), Encryption::Tls);
        assert!(matches!(
            "rot13".parse::<Encryption>(),
            Err(PostmanError::UnsupportedEncryption(_))
        ));
    }

    #[test]
    fn test_smtp_section() {
        let configuration = configuration(json!({
            "driver": "smtp",
            "host": "smtp.host.com",
            "port": 25,
            "encryption": "tls",
            "username": "app@host.com",
            "password": "secret",
            "sendmail": "/ignored"
        }))
        .unwrap();

        let smtp = configuration.smtp.unwrap();
        assert_eq!(smtp.host, "smtp.host.com");
        assert_eq!(smtp.port, 25);
        assert_eq!(smtp.encryption.as_deref(), Some("tls"));
        assert_eq!(smtp.username, "app@host.com");
        assert_eq!(smtp.password, "secret");
        assert!(configuration.sendmail_command.is_none());
    }

    #[test]
    fn test_smtp_port_as_string() {
        let configuration = configuration(json!({
            "driver": "smtp",
            "host": "smtp.host.com",
            "port": "587",
            "encryption": "tls",
            "username": "app@host.com",
            "password": "secret"
        }))
        .unwrap();

        assert_eq!(configuration.smtp.unwrap().port, 587);
    }

    #[test]
    fn test_smtp_port_not_numeric() {
        let err = configuration(json!({
            "driver": "smtp",
            "host": "smtp.host.com",
            "port": "submission",
            "encryption": "tls",
            "username": "app@host.com",
            "password": "secret"
        }))
        .unwrap_err();

        assert!(matches!(err, PostmanError::InvalidPort(p) if p == "submission"));
    }

    #[test]
    fn test_smtp_null_encryption_is_plaintext() {
        let configuration = configuration(json!({
            "driver": "smtp",
            "host": "localhost",
            "port": 1025,
            "encryption": null,
            "username": "",
            "password": ""
        }))
        .unwrap();

        let smtp = configuration.smtp.unwrap();
        assert!(smtp.encryption.is_none());
        assert_eq!(
            Encryption::from_config(smtp.encryption.as_deref()).unwrap(),
            Encryption::None
        );
    }

    #[test]
    fn test_smtp_section_missing_field() {
        let err = configuration(json!({
            "driver": "smtp",
            "host": "smtp.host.com",
            "port": 25,
            "encryption": "tls",
            "username": "app@host.com"
        }))
        .unwrap_err();

        assert!(matches!(
            err,
            PostmanError::MissingField {
                driver: "smtp",
                field: "password"
            }
        ));
    }

    #[test]
    fn test_smtp_section_missing_encryption() {
        let err = configuration(json!({
            "driver": "smtp",
            "host": "smtp.host.com",
            "port": 25,
            "username": "app@host.com",
            "password": "secret"
        }))
        .unwrap_err();

        assert!(matches!(
            err,
            PostmanError::MissingField {
                field: "encryption",
                ..
            }
        ));
    }

    #[test]
    fn test_mail_section_ignores_smtp_fields() {
        let configuration = configuration(json!({
            "driver": "mail",
            "host": null,
            "port": "587",
            "encryption": null,
            "username": ["not", "a", "string"]
        }))
        .unwrap();

        assert_eq!(configuration.driver, "mail");
        assert!(configuration.smtp.is_none());
    }

    #[test]
    fn test_sendmail_section() {
        let configuration = configuration(json!({
            "driver": "sendmail",
            "sendmail": "/usr/local/bin/sendmail -bs",
            "port": "junk"
        }))
        .unwrap();

        assert_eq!(
            configuration.sendmail_command.as_deref(),
            Some("/usr/local/bin/sendmail -bs")
        );
        assert!(configuration.smtp.is_none());
    }

    #[test]
    fn test_sendmail_section_without_command() {
        let configuration = configuration(json!({"driver": "sendmail"})).unwrap();
        assert!(configuration.sendmail_command.is_none());
    }

    #[test]
    fn test_missing_driver() {
        let err = configuration(json!({"host": "smtp.host.com"})).unwrap_err();
        assert!(matches!(
            err,
            PostmanError::Config(ConfigError::MissingKey(key)) if key == "mail.driver"
        ));
    }

    #[test]
    fn test_unknown_driver_is_kept_for_transport_setup() {
        let configuration = configuration(json!({
            "driver": "carrier-pigeon",
            "host": "coop"
        }))
        .unwrap();

        assert_eq!(configuration.driver, "carrier-pigeon");
        assert!(configuration.smtp.is_none());
        assert!(configuration.sendmail_command.is_none());
    }
}
