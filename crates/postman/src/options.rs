//! Construction options and default collaborators

use crate::{MailerClient, Transport};
use postman_config::{
    ConfigSource, FileLoader, Filesystem, LocalFilesystem, Repository, DEFAULT_ENVIRONMENT,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "POSTMAN_CONFIG_DIR";

/// Configuration directory used when [`CONFIG_DIR_ENV`] is unset
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Collaborators for a [`Postman`](crate::Postman).
///
/// Everything is optional; whatever is not injected is built from defaults
/// when the postman is constructed.
pub struct PostmanOptions {
    pub(crate) environment: String,
    config_dir: Option<PathBuf>,
    filesystem: Option<Arc<dyn Filesystem>>,
    loader: Option<FileLoader>,
    config: Option<Arc<dyn ConfigSource>>,
    pub(crate) transport: Option<Transport>,
    pub(crate) mailer: Option<Arc<dyn MailerClient>>,
}

impl PostmanOptions {
    pub fn new() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            config_dir: None,
            filesystem: None,
            loader: None,
            config: None,
            transport: None,
            mailer: None,
        }
    }

    /// Environment whose configuration is loaded (default `local`)
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Directory holding `mail.json` and per-environment subdirectories
    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Filesystem the configuration files are read from
    pub fn filesystem(mut self, filesystem: Arc<dyn Filesystem>) -> Self {
        self.filesystem = Some(filesystem);
        self
    }

    /// File loader; replaces the filesystem and directory options
    pub fn loader(mut self, loader: FileLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Configuration source; replaces file loading entirely
    pub fn config(mut self, config: Arc<dyn ConfigSource>) -> Self {
        self.config = Some(config);
        self
    }

    /// Transport to use instead of the one the driver would build
    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Mailer client to use instead of the default [`Mailer`](crate::Mailer)
    pub fn mailer(mut self, mailer: Arc<dyn MailerClient>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// The injected configuration source, or a file repository for the
    /// environment over the injected loader, or one built from the injected
    /// or default filesystem and directory
    pub(crate) fn config_source(&mut self) -> Arc<dyn ConfigSource> {
        if let Some(config) = self.config.take() {
            return config;
        }

        let loader = self.loader.take().unwrap_or_else(|| {
            let filesystem = self
                .filesystem
                .take()
                .unwrap_or_else(|| Arc::new(LocalFilesystem));
            let dir = self.config_dir.take().unwrap_or_else(default_config_dir);
            FileLoader::new(filesystem, dir)
        });

        debug!(
            "Reading mail configuration from {} for environment '{}'",
            loader.root().display(),
            self.environment
        );
        Arc::new(Repository::new(loader, self.environment.clone()))
    }
}

impl Default for PostmanOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn default_config_dir() -> PathBuf {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR))
}
