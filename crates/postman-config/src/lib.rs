//! Configuration loading for Postman
//!
//! Reads JSON configuration groups from a directory, overlaying
//! environment-specific files (e.g. `config/production/mail.json`) on top
//! of the base group (`config/mail.json`).

mod error;
mod filesystem;
mod loader;
mod repository;

pub use error::{ConfigError, ConfigResult};
pub use filesystem::{Filesystem, LocalFilesystem, MemoryFilesystem};
pub use loader::FileLoader;
pub use repository::{get_typed, ConfigSource, MemorySource, Repository};

/// Environment used when none is given
pub const DEFAULT_ENVIRONMENT: &str = "local";

/// Extension of configuration group files
pub const CONFIG_EXTENSION: &str = "json";
