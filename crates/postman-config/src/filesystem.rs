//! Filesystem access used by the file loader

use crate::{ConfigError, ConfigResult};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Minimal read-only filesystem the loader depends on
pub trait Filesystem: Send + Sync {
    /// Whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file at `path` as UTF-8
    fn read_to_string(&self, path: &Path) -> ConfigResult<String>;
}

/// The local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> ConfigResult<String> {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory files keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> ConfigResult<String> {
        self.files.get(path).cloned().ok_or_else(|| ConfigError::Io {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    }
}
