//! Loads configuration groups from a directory of JSON files

use crate::{ConfigError, ConfigResult, Filesystem, CONFIG_EXTENSION};
use serde_json::map::Entry;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Reads `<root>/<group>.json` and overlays `<root>/<environment>/<group>.json`
#[derive(Clone)]
pub struct FileLoader {
    filesystem: Arc<dyn Filesystem>,
    root: PathBuf,
}

impl FileLoader {
    /// Create a loader rooted at `root`
    pub fn new(filesystem: Arc<dyn Filesystem>, root: impl Into<PathBuf>) -> Self {
        Self {
            filesystem,
            root: root.into(),
        }
    }

    /// Configuration directory this loader reads from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load a group for an environment.
    ///
    /// Returns `None` when neither the base nor the environment file exists.
    pub fn load(&self, environment: &str, group: &str) -> ConfigResult<Option<Value>> {
        let base_path = self.root.join(format!("{}.{}", group, CONFIG_EXTENSION));
        let env_path = self
            .root
            .join(environment)
            .join(format!("{}.{}", group, CONFIG_EXTENSION));

        let base = self.read_group(&base_path, group)?;
        let overlay = self.read_group(&env_path, group)?;

        let merged = match (base, overlay) {
            (Some(mut base), Some(overlay)) => {
                debug!("Merging {} over {}", env_path.display(), base_path.display());
                merge(&mut base, overlay);
                Some(base)
            }
            (base, overlay) => base.or(overlay),
        };

        Ok(merged)
    }

    fn read_group(&self, path: &Path, group: &str) -> ConfigResult<Option<Value>> {
        if !self.filesystem.exists(path) {
            return Ok(None);
        }

        debug!("Loading configuration from {}", path.display());
        let contents = self.filesystem.read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents)?;

        if !value.is_object() {
            return Err(ConfigError::NotAnObject(group.to_string()));
        }

        Ok(Some(value))
    }
}

/// Recursively replace values in `base` with those from `overlay`.
/// Objects merge key by key; any other value replaces the old one.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.entry(key) {
                    Entry::Occupied(mut existing) => merge(existing.get_mut(), value),
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFilesystem;
    use serde_json::json;

    fn loader(fs: MemoryFilesystem) -> FileLoader {
        FileLoader::new(Arc::new(fs), "/app/config")
    }

    #[test]
    fn test_load_base_group() {
        let fs = MemoryFilesystem::new().with_file("/app/config/mail.json", r#"{"driver": "mail"}"#);

        let value = loader(fs).load("local", "mail").unwrap();
        assert_eq!(value, Some(json!({"driver": "mail"})));
    }

    #[test]
    fn test_environment_overlays_base() {
        let fs = MemoryFilesystem::new()
            .with_file(
                "/app/config/mail.json",
                r#"{"driver": "smtp", "host": "smtp.host.com", "port": 25, "from": {"address": "a@b.c", "name": "App"}}"#,
            )
            .with_file(
                "/app/config/production/mail.json",
                r#"{"port": 465, "from": {"name": "Production"}}"#,
            );

        let value = loader(fs).load("production", "mail").unwrap().unwrap();
        assert_eq!(value["driver"], "smtp");
        assert_eq!(value["host"], "smtp.host.com");
        assert_eq!(value["port"], 465);
        // nested objects merge instead of being replaced
        assert_eq!(value["from"]["address"], "a@b.c");
        assert_eq!(value["from"]["name"], "Production");
    }

    #[test]
    fn test_environment_only_group() {
        let fs = MemoryFilesystem::new()
            .with_file("/app/config/testing/mail.json", r#"{"driver": "sendmail"}"#);

        let value = loader(fs).load("testing", "mail").unwrap();
        assert_eq!(value, Some(json!({"driver": "sendmail"})));
    }

    #[test]
    fn test_missing_group() {
        let value = loader(MemoryFilesystem::new()).load("local", "mail").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_rejects_non_object_group() {
        let fs = MemoryFilesystem::new().with_file("/app/config/mail.json", "[1, 2]");

        let err = loader(fs).load("local", "mail").unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject(group) if group == "mail"));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let fs = MemoryFilesystem::new().with_file("/app/config/mail.json", "{driver: mail");

        let err = loader(fs).load("local", "mail").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
