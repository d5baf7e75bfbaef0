//! Keyed configuration lookup

use crate::{ConfigResult, FileLoader};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, warn};

/// Any key-value provider that can answer `get("mail")`.
///
/// Keys are dotted: `mail` returns the whole group, `mail.driver` a single
/// entry inside it.
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str) -> ConfigResult<Option<Value>>;
}

/// Look up `key` and deserialize it into `T`
pub fn get_typed<T: DeserializeOwned>(
    source: &dyn ConfigSource,
    key: &str,
) -> ConfigResult<Option<T>> {
    match source.get(key)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Split `mail.smtp.host` into the group (`mail`) and the path inside it
fn split_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once('.') {
        Some((group, path)) => (group, Some(path)),
        None => (key, None),
    }
}

/// Walk a dotted path into a value
fn lookup(value: &Value, path: Option<&str>) -> Option<Value> {
    let Some(path) = path else {
        return Some(value.clone());
    };

    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
        .cloned()
}

/// Configuration repository backed by a [`FileLoader`] for one environment
pub struct Repository {
    loader: FileLoader,
    environment: String,
    groups: RwLock<HashMap<String, Option<Value>>>,
}

impl Repository {
    /// Create a repository for `environment`
    pub fn new(loader: FileLoader, environment: impl Into<String>) -> Self {
        Self {
            loader,
            environment: environment.into(),
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Environment this repository reads
    pub fn environment(&self) -> &str {
        &self.environment
    }

    fn group(&self, group: &str) -> ConfigResult<Option<Value>> {
        if let Ok(groups) = self.groups.read() {
            if let Some(cached) = groups.get(group) {
                return Ok(cached.clone());
            }
        }

        let loaded = self.loader.load(&self.environment, group)?;
        if loaded.is_none() {
            warn!(
                "No configuration group '{}' under {} for environment '{}'",
                group,
                self.loader.root().display(),
                self.environment
            );
        }

        match self.groups.write() {
            Ok(mut groups) => {
                groups.insert(group.to_string(), loaded.clone());
            }
            Err(_) => debug!("Configuration cache poisoned, not caching '{}'", group),
        }

        Ok(loaded)
    }
}

impl ConfigSource for Repository {
    fn get(&self, key: &str) -> ConfigResult<Option<Value>> {
        let (group, path) = split_key(key);
        Ok(self.group(group)?.and_then(|value| lookup(&value, path)))
    }
}

/// In-memory configuration, keyed by group
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    groups: HashMap<String, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a whole group
    pub fn with(mut self, group: impl Into<String>, value: Value) -> Self {
        self.groups.insert(group.into(), value);
        self
    }
}

impl ConfigSource for MemorySource {
    fn get(&self, key: &str) -> ConfigResult<Option<Value>> {
        let (group, path) = split_key(key);
        Ok(self.groups.get(group).and_then(|value| lookup(value, path)))
    }
}
