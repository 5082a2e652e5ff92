//! Persisted preferences.
//!
//! gitpane only stores the panel visibility flag, but the store is a plain
//! key/value interface so hosts can hand over whatever they already have.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::error::{Error, Result};

/// Trait for preference storage.
///
/// This trait abstracts persistence, allowing for:
/// - The host editor's own preference system
/// - A JSON file for the standalone binary
/// - In-memory storage for tests
#[allow(clippy::missing_errors_doc)]
pub trait PreferenceStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get_value(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`.
    fn set_value(&self, key: &str, value: Value) -> Result<()>;
}

/// Preferences kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, Value>>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_value(&self, key: &str, value: Value) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences stored as a JSON object in a file.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl FilePreferences {
    const DIR: &'static str = "gitpane";
    const FILE: &'static str = "preferences.json";

    /// Default location under the user's config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::DIR).join(Self::FILE))
    }

    /// Load preferences from `path`. A missing file is an empty store.
    ///
    /// # Errors
    /// Returns error if the file exists but can't be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| Error::PreferencesParse {
                file: path.clone(),
                message: e.to_string(),
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferences {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_value(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&*values)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
