//! Persistence store contract and implementations.
//!
//! The store holds one JSON value and is rewritten wholesale on every save.
//! Concurrent external writers are unsupported.

use crate::error::Result;

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::{debug, instrument};

/// Whole-value JSON persistence.
pub trait MacroStore {
    /// Reads the stored value, or `None` when the store has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read or parsed.
    fn read(&self) -> Result<Option<Value>>;

    /// Replaces the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written durably.
    fn write(&mut self, value: &Value) -> Result<()>;
}

/// File-backed store using atomic write (temp file, sync, rename) so a crash
/// mid-save never corrupts the previous contents.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MacroStore for JsonFileStore {
    #[instrument(skip(self))]
    fn read(&self) -> Result<Option<Value>> {
        if !self.path.exists() {
            debug!(path = ?self.path, "Macro store absent");
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let value: Value = serde_json::from_str(&contents)?;

        debug!(path = ?self.path, "Macro store read");

        Ok(Some(value))
    }

    #[instrument(skip(self, value))]
    fn write(&mut self, value: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(value)?;

        // Atomic write: write to temp file then rename
        let temp_path = self.path.with_extension("json.tmp");

        let mut temp_file = fs::File::create(&temp_path)?;
        temp_file.write_all(contents.as_bytes())?;
        temp_file.sync_all()?;

        fs::rename(&temp_path, &self.path)?;

        debug!(path = ?self.path, "Macro store written (atomic write)");

        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Option<Value>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently stored value, if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl MacroStore for MemoryStore {
    fn read(&self) -> Result<Option<Value>> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &Value) -> Result<()> {
        self.value = Some(value.clone());
        Ok(())
    }
}
