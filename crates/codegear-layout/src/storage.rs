//! Key/value persistence for layout state.
//!
//! Values are raw JSON strings, as a browser's local storage would hold
//! them, so a backend may hand back anything including garbage. The
//! manager is responsible for parsing and repairing what it reads.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{LayoutError, LayoutResult};

/// Storage key for a table identity.
pub fn storage_key(table_id: &str) -> String {
    format!("table-state-{table_id}")
}

/// Table identity for a storage key, if it is a layout key.
pub fn table_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix("table-state-")
}

/// Raw key/value store for serialized layout state.
pub trait LayoutStorage {
    fn load(&self, key: &str) -> LayoutResult<Option<String>>;
    fn store(&mut self, key: &str, value: &str) -> LayoutResult<()>;
    fn remove(&mut self, key: &str) -> LayoutResult<()>;
}

// ── Memory ─────────────────────────────────────────────────────────

/// Process-local storage (for testing and ephemeral sessions).
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStorage for MemoryStorage {
    fn load(&self, key: &str) -> LayoutResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> LayoutResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> LayoutResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// ── File ───────────────────────────────────────────────────────────

/// All keys in one JSON object file, rewritten atomically on each change.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn open(path: &Path) -> Self {
        debug!(?path, "layout storage opened");
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> LayoutError {
        LayoutError::Storage {
            path: self.path.clone(),
            source,
        }
    }

    fn read_entries(&self) -> LayoutResult<BTreeMap<String, Value>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.io_err(e)),
        }
    }

    /// Entries to rewrite. A corrupt file is discarded rather than blocking
    /// every later write.
    fn entries_for_update(&self) -> LayoutResult<BTreeMap<String, Value>> {
        match self.read_entries() {
            Err(LayoutError::Serialize(e)) => {
                warn!(path = ?self.path, error = %e, "discarding corrupt layout file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, Value>) -> LayoutResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let bytes = serde_json::to_vec_pretty(entries)?;

        let mut tmp_name = self.path.file_name().map(OsString::from).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        fs::write(&tmp, bytes).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        Ok(())
    }
}

impl LayoutStorage for FileStorage {
    fn load(&self, key: &str) -> LayoutResult<Option<String>> {
        let entries = self.read_entries()?;
        match entries.get(key) {
            Some(value) => Ok(Some(serde_json::to_string(value)?)),
            None => Ok(None),
        }
    }

    fn store(&mut self, key: &str, value: &str) -> LayoutResult<()> {
        let value: Value = serde_json::from_str(value)?;
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries)
    }

    fn remove(&mut self, key: &str) -> LayoutResult<()> {
        let mut entries = self.entries_for_update()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
