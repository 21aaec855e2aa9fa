//! Translation cache with write-through persistence.
//!
//! Every successful `put` is saved before control returns, so the file on
//! disk always matches memory after a token has been resolved. Saves are
//! plain overwrites: two processes writing at once means the last one wins.

use crate::error::StoreError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Where the cache lives between runs.
pub trait CacheStore: Send + Sync {
    /// Reads the whole mapping. A store that doesn't exist yet is empty.
    fn load(&self) -> Result<HashMap<String, String>, StoreError>;

    /// Replaces the stored mapping.
    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StoreError>;
}

/// Cache file holding a JSON object of token → translation.
pub struct JsonCacheFile {
    filepath: PathBuf,
}

impl JsonCacheFile {
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }
}

impl CacheStore for JsonCacheFile {
    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.filepath.exists() {
            return Ok(HashMap::new());
        }
        read_mapping(&self.filepath)
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        write_mapping(&self.filepath, entries)
    }
}

/// In-memory store. Clones share the same contents, which lets a test keep
/// a handle on what the cache wrote.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: bool,
}

#[cfg(test)]
impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Snapshot of what was last saved.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl CacheStore for MemoryCacheStore {
    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteError("store is read-only".to_string()));
        }
        let mut stored = self
            .entries
            .lock()
            .map_err(|e| StoreError::WriteError(e.to_string()))?;
        *stored = entries.clone();
        Ok(())
    }
}

/// Token → translation memo.
pub struct TranslationCache {
    entries: HashMap<String, String>,
    enabled: bool,
    store: Box<dyn CacheStore>,
}

impl TranslationCache {
    /// Loads the cache from `store`. A disabled cache never touches the store.
    pub fn load(store: Box<dyn CacheStore>, enabled: bool) -> Result<Self, StoreError> {
        let entries = if enabled { store.load()? } else { HashMap::new() };

        Ok(Self {
            entries,
            enabled,
            store,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached translation for `token`. Always `None` when disabled.
    pub fn get(&self, token: &str) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.entries.get(token).map(String::as_str)
    }

    /// Records a translation and saves straight away.
    ///
    /// On a failed save the in-memory entry is kept.
    pub fn put(&mut self, token: &str, translation: &str) -> Result<(), StoreError> {
        if !self.enabled {
            return Ok(());
        }
        self.entries
            .insert(token.to_string(), translation.to_string());
        self.store.save(&self.entries)
    }

    /// The token a translation came from, ignoring ASCII case.
    pub fn reverse_lookup(&self, translation: &str) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        // Sorted so the answer doesn't depend on hash order.
        let mut matches: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, value)| value.eq_ignore_ascii_case(translation))
            .map(|(key, _)| key.as_str())
            .collect();
        matches.sort_unstable();
        matches.first().copied()
    }

    /// Empties the cache and the store.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.store.save(&self.entries)
    }

    /// Replaces the cache with the contents of a JSON file and saves.
    pub fn import_from(&mut self, path: &Path) -> Result<usize, StoreError> {
        self.entries = read_mapping(path)?;
        self.store.save(&self.entries)?;
        Ok(self.entries.len())
    }

    /// Writes the cache to a JSON file.
    pub fn export_to(&self, path: &Path) -> Result<(), StoreError> {
        write_mapping(path, &self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_mapping(path: &Path) -> Result<HashMap<String, String>, StoreError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_mapping(path: &Path, entries: &HashMap<String, String>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteError(e.to_string()))?;
    }

    // BTreeMap keeps the file stable between saves
    let sorted: std::collections::BTreeMap<&String, &String> = entries.iter().collect();
    let content = serde_json::to_string_pretty(&sorted)?;
    std::fs::write(path, content).map_err(|e| StoreError::WriteError(e.to_string()))?;

    Ok(())
}
