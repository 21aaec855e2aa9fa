//! User dictionary of literal overrides.
//!
//! Entries map a literal piece of source text (usually Japanese) to the
//! romaji that should be used instead of anything the transducer or a
//! kanji resolver would produce. Overrides are applied longest match first
//! so a registered phrase always beats the words inside it.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Schema URL written into new dictionary files.
pub const DICTIONARY_SCHEMA: &str =
    "https://raw.githubusercontent.com/romacase/romacase/main/schema/dictionary.schema.json";

/// One override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    /// Literal text to look for.
    pub source_text: String,
    /// Replacement romaji.
    pub transformed_romaji: String,
}

impl DictionaryEntry {
    pub fn new(source_text: impl Into<String>, transformed_romaji: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            transformed_romaji: transformed_romaji.into(),
        }
    }
}

/// On-disk layout of the dictionary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryFile {
    #[serde(rename = "$schema", default = "default_schema")]
    pub schema: String,
    pub data: Vec<DictionaryEntry>,
}

fn default_schema() -> String {
    DICTIONARY_SCHEMA.to_string()
}

/// Replaces dictionary phrases in `line`, longest candidates first.
///
/// Every substring of the line is a candidate. Candidates are tried from
/// longest to shortest (earlier start first on ties) and each one that is
/// a dictionary source replaces its first occurrence in the line as it
/// stands at that point. When two entries share a source, the one declared
/// first wins.
///
/// This is quadratic in the line length, which is fine for editor
/// selections. Large inputs would want an Aho-Corasick pass with the same
/// longest-match semantics.
pub fn apply_overrides(line: &str, entries: &[DictionaryEntry]) -> String {
    if entries.is_empty() || line.is_empty() {
        return line.to_string();
    }

    let mut table: HashMap<&str, &str> = HashMap::new();
    for entry in entries.iter().filter(|e| !e.source_text.is_empty()) {
        table
            .entry(entry.source_text.as_str())
            .or_insert(entry.transformed_romaji.as_str());
    }

    // Byte offsets of every char boundary, including the end.
    let bounds: Vec<usize> = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()))
        .collect();

    let mut candidates: Vec<&str> = Vec::new();
    for start in 0..bounds.len() {
        for end in start + 1..bounds.len() {
            candidates.push(&line[bounds[start]..bounds[end]]);
        }
    }
    // Stable sort keeps earlier starts ahead within one length.
    candidates.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let mut result = line.to_string();
    for candidate in candidates {
        if let Some(target) = table.get(candidate) {
            if result.contains(candidate) {
                result = result.replacen(candidate, target, 1);
            }
        }
    }

    result
}

/// Dictionary backed by a JSON file.
pub struct Dictionary {
    /// Path to the JSON file.
    filepath: PathBuf,
    /// Entries in declaration order.
    entries: Vec<DictionaryEntry>,
}

impl Dictionary {
    /// Opens the dictionary at `filepath`. A missing file is an empty
    /// dictionary; a file that doesn't parse is an error.
    pub fn load(filepath: &Path) -> Result<Self, StoreError> {
        let mut dictionary = Self {
            filepath: filepath.to_path_buf(),
            entries: Vec::new(),
        };

        if dictionary.filepath.exists() {
            dictionary.entries = read_entries(&dictionary.filepath)?;
        }

        Ok(dictionary)
    }

    /// An unsaved dictionary, mostly for tests.
    pub fn in_memory(entries: Vec<DictionaryEntry>) -> Self {
        Self {
            filepath: PathBuf::new(),
            entries,
        }
    }

    /// Get the filepath for this dictionary.
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies every override to a line.
    pub fn apply(&self, line: &str) -> String {
        apply_overrides(line, &self.entries)
    }

    /// First entry whose source is exactly `source`.
    pub fn lookup(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.source_text == source)
            .map(|e| e.transformed_romaji.as_str())
    }

    /// First entry whose romaji equals `romaji`, ignoring case.
    pub fn lookup_reverse(&self, romaji: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.transformed_romaji.eq_ignore_ascii_case(romaji))
            .map(|e| e.source_text.as_str())
    }

    /// Sets the romaji for `source`, replacing the first entry with that
    /// source or appending a new one.
    pub fn add(&mut self, source: &str, romaji: &str) {
        match self.entries.iter_mut().find(|e| e.source_text == source) {
            Some(entry) => entry.transformed_romaji = romaji.to_string(),
            None => self.entries.push(DictionaryEntry::new(source, romaji)),
        }
    }

    /// Removes every entry for `source`. Returns how many were removed.
    pub fn remove(&mut self, source: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.source_text != source);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the entries with those of another dictionary file and saves.
    /// The current entries are kept if the file doesn't parse.
    pub fn import_from(&mut self, path: &Path) -> Result<usize, StoreError> {
        let entries = read_entries(path)?;
        self.entries = entries;
        self.save()?;
        Ok(self.entries.len())
    }

    /// Writes the entries to another file.
    pub fn export_to(&self, path: &Path) -> Result<(), StoreError> {
        write_entries(path, &self.entries)
    }

    /// Save the dictionary to its own file.
    pub fn save(&self) -> Result<(), StoreError> {
        write_entries(&self.filepath, &self.entries)
    }

    /// Re-reads the file, e.g. after it was edited by hand.
    pub fn reload_from_disk(&mut self) -> Result<(), StoreError> {
        self.entries = read_entries(&self.filepath)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Vec<DictionaryEntry>, StoreError> {
    let content = std::fs::read_to_string(path)?;
    let file: DictionaryFile = serde_json::from_str(&content)
        .map_err(|e| StoreError::MalformedDictionary(format!("{}: {}", path.display(), e)))?;
    Ok(file.data)
}

fn write_entries(path: &Path, entries: &[DictionaryEntry]) -> Result<(), StoreError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteError(e.to_string()))?;
    }

    let file = DictionaryFile {
        schema: default_schema(),
        data: entries.to_vec(),
    };
    let content = serde_json::to_string_pretty(&file)?;
    std::fs::write(path, content).map_err(|e| StoreError::WriteError(e.to_string()))?;

    Ok(())
}
