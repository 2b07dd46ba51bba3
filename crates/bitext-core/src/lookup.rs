//! Word lookup collaborator and the default dictionary

use crate::content;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A dictionary hit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupEntry {
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub part_of_speech: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Anything that can gloss a span of text. A miss is `None`, not an error.
pub trait Lookup {
    fn lookup(&self, text: &str) -> Option<LookupEntry>;
}

impl<L: Lookup + ?Sized> Lookup for &L {
    fn lookup(&self, text: &str) -> Option<LookupEntry> {
        (**self).lookup(text)
    }
}

/// Case-insensitive in-memory dictionary
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: FxHashMap<String, LookupEntry>,
}

/// Lowercase, collapse inner whitespace and strip surrounding punctuation
pub fn normalize_key(text: &str) -> String {
    let trimmed =
        text.trim_matches(|c: char| c.is_whitespace() || (c.is_ascii_punctuation() && c != '-'));
    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The glossary bundled with the stand-in article
    pub fn builtin() -> Self {
        let mut dict = Self::new();
        for (word, entry) in content::glossary() {
            dict.insert(word, entry);
        }
        dict
    }

    /// Parse a `{ "word": { "translation": ... } }` JSON object
    pub fn from_json_str(json: &str) -> Result<Self, DictionaryError> {
        let raw: FxHashMap<String, LookupEntry> = serde_json::from_str(json)?;
        let mut dict = Self::new();
        for (word, entry) in raw {
            dict.insert(&word, entry);
        }
        Ok(dict)
    }

    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn insert(&mut self, word: &str, entry: LookupEntry) {
        let key = normalize_key(word);
        if !key.is_empty() {
            self.entries.insert(key, entry);
        }
    }

    /// Add every entry of `other`, overriding existing words
    pub fn merge(&mut self, other: Dictionary) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lookup for Dictionary {
    fn lookup(&self, text: &str) -> Option<LookupEntry> {
        self.entries.get(&normalize_key(text)).cloned()
    }
}
