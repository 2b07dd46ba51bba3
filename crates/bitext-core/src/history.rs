//! Document history: summaries of previously opened documents

use crate::document::{DocumentId, DocumentKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const MAX_HISTORY_ENTRIES: usize = 30;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid history file: {0}")]
    Json(#[from] serde_json::Error),
}

/// History entry, independent of whether the paragraphs are still resident
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub name: String,
    /// Unix milliseconds
    pub uploaded_at: i64,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub page_count: usize,
    pub paragraph_count: usize,
    #[serde(default)]
    pub is_demo: bool,
}

/// Persistence collaborator for the history list
pub trait HistoryStore {
    /// Entries, newest first
    fn list(&self) -> &[DocumentSummary];

    /// Insert or move `summary` to the front
    fn upsert(&mut self, summary: DocumentSummary) -> Result<(), HistoryError>;

    /// Returns whether an entry was removed
    fn remove(&mut self, id: &DocumentId) -> Result<bool, HistoryError>;
}

/// Put `summary` first, drop any other entry with its id, keep at most `cap`
pub fn upsert_entry(entries: &mut Vec<DocumentSummary>, summary: DocumentSummary, cap: usize) {
    entries.retain(|e| e.id != summary.id);
    entries.insert(0, summary);
    entries.truncate(cap);
}

fn remove_entry(entries: &mut Vec<DocumentSummary>, id: &DocumentId) -> bool {
    let before = entries.len();
    entries.retain(|e| &e.id != id);
    entries.len() != before
}

/// Append demo entries whose ids are not present yet
fn merge_missing(entries: &mut Vec<DocumentSummary>, demos: Vec<DocumentSummary>) {
    for demo in demos {
        if !entries.iter().any(|e| e.id == demo.id) {
            entries.push(demo);
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<DocumentSummary>,
    cap: usize,
}

impl MemoryHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    pub fn with_entries(entries: Vec<DocumentSummary>, cap: usize) -> Self {
        let mut entries = entries;
        entries.truncate(cap);
        Self { entries, cap }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(MAX_HISTORY_ENTRIES)
    }
}

impl HistoryStore for MemoryHistory {
    fn list(&self) -> &[DocumentSummary] {
        &self.entries
    }

    fn upsert(&mut self, summary: DocumentSummary) -> Result<(), HistoryError> {
        upsert_entry(&mut self.entries, summary, self.cap);
        Ok(())
    }

    fn remove(&mut self, id: &DocumentId) -> Result<bool, HistoryError> {
        Ok(remove_entry(&mut self.entries, id))
    }
}

/// History persisted as a JSON array, rewritten on every change
#[derive(Debug)]
pub struct JsonHistory {
    path: PathBuf,
    entries: Vec<DocumentSummary>,
    cap: usize,
}

impl JsonHistory {
    /// Load the history at `path`, merging in `demos` that are missing.
    ///
    /// A missing file starts from the demos alone. A corrupt file is logged
    /// and replaced on the next write rather than failing the viewer.
    pub fn open(
        path: impl Into<PathBuf>,
        cap: usize,
        demos: Vec<DocumentSummary>,
    ) -> Result<Self, HistoryError> {
        let path = path.into();
        let mut entries = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<Vec<DocumentSummary>>(&json) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), %err, "ignoring unreadable history");
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        merge_missing(&mut entries, demos);
        entries.truncate(cap);
        debug!(path = %path.display(), entries = entries.len(), "history loaded");
        Ok(Self { path, entries, cap })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HistoryStore for JsonHistory {
    fn list(&self) -> &[DocumentSummary] {
        &self.entries
    }

    fn upsert(&mut self, summary: DocumentSummary) -> Result<(), HistoryError> {
        upsert_entry(&mut self.entries, summary, self.cap);
        self.persist()
    }

    fn remove(&mut self, id: &DocumentId) -> Result<bool, HistoryError> {
        let removed = remove_entry(&mut self.entries, id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}

/// Human readable size: `512 B`, `1.5 KB`, `3.4 MB`
pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < KIB * KIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / (KIB * KIB) as f64)
    }
}
