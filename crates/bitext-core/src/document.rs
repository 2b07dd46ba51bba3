//! Documents, paragraphs and the document store

use crate::history::DocumentSummary;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based paragraph identifier, unique within a document
pub type ParagraphId = u32;

/// Reserved target text meaning "not translated yet".
///
/// Distinct from an empty translation, which is a valid final value.
pub const PENDING_TRANSLATION: &str = "\u{2063}pending-translation\u{2063}";

/// Paragraphs shown per estimated page
const PARAGRAPHS_PER_PAGE: usize = 6;

/// Structural role of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParagraphKind {
    Title,
    Authors,
    Affiliation,
    KeywordsLabel,
    Keywords,
    AbstractLabel,
    Abstract,
    Section,
    Body,
}

impl ParagraphKind {
    /// Only abstract and body paragraphs take part in click navigation
    pub fn is_navigable(self) -> bool {
        matches!(self, ParagraphKind::Abstract | ParagraphKind::Body)
    }

    /// Heading-like kinds rendered with emphasis
    pub fn is_heading(self) -> bool {
        matches!(
            self,
            ParagraphKind::Title
                | ParagraphKind::Section
                | ParagraphKind::AbstractLabel
                | ParagraphKind::KeywordsLabel
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub id: ParagraphId,
    pub kind: ParagraphKind,
    pub source_text: String,
    pub target_text: String,
}

impl Paragraph {
    pub fn new(
        id: ParagraphId,
        kind: ParagraphKind,
        source_text: impl Into<String>,
        target_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            source_text: source_text.into(),
            target_text: target_text.into(),
        }
    }

    /// A body paragraph whose translation has not arrived yet
    pub fn pending(id: ParagraphId, kind: ParagraphKind, source_text: impl Into<String>) -> Self {
        Self::new(id, kind, source_text, PENDING_TRANSLATION)
    }

    pub fn is_pending(&self) -> bool {
        self.target_text == PENDING_TRANSLATION
    }

    pub fn is_navigable(&self) -> bool {
        self.kind.is_navigable()
    }
}

/// Opaque document identifier generated at ingestion time
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    /// Id for a document ingested at `unix_millis`
    pub fn generate(unix_millis: i64) -> Self {
        DocumentId(format!("doc-{unix_millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Pdf,
    Txt,
    Docx,
    Other,
}

impl DocumentKind {
    /// Detect the kind from a file name's extension (case-insensitive)
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "txt" => DocumentKind::Txt,
            "docx" => DocumentKind::Docx,
            _ => DocumentKind::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Txt => "TXT",
            DocumentKind::Docx => "DOC",
            DocumentKind::Other => "FILE",
        }
    }
}

/// Page estimate used for history summaries
pub fn estimate_pages(paragraph_count: usize) -> usize {
    paragraph_count.div_ceil(PARAGRAPHS_PER_PAGE).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub display_name: String,
    pub paragraphs: Vec<Paragraph>,
    pub size_bytes: u64,
    pub kind: DocumentKind,
    pub page_count_estimate: usize,
    pub paragraph_count: usize,
}

impl Document {
    pub fn new(
        id: DocumentId,
        display_name: impl Into<String>,
        kind: DocumentKind,
        size_bytes: u64,
        paragraphs: Vec<Paragraph>,
    ) -> Self {
        let paragraph_count = paragraphs.len();
        Self {
            id,
            display_name: display_name.into(),
            paragraphs,
            size_bytes,
            kind,
            page_count_estimate: estimate_pages(paragraph_count),
            paragraph_count,
        }
    }

    pub fn paragraph(&self, id: ParagraphId) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|p| p.id == id)
    }

    /// Fill in translations for pending paragraphs.
    ///
    /// A paragraph's target text moves from pending to final at most once;
    /// entries for unknown or already translated paragraphs are skipped.
    /// Returns the number of paragraphs that changed.
    pub fn apply_translations<I>(&mut self, translations: I) -> usize
    where
        I: IntoIterator<Item = (ParagraphId, String)>,
    {
        let mut applied = 0;
        for (id, text) in translations {
            if text == PENDING_TRANSLATION {
                continue;
            }
            if let Some(para) = self.paragraphs.iter_mut().find(|p| p.id == id) {
                if para.is_pending() {
                    para.target_text = text;
                    applied += 1;
                }
            }
        }
        applied
    }

    pub fn pending_count(&self) -> usize {
        self.paragraphs.iter().filter(|p| p.is_pending()).count()
    }

    pub fn summary(&self, uploaded_at: i64) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            name: self.display_name.clone(),
            uploaded_at,
            size: self.size_bytes,
            kind: self.kind,
            page_count: self.page_count_estimate,
            paragraph_count: self.paragraph_count,
            is_demo: false,
        }
    }
}

/// The currently displayed document plus every document loaded this session
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: FxHashMap<DocumentId, Document>,
    current: Option<DocumentId>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a document and make it current
    pub fn insert_and_show(&mut self, document: Document) {
        let id = document.id.clone();
        self.documents.insert(id.clone(), document);
        self.current = Some(id);
    }

    /// Show a cached document. Returns false if it is not resident.
    pub fn show(&mut self, id: &DocumentId) -> bool {
        if self.documents.contains_key(id) {
            self.current = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    pub fn current_id(&self) -> Option<&DocumentId> {
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Document> {
        self.current.as_ref().and_then(|id| self.documents.get(id))
    }

    /// Paragraphs of the current document, empty when nothing is shown
    pub fn paragraphs(&self) -> &[Paragraph] {
        self.current().map(|d| d.paragraphs.as_slice()).unwrap_or(&[])
    }

    pub fn paragraph(&self, id: ParagraphId) -> Option<&Paragraph> {
        self.current().and_then(|d| d.paragraph(id))
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn get_mut(&mut self, id: &DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
