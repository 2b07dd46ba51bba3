//! Turning an uploaded file into a document

use crate::content;
use crate::document::{Document, DocumentId, DocumentKind, Paragraph, ParagraphKind};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "docx"];

/// Paragraphs this short are dropped as noise
const MIN_PARAGRAPH_CHARS: usize = 10;

const UNAVAILABLE_TEXT: &str =
    "The content of this document is no longer in memory. Open the file again to view its translation.";

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported file type: {0} (expected .pdf, .txt or .docx)")]
    UnsupportedType(String),
    #[error("File is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },
    /// Accepted by type and size but the contents could not be read
    #[error("Cannot read {name}: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Check a file name and size before reading the file
pub fn validate_upload(name: &str, size: u64) -> Result<DocumentKind, IngestError> {
    let kind = DocumentKind::from_file_name(name);
    if kind == DocumentKind::Other {
        return Err(IngestError::UnsupportedType(name.to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(IngestError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(kind)
}

/// A file handed to the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Validate and read a file from disk
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let unreadable = |source| IngestError::Unreadable {
            name: name.clone(),
            source,
        };
        // Judged by name first so a missing file of an accepted type is unreadable
        validate_upload(&name, 0)?;
        let size = std::fs::metadata(path).map_err(unreadable)?.len();
        validate_upload(&name, size)?;
        let bytes = std::fs::read(path).map_err(unreadable)?;
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_file_name(&self.name)
    }
}

/// Ingestion collaborator. Never fails: unusable input becomes a fallback
/// document so the viewer always has something to show.
pub trait Ingestor {
    fn ingest(&self, upload: &Upload, id: DocumentId) -> Document;
}

/// Plain text is split into paragraphs awaiting translation. Other formats
/// are not parsed; they open as the stand-in article.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultIngestor;

impl Ingestor for DefaultIngestor {
    fn ingest(&self, upload: &Upload, id: DocumentId) -> Document {
        let kind = upload.kind();
        match kind {
            DocumentKind::Txt => {
                let text = String::from_utf8_lossy(&upload.bytes);
                let paragraphs: Vec<Paragraph> = split_paragraphs(&text)
                    .into_iter()
                    .enumerate()
                    .map(|(idx, text)| {
                        Paragraph::pending(idx as u32 + 1, ParagraphKind::Body, text)
                    })
                    .collect();
                if paragraphs.is_empty() {
                    warn!(name = %upload.name, "no usable paragraphs in upload");
                    return unavailable_document(id, &upload.name);
                }
                debug!(name = %upload.name, paragraphs = paragraphs.len(), "text ingested");
                Document::new(id, upload.name.clone(), kind, upload.size(), paragraphs)
            }
            _ => Document::new(
                id,
                upload.name.clone(),
                kind,
                upload.size(),
                content::stand_in_article(),
            ),
        }
    }
}

fn paragraph_break() -> &'static Regex {
    static BREAK: OnceLock<Regex> = OnceLock::new();
    BREAK.get_or_init(|| {
        Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").expect("paragraph break pattern should compile")
    })
}

/// Split on blank lines, trim, and drop fragments of 10 characters or fewer
pub fn split_paragraphs(text: &str) -> Vec<String> {
    paragraph_break()
        .split(text)
        .map(str::trim)
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
        .map(str::to_string)
        .collect()
}

/// Single-paragraph placeholder for content that cannot be shown
pub fn unavailable_document(id: DocumentId, name: &str) -> Document {
    let kind = DocumentKind::from_file_name(name);
    let paragraphs = vec![Paragraph::new(
        1,
        ParagraphKind::Body,
        UNAVAILABLE_TEXT,
        UNAVAILABLE_TEXT,
    )];
    Document::new(id, name, kind, 0, paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upload() {
        assert_eq!(validate_upload("paper.PDF", 10).unwrap(), DocumentKind::Pdf);
        assert_eq!(validate_upload("notes.txt", MAX_UPLOAD_BYTES).unwrap(), DocumentKind::Txt);
        assert!(matches!(
            validate_upload("image.png", 10),
            Err(IngestError::UnsupportedType(_))
        ));
        assert!(matches!(
            validate_upload("big.docx", MAX_UPLOAD_BYTES + 1),
            Err(IngestError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_split_paragraphs_drops_short_fragments() {
        let text = "First paragraph is long enough.\n\nshort\n\n\n  Second one, also long.  \r\n\r\nThird\nstill third paragraph";
        assert_eq!(
            split_paragraphs(text),
            vec![
                "First paragraph is long enough.",
                "Second one, also long.",
                "Third\nstill third paragraph",
            ]
        );
        assert_eq!(split_paragraphs("exactly10!"), Vec::<String>::new());
        assert_eq!(split_paragraphs("eleven char"), vec!["eleven char"]);
    }

    #[test]
    fn test_txt_upload_is_pending() {
        let upload = Upload::new(
            "notes.txt",
            b"A paragraph of text.\n\nAnother paragraph here.".to_vec(),
        );
        let doc = DefaultIngestor.ingest(&upload, DocumentId::new("doc-1"));
        assert_eq!(doc.kind, DocumentKind::Txt);
        assert_eq!(doc.paragraph_count, 2);
        assert_eq!(doc.size_bytes, upload.size());
        assert!(doc.paragraphs.iter().all(|p| p.is_pending() && p.kind == ParagraphKind::Body));
        assert_eq!(doc.paragraphs[1].id, 2);
    }

    #[test]
    fn test_binary_formats_open_stand_in() {
        let upload = Upload::new("paper.pdf", vec![0x25, 0x50, 0x44, 0x46]);
        let doc = DefaultIngestor.ingest(&upload, DocumentId::new("doc-2"));
        assert_eq!(doc.paragraphs, content::stand_in_article());
        assert_eq!(doc.pending_count(), 0);
        assert_eq!(doc.display_name, "paper.pdf");
    }

    #[test]
    fn test_empty_txt_falls_back() {
        let upload = Upload::new("empty.txt", b"hi\n\n\n".to_vec());
        let doc = DefaultIngestor.ingest(&upload, DocumentId::new("doc-3"));
        assert_eq!(doc.paragraph_count, 1);
        assert_eq!(doc.paragraphs[0].source_text, UNAVAILABLE_TEXT);
        assert!(!doc.paragraphs[0].is_pending());
    }

    #[test]
    fn test_from_path_validates() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("a.txt");
        std::fs::write(&good, "some text for the viewer").unwrap();
        let upload = Upload::from_path(&good).unwrap();
        assert_eq!(upload.name, "a.txt");

        let bad = dir.path().join("a.csv");
        std::fs::write(&bad, "x").unwrap();
        assert!(matches!(Upload::from_path(&bad), Err(IngestError::UnsupportedType(_))));
        assert!(matches!(
            Upload::from_path(&dir.path().join("missing.txt")),
            Err(IngestError::Unreadable { .. })
        ));
        assert!(matches!(
            Upload::from_path(&dir.path().join("missing.csv")),
            Err(IngestError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_from_path_unreadable_after_validation() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::create_dir(&path).unwrap();
        match Upload::from_path(&path) {
            Err(IngestError::Unreadable { name, .. }) => assert_eq!(name, "notes.txt"),
            other => panic!("expected unreadable, got {other:?}"),
        }
    }
}
