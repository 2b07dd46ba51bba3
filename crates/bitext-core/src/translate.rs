//! Content production: filling in pending translations

use crate::document::{Document, Paragraph, ParagraphId};

pub const DEMO_NOTICE: &str =
    "(Demo mode: connect a translation service to see the real translation)";

/// Produces the target text for one paragraph
pub trait Translator {
    fn translate(&self, paragraph: &Paragraph) -> String;
}

/// Stand-in translator that only marks paragraphs as processed
#[derive(Debug, Clone, Default)]
pub struct DemoTranslator {
    notice: Option<String>,
}

impl DemoTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notice(notice: impl Into<String>) -> Self {
        Self {
            notice: Some(notice.into()),
        }
    }
}

impl Translator for DemoTranslator {
    fn translate(&self, paragraph: &Paragraph) -> String {
        if paragraph.source_text.trim().is_empty() {
            return String::new();
        }
        self.notice.as_deref().unwrap_or(DEMO_NOTICE).to_string()
    }
}

/// Translations for every pending paragraph of `document`, in order
pub fn translate_pending(
    document: &Document,
    translator: &dyn Translator,
) -> Vec<(ParagraphId, String)> {
    document
        .paragraphs
        .iter()
        .filter(|p| p.is_pending())
        .map(|p| (p.id, translator.translate(p)))
        .collect()
}
