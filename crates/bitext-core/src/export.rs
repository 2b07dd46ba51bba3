//! Exporting a document's text in plain text, HTML or Markdown

use crate::document::{Paragraph, ParagraphKind};
use serde::{Deserialize, Serialize};

const RULE_WIDTH: usize = 50;
const PENDING_EXPORT_TEXT: &str = "[translation pending]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Txt,
    Html,
    #[serde(alias = "markdown")]
    Md,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Txt, ExportFormat::Html, ExportFormat::Md];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Md => "md",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain",
            ExportFormat::Html => "text/html",
            ExportFormat::Md => "text/markdown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Txt => "Plain text",
            ExportFormat::Html => "HTML",
            ExportFormat::Md => "Markdown",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ExportFormat::Txt => ExportFormat::Html,
            ExportFormat::Html => ExportFormat::Md,
            ExportFormat::Md => ExportFormat::Txt,
        }
    }
}

/// Which side(s) of each paragraph to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentMode {
    #[default]
    Bilingual,
    #[serde(alias = "translation")]
    TranslationOnly,
    #[serde(alias = "source", alias = "original")]
    SourceOnly,
}

impl ContentMode {
    pub fn label(self) -> &'static str {
        match self {
            ContentMode::Bilingual => "Bilingual",
            ContentMode::TranslationOnly => "Translation only",
            ContentMode::SourceOnly => "Source only",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ContentMode::Bilingual => ContentMode::TranslationOnly,
            ContentMode::TranslationOnly => ContentMode::SourceOnly,
            ContentMode::SourceOnly => ContentMode::Bilingual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime: &'static str,
    pub contents: String,
}

/// `report.pdf` -> `report_translation.md`
pub fn export_file_name(doc_name: &str, format: ExportFormat) -> String {
    let base = match doc_name.rsplit_once('.') {
        Some((stem, ext))
            if matches!(ext.to_ascii_lowercase().as_str(), "pdf" | "txt" | "docx") =>
        {
            stem
        }
        _ => doc_name,
    };
    format!("{base}_translation.{}", format.extension())
}

/// Serialize the exportable paragraphs of a document.
///
/// Only abstract and body paragraphs are exported, numbered from 1.
/// `date` is printed as given.
pub fn export(
    paragraphs: &[Paragraph],
    doc_name: &str,
    date: &str,
    format: ExportFormat,
    mode: ContentMode,
) -> ExportedFile {
    let body: Vec<&Paragraph> = paragraphs.iter().filter(|p| p.is_navigable()).collect();
    let contents = match format {
        ExportFormat::Txt => render_txt(&body, doc_name, date, mode),
        ExportFormat::Html => render_html(&body, doc_name, date, mode),
        ExportFormat::Md => {
            let title = paragraphs.iter().find(|p| p.kind == ParagraphKind::Title);
            render_markdown(&body, title, doc_name, date, mode)
        }
    };
    ExportedFile {
        file_name: export_file_name(doc_name, format),
        mime: format.mime(),
        contents,
    }
}

fn target_text(p: &Paragraph) -> &str {
    if p.is_pending() {
        PENDING_EXPORT_TEXT
    } else {
        &p.target_text
    }
}

fn render_txt(body: &[&Paragraph], doc_name: &str, date: &str, mode: ContentMode) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let header =
        format!("{rule}\nBilingual translation\nDocument: {doc_name}\nDate: {date}\n{rule}\n\n");
    let entries: Vec<String> = body
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let n = idx + 1;
            match mode {
                ContentMode::Bilingual => format!(
                    "[{n}] Source\n{}\n\n[{n}] Translation\n{}\n\n{}\n",
                    p.source_text,
                    target_text(p),
                    "-".repeat(40)
                ),
                ContentMode::TranslationOnly => format!("[{n}]\n{}\n", target_text(p)),
                ContentMode::SourceOnly => format!("[{n}]\n{}\n", p.source_text),
            }
        })
        .collect();
    header + &entries.join("\n")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_html(body: &[&Paragraph], doc_name: &str, date: &str, mode: ContentMode) -> String {
    let name = escape_html(doc_name);
    let headers = match mode {
        ContentMode::Bilingual => "<th class=\"src\">Source</th><th class=\"tgt\">Translation</th>",
        ContentMode::TranslationOnly => "<th class=\"tgt\">Translation</th>",
        ContentMode::SourceOnly => "<th class=\"src\">Source</th>",
    };
    let rows: Vec<String> = body
        .iter()
        .map(|p| {
            let src = escape_html(&p.source_text);
            let tgt = escape_html(target_text(p));
            match mode {
                ContentMode::Bilingual => {
                    format!("<tr><td class=\"src\">{src}</td><td class=\"tgt\">{tgt}</td></tr>")
                }
                ContentMode::TranslationOnly => format!("<tr><td class=\"tgt\">{tgt}</td></tr>"),
                ContentMode::SourceOnly => format!("<tr><td class=\"src\">{src}</td></tr>"),
            }
        })
        .collect();

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n",
            "<head>\n",
            "<meta charset=\"UTF-8\">\n",
            "<title>{name} - translation</title>\n",
            "<style>\n",
            "  body {{ font-family: system-ui, sans-serif; margin: 24px; }}\n",
            "  table {{ width: 100%; border-collapse: collapse; }}\n",
            "  td, th {{ padding: 12px 16px; vertical-align: top; text-align: left; ",
            "border-bottom: 1px solid #eee; }}\n",
            "  .tgt {{ background: #f8f9ff; }}\n",
            "</style>\n",
            "</head>\n",
            "<body>\n",
            "<h1>{name}</h1>\n",
            "<p>Date: {} &middot; {} paragraphs</p>\n",
            "<table>\n",
            "<thead><tr>{headers}</tr></thead>\n",
            "<tbody>\n",
            "{}\n",
            "</tbody>\n",
            "</table>\n",
            "</body>\n",
            "</html>\n",
        ),
        escape_html(date),
        body.len(),
        rows.join("\n"),
        name = name,
        headers = headers,
    )
}

fn render_markdown(
    body: &[&Paragraph],
    title: Option<&Paragraph>,
    doc_name: &str,
    date: &str,
    mode: ContentMode,
) -> String {
    let heading = match (title, mode) {
        (Some(t), ContentMode::TranslationOnly) => target_text(t),
        (Some(t), _) => t.source_text.as_str(),
        (None, _) => doc_name,
    };
    let mut out = format!(
        "# {heading}\n\n> **Document:** {doc_name}  \n> **Date:** {date}  \n> **{} paragraphs**\n\n---\n\n",
        body.len()
    );
    for (idx, p) in body.iter().enumerate() {
        let entry = match mode {
            ContentMode::Bilingual => format!(
                "### Paragraph {}\n\n**Source:**\n\n{}\n\n**Translation:**\n\n{}\n\n---\n\n",
                idx + 1,
                p.source_text,
                target_text(p)
            ),
            ContentMode::TranslationOnly => format!("{}\n\n", target_text(p)),
            ContentMode::SourceOnly => format!("{}\n\n", p.source_text),
        };
        out.push_str(&entry);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Paragraph> {
        vec![
            Paragraph::new(1, ParagraphKind::Title, "On Models", "论模型"),
            Paragraph::new(2, ParagraphKind::Abstract, "Abstract text.", "摘要文本。"),
            Paragraph::new(3, ParagraphKind::Section, "1 Intro", "1 引言"),
            Paragraph::new(4, ParagraphKind::Body, "a < b & c", "甲 < 乙"),
            Paragraph::pending(5, ParagraphKind::Body, "Not yet."),
        ]
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name("paper.PDF", ExportFormat::Md), "paper_translation.md");
        assert_eq!(
            export_file_name("notes.v2.txt", ExportFormat::Html),
            "notes.v2_translation.html"
        );
        assert_eq!(export_file_name("README", ExportFormat::Txt), "README_translation.txt");
    }

    #[test]
    fn test_txt_exports_only_body_numbered_from_one() {
        let file = export(
            &sample(),
            "paper.pdf",
            "2024-05-01",
            ExportFormat::Txt,
            ContentMode::SourceOnly,
        );
        assert_eq!(file.mime, "text/plain");
        assert!(file.contents.contains("Document: paper.pdf"));
        assert!(file.contents.contains("[1]\nAbstract text.\n"));
        assert!(file.contents.contains("[2]\na < b & c\n"));
        assert!(file.contents.contains("[3]\nNot yet.\n"));
        assert!(!file.contents.contains("1 Intro"));
        assert!(!file.contents.contains("On Models"));
    }

    #[test]
    fn test_bilingual_txt_marks_pending() {
        let file = export(&sample(), "paper.pdf", "d", ExportFormat::Txt, ContentMode::Bilingual);
        assert!(file.contents.contains("[1] Source\nAbstract text.\n\n[1] Translation\n摘要文本。"));
        assert!(file.contents.contains("[3] Translation\n[translation pending]"));
    }

    #[test]
    fn test_html_escapes_text() {
        let file = export(&sample(), "a&b.pdf", "d", ExportFormat::Html, ContentMode::Bilingual);
        assert!(file.contents.contains("a &lt; b &amp; c"));
        assert!(file.contents.contains("<h1>a&amp;b.pdf</h1>"));
        assert!(file.contents.contains("3 paragraphs"));
        assert!(!file.contents.contains("a < b"));
    }

    #[test]
    fn test_markdown_uses_title_paragraph() {
        let file = export(
            &sample(),
            "paper.pdf",
            "d",
            ExportFormat::Md,
            ContentMode::TranslationOnly,
        );
        assert!(file.contents.starts_with("# 论模型\n"));
        assert!(file.contents.contains("摘要文本。\n\n"));

        let no_title: Vec<Paragraph> = sample().into_iter().skip(1).collect();
        let file = export(&no_title, "paper.pdf", "d", ExportFormat::Md, ContentMode::Bilingual);
        assert!(file.contents.starts_with("# paper.pdf\n"));
        assert!(file.contents.contains("### Paragraph 2\n"));
    }

    #[test]
    fn test_mode_names_deserialize() {
        let mode: ContentMode = serde_json::from_str("\"translation\"").unwrap();
        assert_eq!(mode, ContentMode::TranslationOnly);
        let mode: ContentMode = serde_json::from_str("\"source-only\"").unwrap();
        assert_eq!(mode, ContentMode::SourceOnly);
        let format: ExportFormat = serde_json::from_str("\"markdown\"").unwrap();
        assert_eq!(format, ExportFormat::Md);
    }
}
