use super::{unix_millis, App, Overlay};
use anyhow::{Context, Result};
use bitext_core::export::export;
use std::path::PathBuf;
use tracing::info;

impl App {
    pub fn cycle_export_format(&mut self) {
        self.export_format = self.export_format.next();
    }

    pub fn cycle_export_content(&mut self) {
        self.export_content = self.export_content.next();
    }

    /// File name the export dialog will write
    pub fn export_file_name(&self) -> Option<String> {
        let doc = self.viewer.document()?;
        Some(bitext_core::export::export_file_name(&doc.display_name, self.export_format))
    }

    /// Write the current document into the export directory
    pub fn write_export(&mut self) -> Result<PathBuf> {
        let doc = self.viewer.document().context("No document to export")?;
        let date = self.formatter.date(unix_millis());
        let file = export(
            &doc.paragraphs,
            &doc.display_name,
            &date,
            self.export_format,
            self.export_content,
        );
        std::fs::create_dir_all(&self.export_dir)
            .with_context(|| format!("Failed to create {}", self.export_dir.display()))?;
        let path = self.export_dir.join(&file.file_name);
        std::fs::write(&path, file.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), mime = file.mime, "exported");
        Ok(path)
    }

    /// Enter in the export dialog
    pub fn confirm_export(&mut self) {
        match self.write_export() {
            Ok(path) => {
                self.overlay = Overlay::None;
                self.set_status(format!("Exported to {}", path.display()));
            }
            Err(err) => self.set_status(format!("Export failed: {err:#}")),
        }
    }
}
