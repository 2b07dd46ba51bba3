use super::{area_contains, unix_millis, App, HistoryRow, Overlay};
use crate::time_format::DateGroup;
use bitext_core::ingest;
use bitext_core::{DefaultIngestor, DocumentId, IngestError, Ingestor, Upload};
use std::cmp::Reverse;
use std::path::Path;
use tracing::{info, warn};

impl App {
    /// Sidebar rows: entries matching the filter, newest first, under date headings
    pub fn history_rows(&self) -> Vec<HistoryRow> {
        self.history_rows_at(unix_millis())
    }

    pub(crate) fn history_rows_at(&self, now_millis: i64) -> Vec<HistoryRow> {
        let list = self.history.list();
        let filter = self.history_filter.trim().to_lowercase();
        let mut entries: Vec<usize> = (0..list.len())
            .filter(|&i| filter.is_empty() || list[i].name.to_lowercase().contains(&filter))
            .collect();
        entries.sort_by_key(|&i| Reverse(list[i].uploaded_at));

        let mut rows = Vec::new();
        for group in DateGroup::ALL {
            let mut members = entries
                .iter()
                .copied()
                .filter(|&i| DateGroup::of(list[i].uploaded_at, now_millis) == group)
                .peekable();
            if members.peek().is_none() {
                continue;
            }
            rows.push(HistoryRow::Group(group));
            rows.extend(members.map(HistoryRow::Entry));
        }
        rows
    }

    /// History list indices in display order
    fn history_order(&self) -> Vec<usize> {
        self.history_rows()
            .into_iter()
            .filter_map(|row| match row {
                HistoryRow::Entry(i) => Some(i),
                HistoryRow::Group(_) => None,
            })
            .collect()
    }

    /// History list index under the sidebar cursor
    pub fn selected_history_entry(&self) -> Option<usize> {
        self.history_order().get(self.history_selected).copied()
    }

    pub(crate) fn select_current_history_entry(&mut self) {
        let current = self.viewer.store().current_id().cloned();
        let list = self.history.list();
        self.history_selected = self
            .history_order()
            .iter()
            .position(|&i| Some(&list[i].id) == current.as_ref())
            .unwrap_or(0);
    }

    pub fn move_history_selection(&mut self, down: bool) {
        let count = self.history_order().len();
        if count == 0 {
            self.history_selected = 0;
            return;
        }
        self.history_selected = if down {
            (self.history_selected + 1).min(count - 1)
        } else {
            self.history_selected.saturating_sub(1)
        };
    }

    /// Show the selected entry: cached content if this session still has it
    pub fn open_selected_history_entry(&mut self) {
        let Some(idx) = self.selected_history_entry() else {
            return;
        };
        let summary = self.history.list()[idx].clone();
        let cached = self.viewer.open_summary(&summary);
        self.overlay = Overlay::None;
        self.history_filter_active = false;
        self.set_status(format!("Opened {}", summary.name));
        if cached {
            self.resume_translation();
        }
    }

    pub fn remove_selected_history_entry(&mut self) {
        let Some(idx) = self.selected_history_entry() else {
            return;
        };
        let id: DocumentId = self.history.list()[idx].id.clone();
        match self.history.remove(&id) {
            Ok(true) => self.set_status("Removed from history"),
            Ok(false) => {}
            Err(err) => {
                warn!(%id, %err, "failed to update history");
                self.set_status(format!("History not saved: {err}"));
            }
        }
        let count = self.history_order().len();
        self.history_selected = self.history_selected.min(count.saturating_sub(1));
    }

    pub fn start_history_filter(&mut self) {
        self.history_filter_active = true;
    }

    pub fn push_history_filter(&mut self, c: char) {
        self.history_filter.push(c);
        self.history_selected = 0;
    }

    pub fn pop_history_filter(&mut self) {
        self.history_filter.pop();
        self.history_selected = 0;
    }

    /// Mouse press while the sidebar is open
    pub(crate) fn history_click(&mut self, column: u16, row: u16) {
        let inside = self
            .history_area
            .map(|area| area_contains(area, column, row))
            .unwrap_or(false);
        if !inside {
            self.overlay = Overlay::None;
            self.history_filter_active = false;
            return;
        }
        let Some((_, y, _, _)) = self.history_list_area else {
            return;
        };
        let hit = row
            .checked_sub(y)
            .and_then(|offset| self.history_list_rows.get(usize::from(offset)).copied().flatten());
        if let Some(ordinal) = hit {
            self.history_selected = ordinal;
            self.open_selected_history_entry();
        }
    }

    /// Ingest a file from disk, record it, show it and start translating.
    ///
    /// A file that passes the type and size checks but cannot be read opens
    /// as the "content unavailable" document with the error in the status line.
    pub fn open_path(&mut self, path: &Path) -> Result<(), IngestError> {
        let uploaded_at = unix_millis();
        let id = DocumentId::generate(uploaded_at);
        let document = match Upload::from_path(path) {
            Ok(upload) => DefaultIngestor.ingest(&upload, id),
            Err(IngestError::Unreadable { name, source }) => {
                warn!(%name, err = %source, "upload unreadable");
                self.set_status(format!("Cannot read {name}: {source}"));
                ingest::unavailable_document(id, &name)
            }
            Err(err) => return Err(err),
        };
        info!(
            name = %document.display_name,
            paragraphs = document.paragraph_count,
            "document opened"
        );
        if let Err(err) = self.history.upsert(document.summary(uploaded_at)) {
            warn!(%err, "failed to update history");
            self.set_status(format!("History not saved: {err}"));
        }
        let now = self.now();
        let ticket = self.viewer.begin_load(now, document);
        self.dispatch_translation(ticket);
        Ok(())
    }

    /// `r`: open the command line file again as a fresh load
    pub fn reload_cli_file(&mut self) {
        let Some(path) = self.cli_file.clone() else {
            self.set_status("No file given on the command line");
            return;
        };
        self.status = None;
        match self.open_path(&path) {
            Ok(()) if self.status.is_some() => {}
            Ok(()) => self.set_status(format!("Reloaded {}", path.display())),
            Err(err) => self.set_status(format!("Cannot open {}: {err}", path.display())),
        }
    }
}
