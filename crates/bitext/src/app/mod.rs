//! Application state and logic

use crate::time_format::TimeFormatter;
use bitext_core::{
    ContentMode, DocumentId, ElementArena, EventStamp, ExportFormat, HistoryStore, Millis, Side,
    Viewer,
};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::debug;

mod export;
mod history;
mod panes;
mod pointer;
mod types;
mod utils;
mod worker;

#[cfg(test)]
mod tests;

pub(crate) use types::{
    area_contains, Area, Clock, HistoryRow, LayoutLine, MountedParagraph, Overlay, PaneLayout,
    TextPos, TextSelection, MIN_PANE_WIDTH, PANE_PADDING,
};
use types::{TranslationRequest, TranslationResponse, SPLIT_NUDGE_PERCENT};
pub(crate) use utils::unix_millis;

/// The main application state
pub struct App {
    /// Core viewer: documents, navigation, sync, split, lookup, progress
    pub viewer: Viewer,
    /// Recently opened documents
    pub history: Box<dyn HistoryStore>,
    /// Time source fed to the viewer
    pub clock: Clock,
    /// Last stamp handed to an input event
    last_stamp: EventStamp,
    /// Shown in the translation pane while a paragraph is pending
    pub pending_placeholder: String,
    /// Rows per mouse wheel notch
    pub lines_per_tick: usize,
    /// How long the demo translator takes per load
    pub translation_delay: Duration,
    /// Where exports are written
    pub export_dir: PathBuf,
    /// Export dialog selections
    pub export_format: ExportFormat,
    pub export_content: ContentMode,
    /// Mounted paragraphs per side; reset on every layout
    arenas: [ElementArena<MountedParagraph>; 2],
    /// Wrapped pane content from the last layout
    pub layouts: [PaneLayout; 2],
    /// First visible row per side
    pub scroll_offsets: [usize; 2],
    /// Document the layouts were built for
    layout_document: Option<DocumentId>,
    /// Pane text areas from the last layout
    pub pane_areas: [Option<Area>; 2],
    /// Divider column from the last layout
    pub divider_area: Option<Area>,
    /// Area holding both panes and the divider
    pub body_area: Option<Area>,
    /// Whole terminal, used to keep the tooltip on screen
    pub screen_area: Option<Area>,
    /// Pane receiving keyboard scrolling
    pub focus: Side,
    /// Overlay currently shown
    pub overlay: Overlay,
    /// Text selection in progress or just finished
    pub selection: Option<TextSelection>,
    /// True while the left button is held after pressing on pane text
    selecting: bool,
    /// One-line message in the status bar
    pub status: Option<String>,
    /// Selected row in the history sidebar (index into `history_rows`)
    pub history_selected: usize,
    /// History sidebar name filter
    pub history_filter: String,
    /// True while typing into the history filter
    pub history_filter_active: bool,
    /// History sidebar area (x, y, width, height)
    pub history_area: Option<Area>,
    /// History list area inside the sidebar
    pub history_list_area: Option<Area>,
    /// History list row mapping for mouse selection
    pub history_list_rows: Vec<Option<usize>>,
    /// File given on the command line, reopened by `r`
    pub cli_file: Option<PathBuf>,
    pub formatter: TimeFormatter,
    /// Whether to quit
    pub should_quit: bool,
    translate_tx: Option<mpsc::Sender<TranslationRequest>>,
    translate_rx: Option<mpsc::Receiver<TranslationResponse>>,
}

impl App {
    pub fn new(viewer: Viewer, history: Box<dyn HistoryStore>) -> Self {
        Self {
            viewer,
            history,
            clock: Clock::Real(Instant::now()),
            last_stamp: 0,
            pending_placeholder: "Translating…".to_string(),
            lines_per_tick: 3,
            translation_delay: Duration::from_millis(1_800),
            export_dir: PathBuf::from("."),
            export_format: ExportFormat::default(),
            export_content: ContentMode::default(),
            arenas: [ElementArena::new(), ElementArena::new()],
            layouts: [PaneLayout::default(), PaneLayout::default()],
            scroll_offsets: [0, 0],
            layout_document: None,
            pane_areas: [None, None],
            divider_area: None,
            body_area: None,
            screen_area: None,
            focus: Side::Source,
            overlay: Overlay::None,
            selection: None,
            selecting: false,
            status: None,
            history_selected: 0,
            history_filter: String::new(),
            history_filter_active: false,
            history_area: None,
            history_list_area: None,
            history_list_rows: Vec::new(),
            cli_file: None,
            formatter: TimeFormatter::new(),
            should_quit: false,
            translate_tx: None,
            translate_rx: None,
        }
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// Identity for one input event; every handler it reaches sees the same stamp
    pub(crate) fn next_stamp(&mut self) -> EventStamp {
        self.last_stamp += 1;
        self.last_stamp
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Run deferred work: translation results, then every viewer task due now
    pub fn tick(&mut self) {
        self.poll_translation_responses();
        let now = self.now();
        if self.viewer.tick(now) {
            debug!(percent = self.viewer.progress().percent, "progress");
        }
    }

    pub fn toggle_sync_scroll(&mut self) {
        let enabled = self.viewer.toggle_sync_scroll();
        self.set_status(if enabled { "Scroll sync on" } else { "Scroll sync off" });
    }

    pub fn toggle_word_lookup(&mut self) {
        let enabled = self.viewer.toggle_word_lookup();
        self.set_status(if enabled { "Word lookup on" } else { "Word lookup off" });
    }

    pub fn nudge_split(&mut self, grow_left: bool) {
        let delta = if grow_left { SPLIT_NUDGE_PERCENT } else { -SPLIT_NUDGE_PERCENT };
        self.viewer.nudge_split(delta);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.opposite();
    }

    fn toggle_overlay(&mut self, overlay: Overlay) {
        self.overlay = if self.overlay == overlay { Overlay::None } else { overlay };
        self.viewer.close_tooltip();
    }

    pub fn toggle_help(&mut self) {
        self.toggle_overlay(Overlay::Help);
    }

    pub fn toggle_history(&mut self) {
        self.history_filter_active = false;
        self.toggle_overlay(Overlay::History);
        if self.overlay == Overlay::History {
            self.select_current_history_entry();
        }
    }

    pub fn toggle_export(&mut self) {
        self.toggle_overlay(Overlay::Export);
    }

    /// Esc: close the innermost thing that is open. Returns false if nothing was.
    pub fn dismiss(&mut self) -> bool {
        if self.history_filter_active {
            self.history_filter_active = false;
            return true;
        }
        if self.overlay != Overlay::None {
            self.overlay = Overlay::None;
            return true;
        }
        if self.viewer.tooltip().payload().is_some() {
            self.viewer.close_tooltip();
            return true;
        }
        if self.selection.take().is_some() {
            return true;
        }
        false
    }

    /// Copy the active paragraph of the focused pane
    pub fn yank_active_paragraph(&mut self) {
        let Some(id) = self.viewer.active().get() else {
            self.set_status("No active paragraph");
            return;
        };
        let Some(paragraph) = self.viewer.store().paragraph(id) else {
            return;
        };
        let text = match self.focus {
            Side::Source => paragraph.source_text.clone(),
            Side::Target if paragraph.is_pending() => {
                self.set_status("Translation still pending");
                return;
            }
            Side::Target => paragraph.target_text.clone(),
        };
        if utils::copy_to_clipboard(&text) {
            self.set_status(format!("Copied paragraph {id}"));
        } else {
            self.set_status("Clipboard unavailable");
        }
    }
}
