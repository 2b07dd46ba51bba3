//! One viewer instance: owns every controller and routes events between them
//!
//! All handlers run to completion on the caller's thread. Deferred work is
//! driven by [`Viewer::tick`] with the caller's clock. A document load is
//! identified by a [`LoadTicket`]; results for any other ticket are dropped.

use crate::anchor::{AnchorRegistry, Side};
use crate::content;
use crate::document::{Document, DocumentId, DocumentKind, DocumentStore, Paragraph, ParagraphId};
use crate::history::DocumentSummary;
use crate::ingest;
use crate::lookup::{Dictionary, Lookup};
use crate::navigation::{ActiveParagraph, EventStamp, NavigationController, ScrollRequest};
use crate::progress::{
    ProgressSchedule, ProgressTracker, TranslationProgress, DEFAULT_SETTLE_DELAY_MS,
};
use crate::schedule::{Generation, Millis};
use crate::scroll_sync::{PaneMetrics, ScrollSync, ScrollWrite, DEFAULT_GUARD_WINDOW_MS};
use crate::split::{ContainerBounds, SplitResizer, DEFAULT_SPLIT_PERCENT};
use crate::tooltip::{
    LookupPolicy, Point, Rect, SelectionEvent, TooltipController, TooltipGeometry,
    DEFAULT_ARM_DELAY_MS,
};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub sync_scroll: bool,
    pub word_lookup: bool,
    pub split_percent: f64,
    pub guard_window_ms: Millis,
    pub lookup_policy: LookupPolicy,
    pub tooltip_geometry: TooltipGeometry,
    pub arm_delay_ms: Millis,
    pub progress_schedule: ProgressSchedule,
    pub settle_delay_ms: Millis,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sync_scroll: false,
            word_lookup: true,
            split_percent: DEFAULT_SPLIT_PERCENT,
            guard_window_ms: DEFAULT_GUARD_WINDOW_MS,
            lookup_policy: LookupPolicy::default(),
            tooltip_geometry: TooltipGeometry::default(),
            arm_delay_ms: DEFAULT_ARM_DELAY_MS,
            progress_schedule: ProgressSchedule::default(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

/// Identity of one accepted load, handed to the content producer and
/// returned with its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: Generation,
    pub document_id: DocumentId,
}

pub struct Viewer {
    store: DocumentStore,
    anchors: AnchorRegistry,
    navigation: NavigationController,
    scroll: ScrollSync,
    split: SplitResizer,
    tooltip: TooltipController,
    progress: ProgressTracker,
    lookup: Box<dyn Lookup>,
    in_flight: Option<LoadTicket>,
}

impl Viewer {
    pub fn new(config: ViewerConfig, lookup: Box<dyn Lookup>) -> Self {
        let mut scroll = ScrollSync::new(config.guard_window_ms);
        scroll.set_enabled(config.sync_scroll);
        let mut tooltip = TooltipController::new(
            config.lookup_policy,
            config.tooltip_geometry,
            config.arm_delay_ms,
        );
        tooltip.set_enabled(config.word_lookup);
        Self {
            store: DocumentStore::new(),
            anchors: AnchorRegistry::new(),
            navigation: NavigationController::new(),
            scroll,
            split: SplitResizer::new(config.split_percent),
            tooltip,
            progress: ProgressTracker::new(config.progress_schedule, config.settle_delay_ms),
            lookup,
            in_flight: None,
        }
    }

    /// Viewer with the built-in dictionary showing the stand-in article
    pub fn with_demo(config: ViewerConfig) -> Self {
        let mut viewer = Self::new(config, Box::new(Dictionary::builtin()));
        let article = content::stand_in_article();
        let size = article.iter().map(|p| p.source_text.len() as u64).sum();
        viewer.show_document(Document::new(
            DocumentId::new(content::DEFAULT_DOCUMENT_ID),
            content::DEFAULT_DOCUMENT_NAME,
            DocumentKind::Pdf,
            size,
            article,
        ));
        viewer
    }

    pub fn set_lookup(&mut self, lookup: Box<dyn Lookup>) {
        self.lookup = lookup;
    }

    // Documents

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn document(&self) -> Option<&Document> {
        self.store.current()
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        self.store.paragraphs()
    }

    pub fn load_in_flight(&self) -> Option<&LoadTicket> {
        self.in_flight.as_ref()
    }

    /// Reset per-document interaction state ahead of showing another document
    fn leave_document(&mut self) {
        self.navigation.clear();
        self.tooltip.close();
        self.anchors.clear();
    }

    /// Show a fully available document without a translation run
    pub fn show_document(&mut self, document: Document) {
        self.leave_document();
        self.progress.cancel();
        self.in_flight = None;
        self.store.insert_and_show(document);
    }

    /// Accept a freshly ingested document: show it and start progress.
    ///
    /// Supersedes any load still in flight.
    pub fn begin_load(&mut self, now: Millis, document: Document) -> LoadTicket {
        self.leave_document();
        let generation = self.progress.start(now);
        let ticket = LoadTicket {
            generation,
            document_id: document.id.clone(),
        };
        debug!(id = %document.id, generation = generation.value(), "load started");
        self.store.insert_and_show(document);
        self.in_flight = Some(ticket.clone());
        ticket
    }

    /// Results of the content producer for `ticket`.
    ///
    /// Dropped unless the ticket is the live load and its document is still
    /// the one on screen. Returns whether the results were applied.
    pub fn finish_load<I>(&mut self, now: Millis, ticket: &LoadTicket, translations: I) -> bool
    where
        I: IntoIterator<Item = (ParagraphId, String)>,
    {
        if self.in_flight.as_ref() != Some(ticket)
            || self.store.current_id() != Some(&ticket.document_id)
        {
            trace!(id = %ticket.document_id, "stale load result dropped");
            return false;
        }
        let applied = self
            .store
            .get_mut(&ticket.document_id)
            .map(|doc| doc.apply_translations(translations))
            .unwrap_or(0);
        self.progress.complete(now, ticket.generation);
        self.in_flight = None;
        debug!(id = %ticket.document_id, applied, "load finished");
        true
    }

    /// Restart translation of the current document if it still has pending
    /// paragraphs and nothing is in flight.
    pub fn resume_pending(&mut self, now: Millis) -> Option<LoadTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        let id = self.store.current().filter(|d| d.pending_count() > 0)?.id.clone();
        let generation = self.progress.start(now);
        let ticket = LoadTicket {
            generation,
            document_id: id,
        };
        self.in_flight = Some(ticket.clone());
        Some(ticket)
    }

    /// Open a history entry.
    ///
    /// Resident documents are shown as cached. Demo entries open the
    /// stand-in article. Anything else opens the "content unavailable"
    /// placeholder. Returns true if the cached content was used.
    pub fn open_summary(&mut self, summary: &DocumentSummary) -> bool {
        self.leave_document();
        self.progress.cancel();
        self.in_flight = None;
        if self.store.show(&summary.id) {
            return true;
        }
        let document = if summary.is_demo || content::is_demo_id(&summary.id) {
            Document::new(
                summary.id.clone(),
                summary.name.clone(),
                summary.kind,
                summary.size,
                content::stand_in_article(),
            )
        } else {
            ingest::unavailable_document(summary.id.clone(), &summary.name)
        };
        self.store.insert_and_show(document);
        false
    }

    // Anchors and navigation

    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    /// The renderer registers mounted paragraphs here
    pub fn anchors_mut(&mut self) -> &mut AnchorRegistry {
        &mut self.anchors
    }

    pub fn active(&self) -> ActiveParagraph {
        self.navigation.active()
    }

    /// Whether clicks from `side` are accepted right now
    pub fn is_interactive(&self, side: Side) -> bool {
        !(side == Side::Target && self.progress.is_in_progress())
    }

    pub fn click_paragraph(
        &mut self,
        paragraph_id: ParagraphId,
        side: Side,
        stamp: EventStamp,
    ) -> Option<ScrollRequest> {
        if !self.is_interactive(side) {
            trace!(paragraph_id, "click on busy pane ignored");
            return None;
        }
        let paragraph = self.store.paragraph(paragraph_id)?;
        self.navigation.click(&self.anchors, paragraph, side, stamp)
    }

    // Scroll sync

    pub fn sync_scroll_enabled(&self) -> bool {
        self.scroll.is_enabled()
    }

    pub fn set_sync_scroll(&mut self, enabled: bool) {
        self.scroll.set_enabled(enabled);
    }

    pub fn toggle_sync_scroll(&mut self) -> bool {
        let enabled = !self.scroll.is_enabled();
        self.scroll.set_enabled(enabled);
        enabled
    }

    pub fn on_pane_scroll(
        &mut self,
        now: Millis,
        side: Side,
        source: &PaneMetrics,
        other: &PaneMetrics,
    ) -> Option<ScrollWrite> {
        self.scroll.on_scroll(now, side, source, other)
    }

    // Split

    pub fn split(&self) -> &SplitResizer {
        &self.split
    }

    pub fn begin_split_drag(&mut self) {
        self.split.begin_drag();
    }

    pub fn drag_split(&mut self, pointer_x: f64, container: ContainerBounds) -> bool {
        self.split.drag_to(pointer_x, container)
    }

    pub fn end_split_drag(&mut self) -> bool {
        self.split.end_drag()
    }

    pub fn nudge_split(&mut self, delta: f64) {
        self.split.nudge(delta);
    }

    // Lookup

    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    pub fn word_lookup_enabled(&self) -> bool {
        self.tooltip.is_enabled()
    }

    pub fn set_word_lookup(&mut self, enabled: bool) {
        self.tooltip.set_enabled(enabled);
    }

    pub fn toggle_word_lookup(&mut self) -> bool {
        let enabled = !self.tooltip.is_enabled();
        self.tooltip.set_enabled(enabled);
        enabled
    }

    /// Pointer pressed. Closes an armed tooltip when outside it, otherwise
    /// starts a selection. Returns true if a tooltip was closed.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        let closed = self.tooltip.pointer_down(point);
        self.tooltip.begin_selection();
        closed
    }

    /// Selection released. Returns true if a tooltip is now showing for it.
    pub fn selection_complete(
        &mut self,
        now: Millis,
        stamp: EventStamp,
        event: &SelectionEvent,
        viewport: Rect,
    ) -> bool {
        if let Some(id) = event.paragraph_id {
            let pending = self.store.paragraph(id).map(|p| p.is_pending()).unwrap_or(false);
            if pending && event.side == Some(Side::Target) {
                return false;
            }
        }
        self.tooltip
            .complete_selection(now, stamp, event, self.lookup.as_ref(), viewport)
    }

    pub fn close_tooltip(&mut self) {
        self.tooltip.close();
    }

    // Progress and time

    pub fn progress(&self) -> TranslationProgress {
        self.progress.snapshot()
    }

    /// Run everything due at `now`. Returns true if progress changed.
    pub fn tick(&mut self, now: Millis) -> bool {
        self.scroll.tick(now);
        self.tooltip.tick(now);
        self.progress.tick(now)
    }

    /// Earliest pending deadline across all controllers
    pub fn next_due(&self) -> Option<Millis> {
        [self.scroll.next_due(), self.tooltip.next_due(), self.progress.next_due()]
            .into_iter()
            .flatten()
            .min()
    }
}
