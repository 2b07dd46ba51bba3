//! Core viewer state for bitext
//!
//! Everything in this crate is headless and single-threaded: a front end feeds
//! input events and a monotonic millisecond clock into a [`Viewer`], renders
//! what it reports, and registers the elements it mounted back into the
//! anchor registry.

pub mod anchor;
pub mod content;
pub mod document;
pub mod export;
pub mod history;
pub mod ingest;
pub mod lookup;
pub mod navigation;
pub mod progress;
pub mod schedule;
pub mod scroll_sync;
pub mod session;
pub mod split;
pub mod tooltip;
pub mod translate;

pub use anchor::{AnchorRegistry, ElementArena, ElementHandle, Side};
pub use document::{
    Document, DocumentId, DocumentKind, DocumentStore, Paragraph, ParagraphId, ParagraphKind,
    PENDING_TRANSLATION,
};
pub use export::{ContentMode, ExportFormat, ExportedFile};
pub use history::{DocumentSummary, HistoryError, HistoryStore, JsonHistory, MemoryHistory};
pub use ingest::{DefaultIngestor, IngestError, Ingestor, Upload};
pub use lookup::{Dictionary, DictionaryError, Lookup, LookupEntry};
pub use navigation::{ActiveParagraph, EventStamp, NavigationController, ScrollRequest};
pub use progress::{
    Checkpoint, ProgressSchedule, ProgressState, ProgressTracker, TranslationProgress,
};
pub use schedule::{Generation, Millis, Scheduler};
pub use scroll_sync::{PaneMetrics, ScrollSync, ScrollWrite};
pub use session::{LoadTicket, Viewer, ViewerConfig};
pub use split::{ContainerBounds, SplitResizer};
pub use tooltip::{
    LookupPolicy, Placement, Point, Rect, SelectionEvent, TooltipController, TooltipGeometry,
    TooltipPayload, TooltipPhase,
};
pub use translate::{DemoTranslator, Translator};
