use bitext_core::{Document, LoadTicket, Millis, ParagraphId, ParagraphKind, Side};
use std::time::Instant;

/// Narrowest pane content width the layout will wrap to
pub const MIN_PANE_WIDTH: u16 = 8;
/// Horizontal padding inside each pane
pub const PANE_PADDING: u16 = 1;
/// Split change per `<` / `>` press, in percent
pub const SPLIT_NUDGE_PERCENT: f64 = 5.0;

/// Screen area as (x, y, width, height)
pub type Area = (u16, u16, u16, u16);

pub(crate) fn area_contains(area: Area, column: u16, row: u16) -> bool {
    let (x, y, width, height) = area;
    column >= x && column < x.saturating_add(width) && row >= y && row < y.saturating_add(height)
}

/// Modal surface drawn over the panes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    History,
    Export,
    Help,
}

/// Time source for the viewer's scheduled work
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    Real(Instant),
    /// Advanced by hand
    #[cfg(test)]
    Manual(Millis),
}

impl Clock {
    pub fn now(&self) -> Millis {
        match self {
            Clock::Real(start) => start.elapsed().as_millis() as Millis,
            #[cfg(test)]
            Clock::Manual(now) => *now,
        }
    }
}

/// One wrapped row of a pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutLine {
    /// `None` for the blank rows between paragraphs
    pub paragraph_id: Option<ParagraphId>,
    pub kind: Option<ParagraphKind>,
    pub text: String,
    /// Row shows the pending placeholder, not paragraph text
    pub pending: bool,
}

impl LayoutLine {
    pub fn blank() -> Self {
        Self {
            paragraph_id: None,
            kind: None,
            text: String::new(),
            pending: false,
        }
    }
}

/// A paragraph as mounted in one pane for the current render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountedParagraph {
    pub paragraph_id: ParagraphId,
    pub side: Side,
    pub first_row: usize,
    pub rows: usize,
}

impl MountedParagraph {
    pub fn center_row(&self) -> usize {
        self.first_row + self.rows / 2
    }
}

/// Wrapped content of one pane
#[derive(Debug, Clone, Default)]
pub struct PaneLayout {
    pub lines: Vec<LayoutLine>,
}

impl PaneLayout {
    pub fn total_rows(&self) -> usize {
        self.lines.len()
    }
}

/// Position inside a pane's wrapped text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPos {
    pub side: Side,
    pub row: usize,
    pub col: u16,
}

/// Mouse drag selecting text in one pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSelection {
    pub anchor: TextPos,
    pub head: TextPos,
}

impl TextSelection {
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// (start, end) in reading order
    pub fn ordered(&self) -> (TextPos, TextPos) {
        if (self.head.row, self.head.col) < (self.anchor.row, self.anchor.col) {
            (self.head, self.anchor)
        } else {
            (self.anchor, self.head)
        }
    }
}

pub(crate) struct TranslationRequest {
    pub(crate) ticket: LoadTicket,
    pub(crate) document: Document,
}

pub(crate) struct TranslationResponse {
    pub(crate) ticket: LoadTicket,
    pub(crate) translations: Vec<(ParagraphId, String)>,
}

/// Visible history row: a date heading or an index into the history list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRow {
    Group(crate::time_format::DateGroup),
    Entry(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_ordered() {
        let a = TextPos { side: Side::Source, row: 3, col: 10 };
        let b = TextPos { side: Side::Source, row: 1, col: 2 };
        let sel = TextSelection { anchor: a, head: b };
        assert_eq!(sel.ordered(), (b, a));
        assert!(!sel.is_empty());
    }

    #[test]
    fn test_area_contains() {
        assert!(area_contains((2, 2, 3, 1), 4, 2));
        assert!(!area_contains((2, 2, 3, 1), 5, 2));
        assert!(!area_contains((2, 2, 3, 1), 2, 3));
    }
}
