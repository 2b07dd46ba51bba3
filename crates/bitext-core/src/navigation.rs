//! Paragraph click navigation between panes

use crate::anchor::{AnchorRegistry, ElementHandle, Side};
use crate::document::{Paragraph, ParagraphId};
use tracing::debug;

/// Logical identity of one input event, assigned by the front end.
/// Delivering the same stamp twice must not repeat side effects.
pub type EventStamp = u64;

/// The single highlighted paragraph, shared by both panes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveParagraph(Option<ParagraphId>);

impl ActiveParagraph {
    pub fn get(self) -> Option<ParagraphId> {
        self.0
    }

    pub fn is(self, id: ParagraphId) -> bool {
        self.0 == Some(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Where in the viewport the element should land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
}

/// Request for the renderer to bring an element into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub paragraph_id: ParagraphId,
    /// Pane to scroll
    pub side: Side,
    pub handle: ElementHandle,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

#[derive(Debug, Default)]
pub struct NavigationController {
    active: ActiveParagraph,
    last_stamp: Option<EventStamp>,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> ActiveParagraph {
        self.active
    }

    pub fn clear(&mut self) {
        self.active = ActiveParagraph(None);
    }

    /// Highlight `paragraph_id` in both panes and scroll its counterpart
    /// in the other pane into view.
    ///
    /// The highlight is set before resolution so the renderer sees it when
    /// it handles the request. Returns `None` when the counterpart is not
    /// mounted; the highlight still changes.
    pub fn navigate(
        &mut self,
        anchors: &AnchorRegistry,
        paragraph_id: ParagraphId,
        from: Side,
    ) -> Option<ScrollRequest> {
        self.active = ActiveParagraph(Some(paragraph_id));
        let handle = anchors.resolve(paragraph_id, from)?;
        Some(ScrollRequest {
            paragraph_id,
            side: from.opposite(),
            handle,
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Center,
        })
    }

    /// Handle a click on a paragraph.
    ///
    /// Non-navigable kinds are ignored entirely. A repeated stamp is a
    /// duplicate delivery of an event already handled.
    pub fn click(
        &mut self,
        anchors: &AnchorRegistry,
        paragraph: &Paragraph,
        from: Side,
        stamp: EventStamp,
    ) -> Option<ScrollRequest> {
        if !paragraph.is_navigable() {
            return None;
        }
        if self.last_stamp == Some(stamp) {
            debug!(stamp, "duplicate click ignored");
            return None;
        }
        self.last_stamp = Some(stamp);
        self.navigate(anchors, paragraph.id, from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::ElementArena;
    use crate::document::ParagraphKind;

    fn registry_with(ids: &[ParagraphId]) -> (AnchorRegistry, ElementArena<ParagraphId>) {
        let mut arena = ElementArena::new();
        let mut reg = AnchorRegistry::new();
        for &id in ids {
            reg.register(id, Side::Source, arena.insert(id));
            reg.register(id, Side::Target, arena.insert(id));
        }
        (reg, arena)
    }

    #[test]
    fn test_click_body_left_scrolls_right() {
        let (reg, arena) = registry_with(&[1, 2, 3, 4]);
        let mut nav = NavigationController::new();
        let para = Paragraph::new(3, ParagraphKind::Body, "src", "tgt");

        let req = nav.click(&reg, &para, Side::Source, 1).expect("scroll request");
        assert_eq!(nav.active().get(), Some(3));
        assert_eq!(req.side, Side::Target);
        assert_eq!(req.paragraph_id, 3);
        assert_eq!(req.block, ScrollBlock::Center);
        assert_eq!(req.behavior, ScrollBehavior::Smooth);
        assert_eq!(arena.get(req.handle), Some(&3));
    }

    #[test]
    fn test_non_navigable_click_changes_nothing() {
        let (reg, _arena) = registry_with(&[1, 2]);
        let mut nav = NavigationController::new();
        nav.click(&reg, &Paragraph::new(2, ParagraphKind::Body, "", ""), Side::Source, 1);

        let title = Paragraph::new(1, ParagraphKind::Title, "Title", "Titel");
        assert!(nav.click(&reg, &title, Side::Target, 2).is_none());
        assert_eq!(nav.active().get(), Some(2));
    }

    #[test]
    fn test_unresolved_navigation_still_highlights() {
        let (reg, _arena) = registry_with(&[1]);
        let mut nav = NavigationController::new();
        assert!(nav.navigate(&reg, 9, Side::Target).is_none());
        assert!(nav.active().is(9));
    }

    #[test]
    fn test_duplicate_stamp_is_ignored() {
        let (reg, _arena) = registry_with(&[5]);
        let mut nav = NavigationController::new();
        let para = Paragraph::new(5, ParagraphKind::Abstract, "a", "b");
        assert!(nav.click(&reg, &para, Side::Target, 7).is_some());
        assert!(nav.click(&reg, &para, Side::Target, 7).is_none());
        assert!(nav.click(&reg, &para, Side::Target, 8).is_some());
    }
}
