use super::utils::wrap_text;
use super::{
    area_contains, App, Area, LayoutLine, MountedParagraph, PaneLayout, TextPos, MIN_PANE_WIDTH,
    PANE_PADDING,
};
use bitext_core::{EventStamp, PaneMetrics, ParagraphId, ScrollRequest, ScrollWrite, Side};
use ratatui::layout::Rect;
use tracing::trace;

/// Split `body` into source pane, divider column and target pane
pub(crate) fn pane_columns(body: Rect, left_percent: f64) -> (Rect, Rect, Rect) {
    let usable = body.width.saturating_sub(1);
    let left = ((f64::from(usable) * left_percent / 100.0).round() as u16).min(usable);
    let source = Rect::new(body.x, body.y, left, body.height);
    let divider = Rect::new(body.x + left, body.y, body.width.min(1), body.height);
    let target = Rect::new(body.x + left + 1, body.y, usable - left, body.height);
    (source, divider, target)
}

/// Text area of a pane: below the one-row header, inside the padding
pub(crate) fn pane_text_area(pane: Rect) -> Rect {
    Rect::new(
        pane.x.saturating_add(PANE_PADDING),
        pane.y.saturating_add(1),
        pane.width.saturating_sub(PANE_PADDING * 2),
        pane.height.saturating_sub(1),
    )
}

pub(crate) fn to_area(rect: Rect) -> Area {
    (rect.x, rect.y, rect.width, rect.height)
}

impl App {
    /// Lay out both panes for this frame and remount every paragraph.
    ///
    /// `screen` is the whole terminal, `body` the region the panes share.
    pub fn layout(&mut self, screen: Rect, body: Rect) {
        let current = self.viewer.store().current_id().cloned();
        if current != self.layout_document {
            self.scroll_offsets = [0, 0];
            self.selection = None;
            self.layout_document = current;
        }

        self.screen_area = Some(to_area(screen));
        self.body_area = Some(to_area(body));
        let (source, divider, target) = pane_columns(body, self.viewer.split().left_percent());
        self.divider_area = Some(to_area(divider));
        for (side, pane) in [(Side::Source, source), (Side::Target, target)] {
            let text = pane_text_area(pane);
            self.pane_areas[side.index()] = Some(to_area(text));
            self.mount_side(side, text.width.max(MIN_PANE_WIDTH));
            let max = self.max_scroll(side);
            let offset = &mut self.scroll_offsets[side.index()];
            *offset = (*offset).min(max);
        }
    }

    /// Wrap one pane's paragraphs and register where each one landed
    fn mount_side(&mut self, side: Side, width: u16) {
        let idx = side.index();
        let mut lines = Vec::new();
        let mut mounted = Vec::new();
        for (n, paragraph) in self.viewer.paragraphs().iter().enumerate() {
            if n > 0 {
                lines.push(LayoutLine::blank());
            }
            let pending = side == Side::Target && paragraph.is_pending();
            let text = match side {
                Side::Source => paragraph.source_text.as_str(),
                Side::Target if pending => self.pending_placeholder.as_str(),
                Side::Target => paragraph.target_text.as_str(),
            };
            let first_row = lines.len();
            lines.extend(wrap_text(text, usize::from(width)).into_iter().map(|row| LayoutLine {
                paragraph_id: Some(paragraph.id),
                kind: Some(paragraph.kind),
                text: row,
                pending,
            }));
            mounted.push(MountedParagraph {
                paragraph_id: paragraph.id,
                side,
                first_row,
                rows: lines.len() - first_row,
            });
        }

        self.arenas[idx].reset();
        self.viewer.anchors_mut().unmount_side(side);
        for paragraph in mounted {
            let handle = self.arenas[idx].insert(paragraph);
            self.viewer.anchors_mut().register(paragraph.paragraph_id, side, handle);
        }
        self.layouts[idx] = PaneLayout { lines };
    }

    pub(crate) fn visible_rows(&self, side: Side) -> usize {
        self.pane_areas[side.index()]
            .map(|(_, _, _, height)| usize::from(height))
            .unwrap_or(0)
    }

    pub(crate) fn max_scroll(&self, side: Side) -> usize {
        self.layouts[side.index()]
            .total_rows()
            .saturating_sub(self.visible_rows(side))
    }

    pub(crate) fn metrics(&self, side: Side) -> PaneMetrics {
        PaneMetrics::new(
            self.scroll_offsets[side.index()] as f64,
            self.layouts[side.index()].total_rows() as f64,
            self.visible_rows(side) as f64,
        )
    }

    /// Scroll `side` by `delta` rows
    pub fn scroll_pane(&mut self, side: Side, delta: isize) {
        let current = self.scroll_offsets[side.index()] as isize;
        let next = (current + delta).clamp(0, self.max_scroll(side) as isize);
        self.set_scroll(side, next as usize);
    }

    pub fn scroll_focused(&mut self, rows: isize) {
        self.scroll_pane(self.focus, rows);
    }

    pub fn page_focused(&mut self, down: bool) {
        let page = self.visible_rows(self.focus).saturating_sub(1).max(1) as isize;
        self.scroll_focused(if down { page } else { -page });
    }

    /// Jump the focused pane to its first or last row
    pub fn scroll_focused_to_end(&mut self, bottom: bool) {
        let side = self.focus;
        let offset = if bottom { self.max_scroll(side) } else { 0 };
        self.set_scroll(side, offset);
    }

    /// Move `side` to `offset`. A position change raises a scroll event
    /// for that pane, exactly like user scrolling does.
    pub(crate) fn set_scroll(&mut self, side: Side, offset: usize) {
        let offset = offset.min(self.max_scroll(side));
        if offset == self.scroll_offsets[side.index()] {
            return;
        }
        self.scroll_offsets[side.index()] = offset;
        self.on_scroll_event(side);
    }

    fn on_scroll_event(&mut self, side: Side) {
        let now = self.now();
        let source = self.metrics(side);
        let other = self.metrics(side.opposite());
        if let Some(write) = self.viewer.on_pane_scroll(now, side, &source, &other) {
            self.apply_scroll_write(write);
        }
    }

    fn apply_scroll_write(&mut self, write: ScrollWrite) {
        trace!(side = ?write.side, top = write.scroll_top, "mirrored scroll");
        self.set_scroll(write.side, write.scroll_top.round().max(0.0) as usize);
    }

    /// Bring the element a navigation request points at to the middle of its pane
    pub(crate) fn apply_scroll_request(&mut self, request: ScrollRequest) -> bool {
        let Some(mounted) = self.arenas[request.side.index()].get(request.handle).copied() else {
            trace!(paragraph_id = request.paragraph_id, "scroll target no longer mounted");
            return false;
        };
        self.center_on(mounted);
        true
    }

    fn center_on(&mut self, mounted: MountedParagraph) {
        let half = self.visible_rows(mounted.side) / 2;
        self.set_scroll(mounted.side, mounted.center_row().saturating_sub(half));
    }

    /// Mounted paragraph `id` on `side`, if the last layout placed it
    pub(crate) fn mounted(&self, id: ParagraphId, side: Side) -> Option<MountedParagraph> {
        let handle = self.viewer.anchors().get(id, side)?;
        self.arenas[side.index()].get(handle).copied()
    }

    /// Activate a paragraph from `side`: the other pane scrolls to its counterpart
    pub(crate) fn activate_paragraph(
        &mut self,
        id: ParagraphId,
        side: Side,
        stamp: EventStamp,
    ) -> bool {
        if !self.viewer.is_interactive(side) {
            self.set_status("Translation in progress");
            return false;
        }
        match self.viewer.click_paragraph(id, side, stamp) {
            Some(request) => self.apply_scroll_request(request),
            None => false,
        }
    }

    /// Step the active paragraph forward or back through abstract and body
    /// paragraphs, bringing it into view in both panes
    pub fn step_paragraph(&mut self, forward: bool) {
        let ids: Vec<ParagraphId> = self
            .viewer
            .paragraphs()
            .iter()
            .filter(|p| p.is_navigable())
            .map(|p| p.id)
            .collect();
        let position = self
            .viewer
            .active()
            .get()
            .and_then(|id| ids.iter().position(|&i| i == id));
        let next = match position {
            Some(pos) if forward => ids.get(pos + 1).or(ids.last()),
            Some(pos) => ids.get(pos.saturating_sub(1)),
            None if forward => ids.first(),
            None => ids.last(),
        };
        let Some(&id) = next else {
            return;
        };
        let side = self.focus;
        let stamp = self.next_stamp();
        if !self.activate_paragraph(id, side, stamp) && !self.viewer.is_interactive(side) {
            return;
        }
        if let Some(mounted) = self.mounted(id, side) {
            self.center_on(mounted);
        }
    }

    /// Text position under a screen cell
    pub(crate) fn text_pos_at(&self, column: u16, row: u16) -> Option<TextPos> {
        Side::BOTH.into_iter().find_map(|side| {
            let area = self.pane_areas[side.index()]?;
            if !area_contains(area, column, row) {
                return None;
            }
            let line = self.scroll_offsets[side.index()] + usize::from(row - area.1);
            (line < self.layouts[side.index()].total_rows()).then_some(TextPos {
                side,
                row: line,
                col: column - area.0,
            })
        })
    }

    pub(crate) fn line_at(&self, pos: TextPos) -> Option<&LayoutLine> {
        self.layouts[pos.side.index()].lines.get(pos.row)
    }

    /// Screen row of a layout row, if it is currently visible
    pub(crate) fn screen_row(&self, side: Side, row: usize) -> Option<u16> {
        let (_, y, _, height) = self.pane_areas[side.index()]?;
        let offset = self.scroll_offsets[side.index()];
        let visible = row.checked_sub(offset)?;
        (visible < usize::from(height)).then(|| y + visible as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_columns_follow_split() {
        let body = Rect::new(0, 1, 101, 20);
        let (source, divider, target) = pane_columns(body, 50.0);
        assert_eq!(source.width, 50);
        assert_eq!(divider.x, 50);
        assert_eq!(target.x, 51);
        assert_eq!(target.width, 50);

        let (source, _, target) = pane_columns(body, 20.0);
        assert_eq!(source.width, 20);
        assert_eq!(target.width, 80);
    }

    #[test]
    fn test_pane_columns_degenerate() {
        let (source, divider, target) = pane_columns(Rect::new(0, 0, 0, 5), 50.0);
        assert_eq!((source.width, divider.width, target.width), (0, 0, 0));
    }

    #[test]
    fn test_pane_text_area() {
        assert_eq!(pane_text_area(Rect::new(10, 1, 30, 20)), Rect::new(11, 2, 28, 19));
    }
}
