use super::utils::{join_rows, slice_cols, word_at};
use super::{area_contains, App, Overlay, TextPos, TextSelection};
use bitext_core::{ContainerBounds, EventStamp, Point, Rect, SelectionEvent, Side};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Tooltip viewport when nothing has been laid out yet
const FALLBACK_SCREEN: (u16, u16) = (80, 24);

fn cell_point(column: u16, row: u16) -> Point {
    Point::new(f64::from(column), f64::from(row))
}

impl App {
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let (column, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(column, row),
            MouseEventKind::Drag(MouseButton::Left) => self.mouse_drag(column, row),
            MouseEventKind::Up(MouseButton::Left) => self.mouse_up(column, row),
            MouseEventKind::Down(MouseButton::Right) => self.lookup_word_at(column, row),
            MouseEventKind::ScrollDown => self.wheel(column, row, true),
            MouseEventKind::ScrollUp => self.wheel(column, row, false),
            _ => {}
        }
    }

    /// Terminal area as the tooltip viewport
    pub(crate) fn viewport(&self) -> Rect {
        let (x, y, width, height) = self
            .screen_area
            .unwrap_or((0, 0, FALLBACK_SCREEN.0, FALLBACK_SCREEN.1));
        Rect::new(f64::from(x), f64::from(y), f64::from(width), f64::from(height))
    }

    fn tooltip_contains(&self, column: u16, row: u16) -> bool {
        self.viewer
            .tooltip()
            .placement()
            .map(|p| p.rect.contains(cell_point(column, row)))
            .unwrap_or(false)
    }

    pub fn mouse_down(&mut self, column: u16, row: u16) {
        match self.overlay {
            Overlay::History => {
                self.history_click(column, row);
                return;
            }
            Overlay::None => {}
            _ => return,
        }
        if let Some(divider) = self.divider_area {
            if area_contains(divider, column, row) {
                self.viewer.begin_split_drag();
                return;
            }
        }
        self.selection = None;
        self.selecting = false;
        if self.tooltip_contains(column, row) {
            return;
        }
        self.viewer.pointer_down(cell_point(column, row));
        if let Some(pos) = self.text_pos_at(column, row) {
            self.focus = pos.side;
            self.selection = Some(TextSelection { anchor: pos, head: pos });
            self.selecting = true;
        }
    }

    pub fn mouse_drag(&mut self, column: u16, row: u16) {
        if self.viewer.split().is_dragging() {
            if let Some((x, _, width, _)) = self.body_area {
                let container = ContainerBounds {
                    left: f64::from(x),
                    width: f64::from(width),
                };
                self.viewer.drag_split(f64::from(column), container);
            }
            return;
        }
        if !self.selecting {
            return;
        }
        let Some(selection) = self.selection else {
            return;
        };
        if let Some(head) = self.clamped_pos(selection.anchor.side, column, row) {
            self.selection = Some(TextSelection { head, ..selection });
        }
    }

    pub fn mouse_up(&mut self, column: u16, row: u16) {
        // Always released, even if the press started elsewhere
        if self.viewer.end_split_drag() {
            return;
        }
        if !self.selecting {
            return;
        }
        self.selecting = false;
        let Some(selection) = self.selection else {
            return;
        };
        let stamp = self.next_stamp();
        if !selection.is_empty() {
            let event = self.selection_event(&selection);
            self.deliver_selection(stamp, &event);
            return;
        }

        // A plain click: the lookup listener sees an empty selection, then
        // the paragraph handles the click
        self.selection = None;
        let empty = SelectionEvent::new("", Rect::new(f64::from(column), f64::from(row), 0.0, 1.0));
        self.deliver_selection(stamp, &empty);
        let clicked = self.line_at(selection.anchor).and_then(|line| line.paragraph_id);
        if let Some(id) = clicked {
            self.activate_paragraph(id, selection.anchor.side, stamp);
        }
    }

    /// Right click: look up the word under the pointer
    pub fn lookup_word_at(&mut self, column: u16, row: u16) {
        if self.overlay != Overlay::None || self.tooltip_contains(column, row) {
            return;
        }
        self.viewer.pointer_down(cell_point(column, row));
        let stamp = self.next_stamp();
        let word = self.text_pos_at(column, row).and_then(|pos| {
            let line = self.line_at(pos)?;
            let (start, end, _) = word_at(&line.text, usize::from(pos.col))?;
            Some(TextSelection {
                anchor: TextPos { col: start as u16, ..pos },
                head: TextPos {
                    col: end.saturating_sub(1) as u16,
                    ..pos
                },
            })
        });
        let event = match word {
            Some(selection) => {
                self.selection = Some(selection);
                self.selection_event(&selection)
            }
            None => SelectionEvent::new("", Rect::new(f64::from(column), f64::from(row), 0.0, 1.0)),
        };
        self.deliver_selection(stamp, &event);
    }

    fn deliver_selection(&mut self, stamp: EventStamp, event: &SelectionEvent) -> bool {
        let now = self.now();
        let viewport = self.viewport();
        self.viewer.selection_complete(now, stamp, event, viewport)
    }

    fn wheel(&mut self, column: u16, row: u16, down: bool) {
        match self.overlay {
            Overlay::History => {
                self.move_history_selection(down);
                return;
            }
            Overlay::None => {}
            _ => return,
        }
        let side = Side::BOTH
            .into_iter()
            .find(|side| {
                self.pane_areas[side.index()]
                    .map(|area| area_contains(area, column, row))
                    .unwrap_or(false)
            })
            .unwrap_or(self.focus);
        let rows = self.lines_per_tick.max(1) as isize;
        self.scroll_pane(side, if down { rows } else { -rows });
    }

    /// Position in `side` nearest to a screen cell, for drags leaving the pane
    fn clamped_pos(&self, side: Side, column: u16, row: u16) -> Option<TextPos> {
        let (x, y, width, height) = self.pane_areas[side.index()]?;
        let total = self.layouts[side.index()].total_rows();
        if total == 0 || width == 0 || height == 0 {
            return None;
        }
        let column = column.clamp(x, x + width - 1);
        let row = row.clamp(y, y + height - 1);
        let line = (self.scroll_offsets[side.index()] + usize::from(row - y)).min(total - 1);
        Some(TextPos {
            side,
            row: line,
            col: column - x,
        })
    }

    /// Selected text snapped outward to whole words, with its screen bounds
    pub(crate) fn selection_event(&self, selection: &TextSelection) -> SelectionEvent {
        let (start, end) = selection.ordered();
        let side = start.side;
        let layout = &self.layouts[side.index()];
        let mut rows = Vec::new();
        let mut first_col = usize::from(start.col);
        let mut last_col = usize::from(end.col) + 1;
        for row in start.row..=end.row {
            let Some(line) = layout.lines.get(row) else {
                break;
            };
            let text = line.text.as_str();
            let from = if row == start.row {
                first_col = word_at(text, usize::from(start.col))
                    .map(|(s, _, _)| s)
                    .unwrap_or(first_col);
                first_col
            } else {
                0
            };
            let to = if row == end.row {
                last_col = word_at(text, usize::from(end.col))
                    .map(|(_, e, _)| e)
                    .unwrap_or(last_col);
                last_col
            } else {
                usize::MAX
            };
            rows.push(slice_cols(text, from, to));
        }

        let (area_x, area_y, area_width, _) = self.pane_areas[side.index()].unwrap_or((0, 0, 0, 0));
        let top = self.screen_row(side, start.row).unwrap_or(area_y);
        let bounds = if start.row == end.row {
            Rect::new(
                f64::from(area_x) + first_col as f64,
                f64::from(top),
                last_col.saturating_sub(first_col) as f64,
                1.0,
            )
        } else {
            Rect::new(
                f64::from(area_x),
                f64::from(top),
                f64::from(area_width),
                (end.row - start.row + 1) as f64,
            )
        };

        let paragraph = [start, end]
            .into_iter()
            .find_map(|pos| self.line_at(pos).and_then(|line| line.paragraph_id));
        let event = SelectionEvent::new(join_rows(&rows), bounds);
        match paragraph {
            Some(id) => event.in_paragraph(side, id),
            None => event,
        }
    }
}
