use crate::app::{App, LayoutLine, PANE_PADDING};
use bitext_core::Side;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render both panes and the divider between them.
///
/// Expects `app.layout` to have run for this frame.
pub fn render_panes(frame: &mut Frame, app: &App) {
    for side in Side::BOTH {
        if let Some((x, y, width, height)) = app.pane_areas[side.index()] {
            render_pane(frame, app, side, Rect::new(x, y, width, height));
        }
    }
    render_divider(frame, app);
}

fn pane_title(side: Side) -> &'static str {
    match side {
        Side::Source => "Original",
        Side::Target => "Translation",
    }
}

/// Scroll position shown at the right of a pane header
fn scroll_label(offset: usize, total: usize, visible: usize) -> String {
    if total <= visible {
        return "All".to_string();
    }
    let max = total - visible;
    if offset == 0 {
        "Top".to_string()
    } else if offset >= max {
        "Bot".to_string()
    } else {
        format!("{}%", offset * 100 / max)
    }
}

fn line_style(app: &App, side: Side, line: &LayoutLine) -> Style {
    let mut style = if line.pending {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
    } else if line.kind.map(|kind| kind.is_heading()).unwrap_or(false) {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    if !app.viewer.is_interactive(side) {
        style = style.add_modifier(Modifier::DIM);
    }
    style
}

fn render_pane(frame: &mut Frame, app: &App, side: Side, text_area: Rect) {
    let idx = side.index();
    let layout = &app.layouts[idx];
    let offset = app.scroll_offsets[idx];
    let visible = usize::from(text_area.height);

    // Header sits on the row above the text, across the padding too
    let header = Rect::new(
        text_area.x.saturating_sub(PANE_PADDING),
        text_area.y.saturating_sub(1),
        text_area.width + PANE_PADDING * 2,
        1,
    );
    let focused = app.focus == side;
    let title_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut title = vec![Span::styled(format!(" {}", pane_title(side)), title_style)];
    if side == Side::Target && app.viewer.progress().is_in_progress() {
        title.push(Span::styled(
            format!("  {}%", app.viewer.progress().percent),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), header);
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("{} ", scroll_label(offset, layout.total_rows(), visible)),
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Right),
        header,
    );

    let active = app.viewer.active().get();
    let lines: Vec<Line> = layout
        .lines
        .iter()
        .skip(offset)
        .take(visible)
        .map(|line| Line::from(Span::styled(line.text.clone(), line_style(app, side, line))))
        .collect();
    frame.render_widget(Paragraph::new(lines), text_area);

    // Active paragraph marker in the left padding column
    if PANE_PADDING > 0 && text_area.x > 0 {
        let marker_x = text_area.x - 1;
        for (row, line) in layout.lines.iter().skip(offset).take(visible).enumerate() {
            if line.paragraph_id.is_some() && line.paragraph_id == active {
                let cell = Rect::new(marker_x, text_area.y + row as u16, 1, 1);
                frame.render_widget(
                    Paragraph::new(Span::styled("▎", Style::default().fg(Color::Yellow))),
                    cell,
                );
            }
        }
    }

    render_selection(frame, app, side, text_area);
}

fn render_selection(frame: &mut Frame, app: &App, side: Side, text_area: Rect) {
    let Some(selection) = app.selection else {
        return;
    };
    if selection.anchor.side != side || selection.is_empty() {
        return;
    }
    let (start, end) = selection.ordered();
    let offset = app.scroll_offsets[side.index()];
    let style = Style::default().add_modifier(Modifier::REVERSED);
    for row in start.row..=end.row {
        let Some(screen_row) = row.checked_sub(offset) else {
            continue;
        };
        if screen_row >= usize::from(text_area.height) {
            break;
        }
        let from = if row == start.row { start.col } else { 0 };
        let to = if row == end.row {
            end.col.saturating_add(1)
        } else {
            text_area.width
        };
        let to = to.min(text_area.width);
        if to <= from {
            continue;
        }
        let cells = Rect::new(text_area.x + from, text_area.y + screen_row as u16, to - from, 1);
        frame.buffer_mut().set_style(cells, style);
    }
}

fn render_divider(frame: &mut Frame, app: &App) {
    let Some((x, y, width, height)) = app.divider_area else {
        return;
    };
    if width == 0 || height == 0 {
        return;
    }
    let style = if app.viewer.split().is_dragging() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let glyph = if app.viewer.split().is_dragging() { "┃" } else { "│" };
    let lines: Vec<Line> = (0..height).map(|_| Line::from(Span::styled(glyph, style))).collect();
    frame.render_widget(Paragraph::new(lines), Rect::new(x, y, 1, height));
}

#[cfg(test)]
mod tests {
    use super::scroll_label;

    #[test]
    fn test_scroll_label() {
        assert_eq!(scroll_label(0, 10, 20), "All");
        assert_eq!(scroll_label(0, 100, 20), "Top");
        assert_eq!(scroll_label(80, 100, 20), "Bot");
        assert_eq!(scroll_label(40, 100, 20), "50%");
    }
}
