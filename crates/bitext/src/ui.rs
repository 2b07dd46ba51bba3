//! UI rendering for the TUI

use crate::app::{App, Overlay};
use crate::views::{render_export_dialog, render_history, render_panes, render_tooltip};
use bitext_core::ProgressState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

/// Width of the progress gauge in the top bar
const GAUGE_WIDTH: u16 = 24;

/// Shorten `name` to `max_width` characters, keeping the extension visible
fn truncate_name(name: &str, max_width: usize) -> String {
    let count = name.chars().count();
    if count <= max_width {
        return name.to_string();
    }
    if max_width <= 1 {
        return "…".repeat(max_width);
    }
    let tail: String = match name.rfind('.') {
        Some(dot) if name.len() - dot < max_width / 2 => name[dot..].to_string(),
        _ => String::new(),
    };
    let head_len = max_width - 1 - tail.chars().count();
    let head: String = name.chars().take(head_len).collect();
    format!("{head}…{tail}")
}

/// Main drawing function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Document bar
            Constraint::Min(0),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    app.layout(frame.area(), chunks[1]);

    draw_top_bar(frame, app, chunks[0]);
    render_panes(frame, app);
    draw_status_bar(frame, app, chunks[2]);

    match app.overlay {
        Overlay::None => render_tooltip(frame, app),
        Overlay::History => render_history(frame, app),
        Overlay::Export => render_export_dialog(frame, app),
        Overlay::Help => draw_help_popover(frame, app),
    }
}

fn toggle_span(label: &str, on: bool) -> Span<'static> {
    let style = if on {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("{label} {}", if on { "on" } else { "off" }), style)
}

fn draw_top_bar(frame: &mut Frame, app: &App, area: Rect) {
    let progress = app.viewer.progress();
    let show_gauge = progress.state != ProgressState::Idle && area.width > GAUGE_WIDTH * 2;

    let mut right_spans = vec![
        toggle_span("sync", app.viewer.sync_scroll_enabled()),
        Span::raw("  "),
        toggle_span("lookup", app.viewer.word_lookup_enabled()),
        Span::raw("  "),
        Span::styled(
            format!("split {:.0}%", app.viewer.split().left_percent()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" "),
    ];
    if app.viewer.split().is_dragging() {
        right_spans.insert(0, Span::styled("resizing  ", Style::default().fg(Color::Yellow)));
    }
    let right_width = Line::from(right_spans.clone()).width() as u16;

    let gauge_width = if show_gauge { GAUGE_WIDTH + 1 } else { 0 };
    let left_budget = usize::from(area.width.saturating_sub(right_width + gauge_width));

    let mut left_spans = vec![Span::styled(
        " BITEXT ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    match app.viewer.document() {
        Some(doc) => {
            let meta = format!(
                "  {} · {} paragraphs",
                doc.kind.label(),
                doc.paragraph_count
            );
            let name_budget = left_budget.saturating_sub(9 + meta.chars().count());
            left_spans.push(Span::raw(" "));
            left_spans.push(Span::styled(
                truncate_name(&doc.display_name, name_budget.max(8)),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));
            left_spans.push(Span::styled(meta, Style::default().fg(Color::DarkGray)));
        }
        None => left_spans.push(Span::styled(" no document", Style::default().fg(Color::DarkGray))),
    }

    let [left_area, gauge_area, right_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(gauge_width),
        Constraint::Length(right_width),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(Line::from(left_spans)), left_area);
    frame.render_widget(
        Paragraph::new(Line::from(right_spans)).alignment(Alignment::Right),
        right_area,
    );

    if show_gauge {
        let (label, color) = match progress.state {
            ProgressState::Complete => ("Translated".to_string(), Color::Green),
            _ => (format!("Translating {}%", progress.percent), Color::Yellow),
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent(u16::from(progress.percent.min(100)))
            .label(label);
        let inner = Rect::new(gauge_area.x, gauge_area.y, GAUGE_WIDTH, gauge_area.height);
        frame.render_widget(gauge, inner);
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let dim_style = Style::default().fg(Color::DarkGray);

    let focus = match app.focus {
        bitext_core::Side::Source => " ORIGINAL ",
        bitext_core::Side::Target => " TRANSLATION ",
    };
    let mut spans = vec![
        Span::styled(
            focus,
            Style::default().fg(Color::Black).bg(Color::DarkGray),
        ),
        Span::raw(" "),
    ];

    if let Some(id) = app.viewer.active().get() {
        spans.push(Span::styled(format!("¶{id} "), Style::default().fg(Color::Yellow)));
    }

    match &app.status {
        Some(message) => {
            spans.push(Span::styled(message.clone(), Style::default().fg(Color::White)))
        }
        None => {
            let hints = [
                ("?", "help"),
                ("h", "history"),
                ("e", "export"),
                ("s", "sync"),
                ("w", "lookup"),
                ("q", "quit"),
            ];
            for (key, label) in hints {
                spans.push(Span::styled(key, key_style));
                spans.push(Span::styled(format!(" {label}  "), dim_style));
            }
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_popover(frame: &mut Frame, _app: &App) {
    let area = frame.area();

    // Calculate popover size and position (centered)
    let popup_width = 46u16.min(area.width.saturating_sub(4));
    let popup_height = 30u16.min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let key_style = Style::default().fg(Color::Cyan);
    let label_style = Style::default().fg(Color::White);
    let dim_style = Style::default().fg(Color::DarkGray);
    let section_style = Style::default().fg(Color::Yellow);

    // Helper to create a padded key-value line
    let help_line = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::styled(format!("  {:<14}", key), key_style),
            Span::styled(desc.to_string(), label_style),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(" Reading", section_style)),
        help_line("j / k / ↑↓", "Scroll focused pane"),
        help_line("PgUp / PgDn", "Scroll a page"),
        help_line("g / G", "Go to start/end"),
        help_line("[ / ]", "Prev/next paragraph"),
        help_line("Tab", "Switch focused pane"),
        help_line("click", "Jump to counterpart"),
        help_line("y", "Yank active paragraph"),
        Line::from(""),
        Line::from(Span::styled(" Lookup", section_style)),
        help_line("drag", "Select text to look up"),
        help_line("right click", "Look up word"),
        help_line("w", "Toggle word lookup"),
        Line::from(""),
        Line::from(Span::styled(" Layout", section_style)),
        help_line("s", "Toggle scroll sync"),
        help_line("< / >", "Move the divider"),
        help_line("drag │", "Resize panes"),
        Line::from(""),
        Line::from(Span::styled(" Documents", section_style)),
        help_line("h", "History (/ filter, d delete)"),
        help_line("e", "Export (f format, c content)"),
        help_line("r", "Reload file from disk"),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "?"), key_style),
            Span::styled("Close help", dim_style),
        ]),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "q / Esc"), key_style),
            Span::styled("Quit / close", label_style),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Cyan));

    let help_block = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(help_block, popup_area);
}

#[cfg(test)]
mod tests {
    use super::truncate_name;

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("paper.pdf", 20), "paper.pdf");
    }

    #[test]
    fn test_truncate_name_keeps_extension() {
        let out = truncate_name("a_very_long_document_name.pdf", 16);
        assert_eq!(out.chars().count(), 16);
        assert!(out.ends_with("….pdf"));
    }

    #[test]
    fn test_truncate_name_tiny() {
        assert_eq!(truncate_name("abcdef", 1), "…");
    }
}
