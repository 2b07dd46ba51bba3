use crate::app::{unix_millis, App, HistoryRow};
use bitext_core::history::format_file_size;
use bitext_core::tooltip::ArrowDirection;
use bitext_core::ExportFormat;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Widest the history sidebar gets
const HISTORY_WIDTH: u16 = 44;

/// Narrowest the export dialog gets
const EXPORT_MIN_WIDTH: u16 = 52;

/// Snap a core rectangle to whole cells inside `bounds`
fn cell_rect(rect: &bitext_core::Rect, bounds: Rect) -> Rect {
    let width = (rect.width.round().max(0.0) as u16).min(bounds.width);
    let height = (rect.height.round().max(0.0) as u16).min(bounds.height);
    let max_x = bounds.x + bounds.width - width;
    let max_y = bounds.y + bounds.height - height;
    let x = (rect.x.round().max(0.0) as u16).clamp(bounds.x, max_x);
    let y = (rect.y.round().max(0.0) as u16).clamp(bounds.y, max_y);
    Rect::new(x, y, width, height)
}

/// Word lookup tooltip with an arrow pointing at the selection
pub fn render_tooltip(frame: &mut Frame, app: &App) {
    let tooltip = app.viewer.tooltip();
    let (Some(payload), Some(placement)) = (tooltip.payload(), tooltip.placement()) else {
        return;
    };
    let area = cell_rect(&placement.rect, frame.area());
    if area.width < 3 || area.height < 3 {
        return;
    }

    frame.render_widget(Clear, area);

    let mut heading = vec![Span::styled(
        payload.word.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    if !payload.phonetic.is_empty() {
        heading.push(Span::styled(
            format!("  {}", payload.phonetic),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let mut lines = vec![Line::from(heading)];
    let mut meaning = Vec::new();
    if !payload.part_of_speech.is_empty() {
        meaning.push(Span::styled(
            format!("{} ", payload.part_of_speech),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
        ));
    }
    meaning.push(Span::styled(payload.translation.clone(), Style::default().fg(Color::Yellow)));
    lines.push(Line::from(meaning));
    if let Some(example) = &payload.example {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            example.clone(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );

    // Arrow on the edge facing the selection, under the anchor column
    let anchor_x = u16::try_from(payload.anchor_x.max(0)).unwrap_or(u16::MAX);
    let arrow_x = anchor_x.clamp(area.x + 1, area.x + area.width - 2);
    let (glyph, arrow_y) = match placement.arrow {
        ArrowDirection::Down => ("▼", area.y + area.height - 1),
        ArrowDirection::Up => ("▲", area.y),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(glyph, Style::default().fg(Color::Cyan))),
        Rect::new(arrow_x, arrow_y, 1, 1),
    );
}

/// Recent documents sidebar on the left edge
pub fn render_history(frame: &mut Frame, app: &mut App) {
    let screen = frame.area();
    let width = HISTORY_WIDTH.min(screen.width);
    let area = Rect::new(screen.x, screen.y, width, screen.height);
    app.history_area = Some((area.x, area.y, area.width, area.height));

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" History ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width < 4 {
        app.history_list_area = None;
        app.history_list_rows.clear();
        return;
    }

    // Filter line
    let filter_line = if app.history_filter_active || !app.history_filter.is_empty() {
        let cursor = if app.history_filter_active { "▏" } else { "" };
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}{cursor}", app.history_filter),
                Style::default().fg(Color::White),
            ),
        ])
    } else {
        Line::from(Span::styled(
            "/ filter  d delete  Enter open",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(
        Paragraph::new(filter_line),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );

    let list_area = Rect::new(inner.x, inner.y + 1, inner.width, inner.height - 1);
    app.history_list_area = Some((list_area.x, list_area.y, list_area.width, list_area.height));

    let now = unix_millis();
    let current = app.viewer.store().current_id().cloned();
    let text_width = usize::from(list_area.width);
    let mut rows: Vec<(Line, Option<usize>)> = Vec::new();
    let mut ordinal = 0usize;
    for row in app.history_rows_at(now) {
        match row {
            HistoryRow::Group(group) => {
                rows.push((
                    Line::from(Span::styled(
                        group.label(),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )),
                    None,
                ));
            }
            HistoryRow::Entry(idx) => {
                let entry = &app.history.list()[idx];
                let selected = ordinal == app.history_selected;
                let is_current = current.as_ref() == Some(&entry.id);
                let name_style = if selected {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else if is_current {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let badge = format!("[{}] ", entry.kind.label());
                let name_budget = text_width.saturating_sub(badge.chars().count() + 2);
                let name: String = entry.name.chars().take(name_budget).collect();
                rows.push((
                    Line::from(vec![
                        Span::raw(if is_current { "● " } else { "  " }),
                        Span::styled(badge, Style::default().fg(Color::Magenta)),
                        Span::styled(name, name_style),
                    ]),
                    Some(ordinal),
                ));
                let mut meta = format!(
                    "    {} · {} pages · {}",
                    app.formatter.relative(entry.uploaded_at, now),
                    entry.page_count,
                    format_file_size(entry.size)
                );
                if entry.is_demo {
                    meta.push_str(" · demo");
                }
                rows.push((
                    Line::from(Span::styled(meta, Style::default().fg(Color::DarkGray))),
                    Some(ordinal),
                ));
                ordinal += 1;
            }
        }
    }

    if rows.is_empty() {
        let message = if app.history_filter.is_empty() {
            "No documents yet"
        } else {
            "No matches"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray))),
            list_area,
        );
        app.history_list_rows.clear();
        return;
    }

    // Keep the selected entry's rows in view
    let visible = usize::from(list_area.height);
    let last_selected = rows
        .iter()
        .rposition(|(_, row)| *row == Some(app.history_selected))
        .unwrap_or(0);
    let scroll = (last_selected + 1).saturating_sub(visible);

    let window: Vec<(Line, Option<usize>)> = rows.into_iter().skip(scroll).take(visible).collect();
    app.history_list_rows = window.iter().map(|(_, row)| *row).collect();
    let lines: Vec<Line> = window.into_iter().map(|(line, _)| line).collect();
    frame.render_widget(Paragraph::new(lines), list_area);
}

/// Centered export dialog: format, content and target file
pub fn render_export_dialog(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let key_style = Style::default().fg(Color::Cyan);
    let label_style = Style::default().fg(Color::DarkGray);

    let mut formats = vec![Span::styled(format!("  {:<10}", "Format"), label_style)];
    for format in ExportFormat::ALL {
        let style = if format == app.export_format {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        formats.push(Span::styled(format!(" {} ", format.label()), style));
        formats.push(Span::raw(" "));
    }

    let file_name = app
        .export_file_name()
        .unwrap_or_else(|| "(no document)".to_string());
    let lines = vec![
        Line::from(""),
        Line::from(formats),
        Line::from(vec![
            Span::styled(format!("  {:<10}", "Content"), label_style),
            Span::styled(
                format!(" {} ", app.export_content.label()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("  {:<10}", "File"), label_style),
            Span::styled(format!(" {file_name}"), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled(format!("  {:<10}", "Into"), label_style),
            Span::styled(
                format!(" {}", app.export_dir.display()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  f", key_style),
            Span::styled(" format  ", label_style),
            Span::styled("c", key_style),
            Span::styled(" content  ", label_style),
            Span::styled("Enter", key_style),
            Span::styled(" export  ", label_style),
            Span::styled("Esc", key_style),
            Span::styled(" cancel", label_style),
        ]),
    ];

    // Grow to fit the longest row, borders and one column of slack
    let widest = lines.iter().map(Line::width).max().unwrap_or(0);
    let fit = u16::try_from(widest + 3).unwrap_or(u16::MAX);
    let popup_width = fit.max(EXPORT_MIN_WIDTH).min(area.width.saturating_sub(2));
    let popup_height = 10u16.min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Export ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

#[cfg(test)]
mod tests {
    use super::cell_rect;
    use ratatui::layout::Rect;

    #[test]
    fn test_cell_rect_clamps_to_bounds() {
        let bounds = Rect::new(0, 0, 80, 24);
        let rect = bitext_core::Rect::new(70.4, -2.0, 20.0, 8.0);
        assert_eq!(cell_rect(&rect, bounds), Rect::new(60, 0, 20, 8));
    }

    #[test]
    fn test_cell_rect_shrinks_oversized() {
        let bounds = Rect::new(0, 0, 10, 4);
        let rect = bitext_core::Rect::new(0.0, 0.0, 40.0, 8.0);
        assert_eq!(cell_rect(&rect, bounds), Rect::new(0, 0, 10, 4));
    }
}
