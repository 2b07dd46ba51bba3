use crate::app::{unix_millis, App, Clock, Overlay, TextPos, TextSelection};
use crate::config::Config;
use crate::ui;
use bitext_core::content::demo_history;
use bitext_core::{
    Document, DocumentId, DocumentKind, MemoryHistory, Paragraph, ParagraphKind, Rect as CoreRect,
    SelectionEvent, Side, Viewer,
};
use ratatui::{backend::TestBackend, buffer::Buffer, style::Modifier, Terminal};

fn make_app() -> App {
    let viewer = Viewer::with_demo(Config::default().viewer_config());
    let history = MemoryHistory::with_entries(demo_history(unix_millis()), 30);
    let mut app = App::new(viewer, Box::new(history));
    app.clock = Clock::Manual(0);
    app
}

fn render_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal.draw(|frame| ui::draw(frame, app)).expect("draw");
    terminal.backend().buffer().clone()
}

fn buffer_text(buf: &Buffer) -> Vec<String> {
    let mut lines = Vec::new();
    for y in 0..buf.area.height {
        let mut line = String::new();
        for x in 0..buf.area.width {
            line.push_str(buf[(x, y)].symbol());
        }
        lines.push(line);
    }
    lines
}

fn screen_contains(buf: &Buffer, needle: &str) -> bool {
    buffer_text(buf).iter().any(|line| line.contains(needle))
}

#[test]
fn test_initial_render_shows_both_panes() {
    let mut app = make_app();
    let buf = render_buffer(&mut app, 100, 30);
    let lines = buffer_text(&buf);

    assert!(lines[0].contains("BITEXT"));
    assert!(lines[0].contains("large_language_models.pdf"));
    assert!(lines[1].contains("Original"));
    assert!(lines[1].contains("Translation"));
    assert!(lines[2].contains("Large Language Models"));
    assert!(lines[2].contains("大"));
    assert!(lines[29].contains("help"));
}

#[test]
fn test_divider_spans_the_body() {
    let mut app = make_app();
    let buf = render_buffer(&mut app, 100, 30);
    let (x, y, _, height) = app.divider_area.expect("divider laid out");
    for row in y..y + height {
        assert_eq!(buf[(x, row)].symbol(), "│", "row {row}");
    }
}

#[test]
fn test_divider_highlights_while_dragging() {
    let mut app = make_app();
    render_buffer(&mut app, 100, 30);
    app.viewer.begin_split_drag();
    let buf = render_buffer(&mut app, 100, 30);
    let (x, y, _, _) = app.divider_area.expect("divider laid out");
    assert_eq!(buf[(x, y)].symbol(), "┃");
    assert!(buffer_text(&buf)[0].contains("resizing"));
}

#[test]
fn test_help_overlay() {
    let mut app = make_app();
    app.toggle_help();
    let buf = render_buffer(&mut app, 100, 34);
    assert!(screen_contains(&buf, " Help "));
    assert!(screen_contains(&buf, "Toggle scroll sync"));
    assert!(screen_contains(&buf, "Resize panes"));
}

#[test]
fn test_history_sidebar_lists_groups_and_records_rows() {
    let mut app = make_app();
    app.toggle_history();
    let buf = render_buffer(&mut app, 100, 30);

    assert!(screen_contains(&buf, " History "));
    assert!(screen_contains(&buf, "attention_is_all_you_need.pdf"));
    assert!(screen_contains(&buf, "[PDF]"));
    assert!(screen_contains(&buf, "1.2 MB"));
    assert!(app.history_area.is_some());
    assert!(app.history_list_area.is_some());
    assert_eq!(app.history_list_rows.first(), Some(&None));
    assert!(app.history_list_rows.iter().any(|row| row.is_some()));
}

#[test]
fn test_history_click_opens_entry() {
    let mut app = make_app();
    app.toggle_history();
    render_buffer(&mut app, 100, 30);

    let (x, y, _, _) = app.history_list_area.expect("list laid out");
    let offset = app
        .history_list_rows
        .iter()
        .position(|row| *row == Some(1))
        .expect("second entry visible");
    app.mouse_down(x + 2, y + offset as u16);

    assert_eq!(app.overlay, Overlay::None);
    assert_eq!(
        app.viewer.store().current_id(),
        Some(&DocumentId::new("demo-transformer"))
    );
    let buf = render_buffer(&mut app, 100, 30);
    assert!(buffer_text(&buf)[0].contains("attention_is_all_you_need.pdf"));
}

#[test]
fn test_history_filter_no_matches() {
    let mut app = make_app();
    app.toggle_history();
    for c in "zzz".chars() {
        app.push_history_filter(c);
    }
    let buf = render_buffer(&mut app, 100, 30);
    assert!(screen_contains(&buf, "No matches"));
    assert!(app.history_list_rows.is_empty());
}

#[test]
fn test_export_dialog() {
    let mut app = make_app();
    app.toggle_export();
    app.cycle_export_format();
    let buf = render_buffer(&mut app, 100, 30);
    assert!(screen_contains(&buf, " Export "));
    assert!(screen_contains(&buf, "large_language_models_translation.html"));
    assert!(screen_contains(&buf, "Bilingual"));

    // The file row stays inside the borders on a narrow screen too
    let buf = render_buffer(&mut app, 60, 20);
    let row = buffer_text(&buf)
        .into_iter()
        .find(|line| line.contains("File"))
        .expect("file row");
    assert!(row.contains("large_language_models_translation.html │"), "{row}");
}

#[test]
fn test_tooltip_renders_above_selection_with_arrow() {
    let mut app = make_app();
    render_buffer(&mut app, 100, 30);
    let event = SelectionEvent::new("transformer", CoreRect::new(10.0, 12.0, 11.0, 1.0));
    let viewport = app.viewport();
    assert!(app.viewer.selection_complete(0, 1, &event, viewport));

    let buf = render_buffer(&mut app, 100, 30);
    let placement = *app.viewer.tooltip().placement().expect("placed");
    let top = placement.rect.y as u16;
    let bottom = top + placement.rect.height as u16 - 1;
    assert!(bottom < 12);
    assert_eq!(buf[(16, bottom)].symbol(), "▼");
    assert!(buffer_text(&buf)[usize::from(top) + 1].contains("transformer"));
    assert!(screen_contains(&buf, "n."));
}

#[test]
fn test_tooltip_flips_below_near_top() {
    let mut app = make_app();
    render_buffer(&mut app, 100, 30);
    let event = SelectionEvent::new("attention", CoreRect::new(40.0, 3.0, 9.0, 1.0));
    let viewport = app.viewport();
    assert!(app.viewer.selection_complete(0, 1, &event, viewport));

    let buf = render_buffer(&mut app, 100, 30);
    let placement = *app.viewer.tooltip().placement().expect("placed");
    let top = placement.rect.y as u16;
    assert!(top > 3);
    assert!(buffer_text(&buf)[usize::from(top)].contains("▲"));
}

#[test]
fn test_pending_translation_placeholder() {
    let mut app = make_app();
    let doc = Document::new(
        DocumentId::new("doc-1"),
        "notes.txt",
        DocumentKind::Txt,
        12,
        vec![Paragraph::pending(1, ParagraphKind::Body, "Hello world")],
    );
    app.viewer.begin_load(0, doc);
    let buf = render_buffer(&mut app, 100, 30);
    let lines = buffer_text(&buf);

    assert!(lines[0].contains("notes.txt"));
    assert!(lines[0].contains("Translating"));
    assert!(lines[2].contains("Hello world"));
    assert!(lines[2].contains("Translating…"));
}

#[test]
fn test_selection_is_highlighted() {
    let mut app = make_app();
    render_buffer(&mut app, 100, 30);
    let anchor = TextPos { side: Side::Source, row: 0, col: 0 };
    app.selection = Some(TextSelection {
        anchor,
        head: TextPos { col: 4, ..anchor },
    });
    let buf = render_buffer(&mut app, 100, 30);
    let (x, y, _, _) = app.pane_areas[Side::Source.index()].expect("pane laid out");
    assert!(buf[(x, y)].modifier.contains(Modifier::REVERSED));
    assert!(buf[(x + 4, y)].modifier.contains(Modifier::REVERSED));
    assert!(!buf[(x + 5, y)].modifier.contains(Modifier::REVERSED));
}
