use super::*;
use crate::config::Config;
use bitext_core::content::demo_history;
use bitext_core::{
    Document, DocumentKind, MemoryHistory, Paragraph, ParagraphId, ParagraphKind, SelectionEvent,
};
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::Duration;
use tempfile::TempDir;

const SCREEN: Rect = Rect {
    x: 0,
    y: 0,
    width: 100,
    height: 14,
};

fn body(screen: Rect) -> Rect {
    Rect::new(screen.x, screen.y + 1, screen.width, screen.height - 2)
}

fn make_app() -> App {
    let viewer = Viewer::with_demo(Config::default().viewer_config());
    let history = MemoryHistory::with_entries(demo_history(unix_millis()), 30);
    let mut app = App::new(viewer, Box::new(history));
    app.clock = Clock::Manual(0);
    app.translation_delay = Duration::ZERO;
    app.layout(SCREEN, body(SCREEN));
    app
}

fn advance(app: &mut App, ms: Millis) {
    let now = app.now() + ms;
    app.clock = Clock::Manual(now);
    app.tick();
}

fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
    app.handle_mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    });
}

fn click(app: &mut App, column: u16, row: u16) {
    mouse(app, MouseEventKind::Down(MouseButton::Left), column, row);
    mouse(app, MouseEventKind::Up(MouseButton::Left), column, row);
}

/// Scroll `side` so paragraph `id` is on screen and return a cell inside it
fn reveal(app: &mut App, id: ParagraphId, side: Side) -> (u16, u16) {
    let mounted = app.mounted(id, side).expect("paragraph mounted");
    app.scroll_offsets[side.index()] = mounted.first_row.min(app.max_scroll(side));
    let (x, _, _, _) = app.pane_areas[side.index()].expect("pane laid out");
    let row = app.screen_row(side, mounted.first_row).expect("row visible");
    (x, row)
}

/// Cell of the first visible occurrence of `word` in `side`
fn find_word(app: &mut App, side: Side, word: &str) -> (u16, u16) {
    let row = app.layouts[side.index()]
        .lines
        .iter()
        .position(|line| line.text.contains(word))
        .expect("word in layout");
    let col = app.layouts[side.index()].lines[row].text.find(word).expect("word in row");
    app.scroll_offsets[side.index()] = row.min(app.max_scroll(side));
    let (x, _, _, _) = app.pane_areas[side.index()].expect("pane laid out");
    let screen_row = app.screen_row(side, row).expect("row visible");
    (x + col as u16 + 1, screen_row)
}

fn write_txt(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).expect("write upload");
    path
}

fn wait_for_translation(app: &mut App) {
    for _ in 0..500 {
        app.tick();
        if app.viewer.load_in_flight().is_none() {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("translation never finished");
}

#[test]
fn test_layout_registers_both_sides() {
    let app = make_app();
    let count = app.viewer.paragraphs().len();
    for side in Side::BOTH {
        assert_eq!(app.viewer.anchors().anchors(side).len(), count);
    }
    let source = app.mounted(5, Side::Source).expect("source mounted");
    let target = app.mounted(5, Side::Target).expect("target mounted");
    assert_eq!(source.paragraph_id, target.paragraph_id);
    assert_eq!(target.side, Side::Target);
}

#[test]
fn test_relayout_remounts_at_new_width() {
    let mut app = make_app();
    let wide_rows = app.layouts[Side::Source.index()].total_rows();
    let narrow = Rect::new(0, 0, 60, 14);
    app.layout(narrow, body(narrow));

    assert!(app.layouts[Side::Source.index()].total_rows() > wide_rows);
    let mounted = app.mounted(9, Side::Target).expect("remounted");
    assert_eq!(mounted.paragraph_id, 9);
    assert_eq!(
        app.viewer.anchors().anchors(Side::Target).len(),
        app.viewer.paragraphs().len()
    );
}

#[test]
fn test_click_centers_counterpart() {
    let mut app = make_app();
    let (x, row) = reveal(&mut app, 9, Side::Source);
    click(&mut app, x + 2, row);

    assert_eq!(app.viewer.active().get(), Some(9));
    let target = app.mounted(9, Side::Target).expect("target mounted");
    let half = app.visible_rows(Side::Target) / 2;
    let expected = target.center_row().saturating_sub(half).min(app.max_scroll(Side::Target));
    assert_eq!(app.scroll_offsets[Side::Target.index()], expected);
    assert_eq!(app.focus, Side::Source);
}

#[test]
fn test_click_from_translation_side() {
    let mut app = make_app();
    let (x, row) = reveal(&mut app, 13, Side::Target);
    app.scroll_offsets[Side::Source.index()] = 0;
    click(&mut app, x, row);

    assert_eq!(app.viewer.active().get(), Some(13));
    assert!(app.scroll_offsets[Side::Source.index()] > 0);
}

#[test]
fn test_click_on_heading_does_nothing() {
    let mut app = make_app();
    let (x, row) = reveal(&mut app, 8, Side::Source);
    let before = app.scroll_offsets;
    click(&mut app, x, row);
    assert_eq!(app.viewer.active().get(), None);
    assert_eq!(app.scroll_offsets[Side::Target.index()], before[Side::Target.index()]);
}

#[test]
fn test_sync_scroll_mirrors_and_suppresses_echo() {
    let mut app = make_app();
    app.toggle_sync_scroll();
    assert!(app.viewer.sync_scroll_enabled());

    app.scroll_pane(Side::Source, 6);
    let source_max = app.max_scroll(Side::Source) as f64;
    let target_max = app.max_scroll(Side::Target) as f64;
    let expected = (6.0 / source_max * target_max).round() as usize;
    assert_eq!(app.scroll_offsets[Side::Target.index()], expected);
    // The mirrored write into the target did not bounce back
    assert_eq!(app.scroll_offsets[Side::Source.index()], 6);

    advance(&mut app, 1_000);
    app.scroll_pane(Side::Target, -(expected as isize));
    assert_eq!(app.scroll_offsets[Side::Target.index()], 0);
    assert_eq!(app.scroll_offsets[Side::Source.index()], 0);
}

#[test]
fn test_sync_scroll_off_scrolls_one_pane() {
    let mut app = make_app();
    app.scroll_pane(Side::Source, 4);
    assert_eq!(app.scroll_offsets, [4, 0]);
}

#[test]
fn test_wheel_scrolls_pane_under_pointer() {
    let mut app = make_app();
    let (x, y, _, _) = app.pane_areas[Side::Target.index()].expect("pane laid out");
    mouse(&mut app, MouseEventKind::ScrollDown, x + 1, y + 1);
    assert_eq!(app.scroll_offsets[Side::Target.index()], app.lines_per_tick);
    assert_eq!(app.scroll_offsets[Side::Source.index()], 0);
}

#[test]
fn test_divider_drag_clamps_split() {
    let mut app = make_app();
    let (x, y, _, _) = app.divider_area.expect("divider laid out");

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), x, y + 2);
    assert!(app.viewer.split().is_dragging());

    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 0, y + 2);
    assert_eq!(app.viewer.split().left_percent(), 20.0);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 99, y + 2);
    assert_eq!(app.viewer.split().left_percent(), 80.0);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 30, y + 2);
    assert_eq!(app.viewer.split().left_percent(), 30.0);

    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 30, y + 2);
    assert!(!app.viewer.split().is_dragging());
    assert!(app.selection.is_none());
}

#[test]
fn test_nudge_split_stays_in_range() {
    let mut app = make_app();
    for _ in 0..20 {
        app.nudge_split(true);
    }
    assert_eq!(app.viewer.split().left_percent(), 80.0);
    for _ in 0..20 {
        app.nudge_split(false);
    }
    assert_eq!(app.viewer.split().left_percent(), 20.0);
}

#[test]
fn test_right_click_looks_up_word() {
    let mut app = make_app();
    let (column, row) = find_word(&mut app, Side::Source, "The transformer");
    let column = column + 4;
    app.lookup_word_at(column, row);

    let payload = app.viewer.tooltip().payload().expect("tooltip shown");
    assert_eq!(payload.word, "transformer");
    assert!(payload.translation.contains("Transformer"));
    assert!(app.viewer.tooltip().placement().is_some());
}

#[test]
fn test_drag_selection_looks_up_phrase() {
    let mut app = make_app();
    let (column, row) = find_word(&mut app, Side::Source, "The transformer");
    let start = column + 4;
    let end = start + "transformer".len() as u16 - 1;
    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), start + 2, row);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), end - 2, row);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), end - 2, row);

    let payload = app.viewer.tooltip().payload().expect("tooltip shown");
    assert_eq!(payload.word, "transformer");
    // Dragging inside a word is not a click: nothing is navigated
    assert_eq!(app.viewer.active().get(), None);
}

#[test]
fn test_selection_event_snaps_to_words() {
    let mut app = make_app();
    let (column, row) = find_word(&mut app, Side::Source, "The transformer");
    let pos = app.text_pos_at(column, row).expect("on text");
    let selection = TextSelection {
        anchor: TextPos { col: pos.col + 1, ..pos },
        head: TextPos { col: pos.col + 6, ..pos },
    };
    let event = app.selection_event(&selection);
    assert_eq!(event.text, "The transformer");
    assert_eq!(event.side, Some(Side::Source));
    assert!(event.paragraph_id.is_some());
}

#[test]
fn test_lookup_disabled_shows_nothing() {
    let mut app = make_app();
    app.toggle_word_lookup();
    let (column, row) = find_word(&mut app, Side::Source, "The transformer");
    app.lookup_word_at(column + 4, row);
    assert!(app.viewer.tooltip().payload().is_none());
}

#[test]
fn test_pending_translation_rejects_lookup_and_clicks() {
    let mut app = make_app();
    let doc = Document::new(
        DocumentId::new("doc-1"),
        "notes.txt",
        DocumentKind::Txt,
        40,
        vec![
            Paragraph::pending(1, ParagraphKind::Body, "A first paragraph of text"),
            Paragraph::pending(2, ParagraphKind::Body, "A second paragraph of text"),
        ],
    );
    app.viewer.begin_load(0, doc);
    app.layout(SCREEN, body(SCREEN));

    let (x, y, _, _) = app.pane_areas[Side::Target.index()].expect("pane laid out");
    assert!(app.layouts[Side::Target.index()].lines[0].pending);
    app.lookup_word_at(x + 1, y);
    assert!(app.viewer.tooltip().payload().is_none());

    click(&mut app, x + 1, y);
    assert_eq!(app.viewer.active().get(), None);
    assert_eq!(app.status.as_deref(), Some("Translation in progress"));
}

#[test]
fn test_open_path_translates_in_background() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_txt(
        &dir,
        "notes.txt",
        "The first paragraph talks about attention.\n\nThe second paragraph is about tokens.",
    );
    let mut app = make_app();
    app.open_path(&path).expect("open");

    let doc = app.viewer.document().expect("document shown");
    assert_eq!(doc.display_name, "notes.txt");
    assert_eq!(doc.pending_count(), 2);
    assert!(app.viewer.progress().is_in_progress());
    assert!(app.history.list().iter().any(|entry| entry.name == "notes.txt"));

    wait_for_translation(&mut app);
    let doc = app.viewer.document().expect("document shown");
    assert_eq!(doc.pending_count(), 0);
    assert!(!app.viewer.progress().is_in_progress());
    assert_eq!(app.status.as_deref(), Some("Translation complete"));
}

#[test]
fn test_superseded_load_result_is_dropped() {
    let dir = TempDir::new().expect("tempdir");
    let first = write_txt(&dir, "first.txt", "Paragraph from the first upload.");
    let second = write_txt(&dir, "second.txt", "Paragraph from the second upload.");
    let mut app = make_app();

    app.open_path(&first).expect("open first");
    let first_id = app.viewer.store().current_id().cloned().expect("first shown");
    std::thread::sleep(Duration::from_millis(3));
    app.open_path(&second).expect("open second");
    wait_for_translation(&mut app);

    let shown = app.viewer.document().expect("document shown");
    assert_eq!(shown.display_name, "second.txt");
    assert_eq!(shown.pending_count(), 0);
    let stale = app.viewer.store().get(&first_id).expect("first kept");
    assert_eq!(stale.pending_count(), 1);
}

#[test]
fn test_open_path_unsupported_type_keeps_document() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_txt(&dir, "table.csv", "a,b,c");
    let mut app = make_app();
    assert!(app.open_path(&path).is_err());
    assert_eq!(app.viewer.document().map(|d| d.id.as_str()), Some("demo-llm-2024"));
}

#[test]
fn test_open_path_unreadable_opens_unavailable_document() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("notes.txt");
    std::fs::create_dir(&path).expect("mkdir");
    let mut app = make_app();
    app.open_path(&path).expect("unreadable upload is not an error");

    let doc = app.viewer.document().expect("document shown");
    assert_ne!(doc.id.as_str(), "demo-llm-2024");
    assert_eq!(doc.display_name, "notes.txt");
    assert_eq!(doc.paragraph_count, 1);
    assert_eq!(doc.pending_count(), 0);
    assert!(doc.paragraphs[0].source_text.contains("no longer in memory"));
    assert!(app.status.as_deref().is_some_and(|s| s.starts_with("Cannot read notes.txt")));
}

#[test]
fn test_open_path_missing_file_opens_unavailable_document() {
    let dir = TempDir::new().expect("tempdir");
    let mut app = make_app();
    app.open_path(&dir.path().join("absent.txt")).expect("missing upload is not an error");
    let doc = app.viewer.document().expect("document shown");
    assert_eq!(doc.display_name, "absent.txt");
    assert_eq!(doc.paragraph_count, 1);
}

#[test]
fn test_reload_without_cli_file() {
    let mut app = make_app();
    app.reload_cli_file();
    assert_eq!(app.status.as_deref(), Some("No file given on the command line"));
}

#[test]
fn test_history_navigation_and_open() {
    let mut app = make_app();
    app.toggle_history();
    assert_eq!(app.overlay, Overlay::History);
    let selected = app.selected_history_entry().map(|i| app.history.list()[i].id.clone());
    assert_eq!(selected, Some(DocumentId::new("demo-llm-2024")));

    app.move_history_selection(true);
    app.open_selected_history_entry();
    assert_eq!(app.overlay, Overlay::None);
    assert_eq!(app.viewer.store().current_id(), Some(&DocumentId::new("demo-transformer")));
    assert_eq!(app.viewer.paragraphs().len(), bitext_core::content::stand_in_article().len());
}

#[test]
fn test_history_filter_and_remove() {
    let mut app = make_app();
    app.toggle_history();
    app.start_history_filter();
    for c in "NLP".chars() {
        app.push_history_filter(c);
    }
    let idx = app.selected_history_entry().expect("match");
    assert_eq!(app.history.list()[idx].name, "introduction_to_nlp.txt");

    let before = app.history.list().len();
    app.remove_selected_history_entry();
    assert_eq!(app.history.list().len(), before - 1);
    assert!(app.selected_history_entry().is_none());

    app.pop_history_filter();
    app.pop_history_filter();
    app.pop_history_filter();
    assert!(app.selected_history_entry().is_some());
}

#[test]
fn test_history_click_outside_closes() {
    let mut app = make_app();
    app.toggle_history();
    app.history_area = Some((0, 0, 40, 14));
    app.mouse_down(90, 5);
    assert_eq!(app.overlay, Overlay::None);
}

#[test]
fn test_export_writes_file() {
    let dir = TempDir::new().expect("tempdir");
    let mut app = make_app();
    app.export_dir = dir.path().join("out");
    app.cycle_export_format();
    app.cycle_export_format();
    app.toggle_export();
    app.confirm_export();

    let path = dir.path().join("out").join("large_language_models_translation.md");
    let contents = std::fs::read_to_string(&path).expect("exported file");
    assert!(contents.contains("Large Language Models"));
    assert!(contents.contains("大语言模型"));
    assert_eq!(app.overlay, Overlay::None);
    assert!(app.status.as_deref().unwrap_or("").starts_with("Exported to"));
}

#[test]
fn test_export_translation_only() {
    let dir = TempDir::new().expect("tempdir");
    let mut app = make_app();
    app.export_dir = dir.path().to_path_buf();
    app.cycle_export_content();
    let path = app.write_export().expect("export");
    let contents = std::fs::read_to_string(path).expect("exported file");
    assert!(contents.contains("大语言模型"));
    assert!(!contents.contains("Positional encodings inject order information"));
}

#[test]
fn test_step_paragraph_walks_navigable_paragraphs() {
    let mut app = make_app();
    app.step_paragraph(true);
    assert_eq!(app.viewer.active().get(), Some(5));
    app.step_paragraph(true);
    assert_eq!(app.viewer.active().get(), Some(9));
    app.step_paragraph(false);
    assert_eq!(app.viewer.active().get(), Some(5));
    app.step_paragraph(false);
    assert_eq!(app.viewer.active().get(), Some(5));

    for _ in 0..20 {
        app.step_paragraph(true);
    }
    let last = app.viewer.paragraphs().iter().filter(|p| p.is_navigable()).map(|p| p.id).last();
    assert_eq!(app.viewer.active().get(), last);
}

#[test]
fn test_step_paragraph_leaves_busy_pane_alone() {
    let mut app = make_app();
    let paragraphs = (1..=20)
        .map(|id| {
            let text = format!("Paragraph number {id} of the notes");
            Paragraph::pending(id, ParagraphKind::Body, text)
        })
        .collect();
    let doc = Document::new(
        DocumentId::new("doc-1"),
        "notes.txt",
        DocumentKind::Txt,
        400,
        paragraphs,
    );
    app.viewer.begin_load(0, doc);
    app.layout(SCREEN, body(SCREEN));

    app.focus = Side::Target;
    let bottom = app.max_scroll(Side::Target);
    assert!(bottom > 0);
    app.scroll_offsets[Side::Target.index()] = bottom;

    app.step_paragraph(true);
    assert_eq!(app.scroll_offsets[Side::Target.index()], bottom);
    assert_eq!(app.viewer.active().get(), None);
    assert_eq!(app.status.as_deref(), Some("Translation in progress"));
}

#[test]
fn test_dismiss_closes_innermost_first() {
    let mut app = make_app();
    let anchor = TextPos { side: Side::Source, row: 0, col: 0 };
    app.selection = Some(TextSelection {
        anchor,
        head: TextPos { col: 3, ..anchor },
    });
    let event = SelectionEvent::new("attention", bitext_core::Rect::new(10.0, 8.0, 9.0, 1.0));
    let viewport = app.viewport();
    assert!(app.viewer.selection_complete(0, 99, &event, viewport));

    assert!(app.dismiss());
    assert!(app.viewer.tooltip().payload().is_none());
    assert!(app.selection.is_some());
    assert!(app.dismiss());
    assert!(app.selection.is_none());
    assert!(!app.dismiss());

    app.toggle_history();
    app.start_history_filter();
    assert!(app.dismiss());
    assert_eq!(app.overlay, Overlay::History);
    assert!(app.dismiss());
    assert_eq!(app.overlay, Overlay::None);
}

#[test]
fn test_tooltip_closes_on_outside_click_once_armed() {
    let mut app = make_app();
    let (column, row) = find_word(&mut app, Side::Source, "The transformer");
    app.lookup_word_at(column + 4, row);
    assert!(app.viewer.tooltip().payload().is_some());

    advance(&mut app, 1_000);
    assert!(app.viewer.tooltip().is_armed());
    let placement = *app.viewer.tooltip().placement().expect("placed");
    assert!(placement.rect.right() < 99.0);
    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 99, 5);
    assert!(app.viewer.tooltip().payload().is_none());
}

#[test]
fn test_opening_overlay_closes_tooltip() {
    let mut app = make_app();
    let (column, row) = find_word(&mut app, Side::Source, "The transformer");
    app.lookup_word_at(column + 4, row);
    app.toggle_help();
    assert!(app.viewer.tooltip().payload().is_none());
    app.toggle_help();
    assert_eq!(app.overlay, Overlay::None);
}

#[test]
fn test_new_document_resets_scroll() {
    let mut app = make_app();
    app.scroll_pane(Side::Source, 5);
    let summary = app.history.list()[2].clone();
    app.viewer.open_summary(&summary);
    app.layout(SCREEN, body(SCREEN));
    assert_eq!(app.scroll_offsets, [0, 0]);
}
