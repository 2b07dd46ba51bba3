//! bitext - side-by-side bilingual document viewer TUI

mod app;
mod config;
mod logging;
mod time_format;
mod ui;
mod views;

use anyhow::Result;
use app::{unix_millis, App, Overlay};
use bitext_core::{content, Dictionary, HistoryStore, JsonHistory, MemoryHistory, Viewer};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "bitext")]
#[command(author, version, about = "A side-by-side bilingual document viewer")]
struct Args {
    /// Document to open: .txt, .pdf or .docx
    file: Option<PathBuf>,

    /// Start with scroll sync on
    #[arg(long)]
    sync: bool,

    /// Start with word lookup off
    #[arg(long)]
    no_lookup: bool,

    /// Width of the source pane in percent (20-80)
    #[arg(long, value_name = "PCT")]
    split: Option<f64>,

    /// Log file (default: <data dir>/bitext/bitext.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn open_history(config: &config::Config) -> Box<dyn HistoryStore> {
    let demos = content::demo_history(unix_millis());
    let cap = config.history.max_entries;
    let Some(path) = config.history_path() else {
        return Box::new(MemoryHistory::with_entries(demos, cap));
    };
    match JsonHistory::open(&path, cap, demos.clone()) {
        Ok(history) => Box::new(history),
        Err(err) => {
            warn!(path = %path.display(), %err, "history unavailable, keeping it in memory");
            eprintln!("Warning: Failed to read history {}: {}", path.display(), err);
            Box::new(MemoryHistory::with_entries(demos, cap))
        }
    }
}

fn build_viewer(args: &Args, config: &config::Config) -> Viewer {
    let mut viewer_config = config.viewer_config();
    if args.sync {
        viewer_config.sync_scroll = true;
    }
    if args.no_lookup {
        viewer_config.word_lookup = false;
    }
    if let Some(split) = args.split {
        viewer_config.split_percent = split;
    }

    let mut viewer = Viewer::with_demo(viewer_config);
    if let Some(path) = config.dictionary_path() {
        match Dictionary::load(&path) {
            Ok(extra) => {
                let mut dictionary = Dictionary::builtin();
                dictionary.merge(extra);
                info!(path = %path.display(), entries = dictionary.len(), "dictionary loaded");
                viewer.set_lookup(Box::new(dictionary));
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "dictionary not loaded");
                eprintln!("Warning: Failed to load dictionary {}: {}", path.display(), err);
            }
        }
    }
    viewer
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(err) = logging::init(args.log_file.as_deref()) {
        eprintln!("Warning: {err:#}");
    }

    let config = config::Config::load();

    let viewer = build_viewer(&args, &config);
    let history = open_history(&config);

    // Create app
    let mut app = App::new(viewer, history);
    app.pending_placeholder = config.ui.pending_placeholder.clone();
    app.lines_per_tick = config.scroll.lines_per_tick;
    app.translation_delay = Duration::from_millis(config.progress.simulated_delay_ms);
    app.export_dir = config.export_dir();
    app.export_format = config.export.format;
    app.export_content = config.export.content;
    app.cli_file = args.file.clone();

    if let Some(path) = &args.file {
        if let Err(err) = app.open_path(path) {
            warn!(path = %path.display(), %err, "file not opened");
            app.set_status(format!("Cannot open {}: {err}", path.display()));
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(16);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Mouse(me) => app.handle_mouse(me),
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
                _ => {}
            }
        }

        // Deferred work: translation results, progress, guards, tooltip arming
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if app.overlay == Overlay::History && app.history_filter_active {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => app.history_filter_active = false,
            KeyCode::Backspace => app.pop_history_filter(),
            KeyCode::Char(c) => app.push_history_filter(c),
            _ => {}
        }
        return;
    }

    match app.overlay {
        Overlay::History => match key.code {
            KeyCode::Down | KeyCode::Char('j') => app.move_history_selection(true),
            KeyCode::Up | KeyCode::Char('k') => app.move_history_selection(false),
            KeyCode::Enter => app.open_selected_history_entry(),
            KeyCode::Delete | KeyCode::Char('d') => app.remove_selected_history_entry(),
            KeyCode::Char('/') => app.start_history_filter(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => app.toggle_history(),
            _ => {}
        },
        Overlay::Export => match key.code {
            KeyCode::Tab | KeyCode::Char('f') => app.cycle_export_format(),
            KeyCode::Char('c') => app.cycle_export_content(),
            KeyCode::Enter => app.confirm_export(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => app.toggle_export(),
            _ => {}
        },
        Overlay::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                app.toggle_help();
            }
        }
        Overlay::None => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Esc => {
                app.dismiss();
            }
            KeyCode::Down | KeyCode::Char('j') => app.scroll_focused(1),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_focused(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => app.page_focused(true),
            KeyCode::PageUp => app.page_focused(false),
            KeyCode::Home | KeyCode::Char('g') => app.scroll_focused_to_end(false),
            KeyCode::End | KeyCode::Char('G') => app.scroll_focused_to_end(true),
            KeyCode::Char(']') => app.step_paragraph(true),
            KeyCode::Char('[') => app.step_paragraph(false),
            KeyCode::Tab => app.toggle_focus(),
            KeyCode::Char('<') => app.nudge_split(false),
            KeyCode::Char('>') => app.nudge_split(true),
            KeyCode::Char('s') => app.toggle_sync_scroll(),
            KeyCode::Char('w') => app.toggle_word_lookup(),
            KeyCode::Char('h') => app.toggle_history(),
            KeyCode::Char('e') => app.toggle_export(),
            KeyCode::Char('r') => app.reload_cli_file(),
            KeyCode::Char('y') => app.yank_active_paragraph(),
            KeyCode::Char('?') => app.toggle_help(),
            _ => {}
        },
    }
}
