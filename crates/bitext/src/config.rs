//! Configuration file support for bitext
//!
//! Config file location: `~/.config/bitext/config.toml` (XDG_CONFIG_HOME)
//!
//! Example config:
//! ```toml
//! [ui]
//! sync_scroll = true
//! word_lookup = true
//! split_percent = 55
//! pending_placeholder = "Translating…"
//!
//! [lookup]
//! max_selection_chars = 80
//! max_unmatched_tokens = 4
//! not_found_marker = "(not in dictionary)"
//! dictionary = "~/.config/bitext/glossary.json"
//! tooltip_width = 40
//! tooltip_height = 8
//! arm_delay_ms = 100
//!
//! [scroll]
//! guard_window_ms = 50
//! lines_per_tick = 3
//!
//! [progress]
//! simulated_delay_ms = 1800
//! checkpoints = [
//!   { at_ms = 0, percent = 5 },
//!   { at_ms = 200, percent = 40 },
//! ]
//!
//! [history]
//! max_entries = 30
//!
//! [export]
//! format = "md"
//! content = "bilingual"
//! dir = "~/Documents"
//! ```

use bitext_core::history::MAX_HISTORY_ENTRIES;
use bitext_core::progress::DEFAULT_SETTLE_DELAY_MS;
use bitext_core::scroll_sync::DEFAULT_GUARD_WINDOW_MS;
use bitext_core::split::DEFAULT_SPLIT_PERCENT;
use bitext_core::tooltip::DEFAULT_ARM_DELAY_MS;
use bitext_core::{
    Checkpoint, ContentMode, ExportFormat, LookupPolicy, ProgressSchedule, TooltipGeometry,
    ViewerConfig,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// UI configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Start with scroll sync on
    pub sync_scroll: bool,
    /// Start with word lookup on
    pub word_lookup: bool,
    /// Initial width of the source pane in percent (clamped to 20..=80)
    pub split_percent: f64,
    /// Shown in the translation pane for paragraphs still being translated
    pub pending_placeholder: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sync_scroll: false,
            word_lookup: true,
            split_percent: DEFAULT_SPLIT_PERCENT,
            pending_placeholder: "Translating…".to_string(),
        }
    }
}

/// Word lookup configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub max_selection_chars: usize,
    pub max_unmatched_tokens: usize,
    pub not_found_marker: String,
    /// Extra JSON dictionary merged over the built-in glossary
    pub dictionary: Option<PathBuf>,
    /// Tooltip size in cells
    pub tooltip_width: u16,
    pub tooltip_height: u16,
    /// Delay before a click outside the tooltip closes it
    pub arm_delay_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        let policy = LookupPolicy::default();
        Self {
            max_selection_chars: policy.max_selection_chars,
            max_unmatched_tokens: policy.max_unmatched_tokens,
            not_found_marker: policy.not_found_marker,
            dictionary: None,
            tooltip_width: 40,
            tooltip_height: 8,
            arm_delay_ms: DEFAULT_ARM_DELAY_MS,
        }
    }
}

/// Scrolling configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// How long a mirrored write suppresses scroll events from its pane
    pub guard_window_ms: u64,
    /// Rows moved per mouse wheel notch
    pub lines_per_tick: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            guard_window_ms: DEFAULT_GUARD_WINDOW_MS,
            lines_per_tick: 3,
        }
    }
}

/// Translation progress configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Progress checkpoints, relative to the start of a load
    pub checkpoints: Vec<Checkpoint>,
    /// How long the demo translator takes to finish
    pub simulated_delay_ms: u64,
    /// How long 100% stays visible before the gauge hides
    pub settle_delay_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            checkpoints: ProgressSchedule::default().checkpoints().to_vec(),
            simulated_delay_ms: 1_800,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

/// History configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// History file (defaults to the platform data dir)
    pub path: Option<PathBuf>,
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_entries: MAX_HISTORY_ENTRIES,
        }
    }
}

/// Export configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub content: ContentMode,
    /// Output directory (defaults to the working directory)
    pub dir: Option<PathBuf>,
}

/// Root configuration
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub lookup: LookupConfig,
    pub scroll: ScrollConfig,
    pub progress: ProgressConfig,
    pub history: HistoryConfig,
    pub export: ExportConfig,
}

impl Config {
    /// Get all possible config file paths in priority order
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("bitext").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("bitext").join("config.toml"));
        }

        // ~/Library/Application Support on macOS
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("bitext").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Get the first existing config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|p| p.exists())
    }

    /// Load config from the first existing config path.
    /// Returns default config if the file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    fn load_from(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
            .map_err(|e| {
                warn!(path = %path.display(), error = %e, "failed to parse config");
                eprintln!("Warning: Failed to parse config: {}", e);
                e
            })
            .ok()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Default location of the history file
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history
            .path
            .as_deref()
            .map(expand_home)
            .or_else(|| dirs::data_dir().map(|d| d.join("bitext").join("history.json")))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export
            .dir
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn dictionary_path(&self) -> Option<PathBuf> {
        self.lookup.dictionary.as_deref().map(expand_home)
    }

    /// Settings for the core viewer
    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            sync_scroll: self.ui.sync_scroll,
            word_lookup: self.ui.word_lookup,
            split_percent: self.ui.split_percent,
            guard_window_ms: self.scroll.guard_window_ms,
            lookup_policy: LookupPolicy {
                max_selection_chars: self.lookup.max_selection_chars,
                max_unmatched_tokens: self.lookup.max_unmatched_tokens,
                not_found_marker: self.lookup.not_found_marker.clone(),
            },
            tooltip_geometry: self.tooltip_geometry(),
            arm_delay_ms: self.lookup.arm_delay_ms,
            progress_schedule: ProgressSchedule::new(self.progress.checkpoints.clone()),
            settle_delay_ms: self.progress.settle_delay_ms,
        }
    }

    /// Tooltip geometry in terminal cells
    pub fn tooltip_geometry(&self) -> TooltipGeometry {
        TooltipGeometry {
            width: f64::from(self.lookup.tooltip_width.max(12)),
            height: f64::from(self.lookup.tooltip_height.max(4)),
            gap_above: 0.0,
            offset_below: 1.0,
            margin: 1.0,
        }
    }
}

/// Expand a leading `~/`
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitext_core::progress::MAX_PENDING_PERCENT;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(!config.ui.sync_scroll);
        assert!(config.ui.word_lookup);
        assert_eq!(config.lookup.max_selection_chars, 80);
        assert_eq!(config.scroll.guard_window_ms, 50);
        assert_eq!(config.history.max_entries, 30);
        assert_eq!(config.export.format, ExportFormat::Txt);
        assert_eq!(config.progress.checkpoints.len(), 4);
    }

    #[test]
    fn test_sections_parse() {
        let config = Config::parse(
            r#"
            [ui]
            sync_scroll = true
            split_percent = 65.0

            [lookup]
            max_unmatched_tokens = 2
            not_found_marker = "?"

            [progress]
            checkpoints = [{ at_ms = 0, percent = 10 }, { at_ms = 300, percent = 95 }]

            [export]
            format = "html"
            content = "translation"
            "#,
        )
        .unwrap();
        assert!(config.ui.sync_scroll);
        let viewer = config.viewer_config();
        assert_eq!(viewer.split_percent, 65.0);
        assert_eq!(viewer.lookup_policy.max_unmatched_tokens, 2);
        assert_eq!(viewer.lookup_policy.not_found_marker, "?");
        assert_eq!(viewer.progress_schedule.checkpoints()[1].percent, MAX_PENDING_PERCENT);
        assert_eq!(config.export.format, ExportFormat::Html);
        assert_eq!(config.export.content, ContentMode::TranslationOnly);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(Config::parse("[ui]\nsync_scroll = \"yes\"").is_err());
    }

    #[test]
    fn test_tooltip_geometry_has_floor() {
        let config = Config::parse("[lookup]\ntooltip_width = 2\ntooltip_height = 1").unwrap();
        let geometry = config.tooltip_geometry();
        assert_eq!(geometry.width, 12.0);
        assert_eq!(geometry.height, 4.0);
    }

    #[test]
    fn test_expand_home() {
        let plain = Path::new("/tmp/x.json");
        assert_eq!(expand_home(plain), PathBuf::from("/tmp/x.json"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/a/b")), home.join("a/b"));
        }
    }
}
