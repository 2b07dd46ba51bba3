use std::io::Write;
use std::process::{Command, Stdio};
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Wall clock in unix milliseconds, for history timestamps and ids
pub(crate) fn unix_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Wrap `text` to `width` columns, breaking at word boundaries.
///
/// Words wider than a line are broken between graphemes. Always returns at
/// least one row.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for raw in text.lines() {
        let raw = raw.replace('\t', " ");
        let mut line = String::new();
        let mut line_width = 0;
        for segment in raw.split_word_bounds() {
            let seg_width = segment.width();
            if segment.trim().is_empty() {
                if line_width == 0 {
                    continue;
                }
                if line_width + seg_width > width {
                    rows.push(std::mem::take(&mut line).trim_end().to_string());
                    line_width = 0;
                    continue;
                }
                line.push_str(segment);
                line_width += seg_width;
                continue;
            }
            if line_width > 0 && line_width + seg_width > width {
                rows.push(std::mem::take(&mut line).trim_end().to_string());
                line_width = 0;
            }
            if seg_width <= width {
                line.push_str(segment);
                line_width += seg_width;
                continue;
            }
            for grapheme in segment.graphemes(true) {
                let g_width = grapheme.width();
                if line_width > 0 && line_width + g_width > width {
                    rows.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push_str(grapheme);
                line_width += g_width;
            }
        }
        if !line.is_empty() {
            rows.push(line.trim_end().to_string());
        }
    }
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

/// Byte offset of the grapheme covering display column `col`, or the
/// string length when `col` is past the end
fn byte_at_col(text: &str, col: usize) -> usize {
    let mut at = 0;
    for (idx, grapheme) in text.grapheme_indices(true) {
        let w = grapheme.width();
        if col < at + w.max(1) {
            return idx;
        }
        at += w;
    }
    text.len()
}

/// Text covering columns `from..to` of a row
pub(crate) fn slice_cols(text: &str, from: usize, to: usize) -> &str {
    if to <= from {
        return "";
    }
    let start = byte_at_col(text, from);
    let end = byte_at_col(text, to);
    &text[start..end.max(start)]
}

fn is_word(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

/// Word under display column `col`: (start column, end column, text)
pub(crate) fn word_at(text: &str, col: usize) -> Option<(usize, usize, &str)> {
    let mut at = 0;
    for segment in text.split_word_bounds() {
        let w = segment.width();
        if col < at + w {
            return is_word(segment).then_some((at, at + w, segment));
        }
        at += w;
    }
    None
}

/// Join wrapped rows back into running text: wide scripts join directly,
/// everything else with a space
pub(crate) fn join_rows(rows: &[&str]) -> String {
    let mut out = String::new();
    for row in rows.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
        let glue = match (out.chars().last(), row.chars().next()) {
            (Some(a), Some(b)) if is_wide(a) && is_wide(b) => "",
            (Some(_), _) => " ",
            (None, _) => "",
        };
        out.push_str(glue);
        out.push_str(row);
    }
    out
}

fn is_wide(c: char) -> bool {
    unicode_width::UnicodeWidthChar::width(c) == Some(2)
}

pub(crate) fn copy_to_clipboard(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    #[cfg(target_os = "macos")]
    {
        write_to_clipboard_cmd("pbcopy", &[], text)
    }
    #[cfg(target_os = "linux")]
    {
        if write_to_clipboard_cmd("wl-copy", &["--type", "text/plain"], text) {
            return true;
        }
        if write_to_clipboard_cmd("xclip", &["-selection", "clipboard"], text) {
            return true;
        }
        write_to_clipboard_cmd("xsel", &["--clipboard", "--input"], text)
    }
    #[cfg(target_os = "windows")]
    {
        write_to_clipboard_cmd("clip", &[], text)
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        false
    }
}

fn write_to_clipboard_cmd(cmd: &str, args: &[&str], text: &str) -> bool {
    let mut child = match Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(_) => return false,
    };
    if let Some(mut stdin) = child.stdin.take() {
        if stdin.write_all(text.as_bytes()).is_err() {
            return false;
        }
    }
    child.wait().map(|status| status.success()).unwrap_or(false)
}
