use time::format_description::{parse_owned, OwnedFormatItem};
use time::OffsetDateTime;

const DATE_FORMAT: &str = "[year]-[month]-[day]";

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Date buckets used by the history sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGroup {
    Today,
    Yesterday,
    LastWeek,
    Older,
}

impl DateGroup {
    pub const ALL: [DateGroup; 4] = [
        DateGroup::Today,
        DateGroup::Yesterday,
        DateGroup::LastWeek,
        DateGroup::Older,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DateGroup::Today => "Today",
            DateGroup::Yesterday => "Yesterday",
            DateGroup::LastWeek => "Last 7 days",
            DateGroup::Older => "Older",
        }
    }

    /// Bucket `millis` relative to UTC midnight of `now_millis`
    pub fn of(millis: i64, now_millis: i64) -> Self {
        let today = now_millis - now_millis.rem_euclid(DAY_MS);
        if millis >= today {
            DateGroup::Today
        } else if millis >= today - DAY_MS {
            DateGroup::Yesterday
        } else if millis >= today - 7 * DAY_MS {
            DateGroup::LastWeek
        } else {
            DateGroup::Older
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimeFormatter {
    date_format: OwnedFormatItem,
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeFormatter {
    pub fn new() -> Self {
        let date_format = parse_owned::<2>(DATE_FORMAT).expect("default date format should parse");
        Self { date_format }
    }

    /// `2024-05-01` for a unix timestamp in milliseconds
    pub fn date(&self, millis: i64) -> String {
        OffsetDateTime::from_unix_timestamp(millis.div_euclid(1000))
            .ok()
            .and_then(|dt| dt.format(&self.date_format).ok())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Short age for history entries; falls back to the date after a week
    pub fn relative(&self, millis: i64, now_millis: i64) -> String {
        match format_relative_age(millis, now_millis) {
            Some(age) => age,
            None => self.date(millis),
        }
    }
}

/// `None` once the age reaches a week
pub fn format_relative_age(millis: i64, now_millis: i64) -> Option<String> {
    let age = now_millis.saturating_sub(millis);
    let text = if age < MINUTE_MS {
        "just now".to_string()
    } else if age < HOUR_MS {
        format!("{} min ago", age / MINUTE_MS)
    } else if age < DAY_MS {
        format!("{} h ago", age / HOUR_MS)
    } else if age < 2 * DAY_MS {
        "yesterday".to_string()
    } else if age < 7 * DAY_MS {
        format!("{} days ago", age / DAY_MS)
    } else {
        return None;
    };
    Some(text)
}
