//! Day/time normalization and 30-minute bucketing.
//!
//! Heats may start at a finer grain (e.g. every 15 minutes) than the
//! 30-minute grid volunteers declare availability on. Every availability
//! lookup therefore floors the queried time to its containing half-hour
//! bucket: 10:37 falls in [10:30, 11:00) and matches a declared 10:30 slot.

use chrono::NaiveTime;

/// The four half-hour buckets spanning the protected lunch window.
pub const LUNCH_BUCKETS: [&str; 4] = ["12:00", "12:30", "13:00", "13:30"];

/// Normalized day string: lowercased, trimmed, inner whitespace collapsed.
pub fn norm_day(day: &str) -> String {
    day.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalized time-of-day: `H:MM` or `HH:MM` becomes zero-padded `HH:MM`.
/// Unparseable input is passed through lowercased; it will simply never
/// match a declared availability bucket.
pub fn norm_time(time: &str) -> String {
    let t = time.trim();
    match NaiveTime::parse_from_str(t, "%H:%M") {
        Ok(parsed) => parsed.format("%H:%M").to_string(),
        Err(_) => t.to_lowercase(),
    }
}

/// Floor a time to the `:00` or `:30` of its hour (10:37 -> 10:30).
pub fn bucket30(time: &str) -> String {
    let t = norm_time(time);
    match NaiveTime::parse_from_str(&t, "%H:%M") {
        Ok(parsed) => {
            use chrono::Timelike;
            let minute = if parsed.minute() < 30 { 0 } else { 30 };
            format!("{:02}:{:02}", parsed.hour(), minute)
        }
        Err(_) => t,
    }
}

/// The lunch bucket a time falls into, if any (12:00..13:59).
pub fn lunch_bucket(time: &str) -> Option<&'static str> {
    let b = bucket30(time);
    LUNCH_BUCKETS.iter().find(|&&lb| lb == b).copied()
}

/// A normalized exact (day, start) instant. Heats sharing a `SlotKey` form
/// one slot; a volunteer may hold at most one role across the whole slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub day: String,
    pub start: String,
}

impl SlotKey {
    pub fn new(day: &str, start: &str) -> Self {
        Self {
            day: norm_day(day),
            start: norm_time(start),
        }
    }

    /// True when either component is blank; such instants are excluded from
    /// scheduling scope.
    pub fn is_blank(&self) -> bool {
        self.day.is_empty() || self.start.is_empty()
    }

    /// The same instant floored to its 30-minute availability bucket.
    pub fn bucketed(&self) -> SlotKey {
        SlotKey {
            day: self.day.clone(),
            start: bucket30(&self.start),
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.day, self.start)
    }
}
