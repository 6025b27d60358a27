#![forbid(unsafe_code)]

//! Append-only comment logs.
//!
//! A log cell holds zero or more entries, oldest first, joined by a separator
//! line. Each entry reads `* <YYYY-MM-DD HH:MM>: <text>` with a UTC timestamp.
//! Entries are only ever appended; existing text is carried over byte for byte.

use time::OffsetDateTime;
use time::macros::format_description;

pub const ENTRY_MARKER: &str = "*";
pub const ENTRY_SEPARATOR: &str = "----------";

pub fn format_timestamp(now: OffsetDateTime) -> String {
    now.to_offset(time::UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_else(|_| "1970-01-01 00:00".to_string())
}

pub fn format_entry(text: &str, now: OffsetDateTime) -> String {
    format!("{ENTRY_MARKER} {}: {}", format_timestamp(now), text.trim())
}

/// Appends `new_text` to `existing_log`. Blank input returns the log unchanged.
pub fn append_entry(existing_log: &str, new_text: &str, now: OffsetDateTime) -> String {
    if new_text.trim().is_empty() {
        return existing_log.to_string();
    }
    let entry = format_entry(new_text, now);
    if existing_log.is_empty() {
        return entry;
    }
    format!("{existing_log}\n{ENTRY_SEPARATOR}\n{entry}")
}
