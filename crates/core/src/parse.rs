#![forbid(unsafe_code)]

//! Lenient numeric and date parsing for values edited by hand upstream.
//!
//! Malformed input never fails: numbers fall back to zero and dates to `None`,
//! so one bad cell cannot block an edit of the rest of the table.

use crate::table::Cell;
use time::Date;
use time::macros::format_description;

pub const PROGRESS_MIN: i64 = 0;
pub const PROGRESS_MAX: i64 = 100;

fn numeric_text(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('%', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    let value = cleaned.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

pub fn safe_float(cell: &Cell) -> f64 {
    match cell {
        Cell::Empty => 0.0,
        Cell::Int(v) => *v as f64,
        Cell::Float(v) if v.is_finite() => *v,
        Cell::Float(_) => 0.0,
        Cell::Text(raw) => numeric_text(raw).unwrap_or(0.0),
    }
}

/// Parses through a float first, so `"40.9"` and `"40%"` both yield `40`.
pub fn safe_int(cell: &Cell) -> i64 {
    match cell {
        Cell::Int(v) => *v,
        other => safe_float(other).trunc() as i64,
    }
}

pub fn clamp_progress(cell: &Cell) -> u8 {
    safe_int(cell).clamp(PROGRESS_MIN, PROGRESS_MAX) as u8
}

/// Accepts `YYYY-MM-DD` and `YYYY/MM/DD`, optionally followed by a time part.
pub fn parse_date(raw: &str) -> Option<Date> {
    let date_part = raw
        .trim()
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    Date::parse(
        date_part,
        format_description!("[year]-[month padding:none]-[day padding:none]"),
    )
    .or_else(|_| {
        Date::parse(
            date_part,
            format_description!("[year]/[month padding:none]/[day padding:none]"),
        )
    })
    .ok()
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}
