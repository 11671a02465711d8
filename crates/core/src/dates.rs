//! Date resolution across the encodings real spreadsheet exports use:
//! serial numbers, native dates, and a handful of textual layouts.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::row::RawValue;

/// The classic spreadsheet epoch: serial 0 = 1899-12-30, one day = 86,400,000 ms.
fn sheet_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap()
}

/// Resolve a decoded cell to a calendar date. `None` for empty cells and
/// anything that fails to parse; never panics.
pub fn resolve_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Empty | RawValue::Bool(_) => None,
        RawValue::Date(d) => Some(*d),
        RawValue::Number(n) => resolve_serial(*n),
        RawValue::Text(s) => resolve_date_str(s),
    }
}

/// Resolve a spreadsheet serial number (days since 1899-12-30). The
/// fractional part is time of day and is floored away.
pub fn resolve_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    // i64 cast saturates on absurd magnitudes; checked_add rejects the rest.
    sheet_epoch().checked_add_signed(Duration::try_days(days as i64)?)
}

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
];

/// Resolve textual dates: `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY`, then a
/// short fallback list of datetime layouts.
pub fn resolve_date_str(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    for layout in DATE_LAYOUTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, layout) {
            return Some(d);
        }
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(dt.date());
        }
    }
    None
}

/// Zero-padded `YYYY-MM-DD`, or the empty string for an unresolved date.
pub fn format_ymd(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}
