//! Day-offset arithmetic against an injected "today".
//!
//! The current date is always an explicit parameter so classification is
//! deterministic; only the CLI boundary ever reads the system clock.

use chrono::NaiveDate;

/// Whole days from `date` to `today`. Positive = in the past.
pub fn days_since(date: NaiveDate, today: NaiveDate) -> i64 {
    (today - date).num_days()
}

/// Whole days from `today` to a future-oriented date (due/expiry).
/// `None` when the date is unresolved; negative = already past.
pub fn days_until(date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    date.map(|d| (d - today).num_days())
}
