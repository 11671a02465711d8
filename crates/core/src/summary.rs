//! Snapshot summaries: pure recomputation over an immutable record list,
//! never cached derived state.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::classify::{policy_status, receivable_status, AgingThresholds, PolicyStatus, ReceivableStatus};
use crate::model::{Policy, Receivable};

/// Placeholder group for policies imported without an insurer.
const NO_INSURER: &str = "(sin aseguradora)";

// ---------------------------------------------------------------------------
// Receivables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReceivableSummary {
    pub total: usize,
    pub current: usize,
    pub upcoming: usize,
    pub overdue: usize,
    pub collected: usize,
    pub void: usize,
    /// Follow-up closed out: notes read exactly "si".
    pub resolved_notes: usize,
    /// Follow-up in progress: notes present but not a plain yes.
    pub noted: usize,
    pub negatives: usize,
    pub negatives_total: f64,
}

/// Tally a receivable snapshot. The notes tallies are informational and
/// independent of the status buckets; the negative tallies read the amount
/// through the money parser.
pub fn receivable_summary(
    rows: &[Receivable],
    today: NaiveDate,
    thresholds: &AgingThresholds,
) -> ReceivableSummary {
    let mut s = ReceivableSummary::default();
    s.total = rows.len();

    for r in rows {
        match receivable_status(r, today, thresholds) {
            ReceivableStatus::Current => s.current += 1,
            ReceivableStatus::Upcoming => s.upcoming += 1,
            ReceivableStatus::Overdue => s.overdue += 1,
            ReceivableStatus::Collected => s.collected += 1,
            ReceivableStatus::Void => s.void += 1,
        }

        if r.is_resolved() {
            s.resolved_notes += 1;
        } else if r.has_note() {
            s.noted += 1;
        }

        let value = r.amount_value();
        if value < 0.0 {
            s.negatives += 1;
            s.negatives_total += value;
        }
    }

    s
}

// ---------------------------------------------------------------------------
// Policies, grouped by insurer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsurerSummary {
    pub insurer: String,
    pub records: usize,
    pub current: usize,
    pub upcoming: usize,
    pub expired: usize,
    pub voided: usize,
    pub premium_total: f64,
    pub grand_total: f64,
}

/// Roll a policy snapshot up per insurer, sorted by record count descending
/// (ties by name). Records with a blank insurer group under a placeholder.
pub fn insurer_summary(
    rows: &[Policy],
    today: NaiveDate,
    expiry_window_days: i64,
) -> Vec<InsurerSummary> {
    let mut groups: BTreeMap<String, InsurerSummary> = BTreeMap::new();

    for p in rows {
        let name = p.insurer.trim();
        let name = if name.is_empty() { NO_INSURER } else { name };
        let entry = groups.entry(name.to_string()).or_insert_with(|| InsurerSummary {
            insurer: name.to_string(),
            ..InsurerSummary::default()
        });

        entry.records += 1;
        match policy_status(p, today, expiry_window_days) {
            PolicyStatus::Current => entry.current += 1,
            PolicyStatus::Upcoming => entry.upcoming += 1,
            PolicyStatus::Expired => entry.expired += 1,
            PolicyStatus::Voided => entry.voided += 1,
            PolicyStatus::NoDate => {}
        }
        entry.premium_total += p.premium;
        entry.grand_total += p.total;
    }

    let mut out: Vec<InsurerSummary> = groups.into_values().collect();
    out.sort_by(|a, b| b.records.cmp(&a.records).then_with(|| a.insurer.cmp(&b.insurer)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::YesNo;
    use chrono::Duration;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn receivable_tallies() {
        let today = ymd(2026, 8, 6);
        let issued = |days: i64| Some(today - Duration::days(days));

        let rows = vec![
            Receivable { issue_date: issued(5), ..Receivable::default() },
            Receivable { issue_date: issued(27), ..Receivable::default() },
            Receivable {
                issue_date: issued(40),
                notes: "left voicemail".into(),
                amount: "(2.000)".into(),
                ..Receivable::default()
            },
            Receivable {
                issue_date: issued(40),
                collected: YesNo::Yes,
                notes: "sí".into(),
                ..Receivable::default()
            },
            Receivable { voided: YesNo::Yes, amount: "-500".into(), ..Receivable::default() },
        ];

        let s = receivable_summary(&rows, today, &AgingThresholds::default());
        assert_eq!(s.total, 5);
        assert_eq!(s.current, 1);
        assert_eq!(s.upcoming, 1);
        assert_eq!(s.overdue, 1);
        assert_eq!(s.collected, 1);
        assert_eq!(s.void, 1);
        assert_eq!(s.resolved_notes, 1);
        assert_eq!(s.noted, 1);
        assert_eq!(s.negatives, 2);
        assert_eq!(s.negatives_total, -2500.0);
    }

    #[test]
    fn insurer_rollup_sorted_by_volume() {
        let today = ymd(2026, 8, 6);
        let ends = |days: i64| Some(today + Duration::days(days));

        let policy = |insurer: &str, ends_on, premium: f64, total: f64| Policy {
            insurer: insurer.into(),
            policy: "x".into(),
            ends_on,
            premium,
            total,
            ..Policy::default()
        };

        let rows = vec![
            policy("Sura", ends(90), 100.0, 120.0),
            policy("Sura", ends(10), 200.0, 240.0),
            policy("Sura", ends(-1), 50.0, 60.0),
            policy("Allianz", ends(90), 10.0, 12.0),
            policy("", None, 1.0, 1.0),
        ];

        let out = insurer_summary(&rows, today, DEFAULT_WINDOW);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].insurer, "Sura");
        assert_eq!(out[0].records, 3);
        assert_eq!(out[0].current, 1);
        assert_eq!(out[0].upcoming, 1);
        assert_eq!(out[0].expired, 1);
        assert_eq!(out[0].premium_total, 350.0);
        assert_eq!(out[0].grand_total, 420.0);
        // Allianz before the placeholder group (same count, name order)
        assert_eq!(out[1].insurer, "Allianz");
        assert_eq!(out[2].insurer, NO_INSURER);
        assert_eq!(out[2].records, 1);
    }

    const DEFAULT_WINDOW: i64 = crate::classify::DEFAULT_EXPIRY_WINDOW_DAYS;
}
