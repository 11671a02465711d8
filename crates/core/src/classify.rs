//! Status classification: pure decision functions from record fields to a
//! status category and traffic-light color.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aging::{days_since, days_until};
use crate::model::{FinancedPolicy, Policy, Receivable};

// ---------------------------------------------------------------------------
// Colors + thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Green,
    Yellow,
    Red,
    Blue,
    Gray,
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Yellow => write!(f, "yellow"),
            Self::Red => write!(f, "red"),
            Self::Blue => write!(f, "blue"),
            Self::Gray => write!(f, "gray"),
        }
    }
}

/// Aging boundaries for receivables. The defaults resolve the source data's
/// historical off-by-one disagreement as >= 31 overdue, >= 25 upcoming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgingThresholds {
    pub upcoming_days: i64,
    pub overdue_days: i64,
}

impl Default for AgingThresholds {
    fn default() -> Self {
        Self {
            upcoming_days: 25,
            overdue_days: 31,
        }
    }
}

/// Days before expiry during which a policy counts as upcoming.
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Receivable: aging buckets + overrides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivableStatus {
    Current,
    Upcoming,
    Overdue,
    Collected,
    Void,
}

impl ReceivableStatus {
    pub fn color(self) -> Color {
        match self {
            Self::Current => Color::Green,
            Self::Upcoming => Color::Yellow,
            Self::Overdue => Color::Red,
            Self::Collected => Color::Blue,
            Self::Void => Color::Gray,
        }
    }
}

impl std::fmt::Display for ReceivableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Upcoming => write!(f, "upcoming"),
            Self::Overdue => write!(f, "overdue"),
            Self::Collected => write!(f, "collected"),
            Self::Void => write!(f, "void"),
        }
    }
}

/// Classify a receivable. Precedence: void, then collected, then aging from
/// the issue date (an unresolved issue date ages as day zero).
pub fn receivable_status(
    r: &Receivable,
    today: NaiveDate,
    thresholds: &AgingThresholds,
) -> ReceivableStatus {
    if r.voided.is_yes() {
        return ReceivableStatus::Void;
    }
    if r.collected.is_yes() {
        return ReceivableStatus::Collected;
    }
    let d = r.issue_date.map(|d| days_since(d, today)).unwrap_or(0);
    if d >= thresholds.overdue_days {
        ReceivableStatus::Overdue
    } else if d >= thresholds.upcoming_days {
        ReceivableStatus::Upcoming
    } else {
        ReceivableStatus::Current
    }
}

// ---------------------------------------------------------------------------
// Policy: expiry-based semaphore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Current,
    Upcoming,
    Expired,
    NoDate,
    Voided,
}

impl PolicyStatus {
    pub fn color(self) -> Color {
        match self {
            Self::Current => Color::Green,
            Self::Upcoming => Color::Yellow,
            Self::Expired => Color::Red,
            Self::NoDate | Self::Voided => Color::Gray,
        }
    }
}

impl std::fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Upcoming => write!(f, "upcoming"),
            Self::Expired => write!(f, "expired"),
            Self::NoDate => write!(f, "no_date"),
            Self::Voided => write!(f, "voided"),
        }
    }
}

/// Classify a policy by days to expiry.
pub fn policy_status(p: &Policy, today: NaiveDate, window_days: i64) -> PolicyStatus {
    if p.voided.is_yes() {
        return PolicyStatus::Voided;
    }
    match days_until(p.ends_on, today) {
        None => PolicyStatus::NoDate,
        Some(d) if d < 0 => PolicyStatus::Expired,
        Some(d) if d <= window_days => PolicyStatus::Upcoming,
        Some(_) => PolicyStatus::Current,
    }
}

// ---------------------------------------------------------------------------
// Financed policy: lifecycle semaphore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Semaphore {
    Green,
    Yellow,
    Red,
}

impl Semaphore {
    pub fn color(self) -> Color {
        match self {
            Self::Green => Color::Green,
            Self::Yellow => Color::Yellow,
            Self::Red => Color::Red,
        }
    }
}

impl std::fmt::Display for Semaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Yellow => write!(f, "yellow"),
            Self::Red => write!(f, "red"),
        }
    }
}

/// Lifecycle semaphore for a financed policy.
///
/// An unset endorsement pins the record red: the endorsement choice gates
/// everything else. Delegated records can never fall below yellow. The
/// classifier makes no assumption that the milestone chain was enforced.
pub fn financed_semaphore(p: &FinancedPolicy) -> Semaphore {
    use crate::model::Endorsement;

    if p.endorsement == Endorsement::Unset {
        return Semaphore::Red;
    }

    let complete = if p.endorsement.is_yes() {
        p.all_done() && p.certified
    } else {
        p.all_done()
    };

    if p.delegated {
        return if complete {
            Semaphore::Green
        } else {
            Semaphore::Yellow
        };
    }

    if complete {
        Semaphore::Green
    } else if p.any_done() || (p.endorsement.is_yes() && p.certified) {
        Semaphore::Yellow
    } else {
        Semaphore::Red
    }
}

// ---------------------------------------------------------------------------
// Badges (presentation hints, derived on the fly)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Mounted,
    Collected,
    Signed,
    Disbursed,
    CertificationPending,
    Finished,
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mounted => write!(f, "mounted"),
            Self::Collected => write!(f, "collected"),
            Self::Signed => write!(f, "signed"),
            Self::Disbursed => write!(f, "disbursed"),
            Self::CertificationPending => write!(f, "certification pending"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// Badge labels for a financed policy: one per true milestone, plus the
/// certification reminder and the finished marker. Derived entirely from
/// the record's fields; nothing is stored.
pub fn financed_badges(p: &FinancedPolicy) -> Vec<Badge> {
    let mut badges = Vec::new();
    if p.mounted {
        badges.push(Badge::Mounted);
    }
    if p.collected {
        badges.push(Badge::Collected);
    }
    if p.signed {
        badges.push(Badge::Signed);
    }
    if p.disbursed {
        badges.push(Badge::Disbursed);
    }
    if p.endorsement.is_yes() && p.disbursed && !p.certified {
        badges.push(Badge::CertificationPending);
    }
    if financed_semaphore(p) == Semaphore::Green {
        badges.push(Badge::Finished);
    }
    badges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Endorsement, YesNo};
    use chrono::Duration;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn receivable_issued_days_ago(days: i64, today: NaiveDate) -> Receivable {
        Receivable {
            insurer: "Sura".into(),
            policy: "100".into(),
            issue_date: Some(today - Duration::days(days)),
            ..Receivable::default()
        }
    }

    #[test]
    fn void_wins_over_everything() {
        let today = ymd(2026, 8, 6);
        let mut r = receivable_issued_days_ago(40, today);
        r.voided = YesNo::Yes;
        r.collected = YesNo::Yes;
        assert_eq!(
            receivable_status(&r, today, &AgingThresholds::default()),
            ReceivableStatus::Void
        );
    }

    #[test]
    fn collected_beats_aging() {
        let today = ymd(2026, 8, 6);
        let mut r = receivable_issued_days_ago(40, today);
        r.collected = YesNo::Yes;
        let status = receivable_status(&r, today, &AgingThresholds::default());
        assert_eq!(status, ReceivableStatus::Collected);
        assert_eq!(status.color(), Color::Blue);
    }

    #[test]
    fn aging_boundaries() {
        let today = ymd(2026, 8, 6);
        let t = AgingThresholds::default();
        let cases = [
            (40, ReceivableStatus::Overdue),
            (31, ReceivableStatus::Overdue),
            (30, ReceivableStatus::Upcoming),
            (25, ReceivableStatus::Upcoming),
            (24, ReceivableStatus::Current),
            (0, ReceivableStatus::Current),
        ];
        for (days, expected) in cases {
            let r = receivable_issued_days_ago(days, today);
            assert_eq!(receivable_status(&r, today, &t), expected, "{days} days");
        }
    }

    #[test]
    fn missing_issue_date_is_current() {
        let today = ymd(2026, 8, 6);
        let r = Receivable::default();
        assert_eq!(
            receivable_status(&r, today, &AgingThresholds::default()),
            ReceivableStatus::Current
        );
    }

    #[test]
    fn policy_expiry_semaphore() {
        let today = ymd(2026, 8, 6);
        let w = DEFAULT_EXPIRY_WINDOW_DAYS;
        let mut p = Policy::default();

        assert_eq!(policy_status(&p, today, w), PolicyStatus::NoDate);

        p.ends_on = Some(ymd(2026, 8, 1));
        assert_eq!(policy_status(&p, today, w), PolicyStatus::Expired);

        p.ends_on = Some(ymd(2026, 9, 5)); // exactly 30 days out
        assert_eq!(policy_status(&p, today, w), PolicyStatus::Upcoming);

        p.ends_on = Some(ymd(2026, 9, 6)); // 31 days out
        assert_eq!(policy_status(&p, today, w), PolicyStatus::Current);

        p.voided = YesNo::Yes;
        assert_eq!(policy_status(&p, today, w), PolicyStatus::Voided);
        assert_eq!(PolicyStatus::Voided.color(), Color::Gray);
    }

    fn financed(endorsement: Endorsement) -> FinancedPolicy {
        FinancedPolicy {
            policy: "F-1".into(),
            endorsement,
            ..FinancedPolicy::default()
        }
    }

    fn complete_base(p: &mut FinancedPolicy) {
        p.mounted = true;
        p.collected = true;
        p.signed = true;
        p.disbursed = true;
    }

    #[test]
    fn unset_endorsement_is_always_red() {
        let mut p = financed(Endorsement::Unset);
        complete_base(&mut p);
        p.certified = true;
        p.delegated = true;
        assert_eq!(financed_semaphore(&p), Semaphore::Red);
    }

    #[test]
    fn endorsement_no_full_chain_is_green() {
        let mut p = financed(Endorsement::No);
        complete_base(&mut p);
        assert_eq!(financed_semaphore(&p), Semaphore::Green);
    }

    #[test]
    fn endorsement_yes_needs_certification() {
        let mut p = financed(Endorsement::Yes);
        complete_base(&mut p);
        assert_eq!(financed_semaphore(&p), Semaphore::Yellow);
        p.certified = true;
        assert_eq!(financed_semaphore(&p), Semaphore::Green);
    }

    #[test]
    fn partial_progress_is_yellow() {
        let mut p = financed(Endorsement::No);
        p.mounted = true;
        assert_eq!(financed_semaphore(&p), Semaphore::Yellow);

        let p = financed(Endorsement::No);
        assert_eq!(financed_semaphore(&p), Semaphore::Red);
    }

    #[test]
    fn certification_alone_counts_as_progress_under_endorsement() {
        let mut p = financed(Endorsement::Yes);
        p.certified = true;
        assert_eq!(financed_semaphore(&p), Semaphore::Yellow);
    }

    #[test]
    fn delegated_floors_at_yellow() {
        let mut p = financed(Endorsement::No);
        p.delegated = true;
        assert_eq!(financed_semaphore(&p), Semaphore::Yellow);

        complete_base(&mut p);
        assert_eq!(financed_semaphore(&p), Semaphore::Green);

        // Under endorsement, delegation still requires certification for green
        let mut p = financed(Endorsement::Yes);
        p.delegated = true;
        complete_base(&mut p);
        assert_eq!(financed_semaphore(&p), Semaphore::Yellow);
        p.certified = true;
        assert_eq!(financed_semaphore(&p), Semaphore::Green);
    }

    #[test]
    fn badges_track_flags() {
        let mut p = financed(Endorsement::Yes);
        p.mounted = true;
        p.collected = true;
        p.signed = true;
        p.disbursed = true;
        let badges = financed_badges(&p);
        assert!(badges.contains(&Badge::Mounted));
        assert!(badges.contains(&Badge::Disbursed));
        assert!(badges.contains(&Badge::CertificationPending));
        assert!(!badges.contains(&Badge::Finished));

        p.certified = true;
        let badges = financed_badges(&p);
        assert!(!badges.contains(&Badge::CertificationPending));
        assert!(badges.contains(&Badge::Finished));
    }

    #[test]
    fn classifier_tolerates_inconsistent_chains() {
        // signed without mounted/collected: never stored by the edit surface,
        // but must classify without crashing
        let mut p = financed(Endorsement::No);
        p.signed = true;
        assert_eq!(financed_semaphore(&p), Semaphore::Yellow);
    }
}
