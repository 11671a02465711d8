use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::{natural_key, normalize_key, parse_money};

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Two-valued flag stored as text in real-world spreadsheets
/// ("SI"/"SÍ"/"TRUE"/"1" vs everything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    /// Parse a spreadsheet cell. Unknown values default to `No`.
    pub fn parse(value: &str) -> Self {
        match normalize_key(value).as_str() {
            "si" | "true" | "1" => Self::Yes,
            _ => Self::No,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}

impl std::fmt::Display for YesNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "SI"),
            Self::No => write!(f, "NO"),
        }
    }
}

/// Endorsement gate for financed policies. `Unset` is the initial state and
/// pins the record to the lowest lifecycle status until a choice is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endorsement {
    #[default]
    Unset,
    Yes,
    No,
}

impl Endorsement {
    /// Parse a spreadsheet cell. Blank and unknown values stay `Unset`.
    pub fn parse(value: &str) -> Self {
        match normalize_key(value).as_str() {
            "si" | "true" | "1" => Self::Yes,
            "no" | "false" | "0" => Self::No,
            _ => Self::Unset,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}

impl std::fmt::Display for Endorsement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, "-"),
            Self::Yes => write!(f, "SI"),
            Self::No => write!(f, "NO"),
        }
    }
}

// ---------------------------------------------------------------------------
// Receivable ("cartera" row)
// ---------------------------------------------------------------------------

/// An outstanding collectible tied to a policy, tracked for aging and
/// collection follow-up.
///
/// Monetary fields keep the text exactly as imported; [`parse_money`]
/// re-derives the signed value on demand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Receivable {
    pub insurer: String,
    pub client: String,
    pub document: String,
    pub advisor: String,
    pub plate: String,
    pub line: String,
    pub policy: String,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub amount: String,
    pub pending: String,
    pub collected: YesNo,
    pub observation: String,
    pub in_force: String,
    /// Free-text follow-up. The normalized value "si" marks the record as
    /// resolved (terminal) for reconciliation purposes.
    pub notes: String,
    pub voided: YesNo,
}

impl Receivable {
    /// Natural key: insurer + policy number, normalized.
    /// Empty when either identity field is missing.
    pub fn key(&self) -> String {
        natural_key(&self.insurer, &self.policy)
    }

    /// Signed amount, read from `amount` and falling back to `pending`.
    pub fn amount_value(&self) -> f64 {
        let raw = if self.amount.trim().is_empty() {
            &self.pending
        } else {
            &self.amount
        };
        parse_money(raw)
    }

    /// Follow-up closed out: notes read exactly "si" after normalization.
    pub fn is_resolved(&self) -> bool {
        normalize_key(&self.notes) == "si"
    }

    /// Follow-up in progress: notes present but not a plain yes.
    pub fn has_note(&self) -> bool {
        !self.notes.trim().is_empty() && !self.is_resolved()
    }
}

// ---------------------------------------------------------------------------
// Policy ("póliza" row)
// ---------------------------------------------------------------------------

/// An insurance contract record, tracked for renewal and expiry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub insurer: String,
    pub policy: String,
    pub line: String,
    pub plate: String,
    pub insured: String,
    pub insured_id: String,
    pub beneficiary: String,
    pub beneficiary_id: String,
    pub holder: String,
    pub holder_id: String,
    pub issued_on: Option<NaiveDate>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub premium: f64,
    pub issue_costs: f64,
    pub vat: f64,
    pub total: f64,
    pub advisor: String,
    pub voided: YesNo,
    // Protected fields: set by staff, never blanked by an import.
    pub renewal: YesNo,
    pub commission: f64,
    pub phone: String,
    pub notes: String,
}

impl Policy {
    pub fn key(&self) -> String {
        natural_key(&self.insurer, &self.policy)
    }

    pub fn is_resolved(&self) -> bool {
        normalize_key(&self.notes) == "si"
    }
}

// ---------------------------------------------------------------------------
// Financed policy (disbursement workflow)
// ---------------------------------------------------------------------------

/// A financed policy moving through the mount → collect → sign → disburse
/// chain, with an optional certification step when the endorsement applies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancedPolicy {
    pub policy: String,
    pub date: Option<NaiveDate>,
    pub plate: String,
    pub client: String,
    pub entity: String,
    pub insurer: String,
    pub manager: String,
    pub installments: u32,
    pub amount: String,
    pub mounted: bool,
    pub collected: bool,
    pub signed: bool,
    pub disbursed: bool,
    pub endorsement: Endorsement,
    pub certified: bool,
    pub delegated: bool,
    pub delegated_to: String,
}

impl FinancedPolicy {
    /// Every milestone of the base chain holds.
    pub fn all_done(&self) -> bool {
        self.mounted && self.collected && self.signed && self.disbursed
    }

    /// At least one milestone of the base chain holds.
    pub fn any_done(&self) -> bool {
        self.mounted || self.collected || self.signed || self.disbursed
    }

    // Milestone dependency chain. Edit surfaces consult these before
    // toggling a step; the classifier tolerates records that violate them.

    pub fn may_collect(&self) -> bool {
        self.mounted
    }

    pub fn may_sign(&self) -> bool {
        self.collected
    }

    pub fn may_disburse(&self) -> bool {
        self.mounted && self.collected && self.signed
    }

    /// Certification requires a disbursed record and only applies when the
    /// endorsement was chosen as yes.
    pub fn may_certify(&self) -> bool {
        self.disbursed && self.endorsement.is_yes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_parse_variants() {
        assert_eq!(YesNo::parse("SI"), YesNo::Yes);
        assert_eq!(YesNo::parse("Sí"), YesNo::Yes);
        assert_eq!(YesNo::parse("TRUE"), YesNo::Yes);
        assert_eq!(YesNo::parse("1"), YesNo::Yes);
        assert_eq!(YesNo::parse("NO"), YesNo::No);
        assert_eq!(YesNo::parse(""), YesNo::No);
        assert_eq!(YesNo::parse("maybe"), YesNo::No);
    }

    #[test]
    fn endorsement_blank_stays_unset() {
        assert_eq!(Endorsement::parse(""), Endorsement::Unset);
        assert_eq!(Endorsement::parse("  "), Endorsement::Unset);
        assert_eq!(Endorsement::parse("SI"), Endorsement::Yes);
        assert_eq!(Endorsement::parse("no"), Endorsement::No);
    }

    #[test]
    fn receivable_amount_falls_back_to_pending() {
        let r = Receivable {
            amount: String::new(),
            pending: "1.234".into(),
            ..Receivable::default()
        };
        assert_eq!(r.amount_value(), 1234.0);

        let r = Receivable {
            amount: "(500)".into(),
            pending: "1.234".into(),
            ..Receivable::default()
        };
        assert_eq!(r.amount_value(), -500.0);
    }

    #[test]
    fn resolved_notes_normalize() {
        let mut r = Receivable::default();
        r.notes = " SÍ ".into();
        assert!(r.is_resolved());
        assert!(!r.has_note());

        r.notes = "called client twice".into();
        assert!(!r.is_resolved());
        assert!(r.has_note());
    }

    #[test]
    fn milestone_chain_predicates() {
        let mut p = FinancedPolicy::default();
        assert!(!p.may_collect());
        p.mounted = true;
        assert!(p.may_collect());
        assert!(!p.may_sign());
        p.collected = true;
        assert!(p.may_sign());
        assert!(!p.may_disburse());
        p.signed = true;
        assert!(p.may_disburse());
        p.disbursed = true;
        assert!(!p.may_certify(), "certification needs endorsement = yes");
        p.endorsement = Endorsement::Yes;
        assert!(p.may_certify());
    }
}
