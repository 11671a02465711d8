//! Field-wise merge of an imported row over a stored record.
//!
//! Rules, per field class:
//! - plain fields: the imported value wins unless the cell is blank;
//! - dates: the imported value wins when it resolves, else the stored date;
//! - protected fields: the stored value wins once populated — an import can
//!   fill a blank but never overwrite staff work;
//! - yes/no flags: yes sticks; an import can set a flag but a blank or
//!   missing column never clears it (clearing is a direct-edit operation).
//!
//! Building a record from scratch is merging over the default record, so
//! inserts and updates share one code path.

use chrono::NaiveDate;

use cartera_core::dates::resolve_date;
use cartera_core::row::RawRow;
use cartera_core::{natural_key, parse_money, Policy, Receivable, YesNo};

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

fn text_field(row: &RawRow, aliases: &[&str], stored: &str) -> String {
    match row.first(aliases) {
        Some(v) => v.as_text(),
        None => stored.to_string(),
    }
}

fn date_field(row: &RawRow, aliases: &[&str], stored: Option<NaiveDate>) -> Option<NaiveDate> {
    row.first(aliases).and_then(resolve_date).or(stored)
}

fn money_field(row: &RawRow, aliases: &[&str], stored: f64) -> f64 {
    match row.first(aliases) {
        Some(v) => parse_money(&v.as_text()),
        None => stored,
    }
}

fn flag_field(row: &RawRow, aliases: &[&str], stored: YesNo) -> YesNo {
    if stored.is_yes() {
        stored
    } else {
        YesNo::parse(&text_field(row, aliases, ""))
    }
}

fn protected_text(row: &RawRow, aliases: &[&str], stored: &str) -> String {
    if stored.trim().is_empty() {
        text_field(row, aliases, "")
    } else {
        stored.to_string()
    }
}

fn protected_money(row: &RawRow, aliases: &[&str], stored: f64) -> f64 {
    if stored == 0.0 {
        money_field(row, aliases, 0.0)
    } else {
        stored
    }
}

// ---------------------------------------------------------------------------
// Receivables
// ---------------------------------------------------------------------------

/// Merge an imported cartera row over a stored receivable. Notes and the
/// void flag are never imported; they belong to staff and to reconciliation.
pub fn merge_receivable(stored: &Receivable, row: &RawRow) -> Receivable {
    use crate::fields::receivable as f;

    Receivable {
        insurer: text_field(row, f::INSURER, &stored.insurer),
        client: text_field(row, f::CLIENT, &stored.client),
        document: text_field(row, f::DOCUMENT, &stored.document),
        advisor: text_field(row, f::ADVISOR, &stored.advisor),
        plate: text_field(row, f::PLATE, &stored.plate),
        line: text_field(row, f::LINE, &stored.line),
        policy: text_field(row, f::POLICY, &stored.policy),
        issue_date: date_field(row, f::ISSUE_DATE, stored.issue_date),
        due_date: date_field(row, f::DUE_DATE, stored.due_date),
        amount: text_field(row, f::AMOUNT, &stored.amount),
        pending: text_field(row, f::PENDING, &stored.pending),
        collected: flag_field(row, f::COLLECTED, stored.collected),
        observation: text_field(row, f::OBSERVATION, &stored.observation),
        in_force: text_field(row, f::IN_FORCE, &stored.in_force),
        notes: stored.notes.clone(),
        voided: stored.voided,
    }
}

/// Build a receivable from an imported row alone. `None` when the identity
/// fields (insurer + policy) are missing.
pub fn receivable_from_row(row: &RawRow) -> Option<Receivable> {
    use crate::fields::receivable as f;

    let insurer = text_field(row, f::INSURER, "");
    let policy = text_field(row, f::POLICY, "");
    if natural_key(&insurer, &policy).is_empty() {
        return None;
    }
    Some(merge_receivable(&Receivable::default(), row))
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Merge an imported policy row over a stored policy. Renewal, commission,
/// phone and notes are protected.
pub fn merge_policy(stored: &Policy, row: &RawRow) -> Policy {
    use crate::fields::policy as f;

    Policy {
        insurer: text_field(row, f::INSURER, &stored.insurer),
        policy: text_field(row, f::POLICY, &stored.policy),
        line: text_field(row, f::LINE, &stored.line),
        plate: text_field(row, f::PLATE, &stored.plate),
        insured: text_field(row, f::INSURED, &stored.insured),
        insured_id: text_field(row, f::INSURED_ID, &stored.insured_id),
        beneficiary: text_field(row, f::BENEFICIARY, &stored.beneficiary),
        beneficiary_id: text_field(row, f::BENEFICIARY_ID, &stored.beneficiary_id),
        holder: text_field(row, f::HOLDER, &stored.holder),
        holder_id: text_field(row, f::HOLDER_ID, &stored.holder_id),
        issued_on: date_field(row, f::ISSUED_ON, stored.issued_on),
        starts_on: date_field(row, f::STARTS_ON, stored.starts_on),
        ends_on: date_field(row, f::ENDS_ON, stored.ends_on),
        premium: money_field(row, f::PREMIUM, stored.premium),
        issue_costs: money_field(row, f::ISSUE_COSTS, stored.issue_costs),
        vat: money_field(row, f::VAT, stored.vat),
        total: money_field(row, f::TOTAL, stored.total),
        advisor: text_field(row, f::ADVISOR, &stored.advisor),
        voided: flag_field(row, f::VOIDED, stored.voided),
        renewal: flag_field(row, f::RENEWAL, stored.renewal),
        commission: protected_money(row, f::COMMISSION, stored.commission),
        phone: protected_text(row, f::PHONE, &stored.phone),
        notes: protected_text(row, f::NOTES, &stored.notes),
    }
}

/// Build a policy from an imported row alone. `None` without identity.
pub fn policy_from_row(row: &RawRow) -> Option<Policy> {
    use crate::fields::policy as f;

    let insurer = text_field(row, f::INSURER, "");
    let policy = text_field(row, f::POLICY, "");
    if natural_key(&insurer, &policy).is_empty() {
        return None;
    }
    Some(merge_policy(&Policy::default(), row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartera_core::row::RawValue;
    use chrono::NaiveDate;

    fn row(cells: &[(&str, RawValue)]) -> RawRow {
        let mut r = RawRow::new();
        for (h, v) in cells {
            r.insert(h, v.clone());
        }
        r
    }

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn blank_cells_keep_stored_values() {
        let stored = Receivable {
            insurer: "Sura".into(),
            policy: "100".into(),
            client: "Juan Perez".into(),
            amount: "1.000".into(),
            ..Receivable::default()
        };
        let r = row(&[
            ("Aseguradora", text("Sura")),
            ("Poliza", text("100")),
            ("Nombre", text("")),
            ("Valor", text("2.000")),
        ]);
        let merged = merge_receivable(&stored, &r);
        assert_eq!(merged.client, "Juan Perez");
        assert_eq!(merged.amount, "2.000");
    }

    #[test]
    fn notes_and_void_never_come_from_the_row() {
        let stored = Receivable {
            insurer: "Sura".into(),
            policy: "100".into(),
            notes: "called client".into(),
            ..Receivable::default()
        };
        let r = row(&[
            ("Aseguradora", text("Sura")),
            ("Poliza", text("100")),
            ("Gestion", text("overwrite attempt")),
            ("Anulada", text("SI")),
        ]);
        let merged = merge_receivable(&stored, &r);
        assert_eq!(merged.notes, "called client");
        assert!(!merged.voided.is_yes());
    }

    #[test]
    fn collected_sticks_once_set() {
        let stored = Receivable {
            insurer: "Sura".into(),
            policy: "100".into(),
            collected: cartera_core::YesNo::Yes,
            ..Receivable::default()
        };
        let r = row(&[
            ("Aseguradora", text("Sura")),
            ("Poliza", text("100")),
            ("Recaudada", text("")),
        ]);
        assert!(merge_receivable(&stored, &r).collected.is_yes());
    }

    #[test]
    fn policy_protected_fields_survive_imports() {
        let stored = Policy {
            insurer: "Sura".into(),
            policy: "AB-1".into(),
            phone: "3001234567".into(),
            commission: 150.0,
            notes: "renewal discussed".into(),
            renewal: cartera_core::YesNo::Yes,
            ..Policy::default()
        };
        let r = row(&[
            ("ASEGURADORA", text("Sura")),
            ("POLIZA", text("AB-1")),
            ("TELEFONO", text("999")),
            ("COMISION", text("0")),
            ("GESTION", text("")),
            ("RENOVACION", text("NO")),
        ]);
        let merged = merge_policy(&stored, &r);
        assert_eq!(merged.phone, "3001234567");
        assert_eq!(merged.commission, 150.0);
        assert_eq!(merged.notes, "renewal discussed");
        assert!(merged.renewal.is_yes());
    }

    #[test]
    fn protected_fields_fill_from_import_when_blank() {
        let stored = Policy {
            insurer: "Sura".into(),
            policy: "AB-1".into(),
            ..Policy::default()
        };
        let r = row(&[
            ("ASEGURADORA", text("Sura")),
            ("POLIZA", text("AB-1")),
            ("TELEFONO", text("3007654321")),
            ("COMISION", text("85.000")),
        ]);
        let merged = merge_policy(&stored, &r);
        assert_eq!(merged.phone, "3007654321");
        assert_eq!(merged.commission, 85_000.0);
    }

    #[test]
    fn policy_dates_and_numbers_decode() {
        let r = row(&[
            ("ASEGURADORA", text("Mapfre")),
            ("PÓLIZA", text("77")),
            ("FECHA FIN", RawValue::Number(44927.0)),
            ("FECHA INICIO", text("05/01/2023")),
            ("PRIMA", text("$ 1.234.567")),
            ("IVA", RawValue::Number(19.0)),
        ]);
        let p = policy_from_row(&r).unwrap();
        assert_eq!(p.ends_on, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(p.starts_on, NaiveDate::from_ymd_opt(2023, 1, 5));
        assert_eq!(p.premium, 1_234_567.0);
        assert_eq!(p.vat, 19.0);
    }

    #[test]
    fn missing_identity_yields_none() {
        let r = row(&[("Nombre", text("Juan")), ("Valor", text("100"))]);
        assert!(receivable_from_row(&r).is_none());

        let r = row(&[("Aseguradora", text("Sura")), ("Nombre", text("Juan"))]);
        assert!(receivable_from_row(&r).is_none());
    }

    #[test]
    fn merge_is_idempotent() {
        let r = row(&[
            ("Aseguradora", text("Sura")),
            ("Poliza", text("100")),
            ("Nombre", text("Juan Perez")),
            ("Valor", text("1.000")),
            ("Fecha de emisión", text("2026-07-01")),
        ]);
        let first = receivable_from_row(&r).unwrap();
        let second = merge_receivable(&first, &r);
        assert_eq!(first, second);
    }
}
