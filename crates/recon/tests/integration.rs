//! End-to-end reconciliation scenarios: import, apply, re-import.

use cartera_core::row::{RawRow, RawValue};
use cartera_core::{Policy, Receivable, YesNo};
use cartera_recon::{plan, ReconPlan, Stored};

fn row(cells: &[(&str, &str)]) -> RawRow {
    let mut r = RawRow::new();
    for (h, v) in cells {
        r.insert(h, RawValue::Text(v.to_string()));
    }
    r
}

/// Apply a plan to an in-memory store the way the SQLite layer does:
/// upsert inserts and changed updates, flag voids, drop deletes.
fn apply<T: cartera_recon::Reconcilable>(
    stored: &mut Vec<Stored<T>>,
    plan: &ReconPlan<T>,
    void: impl Fn(&mut T),
) {
    for del in &plan.deletes {
        stored.retain(|s| &s.id != del);
    }
    for v in &plan.voids {
        if let Some(s) = stored.iter_mut().find(|s| &s.id == v) {
            void(&mut s.record);
        }
    }
    for u in &plan.updates {
        if !u.changed {
            continue;
        }
        if let Some(s) = stored.iter_mut().find(|s| s.id == u.id) {
            s.record = u.record.clone();
        }
    }
    for ins in &plan.inserts {
        stored.push(Stored::new(ins.key(), ins.clone()));
    }
}

#[test]
fn receivable_import_cycle() {
    let mut stored: Vec<Stored<Receivable>> = Vec::new();

    // Month 1: two receivables come in
    let batch_1 = vec![
        row(&[
            ("Aseguradora", "Sura"),
            ("Poliza", "100"),
            ("Nombre", "Juan Perez"),
            ("Valor", "1.200.000"),
            ("Fecha de emisión", "2026-07-01"),
        ]),
        row(&[
            ("Aseguradora", "Mapfre"),
            ("Poliza", "200"),
            ("Nombre", "Ana Gomez"),
            ("Valor", "800.000"),
        ]),
    ];
    let p = plan::<Receivable>(&stored, &batch_1);
    assert_eq!(p.summary.inserted, 2);
    apply(&mut stored, &p, |r| r.voided = YesNo::Yes);
    assert_eq!(stored.len(), 2);

    // Staff work the Sura record
    stored[0].record.notes = "called client, promised payment".into();

    // Month 2: Sura still open (blank notes column), Mapfre gone
    let batch_2 = vec![row(&[
        ("Aseguradora", "Sura"),
        ("Poliza", "100"),
        ("Nombre", "Juan Perez"),
        ("Valor", "1.200.000"),
        ("Fecha de emisión", "2026-07-01"),
        ("Gestion", ""),
    ])];
    let p = plan::<Receivable>(&stored, &batch_2);
    assert_eq!(p.summary.voided, 1, "Mapfre record voided, not deleted");
    assert!(p.deletes.is_empty());
    // Notes survive the blank column
    assert_eq!(
        p.updates[0].record.notes,
        "called client, promised payment"
    );
    apply(&mut stored, &p, |r| r.voided = YesNo::Yes);

    let mapfre = stored.iter().find(|s| s.record.insurer == "Mapfre").unwrap();
    assert!(mapfre.record.voided.is_yes());

    // Sura gets resolved, then disappears from month 3's file
    stored
        .iter_mut()
        .find(|s| s.record.insurer == "Sura")
        .unwrap()
        .record
        .notes = "sí".into();

    let p = plan::<Receivable>(&stored, &[]);
    assert_eq!(p.deletes.len(), 1, "resolved record is hard-deleted");
    assert!(p.voids.is_empty(), "voided record is not re-voided");
    apply(&mut stored, &p, |r| r.voided = YesNo::Yes);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].record.insurer, "Mapfre");
}

#[test]
fn policy_import_preserves_staff_fields_across_cycles() {
    let mut stored: Vec<Stored<Policy>> = Vec::new();

    let batch = |phone: &str, total: &str| {
        vec![row(&[
            ("ASEGURADORA", "Sura"),
            ("POLIZA", "AB-1"),
            ("TOMADOR", "Empresa XYZ"),
            ("FECHA FIN", "2026-12-31"),
            ("TOTAL", total),
            ("TELEFONO", phone),
        ])]
    };

    let p = plan::<Policy>(&stored, &batch("", "1.000.000"));
    apply(&mut stored, &p, |r| r.voided = YesNo::Yes);
    assert_eq!(stored.len(), 1);

    // Staff fill in the protected fields
    stored[0].record.phone = "3001234567".into();
    stored[0].record.commission = 120_000.0;
    stored[0].record.notes = "client wants renewal".into();

    // Next export carries a different phone and a new total
    let p = plan::<Policy>(&stored, &batch("999", "1.100.000"));
    assert_eq!(p.updates.len(), 1);
    let merged = &p.updates[0].record;
    assert_eq!(merged.phone, "3001234567", "populated protected field kept");
    assert_eq!(merged.commission, 120_000.0);
    assert_eq!(merged.notes, "client wants renewal");
    assert_eq!(merged.total, 1_100_000.0, "plain field takes the import");
    apply(&mut stored, &p, |r| r.voided = YesNo::Yes);

    // Unchanged re-import is a no-op both times
    let p = plan::<Policy>(&stored, &batch("999", "1.100.000"));
    assert!(p.is_noop());
    let p = plan::<Policy>(&stored, &batch("999", "1.100.000"));
    assert!(p.is_noop());
}

#[test]
fn mixed_quality_file_counts_line_up() {
    let stored = vec![Stored::new(
        "sura_100",
        Receivable {
            insurer: "Sura".into(),
            policy: "100".into(),
            ..Receivable::default()
        },
    )];

    let rows = vec![
        // update
        row(&[("Aseguradora", "Sura"), ("Poliza", "100"), ("Nombre", "J")]),
        // insert
        row(&[("Aseguradora", "Hdi"), ("Poliza", "7")]),
        // no identity: skipped
        row(&[("Nombre", "sin poliza")]),
        // duplicate of the insert: skipped
        row(&[("Aseguradora", "HDI"), ("Poliza", "7")]),
    ];

    let p = plan::<Receivable>(&stored, &rows);
    let s = p.summary;
    assert_eq!(s.read, 4);
    assert_eq!(s.valid, 2);
    assert_eq!(s.skipped, 2);
    assert_eq!(s.inserted, 1);
    assert_eq!(s.updated, 1);
    assert_eq!(s.voided, 0);
    assert_eq!(s.deleted, 0);
    assert_eq!(
        s.to_string(),
        "read 4 | valid 2 | new 1 | updated 1 | unchanged 0 | voided 0 | deleted 0 | skipped 2"
    );
}
