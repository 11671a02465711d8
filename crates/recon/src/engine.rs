//! The reconciliation planner: a three-way diff between the stored snapshot
//! and a freshly imported batch, keyed by normalized natural key.

use std::collections::{HashMap, HashSet};

use cartera_core::row::RawRow;
use cartera_core::{Policy, Receivable};

use crate::merge;
use crate::model::{PlanSummary, ReconPlan, Stored, Update};

/// A record shape the planner can reconcile.
pub trait Reconcilable: Clone + PartialEq {
    /// Normalized natural key; empty when identity fields are missing.
    fn key(&self) -> String;
    /// Build a record from an imported row; `None` without identity.
    fn from_row(row: &RawRow) -> Option<Self>;
    /// Merge an imported row over the stored record.
    fn merge(stored: &Self, row: &RawRow) -> Self;
    /// Follow-up closed out: absent records are deleted instead of voided.
    fn is_resolved(&self) -> bool;
    fn is_voided(&self) -> bool;
}

impl Reconcilable for Receivable {
    fn key(&self) -> String {
        Receivable::key(self)
    }
    fn from_row(row: &RawRow) -> Option<Self> {
        merge::receivable_from_row(row)
    }
    fn merge(stored: &Self, row: &RawRow) -> Self {
        merge::merge_receivable(stored, row)
    }
    fn is_resolved(&self) -> bool {
        Receivable::is_resolved(self)
    }
    fn is_voided(&self) -> bool {
        self.voided.is_yes()
    }
}

impl Reconcilable for Policy {
    fn key(&self) -> String {
        Policy::key(self)
    }
    fn from_row(row: &RawRow) -> Option<Self> {
        merge::policy_from_row(row)
    }
    fn merge(stored: &Self, row: &RawRow) -> Self {
        merge::merge_policy(stored, row)
    }
    fn is_resolved(&self) -> bool {
        Policy::is_resolved(self)
    }
    fn is_voided(&self) -> bool {
        self.voided.is_yes()
    }
}

/// Compute the reconciliation plan.
///
/// - imported rows matching a stored key become updates (merged, protected
///   fields preserved); unmatched rows become inserts;
/// - stored records absent from the import are voided, or deleted when their
///   follow-up is already resolved;
/// - rows without identity and duplicate keys are skipped and counted.
///
/// Re-running over the applied result is a no-op: empty inserts, voids and
/// deletes, and every update flagged unchanged.
pub fn plan<T: Reconcilable>(stored: &[Stored<T>], imported: &[RawRow]) -> ReconPlan<T> {
    let mut summary = PlanSummary {
        read: imported.len(),
        ..PlanSummary::default()
    };

    let mut stored_by_key: HashMap<String, &Stored<T>> = HashMap::new();
    for s in stored {
        let key = s.record.key();
        if key.is_empty() {
            continue;
        }
        stored_by_key.entry(key).or_insert(s);
    }

    let mut inserts = Vec::new();
    let mut updates = Vec::new();
    let mut imported_keys: HashSet<String> = HashSet::new();

    for row in imported {
        let Some(candidate) = T::from_row(row) else {
            summary.skipped += 1;
            continue;
        };
        let key = candidate.key();
        if !imported_keys.insert(key.clone()) {
            // Same key twice in one file: first row wins.
            summary.skipped += 1;
            continue;
        }
        summary.valid += 1;

        match stored_by_key.get(&key) {
            Some(existing) => {
                let merged = T::merge(&existing.record, row);
                let changed = merged != existing.record;
                if changed {
                    summary.updated += 1;
                } else {
                    summary.unchanged += 1;
                }
                updates.push(Update {
                    id: existing.id.clone(),
                    record: merged,
                    changed,
                });
            }
            None => {
                summary.inserted += 1;
                inserts.push(candidate);
            }
        }
    }

    let mut voids = Vec::new();
    let mut deletes = Vec::new();
    for s in stored {
        let key = s.record.key();
        if key.is_empty() || imported_keys.contains(&key) {
            continue;
        }
        if s.record.is_resolved() {
            summary.deleted += 1;
            deletes.push(s.id.clone());
        } else if !s.record.is_voided() {
            summary.voided += 1;
            voids.push(s.id.clone());
        }
    }

    ReconPlan {
        inserts,
        updates,
        voids,
        deletes,
        summary,
    }
}
