use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A record as it lives in the store: the document id plus its data.
/// Ids are the normalized natural key.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub id: String,
    pub record: T,
}

impl<T> Stored<T> {
    pub fn new(id: impl Into<String>, record: T) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// An update decision: the merged record to write back under `id`.
/// `changed` is false when the merge was a no-op; callers skip those writes.
#[derive(Debug, Clone, Serialize)]
pub struct Update<T> {
    pub id: String,
    pub record: T,
    pub changed: bool,
}

/// The reconciliation decision set. Pure data; the store applies it.
#[derive(Debug, Clone, Serialize)]
pub struct ReconPlan<T> {
    pub inserts: Vec<T>,
    pub updates: Vec<Update<T>>,
    /// Stored records absent from the import: marked void, keeping the
    /// audit trail.
    pub voids: Vec<String>,
    /// Absent records whose follow-up was already resolved: hard-deleted.
    pub deletes: Vec<String>,
    pub summary: PlanSummary,
}

impl<T> ReconPlan<T> {
    /// True when applying the plan would not change the store.
    pub fn is_noop(&self) -> bool {
        self.inserts.is_empty()
            && self.voids.is_empty()
            && self.deletes.is_empty()
            && self.updates.iter().all(|u| !u.changed)
    }
}

/// Row and decision counts, exactly what import summaries report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    /// Rows read from the file.
    pub read: usize,
    /// Rows carrying a usable natural key.
    pub valid: usize,
    /// Rows dropped: missing identity fields, or a duplicate key.
    pub skipped: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Matched rows whose merge changed nothing.
    pub unchanged: usize,
    pub voided: usize,
    pub deleted: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "read {} | valid {} | new {} | updated {} | unchanged {} | voided {} | deleted {} | skipped {}",
            self.read,
            self.valid,
            self.inserted,
            self.updated,
            self.unchanged,
            self.voided,
            self.deleted,
            self.skipped,
        )
    }
}
