//! `cartera-recon` — reconciliation of imported spreadsheet rows against
//! stored records.
//!
//! Pure engine crate: receives decoded rows and the stored snapshot, returns
//! a plan (inserts, updates, voids, deletes). No I/O; the store applies the
//! plan. Malformed rows are skipped and counted, never an error.

pub mod engine;
pub mod fields;
pub mod merge;
pub mod model;

pub use engine::{plan, Reconcilable};
pub use model::{PlanSummary, ReconPlan, Stored, Update};
