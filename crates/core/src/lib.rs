//! `cartera-core` — records, normalization, dates, and classification.
//!
//! Pure crate: every function is a total function of its inputs. "Today" is
//! always an explicit parameter; no I/O, no system clock, no panics on dirty
//! spreadsheet input.

pub mod aging;
pub mod classify;
pub mod dates;
pub mod model;
pub mod normalize;
pub mod row;
pub mod summary;

pub use classify::{Badge, Color, PolicyStatus, ReceivableStatus, Semaphore};
pub use model::{Endorsement, FinancedPolicy, Policy, Receivable, YesNo};
pub use normalize::{natural_key, normalize_header, normalize_key, parse_money};
pub use row::{RawRow, RawValue};
