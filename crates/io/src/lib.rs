//! `cartera-io` — spreadsheet import and export.
//!
//! Import is one-way: files are decoded into raw rows for the recon crate;
//! nothing round-trips. Export writes the classified view, exactly what the
//! list commands show.

pub mod csv;
pub mod xlsx;
