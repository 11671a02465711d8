//! `cartera-config` — application settings.
//!
//! Loaded from `<config_dir>/cartera/settings.toml`; every field has a
//! default, so a missing file means default settings, never an error.

pub mod settings;

pub use settings::Settings;
