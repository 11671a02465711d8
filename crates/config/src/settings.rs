// Application settings
// Loaded from ~/.config/cartera/settings.toml

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cartera_core::classify::{AgingThresholds, DEFAULT_EXPIRY_WINDOW_DAYS};

/// Aging boundaries and the policy expiry window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgingSettings {
    /// Days since issue at which a receivable counts as upcoming.
    pub upcoming_days: i64,
    /// Days since issue at which a receivable counts as overdue.
    pub overdue_days: i64,
    /// Days before expiry during which a policy counts as upcoming.
    pub expiry_window_days: i64,
}

impl Default for AgingSettings {
    fn default() -> Self {
        let t = AgingThresholds::default();
        Self {
            upcoming_days: t.upcoming_days,
            overdue_days: t.overdue_days,
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
        }
    }
}

impl AgingSettings {
    pub fn thresholds(&self) -> AgingThresholds {
        AgingThresholds {
            upcoming_days: self.upcoming_days,
            overdue_days: self.overdue_days,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Database file. Empty = `<data_dir>/cartera/cartera.db`.
    pub path: String,
    /// Max statements per transaction when applying a plan.
    pub batch_size: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: String::new(),
            batch_size: 450,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Insurers offered by the filter UIs. Matching is normalized, so the
    /// casing here is display-only.
    pub insurers: Vec<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            insurers: [
                "Allianz", "Sura", "Estado", "Previsora", "Mundial", "Solidaria", "Axa",
                "Mapfre", "Sbs", "Hdi",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub aging: AgingSettings,
    pub store: StoreSettings,
    pub catalog: CatalogSettings,
}

impl Settings {
    /// The settings file path.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cartera")
            .join("settings.toml")
    }

    /// Load settings from disk. Missing file → defaults; a malformed file is
    /// an error (silently ignoring it would misclassify records).
    pub fn load() -> Result<Self, String> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
        toml::from_str(&contents).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// The effective database path.
    pub fn db_path(&self) -> PathBuf {
        if !self.store.path.trim().is_empty() {
            return PathBuf::from(&self.store.path);
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cartera")
            .join("cartera.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_decided_boundaries() {
        let s = Settings::default();
        assert_eq!(s.aging.upcoming_days, 25);
        assert_eq!(s.aging.overdue_days, 31);
        assert_eq!(s.aging.expiry_window_days, 30);
        assert_eq!(s.store.batch_size, 450);
        assert!(s.catalog.insurers.contains(&"Sura".to_string()));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let s = Settings::load_from(&path).unwrap();
        assert_eq!(s.aging.overdue_days, 31);
    }

    #[test]
    fn partial_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[aging]\noverdue_days = 45\n\n[store]\nbatch_size = 100\n",
        )
        .unwrap();

        let s = Settings::load_from(&path).unwrap();
        assert_eq!(s.aging.overdue_days, 45);
        assert_eq!(s.aging.upcoming_days, 25, "untouched fields keep defaults");
        assert_eq!(s.store.batch_size, 100);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[aging\noverdue_days = oops").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn explicit_db_path_wins() {
        let mut s = Settings::default();
        s.store.path = "/tmp/elsewhere.db".into();
        assert_eq!(s.db_path(), PathBuf::from("/tmp/elsewhere.db"));
    }
}
