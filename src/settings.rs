//! User settings snapshot and the store trait it is read through.
//!
//! The pipeline never reads settings from ambient state: callers take a
//! [`SettingsStore::snapshot`] and pass it in explicitly.

use crate::error::SdkError;
use crate::shared::{Currency, TimeRange};

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Dashboard preferences, as persisted (camelCase JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub currency: Currency,
    pub time_range: TimeRange,
    pub show_grid_lines: bool,
    pub show_tooltips: bool,
    pub auto_refresh: bool,
    pub price_alerts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::Usd,
            time_range: TimeRange::D30,
            show_grid_lines: true,
            show_tooltips: true,
            auto_refresh: true,
            price_alerts: false,
        }
    }
}

impl Settings {
    /// Parse a persisted snapshot. Missing fields take their defaults and
    /// unknown currency or range values fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, SdkError> {
        serde_json::from_str(json).map_err(|e| SdkError::Validation(format!("settings: {}", e)))
    }

    pub fn to_json(&self) -> Result<String, SdkError> {
        serde_json::to_string(self).map_err(|e| SdkError::Other(e.to_string()))
    }
}

/// Read access to the current settings.
pub trait SettingsStore: Send + Sync {
    fn snapshot(&self) -> Settings;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    current: RwLock<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: RwLock::new(settings),
        }
    }

    /// Apply `f` to the stored settings and return the result.
    pub fn update(&self, f: impl FnOnce(&mut Settings)) -> Settings {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
        *guard
    }

    pub fn reset_to_defaults(&self) -> Settings {
        self.update(|s| *s = Settings::default())
    }
}

impl SettingsStore for MemorySettingsStore {
    fn snapshot(&self) -> Settings {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.currency, Currency::Usd);
        assert_eq!(s.time_range, TimeRange::D30);
        assert!(s.show_grid_lines && s.show_tooltips && s.auto_refresh);
        assert!(!s.price_alerts);
    }

    #[test]
    fn test_from_json_partial_snapshot() {
        let s = Settings::from_json(r#"{"currency":"eur","timeRange":"7d","autoRefresh":false}"#)
            .unwrap();
        assert_eq!(s.currency, Currency::Eur);
        assert_eq!(s.time_range, TimeRange::D7);
        assert!(!s.auto_refresh);
        assert!(s.show_grid_lines);
    }

    #[test]
    fn test_from_json_unknown_values_fall_back() {
        let s = Settings::from_json(r#"{"currency":"btc","timeRange":"1y"}"#).unwrap();
        assert_eq!(s.currency, Currency::Usd);
        assert_eq!(s.time_range, TimeRange::D30);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SdkError::Validation(_))
        ));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = Settings::default().to_json().unwrap();
        assert!(json.contains("\"showGridLines\":true"));
        assert!(json.contains("\"timeRange\":\"30d\""));
    }

    #[test]
    fn test_memory_store_update_and_reset() {
        let store = MemorySettingsStore::default();
        let updated = store.update(|s| s.currency = Currency::Jpy);
        assert_eq!(updated.currency, Currency::Jpy);
        assert_eq!(store.snapshot().currency, Currency::Jpy);

        store.reset_to_defaults();
        assert_eq!(store.snapshot(), Settings::default());
    }
}
