//! Game settings
//!
//! Persisted separately from the leaderboard in the same key-value store.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, StorageError};
use crate::persistence::{self, KeyValueStore, SETTINGS_KEY};

/// Board size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoardSize {
    Small,
    #[default]
    Standard,
}

impl BoardSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardSize::Small => "Small",
            BoardSize::Standard => "Standard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Some(BoardSize::Small),
            "standard" | "std" => Some(BoardSize::Standard),
            _ => None,
        }
    }

    /// Number of pairs dealt for this preset
    pub fn pair_count(&self) -> usize {
        match self {
            BoardSize::Small => 4,
            BoardSize::Standard => 6,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Distinct pairs per deal (deck size is twice this)
    pub pair_count: usize,
    /// How long a mismatched pair stays face-up
    pub mismatch_delay_ms: u32,
    /// Game clock resolution; one tick adds one second to the round time
    pub tick_interval_ms: u32,
    /// Fixed RNG seed for reproducible deals (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pair_count: BoardSize::Standard.pair_count(),
            mismatch_delay_ms: 1000,
            tick_interval_ms: 1000,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a board size preset
    pub fn from_preset(preset: BoardSize) -> Self {
        Self {
            pair_count: preset.pair_count(),
            ..Self::default()
        }
    }

    /// Check the settings can produce a valid deal from a catalog of `catalog_len` faces
    pub fn validate(&self, catalog_len: usize) -> Result<(), ConfigError> {
        if self.pair_count == 0 {
            return Err(ConfigError::NoPairs);
        }
        if catalog_len < self.pair_count {
            return Err(ConfigError::CatalogTooSmall {
                required: self.pair_count,
                available: catalog_len,
            });
        }
        if self.mismatch_delay_ms == 0 {
            return Err(ConfigError::ZeroMismatchDelay);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }

    /// Load settings from the store, falling back to defaults
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match persistence::load_json::<Self, _>(store, SETTINGS_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to the store
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        persistence::save_json(store, SETTINGS_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.pair_count, 6);
        assert_eq!(settings.mismatch_delay_ms, 1000);
        assert_eq!(settings.tick_interval_ms, 1000);
        assert!(settings.validate(6).is_ok());
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!(BoardSize::from_str("SMALL"), Some(BoardSize::Small));
        assert_eq!(BoardSize::from_str("std"), Some(BoardSize::Standard));
        assert_eq!(BoardSize::from_str("huge"), None);
        assert_eq!(Settings::from_preset(BoardSize::Small).pair_count, 4);
        assert_eq!(BoardSize::Small.as_str(), "Small");
    }

    #[test]
    fn test_validate_errors() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.validate(5),
            Err(ConfigError::CatalogTooSmall { required: 6, available: 5 })
        );

        settings.pair_count = 0;
        assert_eq!(settings.validate(6), Err(ConfigError::NoPairs));

        settings.pair_count = 2;
        settings.mismatch_delay_ms = 0;
        assert_eq!(settings.validate(6), Err(ConfigError::ZeroMismatchDelay));

        settings.mismatch_delay_ms = 500;
        settings.tick_interval_ms = 0;
        assert_eq!(settings.validate(6), Err(ConfigError::ZeroTickInterval));
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        let settings = Settings {
            seed: Some(42),
            ..Settings::from_preset(BoardSize::Small)
        };
        settings.save(&store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let store = MemoryStore::new();
        store.set(SETTINGS_KEY, r#"{"pair_count": 3}"#).unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.pair_count, 3);
        assert_eq!(settings.mismatch_delay_ms, 1000);
    }
}
