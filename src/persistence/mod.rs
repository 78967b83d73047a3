//! Durable key-value storage
//!
//! Everything the game persists goes through [`KeyValueStore`]:
//! - Player gamertag (plain string)
//! - Leaderboard (JSON array)
//! - Settings (JSON object)
//!
//! On the web this is LocalStorage; natively and in tests it is [`MemoryStore`].

mod memory;
#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

use std::rc::Rc;

use crate::error::StorageError;

/// Storage key for the player's gamertag
pub const IDENTITY_KEY: &str = "baseballGamertag";
/// Storage key for the leaderboard
pub const LEADERBOARD_KEY: &str = "memorayMatchLeaderboard";
/// Storage key for settings
pub const SETTINGS_KEY: &str = "memorayMatchSettings";

/// Get/set-by-key storage capability
pub trait KeyValueStore {
    /// Read a value, `Ok(None)` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Load a JSON record, treating a missing, unreadable or corrupt record as absent
pub fn load_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Discarding corrupt record `{}`: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to read `{}`: {}", key, e);
            None
        }
    }
}

/// Serialize a value as JSON and write it under `key`
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: serde::Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
