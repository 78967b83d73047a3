//! Card catalog and deal construction

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::state::{Deal, GamePhase};
use crate::error::ConfigError;

/// Index of a face in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentKey(pub usize);

/// One card face the presentation layer knows how to draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: String,
    pub image_path: String,
    pub description: String,
}

impl CatalogEntry {
    pub fn new(key: &str, image_path: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            image_path: image_path.to_string(),
            description: description.to_string(),
        }
    }
}

/// Ordered set of faces with unique keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate keys (they would break pairing)
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.key.as_str()) {
                return Err(ConfigError::DuplicateContentKey(entry.key.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The six baseball cards the web build ships with
    pub fn baseball() -> Self {
        Self {
            entries: vec![
                CatalogEntry::new("bradley", "./Assets/bradley.jpg", "Bradley player card"),
                CatalogEntry::new("djkitty", "./Assets/djkitty.jpg", "DJ Kitty mascot card"),
                CatalogEntry::new("littell", "./Assets/littell.jpg", "Littell player card"),
                CatalogEntry::new("palacios", "./Assets/palacios.jpg", "Palacios player card"),
                CatalogEntry::new("raymond", "./Assets/raymond.jpg", "Raymond player card"),
                CatalogEntry::new("baseball", "./Assets/baseball.jpg", "Baseball card"),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: ContentKey) -> Option<&CatalogEntry> {
        self.entries.get(key.0)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::baseball()
    }
}

/// Deal `pair_count` pairs in a uniformly random order
///
/// Uses the first `pair_count` catalog faces. Callers validate
/// `1 <= pair_count <= catalog.len()` up front.
pub fn new_deal<R: Rng + ?Sized>(pair_count: usize, phase: GamePhase, rng: &mut R) -> Deal {
    let mut faces: Vec<ContentKey> = (0..pair_count)
        .flat_map(|i| {
            let key = ContentKey(i);
            [key, key]
        })
        .collect();
    // Fisher-Yates
    faces.shuffle(rng);
    Deal::from_faces(&faces, phase)
}
