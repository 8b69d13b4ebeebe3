//! Catalog of part archetypes a dungeon may be built from.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::archetype::PartArchetype;

/// Error type for catalog validation.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Two archetypes share a name.
    DuplicateName(String),
    /// An archetype's local bounds have min > max on some axis.
    InvalidBounds(String),
    /// The configured entrance is not one of the catalog's archetypes.
    UnknownEntrance(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "duplicate archetype name '{}'", name),
            Self::InvalidBounds(name) => write!(f, "archetype '{}' has inverted bounds", name),
            Self::UnknownEntrance(name) => write!(f, "entrance '{}' is not in the catalog", name),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Immutable list of archetypes that may be spawned at an exit.
///
/// Shared read-only between every node of a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnableCatalog {
    /// Human-readable name for this catalog.
    #[serde(default)]
    pub name: String,
    /// Archetype used for the root part. Defaults to the first entry.
    #[serde(default)]
    pub entrance: Option<String>,
    /// Spawnable archetypes.
    #[serde(default)]
    pub parts: Vec<Arc<PartArchetype>>,
}

impl SpawnableCatalog {
    pub fn new(parts: Vec<PartArchetype>) -> Self {
        Self {
            name: String::new(),
            entrance: None,
            parts: parts.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_entrance(mut self, entrance: impl Into<String>) -> Self {
        self.entrance = Some(entrance.into());
        self
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<PartArchetype>> {
        self.parts.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Arc<PartArchetype>> {
        self.parts.iter().find(|part| part.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PartArchetype>> {
        self.parts.iter()
    }

    /// Archetype for the root part: the named entrance, or the first entry.
    pub fn entrance(&self) -> Option<&Arc<PartArchetype>> {
        match &self.entrance {
            Some(name) => self.find(name),
            None => self.parts.first(),
        }
    }

    /// Pick an archetype uniformly at random. `None` if the catalog is empty.
    pub fn pick(&self, rng: &mut impl Rng) -> Option<&Arc<PartArchetype>> {
        if self.parts.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.parts.len());
        self.parts.get(index)
    }

    /// Check names are unique, bounds are well formed and the entrance exists.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for part in &self.parts {
            if !seen.insert(part.name.as_str()) {
                return Err(CatalogError::DuplicateName(part.name.clone()));
            }
            if !part.bounds.is_valid() {
                return Err(CatalogError::InvalidBounds(part.name.clone()));
            }
        }
        if let Some(entrance) = &self.entrance {
            if self.find(entrance).is_none() {
                return Err(CatalogError::UnknownEntrance(entrance.clone()));
            }
        }
        Ok(())
    }

    /// Built-in crypt catalog used when no catalog file is supplied.
    pub fn crypt() -> Self {
        Self::new(vec![
            PartArchetype::room("entrance_hall", 5.0, 10.0),
            PartArchetype::corridor("short_corridor", 4.0),
            PartArchetype::corridor("long_corridor", 10.0),
            PartArchetype::room("chamber", 4.0, 8.0),
            PartArchetype::bend("bend", 4.0),
            PartArchetype::dead_end("ossuary", 3.0),
        ])
        .with_name("Crypt")
        .with_entrance("entrance_hall")
    }
}
