use bevy::prelude::*;

pub mod archetype;
pub mod catalog;
pub mod geometry;

pub use archetype::{ExitSocket, PartArchetype};
pub use catalog::{CatalogError, SpawnableCatalog};
pub use geometry::{Aabb, Placement, CONTACT_EPSILON};

/// Core plugin providing foundational types for Delver.
pub struct DvCorePlugin;

impl Plugin for DvCorePlugin {
    fn build(&self, _app: &mut App) {
        // Core types are used by other crates; no systems to register here.
    }
}
