use bevy::prelude::*;

pub mod brute_force;
pub mod grid;
pub mod index;

pub use brute_force::BruteForceIndex;
pub use grid::{CellCoord, GridIndex, MAX_CELLS_PER_VOLUME};
pub use index::{ColliderId, SpatialIndex};

/// Spatial plugin for Delver.
/// Provides the broad-phase overlap query dungeon parts are checked against.
pub struct DvSpatialPlugin;

impl Plugin for DvSpatialPlugin {
    fn build(&self, _app: &mut App) {
        // Indices are owned by each generation run; nothing to register.
    }
}
