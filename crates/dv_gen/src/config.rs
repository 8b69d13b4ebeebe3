use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Largest accepted `max_depth`. Each level of depth is a nested call chain
/// during generation, so this bounds stack use.
pub const MAX_DEPTH_LIMIT: u32 = 128;

/// Parameters for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed for the run's random source.
    pub seed: u64,
    /// Parts at this depth spawn nothing; their exits become dead ends.
    /// At most [`MAX_DEPTH_LIMIT`].
    pub max_depth: u32,
    /// Replacement attempts per exit after a spawned part collides.
    pub max_retries_per_exit: u32,
    /// Optional cap on live parts in the whole dungeon.
    pub max_parts: Option<usize>,
    /// Cell size of the broad-phase grid, in world units.
    pub grid_cell_size: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_depth: 10,
            max_retries_per_exit: 8,
            max_parts: None,
            grid_cell_size: 8.0,
        }
    }
}

impl GenerationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries_per_exit = retries;
        self
    }

    pub fn with_max_parts(mut self, max_parts: usize) -> Self {
        self.max_parts = Some(max_parts);
        self
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if !(self.grid_cell_size > 0.0 && self.grid_cell_size.is_finite()) {
            return Err(GenerationError::InvalidConfig(format!(
                "grid_cell_size must be positive, got {}",
                self.grid_cell_size
            )));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(GenerationError::InvalidConfig(format!(
                "max_depth must be at most {}, got {}",
                MAX_DEPTH_LIMIT, self.max_depth
            )));
        }
        if self.max_parts == Some(0) {
            return Err(GenerationError::InvalidConfig(
                "max_parts must allow at least the root part".into(),
            ));
        }
        Ok(())
    }
}
