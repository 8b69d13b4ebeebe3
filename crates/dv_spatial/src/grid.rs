//! Uniform hash-grid broad-phase.
//!
//! Each volume is bucketed into every cell its box touches; a query gathers
//! candidates from the cells under the query box and runs the exact AABB test
//! on them. Volumes covering more than [`MAX_CELLS_PER_VOLUME`] cells, or with
//! non-finite extents, are kept in a separate list that every query scans.
//! Results match [`BruteForceIndex`](crate::BruteForceIndex).

use std::collections::HashMap;

use bevy::math::{IVec3, Vec3};
use dv_core::Aabb;
use smallvec::SmallVec;

use crate::index::{ColliderId, SpatialIndex};

/// Volumes spanning more cells than this skip the grid.
pub const MAX_CELLS_PER_VOLUME: u64 = 4096;

/// Grid position of a cell in cell-space coordinates.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub struct CellCoord(pub IVec3);

type Bucket = SmallVec<[ColliderId; 4]>;

#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_size: f32,
    cells: HashMap<CellCoord, Bucket>,
    oversized: Vec<ColliderId>,
    volumes: HashMap<ColliderId, Aabb>,
}

impl GridIndex {
    /// Create an empty grid.
    ///
    /// # Panics
    /// If `cell_size` is not strictly positive.
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "grid cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            oversized: Vec::new(),
            volumes: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of volumes stored outside the grid.
    pub fn oversized_len(&self) -> usize {
        self.oversized.len()
    }

    /// Inclusive cell range under `volume`, or `None` if it is too large to bucket.
    fn cell_range(&self, volume: &Aabb) -> Option<(IVec3, IVec3)> {
        let size = f64::from(self.cell_size);
        let lo = volume.min.as_dvec3() / size;
        let hi = volume.max.as_dvec3() / size;
        if !(lo.is_finite() && hi.is_finite()) {
            return None;
        }
        let (lo, hi) = (lo.floor(), hi.floor());
        let span = (hi - lo).max(bevy::math::DVec3::ZERO) + 1.0;
        if span.x * span.y * span.z > MAX_CELLS_PER_VOLUME as f64 {
            return None;
        }
        let limit = f64::from(i32::MAX);
        if lo.abs().max_element() > limit || hi.abs().max_element() > limit {
            return None;
        }
        Some((lo.as_ivec3(), hi.as_ivec3()))
    }

    fn cells_in(lo: IVec3, hi: IVec3) -> impl Iterator<Item = CellCoord> {
        (lo.z..=hi.z).flat_map(move |z| {
            (lo.y..=hi.y)
                .flat_map(move |y| (lo.x..=hi.x).map(move |x| CellCoord(IVec3::new(x, y, z))))
        })
    }

    fn unlink(&mut self, id: ColliderId, volume: &Aabb) {
        let Some((lo, hi)) = self.cell_range(volume) else {
            self.oversized.retain(|existing| *existing != id);
            return;
        };
        for coord in Self::cells_in(lo, hi) {
            if let Some(bucket) = self.cells.get_mut(&coord) {
                bucket.retain(|existing| *existing != id);
                if bucket.is_empty() {
                    self.cells.remove(&coord);
                }
            }
        }
    }
}

impl Default for GridIndex {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl SpatialIndex for GridIndex {
    fn insert(&mut self, id: ColliderId, volume: Aabb) {
        if let Some(previous) = self.volumes.insert(id, volume) {
            self.unlink(id, &previous);
        }
        let Some((lo, hi)) = self.cell_range(&volume) else {
            self.oversized.push(id);
            return;
        };
        for coord in Self::cells_in(lo, hi) {
            self.cells.entry(coord).or_default().push(id);
        }
    }

    fn remove(&mut self, id: ColliderId) -> Option<Aabb> {
        let volume = self.volumes.remove(&id)?;
        self.unlink(id, &volume);
        Some(volume)
    }

    fn query(&self, volume: &Aabb) -> Vec<ColliderId> {
        let mut hits: Vec<ColliderId> = match self.cell_range(volume) {
            Some((lo, hi)) => Self::cells_in(lo, hi)
                .filter_map(|coord| self.cells.get(&coord))
                .flatten()
                .chain(self.oversized.iter())
                .copied()
                .collect(),
            // A query this large would visit more cells than there are volumes.
            None => self.volumes.keys().copied().collect(),
        };
        hits.sort_unstable();
        hits.dedup();
        hits.retain(|id| self.volumes.get(id).is_some_and(|other| other.intersects(volume)));
        hits
    }

    fn volume(&self, id: ColliderId) -> Option<Aabb> {
        self.volumes.get(&id).copied()
    }

    fn len(&self) -> usize {
        self.volumes.len()
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.oversized.clear();
        self.volumes.clear();
    }
}
