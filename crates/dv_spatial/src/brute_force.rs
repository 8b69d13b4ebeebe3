use dv_core::Aabb;

use crate::index::{ColliderId, SpatialIndex};

/// Linear-scan index. Fine for small dungeons and as a reference for
/// [`GridIndex`](crate::GridIndex).
#[derive(Debug, Clone, Default)]
pub struct BruteForceIndex {
    entries: Vec<(ColliderId, Aabb)>,
}

impl BruteForceIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpatialIndex for BruteForceIndex {
    fn insert(&mut self, id: ColliderId, volume: Aabb) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = volume,
            None => self.entries.push((id, volume)),
        }
    }

    fn remove(&mut self, id: ColliderId) -> Option<Aabb> {
        let position = self.entries.iter().position(|(existing, _)| *existing == id)?;
        Some(self.entries.swap_remove(position).1)
    }

    fn query(&self, volume: &Aabb) -> Vec<ColliderId> {
        let mut hits: Vec<ColliderId> = self
            .entries
            .iter()
            .filter(|(_, other)| other.intersects(volume))
            .map(|(id, _)| *id)
            .collect();
        hits.sort_unstable();
        hits
    }

    fn volume(&self, id: ColliderId) -> Option<Aabb> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, volume)| *volume)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
