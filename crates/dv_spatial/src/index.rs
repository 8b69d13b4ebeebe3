use dv_core::Aabb;

/// Identity of a volume stored in a spatial index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColliderId {
    /// A placed dungeon part, by arena index.
    Part(u32),
    /// Static geometry present before generation started.
    Obstacle(u32),
}

/// Overlap query over the set of volumes currently present in the world.
pub trait SpatialIndex {
    /// Add a volume. Re-inserting an id replaces its previous volume.
    fn insert(&mut self, id: ColliderId, volume: Aabb);

    /// Remove a volume, returning it if it was present.
    fn remove(&mut self, id: ColliderId) -> Option<Aabb>;

    /// Every present collider whose volume intersects `volume`.
    ///
    /// This is a snapshot of the index at call time; results are sorted by id.
    fn query(&self, volume: &Aabb) -> Vec<ColliderId>;

    /// Stored volume for `id`.
    fn volume(&self, id: ColliderId) -> Option<Aabb>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}
