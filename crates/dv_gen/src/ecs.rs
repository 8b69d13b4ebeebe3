use std::collections::HashMap;

use bevy::prelude::*;
use dv_core::PartArchetype;

use crate::graph::{DungeonPart, NodeHandle};
use crate::host::PartHost;

/// Marker component for an entity mirroring a placed dungeon part.
#[derive(Component, Debug, Clone)]
pub struct DungeonPartEntity {
    pub handle: NodeHandle,
    pub archetype: String,
    pub depth: u32,
    pub parent: Option<NodeHandle>,
}

/// Host that mirrors parts into the ECS through `Commands`.
pub struct EcsHost<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    entities: HashMap<NodeHandle, Entity>,
}

impl<'a, 'w, 's> EcsHost<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>) -> Self {
        Self {
            commands,
            entities: HashMap::new(),
        }
    }

    pub fn entity(&self, handle: NodeHandle) -> Option<Entity> {
        self.entities.get(&handle).copied()
    }

    /// Entities of the parts still alive.
    pub fn into_entities(self) -> HashMap<NodeHandle, Entity> {
        self.entities
    }
}

impl PartHost for EcsHost<'_, '_, '_> {
    fn instantiate(&mut self, handle: NodeHandle, archetype: &PartArchetype, part: &DungeonPart) {
        let entity = self
            .commands
            .spawn((
                DungeonPartEntity {
                    handle,
                    archetype: archetype.name.clone(),
                    depth: part.depth(),
                    parent: part.parent(),
                },
                Transform::from(*part.placement()),
                Name::new(format!("{} #{}", archetype.name, handle.0)),
            ))
            .id();
        self.entities.insert(handle, entity);
    }

    fn destroy(&mut self, handle: NodeHandle) {
        if let Some(entity) = self.entities.remove(&handle) {
            self.commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::generator::generate;
    use bevy::ecs::world::CommandQueue;
    use dv_core::{Aabb, Placement, SpawnableCatalog};
    use dv_spatial::{BruteForceIndex, ColliderId, SpatialIndex};
    use std::sync::Arc;

    #[test]
    fn destroyed_parts_leave_no_entities() {
        let corridor = PartArchetype::corridor("hall", 4.0);
        let catalog = Arc::new(SpawnableCatalog::new(vec![corridor.clone()]));
        let config = GenerationConfig::default().with_max_retries(2);
        let mut index = BruteForceIndex::new();
        index.insert(
            ColliderId::Obstacle(0),
            Aabb::new(Vec3::new(-1.0, 0.0, 5.0), Vec3::new(1.0, 3.0, 6.0)),
        );

        let mut world = World::new();
        let mut queue = CommandQueue::default();
        let entities = {
            let mut commands = Commands::new(&mut queue, &world);
            let mut host = EcsHost::new(&mut commands);
            generate(
                catalog,
                &config,
                Arc::new(corridor),
                Placement::IDENTITY,
                &mut index,
                &mut host,
            )
            .unwrap();
            host.into_entities()
        };
        queue.apply(&mut world);

        assert_eq!(entities.len(), 1);
        let mut parts = world.query::<(&DungeonPartEntity, &Transform)>();
        let spawned: Vec<_> = parts.iter(&world).collect();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].0.depth, 0);
        assert_eq!(spawned[0].1.translation, Vec3::ZERO);
    }
}
