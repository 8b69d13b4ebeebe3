use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;
use dv_core::{Aabb, Placement, SpawnableCatalog};
use dv_spatial::{ColliderId, GridIndex, SpatialIndex};

use crate::config::GenerationConfig;
use crate::ecs::EcsHost;
use crate::error::GenerationError;
use crate::generator::generate_from_entrance;
use crate::graph::NodeHandle;
use crate::layout::DungeonLayout;

/// Inputs for the startup generation run.
#[derive(Resource, Debug, Clone)]
pub struct DungeonSettings {
    pub config: GenerationConfig,
    pub catalog: Arc<SpawnableCatalog>,
    /// Where the entrance part is placed.
    pub origin: Placement,
    /// Static geometry the dungeon must grow around.
    pub obstacles: Vec<Aabb>,
}

impl Default for DungeonSettings {
    fn default() -> Self {
        Self {
            config: GenerationConfig::default(),
            catalog: Arc::new(SpawnableCatalog::crypt()),
            origin: Placement::IDENTITY,
            obstacles: Vec::new(),
        }
    }
}

/// The dungeon produced at startup.
#[derive(Resource, Debug)]
pub struct GeneratedDungeon {
    pub layout: DungeonLayout,
    pub seed: u64,
    pub entities: HashMap<NodeHandle, Entity>,
}

/// Event fired once the startup dungeon exists.
#[derive(Event, Clone, Debug)]
pub struct DungeonGenerated {
    pub seed: u64,
    pub parts: usize,
    pub dead_ends: usize,
}

/// Event fired when the startup dungeon could not be generated.
#[derive(Event, Clone, Debug)]
pub struct DungeonGenerationFailed {
    pub error: GenerationError,
}

/// Dungeon generation plugin for Delver.
/// Grows a dungeon from `DungeonSettings` at startup and mirrors it into the ECS.
pub struct DvGenPlugin;

impl Plugin for DvGenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DungeonSettings>()
            .add_event::<DungeonGenerated>()
            .add_event::<DungeonGenerationFailed>()
            .add_systems(Startup, generate_dungeon_system);
    }
}

/// Run one generation with a fresh grid holding the configured obstacles.
pub fn run_generation(
    settings: &DungeonSettings,
    commands: &mut Commands,
) -> Result<GeneratedDungeon, GenerationError> {
    settings.config.validate()?;

    let mut index = GridIndex::new(settings.config.grid_cell_size);
    for (i, obstacle) in settings.obstacles.iter().enumerate() {
        index.insert(ColliderId::Obstacle(i as u32), *obstacle);
    }

    let mut host = EcsHost::new(commands);
    let layout = generate_from_entrance(
        Arc::clone(&settings.catalog),
        &settings.config,
        settings.origin,
        &mut index,
        &mut host,
    )?;

    Ok(GeneratedDungeon {
        layout,
        seed: settings.config.seed,
        entities: host.into_entities(),
    })
}

/// System that generates the dungeon described by `DungeonSettings`.
///
/// A root collision fails the whole run: the entrance is placed the same way
/// for every seed, so there is nothing to retry.
pub fn generate_dungeon_system(
    mut commands: Commands,
    settings: Res<DungeonSettings>,
    mut generated: EventWriter<DungeonGenerated>,
    mut failed: EventWriter<DungeonGenerationFailed>,
) {
    match run_generation(&settings, &mut commands) {
        Ok(dungeon) => {
            generated.send(DungeonGenerated {
                seed: dungeon.seed,
                parts: dungeon.layout.part_count(),
                dead_ends: dungeon.layout.report.dead_ends.len(),
            });
            commands.insert_resource(dungeon);
        }
        Err(error) => {
            error!("Dungeon generation failed: {}", error);
            failed.send(DungeonGenerationFailed { error });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::DungeonPartEntity;
    use bevy::ecs::event::Events;

    #[test]
    fn startup_generates_and_spawns_entities() {
        let mut app = App::new();
        app.add_plugins(DvGenPlugin);
        app.update();

        let parts = app.world().resource::<GeneratedDungeon>().layout.part_count();
        assert!(parts > 1);

        let mut query = app.world_mut().query::<&DungeonPartEntity>();
        assert_eq!(query.iter(app.world()).count(), parts);

        let events = app.world().resource::<Events<DungeonGenerated>>();
        let mut reader = events.get_reader();
        let sent: Vec<_> = reader.read(events).collect();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].parts, parts);
        assert_eq!(sent[0].seed, 42);
    }

    #[test]
    fn blocked_entrance_fails_generation() {
        let mut app = App::new();
        app.insert_resource(DungeonSettings {
            obstacles: vec![Aabb::new(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 2.0, 2.0))],
            ..Default::default()
        });
        app.add_plugins(DvGenPlugin);
        app.update();

        assert!(app.world().get_resource::<GeneratedDungeon>().is_none());
        let events = app.world().resource::<Events<DungeonGenerationFailed>>();
        let mut reader = events.get_reader();
        let failures: Vec<_> = reader.read(events).collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0].error,
            GenerationError::OrphanCollision { .. }
        ));

        let mut query = app.world_mut().query::<&DungeonPartEntity>();
        assert_eq!(query.iter(app.world()).count(), 0);
    }
}
