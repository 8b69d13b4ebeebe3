use std::path::Path;
use std::sync::Arc;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use dv_gen::{DungeonGenerated, DungeonGenerationFailed, DungeonSettings, GeneratedDungeon};

fn main() -> AppExit {
    App::new()
        .add_plugins((MinimalPlugins, LogPlugin::default()))
        .insert_resource(load_settings())
        // Plugins
        .add_plugins((
            dv_core::DvCorePlugin,
            dv_spatial::DvSpatialPlugin,
            dv_gen::DvGenPlugin,
            dv_persistence::DvPersistencePlugin,
        ))
        .add_systems(Update, (log_dungeon_summary, exit_when_done).chain())
        .run()
}

/// Build settings from `assets/generation.ron` and an optional catalog given
/// as the first command-line argument, either a file path or the name of a
/// catalog in `assets/catalogs`. Falls back to the built-in crypt.
fn load_settings() -> DungeonSettings {
    let mut settings = DungeonSettings::default();

    let config_path = Path::new(dv_persistence::CONFIG_PATH);
    if config_path.exists() {
        match dv_persistence::load_config(config_path) {
            Ok(config) => settings.config = config,
            Err(e) => eprintln!("Failed to load {}: {}", config_path.display(), e),
        }
    }

    if let Some(arg) = std::env::args().nth(1) {
        let catalogs_dir = Path::new(dv_persistence::CATALOGS_DIR);
        let loaded = dv_persistence::resolve_catalog(&arg, catalogs_dir)
            .and_then(|path| Ok((dv_persistence::load_catalog(&path)?, path)));
        match loaded {
            Ok((catalog, path)) => {
                println!("Loaded catalog '{}' from {}", catalog.name, path.display());
                settings.catalog = Arc::new(catalog);
            }
            Err(e) => eprintln!("Failed to load catalog {}: {}", arg, e),
        }
    }

    settings
}

fn log_dungeon_summary(
    mut generated: EventReader<DungeonGenerated>,
    dungeon: Option<Res<GeneratedDungeon>>,
) {
    let Some(dungeon) = dungeon else {
        return;
    };
    for event in generated.read() {
        let layout = &dungeon.layout;
        info!(
            "Seed {}: {} parts, {} dead ends, deepest branch {}",
            event.seed,
            event.parts,
            event.dead_ends,
            layout.max_depth_reached()
        );
        for (depth, count) in layout.parts_per_depth().iter().enumerate() {
            info!("  depth {:>2}: {} parts", depth, count);
        }
        for (name, count) in layout.archetype_counts() {
            info!("  {:<16} x{}", name, count);
        }
    }
}

fn exit_when_done(
    generated: EventReader<DungeonGenerated>,
    failed: EventReader<DungeonGenerationFailed>,
    mut exit: EventWriter<AppExit>,
) {
    if !failed.is_empty() {
        exit.send(AppExit::error());
    } else if !generated.is_empty() {
        exit.send(AppExit::Success);
    }
}
