use bevy::prelude::*;

pub mod catalog_io;

pub use catalog_io::{
    catalog_filename, catalog_path, list_catalogs, load_catalog, load_config, resolve_catalog,
    save_catalog, save_config, CatalogIoError, CATALOGS_DIR, CONFIG_PATH,
};

/// Persistence plugin for Delver.
/// Loads and saves authoring data (part catalogs, generation configs) in RON format.
pub struct DvPersistencePlugin;

impl Plugin for DvPersistencePlugin {
    fn build(&self, _app: &mut App) {
        // Catalogs are loaded before the app starts; no systems to register here.
    }
}
