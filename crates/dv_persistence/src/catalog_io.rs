use std::fs;
use std::path::{Path, PathBuf};

use dv_core::{CatalogError, SpawnableCatalog};
use dv_gen::GenerationConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default directory for part catalogs.
pub const CATALOGS_DIR: &str = "assets/catalogs";

/// Default location of the generation config.
pub const CONFIG_PATH: &str = "assets/generation.ron";

/// Error type for catalog and config I/O. File errors name the file.
#[derive(Debug)]
pub enum CatalogIoError {
    Io { path: PathBuf, source: std::io::Error },
    Serialize(ron::Error),
    Parse { path: PathBuf, source: ron::error::SpannedError },
    Invalid { path: PathBuf, source: CatalogError },
    /// A catalog name that matches no file in the catalogs directory.
    NotFound { name: String, available: Vec<String> },
}

impl std::fmt::Display for CatalogIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::Serialize(e) => write!(f, "RON serialization error: {}", e),
            Self::Parse { path, source } => write!(f, "{}: RON parse error: {}", path.display(), source),
            Self::Invalid { path, source } => write!(f, "{}: invalid catalog: {}", path.display(), source),
            Self::NotFound { name, available } if available.is_empty() => {
                write!(f, "no catalog named '{}'", name)
            }
            Self::NotFound { name, available } => write!(
                f,
                "no catalog named '{}' (available: {})",
                name,
                available.join(", ")
            ),
        }
    }
}

impl std::error::Error for CatalogIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(e) => Some(e),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}

fn write_ron<T: Serialize>(path: &Path, value: &T) -> Result<(), CatalogIoError> {
    let pretty_config = ron::ser::PrettyConfig::new()
        .depth_limit(5)
        .separate_tuple_members(false);

    let ron_string =
        ron::ser::to_string_pretty(value, pretty_config).map_err(CatalogIoError::Serialize)?;
    fs::write(path, ron_string).map_err(|source| CatalogIoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogIoError> {
    let contents = fs::read_to_string(path).map_err(|source| CatalogIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| CatalogIoError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a part catalog to a RON file.
pub fn save_catalog(path: &Path, catalog: &SpawnableCatalog) -> Result<(), CatalogIoError> {
    write_ron(path, catalog)
}

/// Load a part catalog from a RON file and validate it.
pub fn load_catalog(path: &Path) -> Result<SpawnableCatalog, CatalogIoError> {
    let catalog: SpawnableCatalog = read_ron(path)?;
    catalog.validate().map_err(|source| CatalogIoError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(catalog)
}

/// Save a generation config to a RON file.
pub fn save_config(path: &Path, config: &GenerationConfig) -> Result<(), CatalogIoError> {
    write_ron(path, config)
}

/// Load a generation config from a RON file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<GenerationConfig, CatalogIoError> {
    read_ron(path)
}

/// List all catalog files in `dir`, sorted by path.
pub fn list_catalogs(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut catalogs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            catalogs.push(path);
        }
    }

    catalogs.sort();
    Ok(catalogs)
}

/// File name a catalog called `name` is stored under.
pub fn catalog_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}.ron", sanitized.to_lowercase())
}

/// Path of the catalog called `name` inside `dir`.
pub fn catalog_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(catalog_filename(name))
}

/// Find a catalog file from a command-line style argument.
///
/// An existing file path is used as is. Anything else is treated as a catalog
/// name and looked up in `dir`, so `"Sunken Crypt"` finds `sunken_crypt.ron`.
pub fn resolve_catalog(arg: &str, dir: &Path) -> Result<PathBuf, CatalogIoError> {
    let direct = Path::new(arg);
    if direct.is_file() {
        return Ok(direct.to_path_buf());
    }

    let named = catalog_path(dir, arg);
    if named.is_file() {
        return Ok(named);
    }

    let available = list_catalogs(dir)
        .map_err(|source| CatalogIoError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .iter()
        .filter_map(|path| path.file_stem()?.to_str().map(str::to_owned))
        .collect();
    Err(CatalogIoError::NotFound {
        name: arg.to_owned(),
        available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::PartArchetype;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crypt.ron");

        let catalog = SpawnableCatalog::crypt();
        save_catalog(&path, &catalog).unwrap();

        let loaded = load_catalog(&path).unwrap();
        assert_eq!(loaded.name, catalog.name);
        assert_eq!(loaded.entrance, catalog.entrance);
        assert_eq!(loaded.len(), catalog.len());
        for (a, b) in loaded.iter().zip(catalog.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.bounds, b.bounds);
            assert_eq!(a.exits.len(), b.exits.len());
        }
    }

    #[test]
    fn load_rejects_invalid_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dupes.ron");
        let catalog = SpawnableCatalog::new(vec![
            PartArchetype::corridor("hall", 2.0),
            PartArchetype::corridor("hall", 4.0),
        ]);
        save_catalog(&path, &catalog).unwrap();

        assert!(matches!(
            load_catalog(&path),
            Err(CatalogIoError::Invalid {
                source: CatalogError::DuplicateName(_),
                ..
            })
        ));
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(parts: [").unwrap();
        assert!(matches!(
            load_catalog(&path),
            Err(CatalogIoError::Parse { .. })
        ));
    }

    #[test]
    fn hand_written_catalog_parses() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiny.ron");
        fs::write(
            &path,
            r#"(
                name: "Tiny",
                parts: [
                    (
                        name: "hall",
                        bounds: (min: (-1.0, 0.0, 0.0), max: (1.0, 3.0, 4.0)),
                        exits: [
                            (name: "far", offset: (translation: (0.0, 0.0, 4.0))),
                            (name: "side", offset: (translation: (1.0, 0.0, 2.0), yaw_degrees: 90.0)),
                        ],
                    ),
                ],
            )"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        let hall = catalog.entrance().unwrap();
        assert_eq!(hall.name, "hall");
        assert_eq!(hall.exit_count(), 2);
        assert!((hall.exits[1].offset.yaw_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn save_and_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("generation.ron");
        let config = GenerationConfig::default().with_seed(9).with_max_parts(300);

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn list_catalogs_filters_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.ron"), "()").unwrap();
        fs::write(dir.path().join("a.ron"), "()").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let found = list_catalogs(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("a.ron"), dir.path().join("b.ron")]
        );
        assert!(list_catalogs(&dir.path().join("missing")).unwrap().is_empty());
    }

    #[test]
    fn shipped_assets_load() {
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");

        let catalog = load_catalog(&assets.join("catalogs/sunken_crypt.ron")).unwrap();
        assert_eq!(catalog.entrance().unwrap().name, "stair_landing");
        assert_eq!(catalog.len(), 5);

        let config = load_config(&assets.join("generation.ron")).unwrap();
        assert_eq!(config.max_parts, Some(400));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn resolve_catalog_by_path_or_name() {
        let dir = tempdir().unwrap();
        let catalog = SpawnableCatalog::crypt().with_name("Sunken Crypt");
        let stored = catalog_path(dir.path(), &catalog.name);
        save_catalog(&stored, &catalog).unwrap();
        assert_eq!(stored, dir.path().join("sunken_crypt.ron"));

        let by_path = stored.to_str().unwrap();
        assert_eq!(resolve_catalog(by_path, dir.path()).unwrap(), stored);
        assert_eq!(resolve_catalog("Sunken Crypt", dir.path()).unwrap(), stored);
        assert_eq!(resolve_catalog("sunken_crypt", dir.path()).unwrap(), stored);
    }

    #[test]
    fn resolve_catalog_lists_alternatives() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("caves.ron"), "()").unwrap();
        fs::write(dir.path().join("tombs.ron"), "()").unwrap();

        let err = resolve_catalog("sewers", dir.path()).unwrap_err();
        match &err {
            CatalogIoError::NotFound { name, available } => {
                assert_eq!(name, "sewers");
                assert_eq!(available, &vec!["caves".to_string(), "tombs".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(err.to_string().contains("caves, tombs"));
    }

    #[test]
    fn errors_name_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.ron");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, CatalogIoError::Io { .. }));
        assert!(err.to_string().contains("missing.ron"));
    }

    #[test]
    fn catalog_filename_sanitizes() {
        assert_eq!(catalog_filename("Sunken Crypt"), "sunken_crypt.ron");
        assert_eq!(catalog_filename("Level-2"), "level-2.ron");
        assert_eq!(catalog_filename("Boss Room!"), "boss_room_.ron");
    }
}
