use dv_core::CatalogError;
use dv_spatial::ColliderId;

use crate::graph::{ExitIndex, NodeHandle};

/// Error type for a generation run.
///
/// Collisions of non-root parts, empty catalogs and the depth limit are
/// handled inside the run and show up in the
/// [`GenerationReport`](crate::GenerationReport) instead.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The root part overlaps existing geometry; there is no parent to retry.
    OrphanCollision {
        root: NodeHandle,
        collider: ColliderId,
    },
    /// The handle does not name a live node.
    UnknownNode(NodeHandle),
    /// The node has no exit with this index.
    UnknownExit { node: NodeHandle, exit: ExitIndex },
    /// No archetype is available for the root part.
    NoEntrance,
    InvalidConfig(String),
    Catalog(CatalogError),
}

impl From<CatalogError> for GenerationError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrphanCollision { root, collider } => write!(
                f,
                "root part {:?} collides with {:?}; generation cannot recover",
                root, collider
            ),
            Self::UnknownNode(node) => write!(f, "no live dungeon part {:?}", node),
            Self::UnknownExit { node, exit } => {
                write!(f, "dungeon part {:?} has no exit {}", node, exit)
            }
            Self::NoEntrance => write!(f, "catalog has no archetype for the root part"),
            Self::InvalidConfig(reason) => write!(f, "invalid generation config: {}", reason),
            Self::Catalog(e) => write!(f, "catalog error: {}", e),
        }
    }
}

impl std::error::Error for GenerationError {}
