//! Recursive dungeon growth.
//!
//! A part is activated right after it is created: it checks its volume
//! against everything already in the world, destroys itself on overlap, and
//! otherwise spawns one random part into each of its unresolved exits. Every
//! spawned part is activated before the spawning call returns, so the graph
//! grows depth-first along a synchronous call chain whose height is bounded
//! by `max_depth`.

use std::sync::Arc;

use bevy::log::{debug, info, warn};
use dv_core::{PartArchetype, Placement, SpawnableCatalog};
use dv_spatial::{ColliderId, SpatialIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::graph::{DungeonGraph, DungeonPart, ExitIndex, ExitStatus, NodeHandle, NodeState};
use crate::host::PartHost;
use crate::layout::{DeadEnd, DeadEndReason, DungeonLayout, GenerationReport};

/// Result of activating a part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Collision-clear; `children` parts were spawned into its exits.
    Placed { children: usize },
    /// Overlapped `with` and was destroyed.
    Collided { with: ColliderId },
    /// The part had already left the `Pending` state.
    AlreadyActivated,
}

/// Result of spawning into one exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(NodeHandle),
    /// The exit already had a live part attached.
    Occupied(NodeHandle),
    DeadEnd(DeadEndReason),
}

/// State of a single generation run.
pub struct Generator<'a, R, S, H> {
    catalog: Arc<SpawnableCatalog>,
    config: &'a GenerationConfig,
    rng: R,
    index: &'a mut S,
    host: &'a mut H,
    graph: DungeonGraph,
    report: GenerationReport,
    alive: usize,
}

impl<'a, R: Rng, S: SpatialIndex, H: PartHost> Generator<'a, R, S, H> {
    /// `index` may already hold obstacles; parts are checked against them too.
    pub fn new(
        catalog: Arc<SpawnableCatalog>,
        config: &'a GenerationConfig,
        rng: R,
        index: &'a mut S,
        host: &'a mut H,
    ) -> Self {
        Self {
            catalog,
            config,
            rng,
            index,
            host,
            graph: DungeonGraph::new(),
            report: GenerationReport::default(),
            alive: 0,
        }
    }

    pub fn graph(&self) -> &DungeonGraph {
        &self.graph
    }

    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    /// Create the root part. It stays `Pending` until [`activate`](Self::activate).
    pub fn place_root(&mut self, archetype: Arc<PartArchetype>, placement: Placement) -> NodeHandle {
        let handle = self.insert_part(DungeonPart::new(archetype, placement));
        debug!("Placed root {:?} at {:?}", handle, placement.translation);
        handle
    }

    fn insert_part(&mut self, part: DungeonPart) -> NodeHandle {
        let archetype = Arc::clone(part.archetype());
        let bounds = *part.bounds();
        let handle = self.graph.insert(part);
        self.index.insert(handle.collider(), bounds);
        if let Some(part) = self.graph.get(handle) {
            self.host.instantiate(handle, &archetype, part);
        }
        self.report.instantiated += 1;
        self.alive += 1;
        handle
    }

    /// Run the collision check and then exit resolution, once.
    ///
    /// A colliding part is destroyed. For the root there is nobody to retry
    /// and the collision is returned as [`GenerationError::OrphanCollision`].
    pub fn activate(&mut self, node: NodeHandle) -> Result<Activation, GenerationError> {
        let part = self.graph.get(node).ok_or(GenerationError::UnknownNode(node))?;
        if part.state() != NodeState::Pending {
            return Ok(Activation::AlreadyActivated);
        }
        let is_root = part.is_root();

        self.graph.set_state(node, NodeState::CollisionChecking);
        if let Some(collider) = self.check_collisions(node) {
            warn!(
                "Collision detected between {:?} ({}) and {:?}. Destroying part.",
                node,
                self.part_name(node),
                collider
            );
            self.report.collisions += 1;
            self.destroy(node);
            if is_root {
                return Err(GenerationError::OrphanCollision {
                    root: node,
                    collider,
                });
            }
            return Ok(Activation::Collided { with: collider });
        }

        self.graph.set_state(node, NodeState::Resolving);
        let children = self.resolve_exits(node)?;
        self.graph.set_state(node, NodeState::Active);
        Ok(Activation::Placed { children })
    }

    /// First collider other than `node` itself that overlaps its volume.
    ///
    /// This only reports; [`activate`](Self::activate) destroys the part when
    /// a collider is found.
    pub fn check_collisions(&self, node: NodeHandle) -> Option<ColliderId> {
        let part = self.graph.get_alive(node)?;
        self.index
            .query(part.bounds())
            .into_iter()
            .find(|id| *id != node.collider())
    }

    /// Spawn into every unresolved exit of `node`. Returns how many parts survived.
    ///
    /// Exits whose recorded child has been destroyed count as unresolved.
    pub fn resolve_exits(&mut self, node: NodeHandle) -> Result<usize, GenerationError> {
        if !self.graph.is_alive(node) {
            return Err(GenerationError::UnknownNode(node));
        }
        let mut spawned = 0;
        for exit in self.graph.unresolved_exits(node) {
            if let SpawnOutcome::Spawned(_) = self.spawn(node, exit)? {
                spawned += 1;
            }
        }
        Ok(spawned)
    }

    /// Attach one random part to `exit` of `node` and activate it.
    ///
    /// If the new part collides, a fresh archetype is rolled for the same
    /// exit, up to `max_retries_per_exit` times.
    pub fn spawn(&mut self, node: NodeHandle, exit: ExitIndex) -> Result<SpawnOutcome, GenerationError> {
        let part = self
            .graph
            .get_alive(node)
            .ok_or(GenerationError::UnknownNode(node))?;
        let socket = *part
            .exits()
            .get(exit)
            .ok_or(GenerationError::UnknownExit { node, exit })?;
        let depth = part.depth();

        if let ExitStatus::Resolved(child) = self.graph.exit_status(node, exit) {
            return Ok(SpawnOutcome::Occupied(child));
        }

        if depth >= self.config.max_depth {
            warn!("Spawn limit reached at {:?} exit {} (depth {}).", node, exit, depth);
            return Ok(self.dead_end(node, exit, DeadEndReason::DepthLimit));
        }

        let mut retries = 0;
        loop {
            if self.config.max_parts.is_some_and(|max| self.alive >= max) {
                warn!("Part limit reached; leaving {:?} exit {} open.", node, exit);
                return Ok(self.dead_end(node, exit, DeadEndReason::PartLimit));
            }

            let Some(archetype) = self.catalog.pick(&mut self.rng).cloned() else {
                warn!("No spawnable dungeon parts available.");
                return Ok(self.dead_end(node, exit, DeadEndReason::EmptyCatalog));
            };

            let child_part = DungeonPart::new(archetype, socket).attached_to(node, exit, depth);
            let child = self.insert_part(child_part);
            self.graph.link(node, exit, child);
            debug!(
                "Spawned {} as {:?} at {:?} exit {} (depth {})",
                self.part_name(child),
                child,
                node,
                exit,
                depth + 1
            );

            match self.activate(child)? {
                Activation::Collided { .. } => {
                    if retries >= self.config.max_retries_per_exit {
                        warn!(
                            "Giving up on {:?} exit {} after {} retries.",
                            node, exit, retries
                        );
                        return Ok(self.dead_end(node, exit, DeadEndReason::RetriesExhausted));
                    }
                    retries += 1;
                    self.report.retries += 1;
                }
                Activation::Placed { .. } | Activation::AlreadyActivated => {
                    self.report.clear_dead_end(node, exit);
                    return Ok(SpawnOutcome::Spawned(child));
                }
            }
        }
    }

    /// Remove a live part from the world. Its slot stays in the arena.
    pub fn destroy(&mut self, node: NodeHandle) {
        if !self.graph.is_alive(node) {
            return;
        }
        self.index.remove(node.collider());
        self.graph.mark_destroyed(node);
        self.host.destroy(node);
        self.alive -= 1;
    }

    fn dead_end(&mut self, node: NodeHandle, exit: ExitIndex, reason: DeadEndReason) -> SpawnOutcome {
        self.report.record_dead_end(DeadEnd { node, exit, reason });
        SpawnOutcome::DeadEnd(reason)
    }

    fn part_name(&self, node: NodeHandle) -> &str {
        self.graph.get(node).map(|part| part.name()).unwrap_or("?")
    }

    pub fn finish(self) -> DungeonLayout {
        let layout = DungeonLayout {
            graph: self.graph,
            report: self.report,
        };
        info!(
            "Dungeon generated: {} parts, depth {}, {} collisions, {} dead ends.",
            layout.part_count(),
            layout.max_depth_reached(),
            layout.report.collisions,
            layout.report.dead_ends.len()
        );
        layout
    }
}

/// Generate a dungeon rooted at `root`, seeded from `config.seed`.
pub fn generate<S: SpatialIndex, H: PartHost>(
    catalog: Arc<SpawnableCatalog>,
    config: &GenerationConfig,
    root: Arc<PartArchetype>,
    placement: Placement,
    index: &mut S,
    host: &mut H,
) -> Result<DungeonLayout, GenerationError> {
    config.validate()?;
    catalog.validate()?;

    let rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut generator = Generator::new(catalog, config, rng, index, host);
    let root = generator.place_root(root, placement);
    generator.activate(root)?;
    Ok(generator.finish())
}

/// Generate a dungeon whose root is the catalog's entrance archetype.
pub fn generate_from_entrance<S: SpatialIndex, H: PartHost>(
    catalog: Arc<SpawnableCatalog>,
    config: &GenerationConfig,
    placement: Placement,
    index: &mut S,
    host: &mut H,
) -> Result<DungeonLayout, GenerationError> {
    let root = catalog
        .entrance()
        .cloned()
        .ok_or(GenerationError::NoEntrance)?;
    generate(catalog, config, root, placement, index, host)
}
