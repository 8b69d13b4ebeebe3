//! Arena of placed dungeon parts and the links between them.
//!
//! The arena owns every node of a generation run. Parent and child links are
//! plain handles, and destroying a node only marks its slot, so handles held
//! elsewhere stay valid and simply report the node as gone.

use std::collections::HashMap;
use std::sync::Arc;

use dv_core::{Aabb, PartArchetype, Placement};
use dv_spatial::ColliderId;

/// Position of an exit socket in its part's exit list.
pub type ExitIndex = usize;

/// Index of a node in a [`DungeonGraph`]. Never reused within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u32);

impl NodeHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Identity of this node's volume in a spatial index.
    pub fn collider(self) -> ColliderId {
        ColliderId::Part(self.0)
    }
}

/// Lifecycle of a node.
///
/// `Pending -> CollisionChecking -> Destroyed`, or
/// `Pending -> CollisionChecking -> Resolving -> Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NodeState {
    /// Instantiated, not yet checked.
    #[default]
    Pending,
    CollisionChecking,
    /// Collision-clear, spawning into its exits.
    Resolving,
    /// Exits processed; a stable part of the level.
    Active,
    Destroyed,
}

/// Whether an exit socket has a live neighbour attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Resolved(NodeHandle),
    Unresolved,
}

/// A placed instance of an archetype.
#[derive(Debug, Clone)]
pub struct DungeonPart {
    pub(crate) archetype: Arc<PartArchetype>,
    pub(crate) placement: Placement,
    pub(crate) exits: Vec<Placement>,
    pub(crate) bounds: Aabb,
    pub(crate) adjacent: HashMap<ExitIndex, NodeHandle>,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) exit_from_parent: Option<ExitIndex>,
    pub(crate) depth: u32,
    pub(crate) state: NodeState,
}

impl DungeonPart {
    /// Place `archetype` at `placement`. World exits and bounds are fixed here.
    pub fn new(archetype: Arc<PartArchetype>, placement: Placement) -> Self {
        let exits = archetype.world_exits(&placement);
        let bounds = archetype.world_bounds(&placement);
        Self {
            archetype,
            placement,
            exits,
            bounds,
            adjacent: HashMap::new(),
            parent: None,
            exit_from_parent: None,
            depth: 0,
            state: NodeState::Pending,
        }
    }

    /// Attach under `parent` at its exit `exit`, one generation deeper.
    pub fn attached_to(mut self, parent: NodeHandle, exit: ExitIndex, parent_depth: u32) -> Self {
        self.parent = Some(parent);
        self.exit_from_parent = Some(exit);
        self.depth = parent_depth + 1;
        self
    }

    pub fn archetype(&self) -> &Arc<PartArchetype> {
        &self.archetype
    }

    pub fn name(&self) -> &str {
        &self.archetype.name
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// World-space exit sockets, in archetype declaration order.
    pub fn exits(&self) -> &[Placement] {
        &self.exits
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// The node that spawned this one. `None` for the root.
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Which of the parent's exits this node occupies. `None` for the root.
    pub fn exit_from_parent(&self) -> Option<ExitIndex> {
        self.exit_from_parent
    }

    /// Spawn generation; 0 for the root.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Recorded child for `exit`, which may since have been destroyed.
    pub fn adjacent(&self, exit: ExitIndex) -> Option<NodeHandle> {
        self.adjacent.get(&exit).copied()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena owning every node of one generation run.
#[derive(Debug, Clone, Default)]
pub struct DungeonGraph {
    nodes: Vec<DungeonPart>,
    root: Option<NodeHandle>,
}

impl DungeonGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node and return its handle. The first parentless node becomes the root.
    pub fn insert(&mut self, part: DungeonPart) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len() as u32);
        if part.parent.is_none() && self.root.is_none() {
            self.root = Some(handle);
        }
        self.nodes.push(part);
        handle
    }

    pub fn root(&self) -> Option<NodeHandle> {
        self.root
    }

    /// Node in any state, destroyed nodes included.
    pub fn get(&self, handle: NodeHandle) -> Option<&DungeonPart> {
        self.nodes.get(handle.index())
    }

    pub(crate) fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut DungeonPart> {
        self.nodes.get_mut(handle.index())
    }

    /// Node only if it has not been destroyed.
    pub fn get_alive(&self, handle: NodeHandle) -> Option<&DungeonPart> {
        self.get(handle)
            .filter(|part| part.state != NodeState::Destroyed)
    }

    pub fn is_alive(&self, handle: NodeHandle) -> bool {
        self.get_alive(handle).is_some()
    }

    pub(crate) fn set_state(&mut self, handle: NodeHandle, state: NodeState) {
        if let Some(part) = self.get_mut(handle) {
            part.state = state;
        }
    }

    /// Free a node's slot. Links pointing at it become stale, not dangling.
    pub(crate) fn mark_destroyed(&mut self, handle: NodeHandle) {
        self.set_state(handle, NodeState::Destroyed);
    }

    /// Record `child` as occupying `exit` of `parent`.
    pub(crate) fn link(&mut self, parent: NodeHandle, exit: ExitIndex, child: NodeHandle) {
        if let Some(part) = self.get_mut(parent) {
            part.adjacent.insert(exit, child);
        }
    }

    /// Resolved only if the recorded child for `exit` is still alive.
    pub fn exit_status(&self, handle: NodeHandle, exit: ExitIndex) -> ExitStatus {
        match self.get(handle).and_then(|part| part.adjacent(exit)) {
            Some(child) if self.is_alive(child) => ExitStatus::Resolved(child),
            _ => ExitStatus::Unresolved,
        }
    }

    /// Exits of `handle` eligible for a new spawn, in declaration order.
    pub fn unresolved_exits(&self, handle: NodeHandle) -> Vec<ExitIndex> {
        let Some(part) = self.get(handle) else {
            return Vec::new();
        };
        (0..part.exits.len())
            .filter(|exit| self.exit_status(handle, *exit) == ExitStatus::Unresolved)
            .collect()
    }

    /// Live children of `handle`, in exit order.
    pub fn children(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let Some(part) = self.get(handle) else {
            return Vec::new();
        };
        (0..part.exits.len())
            .filter_map(|exit| match self.exit_status(handle, exit) {
                ExitStatus::Resolved(child) => Some(child),
                ExitStatus::Unresolved => None,
            })
            .collect()
    }

    /// Every live node, in creation order.
    pub fn live_nodes(&self) -> impl Iterator<Item = (NodeHandle, &DungeonPart)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, part)| part.state != NodeState::Destroyed)
            .map(|(index, part)| (NodeHandle(index as u32), part))
    }

    pub fn len_alive(&self) -> usize {
        self.live_nodes().count()
    }

    /// Slots ever allocated, destroyed ones included.
    pub fn len_total(&self) -> usize {
        self.nodes.len()
    }
}
