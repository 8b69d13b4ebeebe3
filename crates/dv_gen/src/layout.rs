//! Result of a generation run.

use std::collections::BTreeMap;

use crate::graph::{DungeonGraph, DungeonPart, ExitIndex, NodeHandle};

/// Why an exit was left permanently unresolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeadEndReason {
    /// The part had already reached the configured maximum depth.
    DepthLimit,
    /// The catalog had nothing to spawn.
    EmptyCatalog,
    /// Every replacement rolled for this exit collided.
    RetriesExhausted,
    /// The dungeon reached its part cap.
    PartLimit,
}

impl DeadEndReason {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DepthLimit => "depth limit",
            Self::EmptyCatalog => "empty catalog",
            Self::RetriesExhausted => "retries exhausted",
            Self::PartLimit => "part limit",
        }
    }
}

/// An exit that was given up on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeadEnd {
    pub node: NodeHandle,
    pub exit: ExitIndex,
    pub reason: DeadEndReason,
}

/// Counters collected while generating.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Parts created, including those later destroyed.
    pub instantiated: usize,
    /// Parts destroyed by their own collision check.
    pub collisions: usize,
    /// Replacement spawns issued after a collision.
    pub retries: usize,
    pub dead_ends: Vec<DeadEnd>,
}

impl GenerationReport {
    /// Record a dead end, replacing any earlier entry for the same exit.
    pub(crate) fn record_dead_end(&mut self, dead_end: DeadEnd) {
        match self
            .dead_ends
            .iter_mut()
            .find(|existing| existing.node == dead_end.node && existing.exit == dead_end.exit)
        {
            Some(existing) => *existing = dead_end,
            None => self.dead_ends.push(dead_end),
        }
    }

    pub(crate) fn clear_dead_end(&mut self, node: NodeHandle, exit: ExitIndex) {
        self.dead_ends
            .retain(|existing| !(existing.node == node && existing.exit == exit));
    }

    pub fn dead_ends_for(&self, reason: DeadEndReason) -> usize {
        self.dead_ends
            .iter()
            .filter(|dead_end| dead_end.reason == reason)
            .count()
    }
}

/// A completed dungeon: the graph of surviving parts plus run statistics.
#[derive(Debug, Clone)]
pub struct DungeonLayout {
    pub graph: DungeonGraph,
    pub report: GenerationReport,
}

impl DungeonLayout {
    pub fn root(&self) -> Option<NodeHandle> {
        self.graph.root()
    }

    pub fn parts(&self) -> impl Iterator<Item = (NodeHandle, &DungeonPart)> {
        self.graph.live_nodes()
    }

    pub fn part_count(&self) -> usize {
        self.graph.len_alive()
    }

    pub fn max_depth_reached(&self) -> u32 {
        self.parts().map(|(_, part)| part.depth()).max().unwrap_or(0)
    }

    /// Live parts per archetype name.
    pub fn archetype_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for (_, part) in self.parts() {
            *counts.entry(part.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Live parts at each depth, indexed by depth.
    pub fn parts_per_depth(&self) -> Vec<usize> {
        let mut counts = vec![0; self.max_depth_reached() as usize + 1];
        for (_, part) in self.parts() {
            counts[part.depth() as usize] += 1;
        }
        counts
    }

    /// Every pair of live parts whose volumes intersect. Empty for a valid layout.
    pub fn overlapping_pairs(&self) -> Vec<(NodeHandle, NodeHandle)> {
        let parts: Vec<_> = self.parts().collect();
        let mut pairs = Vec::new();
        for (i, (a, part_a)) in parts.iter().enumerate() {
            for (b, part_b) in &parts[i + 1..] {
                if part_a.bounds().intersects(part_b.bounds()) {
                    pairs.push((*a, *b));
                }
            }
        }
        pairs
    }
}
