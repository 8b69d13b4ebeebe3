//! Part archetypes: immutable templates for placeable dungeon pieces.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::{Aabb, Placement};

/// Standard wall height used by the built-in shapes.
const WALL_HEIGHT: f32 = 3.0;

/// Half-width of a corridor and of the doorway every built-in shape exposes.
const DOOR_HALF_WIDTH: f32 = 1.0;

/// A named attachment point on a part.
///
/// The offset is relative to the part's origin, and its +Z axis points out
/// of the part into the space a neighbour would occupy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitSocket {
    pub name: String,
    pub offset: Placement,
}

impl ExitSocket {
    pub fn new(name: impl Into<String>, offset: Placement) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }
}

/// Template describing a placeable dungeon part.
///
/// A part's origin is the doorway it is entered through, and its body
/// extends along local +Z. The entry doorway is not listed in `exits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartArchetype {
    /// Unique name within a catalog.
    pub name: String,
    /// Bounding volume in the part's local frame.
    pub bounds: Aabb,
    /// Exit sockets in the part's local frame.
    #[serde(default)]
    pub exits: Vec<ExitSocket>,
}

impl PartArchetype {
    pub fn new(name: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            name: name.into(),
            bounds,
            exits: Vec::new(),
        }
    }

    pub fn with_exit(mut self, name: impl Into<String>, offset: Placement) -> Self {
        self.exits.push(ExitSocket::new(name, offset));
        self
    }

    pub fn exit_count(&self) -> usize {
        self.exits.len()
    }

    /// Bounding volume once the part is placed at `placement`.
    pub fn world_bounds(&self, placement: &Placement) -> Aabb {
        self.bounds.transformed(placement)
    }

    /// Exit sockets once the part is placed at `placement`, in declaration order.
    pub fn world_exits(&self, placement: &Placement) -> Vec<Placement> {
        self.exits
            .iter()
            .map(|exit| placement.compose(&exit.offset))
            .collect()
    }

    /// Straight corridor with a single exit at the far end.
    pub fn corridor(name: impl Into<String>, length: f32) -> Self {
        let bounds = Aabb::new(
            Vec3::new(-DOOR_HALF_WIDTH, 0.0, 0.0),
            Vec3::new(DOOR_HALF_WIDTH, WALL_HEIGHT, length),
        );
        Self::new(name, bounds).with_exit(
            "far",
            Placement::from_translation(Vec3::new(0.0, 0.0, length)),
        )
    }

    /// Rectangular room with exits ahead, left and right.
    pub fn room(name: impl Into<String>, half_width: f32, depth: f32) -> Self {
        let bounds = Aabb::new(
            Vec3::new(-half_width, 0.0, 0.0),
            Vec3::new(half_width, WALL_HEIGHT, depth),
        );
        let mid = depth * 0.5;
        Self::new(name, bounds)
            .with_exit(
                "north",
                Placement::from_translation(Vec3::new(0.0, 0.0, depth)),
            )
            .with_exit(
                "east",
                Placement::from_yaw_degrees(Vec3::new(half_width, 0.0, mid), 90.0),
            )
            .with_exit(
                "west",
                Placement::from_yaw_degrees(Vec3::new(-half_width, 0.0, mid), -90.0),
            )
    }

    /// Corner piece turning right.
    pub fn bend(name: impl Into<String>, size: f32) -> Self {
        let half = size * 0.5;
        let bounds = Aabb::new(
            Vec3::new(-half, 0.0, 0.0),
            Vec3::new(half, WALL_HEIGHT, size),
        );
        Self::new(name, bounds).with_exit(
            "turn",
            Placement::from_yaw_degrees(Vec3::new(half, 0.0, half), 90.0),
        )
    }

    /// Part with no exits. Always a leaf of the dungeon graph.
    pub fn dead_end(name: impl Into<String>, depth: f32) -> Self {
        let bounds = Aabb::new(
            Vec3::new(-DOOR_HALF_WIDTH, 0.0, 0.0),
            Vec3::new(DOOR_HALF_WIDTH, WALL_HEIGHT, depth),
        );
        Self::new(name, bounds)
    }
}
