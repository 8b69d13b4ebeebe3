//! World-space geometry shared by every dungeon part: bounding boxes and
//! rigid placements.

use bevy::math::{EulerRot, Quat, Vec3};
use bevy::prelude::Transform;
use serde::{Deserialize, Serialize};

/// Interiors must overlap by more than this before two boxes intersect.
///
/// Parts attached at an exit share a face with their parent, and rotated
/// corners pick up float noise.
pub const CONTACT_EPSILON: f32 = 1e-3;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "AabbDef", into = "AabbDef")]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners.
    ///
    /// # Panics
    /// Debug-asserts that min <= max on all axes.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all(), "AABB min must be <= max on all axes");
        Self { min, max }
    }

    /// Create a new AABB from center and half-extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// True when min <= max on every axis.
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Check if this AABB contains a point (boundary inclusive).
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Check if the interiors of two boxes overlap.
    ///
    /// Boxes that only touch along a face, edge or corner do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x + CONTACT_EPSILON < other.max.x
            && other.min.x + CONTACT_EPSILON < self.max.x
            && self.min.y + CONTACT_EPSILON < other.max.y
            && other.min.y + CONTACT_EPSILON < self.max.y
            && self.min.z + CONTACT_EPSILON < other.max.z
            && other.min.z + CONTACT_EPSILON < self.max.z
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Smallest box enclosing both.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// The axis-aligned box enclosing this box after applying `placement`.
    pub fn transformed(&self, placement: &Placement) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in self.corners() {
            let p = placement.transform_point(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }
}

#[derive(Serialize, Deserialize)]
struct AabbDef {
    min: [f32; 3],
    max: [f32; 3],
}

impl From<AabbDef> for Aabb {
    fn from(def: AabbDef) -> Self {
        Self {
            min: Vec3::from_array(def.min),
            max: Vec3::from_array(def.max),
        }
    }
}

impl From<Aabb> for AabbDef {
    fn from(aabb: Aabb) -> Self {
        Self {
            min: aabb.min.to_array(),
            max: aabb.max.to_array(),
        }
    }
}

/// Rigid transform: rotation followed by translation.
///
/// In data files placements are written as a translation plus a yaw in
/// degrees about +Y, which covers everything a floor-plan dungeon needs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlacementDef", into = "PlacementDef")]
pub struct Placement {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Placement {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    /// Placement rotated `degrees` about +Y. Positive yaw turns +Z towards +X.
    pub fn from_yaw_degrees(translation: Vec3, degrees: f32) -> Self {
        Self {
            translation,
            rotation: Quat::from_rotation_y(degrees.to_radians()),
        }
    }

    pub fn yaw_degrees(&self) -> f32 {
        let (yaw, _, _) = self.rotation.to_euler(EulerRot::YXZ);
        yaw.to_degrees()
    }

    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * point
    }

    /// Express `local`, given relative to this placement, in this placement's parent frame.
    pub fn compose(&self, local: &Placement) -> Placement {
        Placement {
            translation: self.transform_point(local.translation),
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    /// Local +Z in world space. Exits face out of their part along this axis.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

impl From<Placement> for Transform {
    fn from(placement: Placement) -> Self {
        Transform::from_translation(placement.translation).with_rotation(placement.rotation)
    }
}

#[derive(Serialize, Deserialize)]
struct PlacementDef {
    #[serde(default)]
    translation: [f32; 3],
    #[serde(default)]
    yaw_degrees: f32,
}

impl From<PlacementDef> for Placement {
    fn from(def: PlacementDef) -> Self {
        Placement::from_yaw_degrees(Vec3::from_array(def.translation), def.yaw_degrees)
    }
}

impl From<Placement> for PlacementDef {
    fn from(placement: Placement) -> Self {
        Self {
            translation: placement.translation.to_array(),
            yaw_degrees: placement.yaw_degrees(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn overlapping_boxes_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));
        let b = Aabb::new(Vec3::splat(5.0), Vec3::splat(15.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        // Parts attached at an exit share a face
        let a = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));
        let b = Aabb::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(10.0, 10.0, 20.0));
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn separated_boxes_do_not_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));
        let b = Aabb::new(Vec3::splat(11.0), Vec3::splat(20.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn contained_box_intersects() {
        let outer = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));
        let inner = Aabb::from_center_half_extents(Vec3::splat(5.0), Vec3::ONE);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn yaw_turns_forward_towards_x() {
        let placement = Placement::from_yaw_degrees(Vec3::ZERO, 90.0);
        assert!(approx(placement.forward(), Vec3::X));
        assert!((placement.yaw_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn transformed_box_follows_rotation() {
        let local = Aabb::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 3.0, 4.0));
        let placement = Placement::from_yaw_degrees(Vec3::new(10.0, 0.0, 0.0), 90.0);
        let world = local.transformed(&placement);
        assert!(approx(world.min, Vec3::new(10.0, 0.0, -1.0)));
        assert!(approx(world.max, Vec3::new(14.0, 3.0, 1.0)));
    }

    #[test]
    fn compose_chains_offsets() {
        let parent = Placement::from_yaw_degrees(Vec3::new(0.0, 0.0, 5.0), 90.0);
        let exit = Placement::from_translation(Vec3::new(0.0, 0.0, 4.0));
        let world = parent.compose(&exit);
        assert!(approx(world.translation, Vec3::new(4.0, 0.0, 5.0)));
        assert!(approx(world.forward(), Vec3::X));
    }

    #[test]
    fn placement_converts_to_transform() {
        let placement = Placement::from_yaw_degrees(Vec3::new(1.0, 2.0, 3.0), 180.0);
        let transform = Transform::from(placement);
        assert_eq!(transform.translation, placement.translation);
        assert_eq!(transform.rotation, placement.rotation);
    }
}
