//! Axis-aligned collision volumes and cylinder tests

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box used for movement blocking
///
/// Stored as center + full size; `min`/`max` are derived. The z axis is up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionVolume {
    pub position: Vec3,
    pub size: Vec3,
}

impl CollisionVolume {
    /// Create a volume from its center and full size
    pub fn new(position: Vec3, size: Vec3) -> Self {
        Self { position, size }
    }

    /// Create a volume from min and max corners
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            position: (min + max) * 0.5,
            size: max - min,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.position - self.size * 0.5
    }

    pub fn max(&self) -> Vec3 {
        self.position + self.size * 0.5
    }

    /// Check if this volume overlaps another
    pub fn overlaps(&self, other: &CollisionVolume) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x
            && a_max.x >= b_min.x
            && a_min.y <= b_max.y
            && a_max.y >= b_min.y
            && a_min.z <= b_max.z
            && a_max.z >= b_min.z
    }

    /// Whether a point lies inside or on the surface of the volume
    pub fn contains_point(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.cmpge(min).all() && point.cmple(max).all()
    }

    /// Sphere test: closest point on the box within `radius` of `point`
    pub fn intersects_point_radius(&self, point: Vec3, radius: f32) -> bool {
        let closest = point.clamp(self.min(), self.max());
        closest.distance_squared(point) <= radius * radius
    }

    /// Upright cylinder test; `feet` is the bottom center of the cylinder
    pub fn intersects_cylinder(&self, feet: Vec3, radius: f32, height: f32) -> bool {
        let (min, max) = (self.min(), self.max());
        if feet.z + height <= min.z || feet.z >= max.z {
            return false;
        }

        let planar = Vec2::new(feet.x, feet.y);
        let closest = planar.clamp(min.truncate(), max.truncate());
        closest.distance_squared(planar) < radius * radius
    }

    /// Smallest translation that moves the cylinder out of this volume
    ///
    /// The box is grown by `radius` horizontally and the cylinder is pushed
    /// along whichever of the six faces needs the shortest move. Returns `None`
    /// when the cylinder does not intersect the volume.
    pub fn push_out(&self, feet: Vec3, radius: f32, height: f32) -> Option<Vec3> {
        if !self.intersects_cylinder(feet, radius, height) {
            return None;
        }

        let (min, max) = (self.min(), self.max());
        let candidates = [
            Vec3::new(min.x - radius - feet.x, 0.0, 0.0),
            Vec3::new(max.x + radius - feet.x, 0.0, 0.0),
            Vec3::new(0.0, min.y - radius - feet.y, 0.0),
            Vec3::new(0.0, max.y + radius - feet.y, 0.0),
            Vec3::new(0.0, 0.0, min.z - (feet.z + height)),
            Vec3::new(0.0, 0.0, max.z - feet.z),
        ];

        candidates
            .into_iter()
            .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> CollisionVolume {
        CollisionVolume::new(Vec3::ZERO, Vec3::splat(2.0))
    }

    #[test]
    fn test_min_max_round_trip() {
        let volume = CollisionVolume::from_min_max(Vec3::new(0.0, 1.0, 2.0), Vec3::new(4.0, 3.0, 6.0));
        assert_eq!(volume.position, Vec3::new(2.0, 2.0, 4.0));
        assert_eq!(volume.size, Vec3::new(4.0, 2.0, 4.0));
        assert_eq!(volume.min(), Vec3::new(0.0, 1.0, 2.0));
    }

    #[test]
    fn test_overlap() {
        let a = CollisionVolume::from_min_max(Vec3::ZERO, Vec3::ONE);
        let b = CollisionVolume::from_min_max(Vec3::splat(0.5), Vec3::splat(1.5));
        let c = CollisionVolume::from_min_max(Vec3::splat(2.0), Vec3::splat(3.0));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_point_radius() {
        let volume = unit_box();
        assert!(volume.intersects_point_radius(Vec3::new(1.4, 0.0, 0.0), 0.5));
        assert!(!volume.intersects_point_radius(Vec3::new(1.6, 0.0, 0.0), 0.5));
        assert!(volume.contains_point(Vec3::new(0.5, -0.5, 1.0)));
    }

    #[test]
    fn test_cylinder_respects_height_band() {
        let volume = unit_box();
        // Standing on top of the box is not an intersection
        assert!(!volume.intersects_cylinder(Vec3::new(0.0, 0.0, 1.0), 0.3, 1.8));
        // Head below the box bottom
        assert!(!volume.intersects_cylinder(Vec3::new(0.0, 0.0, -3.0), 0.3, 1.8));
        assert!(volume.intersects_cylinder(Vec3::new(1.2, 0.0, -1.0), 0.3, 1.8));
    }

    #[test]
    fn test_push_out_uses_minimum_penetration_axis() {
        let volume = CollisionVolume::from_min_max(Vec3::new(0.0, -5.0, 0.0), Vec3::new(0.2, 5.0, 3.0));

        let push = volume.push_out(Vec3::new(-0.1, 0.0, 0.0), 0.3, 1.8).unwrap();
        assert!((push.x + 0.2).abs() < 1e-5);
        assert_eq!(push.y, 0.0);
        assert_eq!(push.z, 0.0);

        let moved = Vec3::new(-0.1, 0.0, 0.0) + push;
        assert!(volume.push_out(moved, 0.3, 1.8).is_none());
    }
}
