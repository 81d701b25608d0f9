//! Volumes produced by the geometry compilers

use crate::audio::material::MaterialTag;
use crate::physics::CollisionVolume;
use glam::Vec3;

/// Axis-aligned opaque box with an acoustic material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpaqueVolume {
    /// Center of the box
    pub position: Vec3,
    /// Full size of the box
    pub size: Vec3,
    pub material: MaterialTag,
}

impl OpaqueVolume {
    pub fn new(position: Vec3, size: Vec3, material: MaterialTag) -> Self {
        Self {
            position,
            size,
            material,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.position - self.size * 0.5
    }

    pub fn max(&self) -> Vec3 {
        self.position + self.size * 0.5
    }

    /// Collision box with identical geometry
    pub fn collision_volume(&self) -> CollisionVolume {
        CollisionVolume::new(self.position, self.size)
    }
}

/// Compiled volume waiting to be applied to the live scenes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingVolume {
    pub volume: OpaqueVolume,
    /// Whether a matching collision volume is created alongside
    pub has_collision: bool,
}

impl PendingVolume {
    /// Volume that blocks both sound and movement
    pub fn solid(volume: OpaqueVolume) -> Self {
        Self {
            volume,
            has_collision: true,
        }
    }

    /// Volume that only blocks sound
    pub fn acoustic_only(volume: OpaqueVolume) -> Self {
        Self {
            volume,
            has_collision: false,
        }
    }
}
