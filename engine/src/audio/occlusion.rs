//! Acoustic occlusion scene
//!
//! [`AcousticEngine`] is the contract level geometry submits opaque volumes
//! through. [`OcclusionScene`] is the in-process implementation: it validates
//! submissions against the world bounds it was constructed with and answers
//! line-of-sight transmission queries.

use crate::audio::material::{AcousticMaterial, MaterialLibrary, MaterialTag};
use crate::audio::raycast::{ray_box_intersection, AudioRay};
use crate::core::handle::{SlotKey, Slots};
use crate::geometry::bounds::WorldBounds;
use glam::Vec3;
use tracing::{debug, trace};

/// Opaque reference to a volume registered with an acoustic engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcousticHandle(SlotKey);

impl AcousticHandle {
    /// Wrap a key minted by an engine's own handle table
    pub fn from_key(key: SlotKey) -> Self {
        Self(key)
    }

    pub fn key(&self) -> SlotKey {
        self.0
    }
}

/// Reasons an acoustic engine refuses a submission
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AcousticError {
    #[error("volume at {position} with size {size} lies outside the world bounds")]
    OutOfBounds { position: Vec3, size: Vec3 },

    #[error("volume size {0} must be positive on every axis")]
    DegenerateVolume(Vec3),

    #[error("acoustic handle {0:?} is not registered")]
    UnknownHandle(AcousticHandle),
}

/// Consumer of opaque volumes
pub trait AcousticEngine {
    /// Register an opaque box; the handle stays valid until removed
    fn add_volume(
        &mut self,
        size: Vec3,
        material: MaterialTag,
        position: Vec3,
    ) -> Result<AcousticHandle, AcousticError>;

    /// Unregister a box previously returned by [`AcousticEngine::add_volume`]
    fn remove_volume(&mut self, handle: AcousticHandle) -> Result<(), AcousticError>;

    /// Whether `handle` is currently registered
    fn contains(&self, handle: AcousticHandle) -> bool;
}

/// A registered opaque box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneVolume {
    pub position: Vec3,
    pub size: Vec3,
    pub material: MaterialTag,
}

impl SceneVolume {
    pub fn min(&self) -> Vec3 {
        self.position - self.size * 0.5
    }

    pub fn max(&self) -> Vec3 {
        self.position + self.size * 0.5
    }
}

/// Bounded in-memory acoustic scene
#[derive(Debug, Clone)]
pub struct OcclusionScene {
    bounds: WorldBounds,
    materials: MaterialLibrary,
    volumes: Slots<SceneVolume>,
    submissions: usize,
}

impl OcclusionScene {
    /// Create a scene covering `bounds`
    pub fn new(bounds: WorldBounds, materials: MaterialLibrary) -> Self {
        debug!(min = ?bounds.min, max = ?bounds.max, "Created occlusion scene");
        Self {
            bounds,
            materials,
            volumes: Slots::new(),
            submissions: 0,
        }
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    /// Number of volumes currently registered
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Total accepted `add_volume` calls since construction
    pub fn submission_count(&self) -> usize {
        self.submissions
    }

    pub fn get(&self, handle: AcousticHandle) -> Option<&SceneVolume> {
        self.volumes.get(handle.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AcousticHandle, &SceneVolume)> {
        self.volumes
            .iter()
            .map(|(key, volume)| (AcousticHandle(key), volume))
    }

    /// Materials of every volume the segment `from -> to` passes through
    pub fn occluders_between(&self, from: Vec3, to: Vec3) -> Vec<AcousticMaterial> {
        let Some((ray, distance)) = AudioRay::between(from, to) else {
            return Vec::new();
        };

        self.volumes
            .iter()
            .filter(|(_, volume)| {
                ray_box_intersection(&ray, volume.min(), volume.max(), distance).is_some()
            })
            .map(|(_, volume)| self.materials.get(volume.material))
            .collect()
    }

    /// Fraction of sound passing straight from `from` to `to`
    pub fn transmission_between(&self, from: Vec3, to: Vec3) -> f32 {
        let transmission = self
            .occluders_between(from, to)
            .iter()
            .fold(1.0, |acc, material| acc * material.transmission);
        trace!(?from, ?to, transmission, "Line-of-sight transmission");
        transmission
    }
}

impl AcousticEngine for OcclusionScene {
    fn add_volume(
        &mut self,
        size: Vec3,
        material: MaterialTag,
        position: Vec3,
    ) -> Result<AcousticHandle, AcousticError> {
        if size.cmple(Vec3::ZERO).any() {
            return Err(AcousticError::DegenerateVolume(size));
        }

        let volume = SceneVolume {
            position,
            size,
            material,
        };
        if !self.bounds.contains_box(volume.min(), volume.max()) {
            return Err(AcousticError::OutOfBounds { position, size });
        }

        self.submissions += 1;
        let handle = AcousticHandle(self.volumes.insert(volume));
        trace!(?handle, ?position, ?size, "Added acoustic volume");
        Ok(handle)
    }

    fn remove_volume(&mut self, handle: AcousticHandle) -> Result<(), AcousticError> {
        self.volumes
            .remove(handle.0)
            .map(|_| trace!(?handle, "Removed acoustic volume"))
            .ok_or(AcousticError::UnknownHandle(handle))
    }

    fn contains(&self, handle: AcousticHandle) -> bool {
        self.volumes.contains(handle.0)
    }
}
