//! Live collision scene read by movement resolution

use super::volume::CollisionVolume;
use crate::core::handle::{SlotKey, Slots};
use glam::Vec3;
use tracing::trace;

/// Push-out passes per resolve call; corners need two, the rest is slack
const MAX_RESOLVE_PASSES: usize = 4;

/// Stable reference to a volume in a [`CollisionWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionHandle(SlotKey);

/// Ordered set of collision volumes addressed by stable handles
#[derive(Debug, Default, Clone)]
pub struct CollisionWorld {
    volumes: Slots<CollisionVolume>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a volume and return its handle
    pub fn insert(&mut self, volume: CollisionVolume) -> CollisionHandle {
        let handle = CollisionHandle(self.volumes.insert(volume));
        trace!(?handle, position = ?volume.position, size = ?volume.size, "Inserted collision volume");
        handle
    }

    /// Remove a volume; stale handles return `None` and touch nothing
    pub fn remove(&mut self, handle: CollisionHandle) -> Option<CollisionVolume> {
        let removed = self.volumes.remove(handle.0);
        trace!(?handle, removed = removed.is_some(), "Removed collision volume");
        removed
    }

    pub fn get(&self, handle: CollisionHandle) -> Option<&CollisionVolume> {
        self.volumes.get(handle.0)
    }

    pub fn contains(&self, handle: CollisionHandle) -> bool {
        self.volumes.contains(handle.0)
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Iterate volumes in storage order
    pub fn iter(&self) -> impl Iterator<Item = (CollisionHandle, &CollisionVolume)> {
        self.volumes
            .iter()
            .map(|(key, volume)| (CollisionHandle(key), volume))
    }

    /// Whether an upright cylinder at `feet` touches any volume
    pub fn blocked(&self, feet: Vec3, radius: f32, height: f32) -> bool {
        self.iter()
            .any(|(_, volume)| volume.intersects_cylinder(feet, radius, height))
    }

    /// Push an upright cylinder out of every volume it intersects
    pub fn resolve(&self, feet: Vec3, radius: f32, height: f32) -> Vec3 {
        let mut position = feet;

        for _ in 0..MAX_RESOLVE_PASSES {
            let mut moved = false;
            for (_, volume) in self.iter() {
                if let Some(push) = volume.push_out(position, radius, height) {
                    position += push;
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }

        position
    }
}
