//! Components used by level actors

use crate::geometry::room::RoomId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Position of the actor's feet in world space
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub position: Vec3,
}

impl Transform {
    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }
}

/// Linear velocity in units per second
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Velocity(pub Vec3);

/// Upright cylinder used for collision
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Body {
    pub radius: f32,
    pub height: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            radius: 0.3,
            height: 1.8,
        }
    }
}

/// Present while the actor stands on a floor, platform or stair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grounded {
    pub on_stair: bool,
}

/// Actor able to operate doors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Interactor {
    /// Maximum distance to a door's box
    pub reach: f32,
}

impl Default for Interactor {
    fn default() -> Self {
        Self { reach: 1.5 }
    }
}

/// One-tick marker: interact with whatever is in reach
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractRequest;

/// Room the actor stood in at the end of the last tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentRoom(pub Option<RoomId>);

/// Name component for user-friendly entity identification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    /// Create a new name component
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
