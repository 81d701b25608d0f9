//! Collision scene read by movement resolution
//!
//! Axis-aligned volumes stored behind generation-counted handles, so removing
//! one volume never invalidates a handle to another.

pub mod volume;
pub mod world;

// Re-export commonly used types
pub use volume::CollisionVolume;
pub use world::{CollisionHandle, CollisionWorld};
