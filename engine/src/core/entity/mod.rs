//! Entity-Component System (ECS) functionality
//!
//! Components for actors moving through a level and a thin wrapper around
//! `hecs::World`. The systems driving them live in `crate::level::systems`.

pub mod components;
pub mod world;

// Re-export commonly used types
pub use components::{
    Body, CurrentRoom, Grounded, InteractRequest, Interactor, Name, Transform, Velocity,
};
pub use world::World;

// Re-export hecs types that users will need
pub use hecs::Entity;
