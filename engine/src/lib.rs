//! Procedural level geometry with synchronized acoustic and collision scenes
//!
//! This crate compiles rooms, corridors, stairs and doors into axis-aligned
//! volumes and keeps an acoustic occlusion scene and a collision scene in
//! step with each other, including while doors open and close.

pub mod audio;
pub mod config;
pub mod core;
pub mod geometry;
pub mod level;
pub mod physics;

// Re-export commonly used types
pub mod prelude {
    // Entity system types
    pub use crate::core::entity::{
        Body, CurrentRoom, Entity, Grounded, InteractRequest, Interactor, Name, Transform,
        Velocity, World,
    };

    // Math types
    pub use glam::{Vec2, Vec3};

    // Geometry types
    pub use crate::geometry::{
        ClimbDirection, Opening, Platform, RoomId, RoomMaterials, RoomSpec, Side,
        StairDefinition, WorldBounds,
    };

    // Level types
    pub use crate::level::systems::run_tick;
    pub use crate::level::{Door, DoorCues, DoorId, DoorState, LevelError, MapAssembly};

    // Audio types
    pub use crate::audio::{
        AcousticEngine, AmbientSource, AudioDevice, MaterialLibrary, NullAudioDevice,
        OcclusionScene, RecordingAudioDevice,
    };

    // Physics types
    pub use crate::physics::{CollisionHandle, CollisionVolume, CollisionWorld};

    // Config types
    pub use crate::config::LevelConfig;
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
