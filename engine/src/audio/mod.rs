//! Acoustic side of a level
//!
//! This module provides:
//! - Acoustic materials and the library that names them
//! - The acoustic engine contract and an in-memory occlusion scene
//! - Segment/box ray tests used for line-of-sight occlusion
//! - The positional audio device contract and its headless doubles
//! - Looping ambient sources

pub mod ambient;
pub mod device;
pub mod material;
pub mod occlusion;
pub mod raycast;

// Re-export commonly used types
pub use ambient::AmbientSource;
pub use device::{
    AudioCall, AudioDevice, AudioError, NullAudioDevice, RecordedSource, RecordingAudioDevice,
    SourceHandle,
};
pub use material::{calculate_occlusion, AcousticMaterial, MaterialLibrary, MaterialTag};
pub use occlusion::{AcousticEngine, AcousticError, AcousticHandle, OcclusionScene};
pub use raycast::{ray_box_intersection, AudioRay};
