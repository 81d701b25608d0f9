//! Ambient sound sources placed in a level

use crate::audio::device::{AudioDevice, SourceHandle};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Looping positional sound started once the level geometry is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientSource {
    /// Sound file path, opaque to the level
    pub sound_path: String,
    /// World position
    pub position: Vec3,
    /// Playback volume (0.0 to 1.0)
    pub volume: f32,
}

impl AmbientSource {
    pub fn new(sound_path: impl Into<String>, position: Vec3, volume: f32) -> Self {
        Self {
            sound_path: sound_path.into(),
            position,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Start the loop; device failures are logged and yield `None`
    pub fn start(&self, audio: &mut dyn AudioDevice) -> Option<SourceHandle> {
        match audio.play_positional(&self.sound_path, self.position, true, self.volume) {
            Ok(handle) => {
                debug!(path = %self.sound_path, position = ?self.position, "Started ambient source");
                Some(handle)
            }
            Err(e) => {
                warn!(path = %self.sound_path, error = %e, "Failed to start ambient source");
                None
            }
        }
    }
}
