//! Positional audio device contract
//!
//! Level code only ever plays, re-levels and stops positional sources; the
//! mixer behind the trait is somebody else's problem. Two implementations
//! ship here: [`NullAudioDevice`] for headless runs and
//! [`RecordingAudioDevice`], which remembers every call.

use glam::Vec3;
use std::collections::HashMap;
use tracing::debug;

/// Handle to a playing sound instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceHandle(u64);

impl SourceHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Errors reported by an audio device
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AudioError {
    #[error("failed to play {path}: {reason}")]
    Playback { path: String, reason: String },

    #[error("sound source {0:?} is not playing")]
    UnknownSource(SourceHandle),
}

/// Positional audio output
pub trait AudioDevice {
    /// Start a sound at `position`
    fn play_positional(
        &mut self,
        path: &str,
        position: Vec3,
        looping: bool,
        volume: f32,
    ) -> Result<SourceHandle, AudioError>;

    /// Change the volume of a playing source
    fn set_volume(&mut self, handle: SourceHandle, volume: f32) -> Result<(), AudioError>;

    /// Stop a playing source
    fn stop(&mut self, handle: SourceHandle) -> Result<(), AudioError>;
}

/// Device that accepts everything and plays nothing
#[derive(Debug, Default)]
pub struct NullAudioDevice {
    next_id: u64,
}

impl NullAudioDevice {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioDevice for NullAudioDevice {
    fn play_positional(
        &mut self,
        path: &str,
        position: Vec3,
        looping: bool,
        volume: f32,
    ) -> Result<SourceHandle, AudioError> {
        let handle = SourceHandle(self.next_id);
        self.next_id += 1;
        debug!(path, ?position, looping, volume, id = handle.0, "Playing sound (no output)");
        Ok(handle)
    }

    fn set_volume(&mut self, handle: SourceHandle, volume: f32) -> Result<(), AudioError> {
        debug!(id = handle.0, volume, "Set source volume (no output)");
        Ok(())
    }

    fn stop(&mut self, handle: SourceHandle) -> Result<(), AudioError> {
        debug!(id = handle.0, "Stopped source (no output)");
        Ok(())
    }
}

/// One call received by a [`RecordingAudioDevice`]
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Play {
        path: String,
        position: Vec3,
        looping: bool,
        volume: f32,
        handle: SourceHandle,
    },
    SetVolume {
        handle: SourceHandle,
        volume: f32,
    },
    Stop {
        handle: SourceHandle,
    },
}

/// State of a source started on a [`RecordingAudioDevice`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSource {
    pub path: String,
    pub position: Vec3,
    pub looping: bool,
    pub volume: f32,
}

/// Device that records calls and tracks live sources
///
/// One-shot sounds are recorded but not kept as live sources, since a real
/// mixer would drop them once they finish.
#[derive(Debug, Default)]
pub struct RecordingAudioDevice {
    calls: Vec<AudioCall>,
    sources: HashMap<SourceHandle, RecordedSource>,
    next_id: u64,
}

impl RecordingAudioDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in arrival order
    pub fn calls(&self) -> &[AudioCall] {
        &self.calls
    }

    /// Paths passed to `play_positional`, in order
    pub fn played_paths(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                AudioCall::Play { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Live looping source, if still playing
    pub fn source(&self, handle: SourceHandle) -> Option<&RecordedSource> {
        self.sources.get(&handle)
    }

    /// Number of live looping sources
    pub fn live_sources(&self) -> usize {
        self.sources.len()
    }
}

impl AudioDevice for RecordingAudioDevice {
    fn play_positional(
        &mut self,
        path: &str,
        position: Vec3,
        looping: bool,
        volume: f32,
    ) -> Result<SourceHandle, AudioError> {
        let handle = SourceHandle(self.next_id);
        self.next_id += 1;

        self.calls.push(AudioCall::Play {
            path: path.to_string(),
            position,
            looping,
            volume,
            handle,
        });
        if looping {
            self.sources.insert(
                handle,
                RecordedSource {
                    path: path.to_string(),
                    position,
                    looping,
                    volume,
                },
            );
        }
        Ok(handle)
    }

    fn set_volume(&mut self, handle: SourceHandle, volume: f32) -> Result<(), AudioError> {
        self.calls.push(AudioCall::SetVolume { handle, volume });
        let source = self
            .sources
            .get_mut(&handle)
            .ok_or(AudioError::UnknownSource(handle))?;
        source.volume = volume;
        Ok(())
    }

    fn stop(&mut self, handle: SourceHandle) -> Result<(), AudioError> {
        self.calls.push(AudioCall::Stop { handle });
        self.sources
            .remove(&handle)
            .map(|_| ())
            .ok_or(AudioError::UnknownSource(handle))
    }
}
