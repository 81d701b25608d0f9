//! Doors: an opaque volume and a collision volume that come and go together
//!
//! A closed door has its volume registered in both scenes; an open door has
//! it in neither. Transitions touch the acoustic engine first, so a refused
//! submission leaves the door in its previous state with both scenes
//! untouched.

use crate::audio::device::{AudioDevice, SourceHandle};
use crate::audio::occlusion::{AcousticEngine, AcousticError, AcousticHandle};
use crate::geometry::room::RoomId;
use crate::geometry::volume::OpaqueVolume;
use crate::physics::{CollisionHandle, CollisionWorld};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Index of a door within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoorId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorState {
    Closed,
    Open,
}

/// Sound paths for a door; paths are opaque to the level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoorCues {
    /// One-shot played when the door opens
    pub open: Option<String>,
    /// One-shot played when the door closes
    pub close: Option<String>,
    /// Loop audible while the door is closed (e.g. a draught behind it)
    pub ambient_loop: Option<String>,
    /// Loop volume while closed; `None` uses the level default
    pub loop_volume: Option<f32>,
}

impl DoorCues {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: Some(open.into()),
            close: Some(close.into()),
            ..Default::default()
        }
    }

    pub fn with_loop(mut self, path: impl Into<String>, volume: f32) -> Self {
        self.ambient_loop = Some(path.into());
        self.loop_volume = Some(volume);
        self
    }
}

/// Door filling one room opening
#[derive(Debug, Clone)]
pub struct Door {
    id: DoorId,
    room: RoomId,
    opening: String,
    volume: OpaqueVolume,
    state: DoorState,
    cues: DoorCues,
    loop_volume: f32,
    acoustic: Option<AcousticHandle>,
    collision: Option<CollisionHandle>,
    loop_source: Option<SourceHandle>,
    built: bool,
    toggle_requested: bool,
}

impl Door {
    pub(crate) fn new(
        id: DoorId,
        room: RoomId,
        opening: impl Into<String>,
        volume: OpaqueVolume,
        cues: DoorCues,
        default_loop_volume: f32,
    ) -> Self {
        let loop_volume = cues.loop_volume.unwrap_or(default_loop_volume).clamp(0.0, 1.0);
        Self {
            id,
            room,
            opening: opening.into(),
            volume,
            state: DoorState::Closed,
            cues,
            loop_volume,
            acoustic: None,
            collision: None,
            loop_source: None,
            built: false,
            toggle_requested: false,
        }
    }

    pub fn id(&self) -> DoorId {
        self.id
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn opening(&self) -> &str {
        &self.opening
    }

    pub fn position(&self) -> Vec3 {
        self.volume.position
    }

    pub fn size(&self) -> Vec3 {
        self.volume.size
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DoorState::Open
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn acoustic_handle(&self) -> Option<AcousticHandle> {
        self.acoustic
    }

    pub fn collision_handle(&self) -> Option<CollisionHandle> {
        self.collision
    }

    pub fn loop_source(&self) -> Option<SourceHandle> {
        self.loop_source
    }

    pub(crate) fn request_toggle(&mut self) {
        self.toggle_requested = true;
    }

    pub(crate) fn take_toggle_request(&mut self) -> bool {
        std::mem::take(&mut self.toggle_requested)
    }

    /// Register the closed door in both scenes and start its loop
    ///
    /// Runs once; later calls do nothing.
    pub fn build<A: AcousticEngine + ?Sized>(
        &mut self,
        acoustic: &mut A,
        collision: &mut CollisionWorld,
        audio: &mut dyn AudioDevice,
    ) -> Result<(), AcousticError> {
        if self.built {
            return Ok(());
        }

        if self.state == DoorState::Closed {
            self.insert_volumes(acoustic, collision)?;
        }

        if let Some(path) = &self.cues.ambient_loop {
            let volume = if self.is_open() { 0.0 } else { self.loop_volume };
            match audio.play_positional(path, self.volume.position, true, volume) {
                Ok(handle) => self.loop_source = Some(handle),
                Err(e) => warn!(door = self.id.0, error = %e, "Failed to start door loop"),
            }
        }

        self.built = true;
        debug!(door = self.id.0, position = ?self.volume.position, "Built door");
        Ok(())
    }

    /// Open the door; returns whether a transition happened
    pub fn open<A: AcousticEngine + ?Sized>(
        &mut self,
        acoustic: &mut A,
        collision: &mut CollisionWorld,
        audio: &mut dyn AudioDevice,
    ) -> Result<bool, AcousticError> {
        if self.state == DoorState::Open {
            return Ok(false);
        }

        if let Some(handle) = self.acoustic {
            acoustic.remove_volume(handle)?;
            self.acoustic = None;
        }
        if let Some(handle) = self.collision.take() {
            collision.remove(handle);
        }
        self.state = DoorState::Open;

        self.play_cue(self.cues.open.clone(), audio);
        self.set_loop_volume(0.0, audio);
        info!(door = self.id.0, "Door opened");
        Ok(true)
    }

    /// Close the door; returns whether a transition happened
    pub fn close<A: AcousticEngine + ?Sized>(
        &mut self,
        acoustic: &mut A,
        collision: &mut CollisionWorld,
        audio: &mut dyn AudioDevice,
    ) -> Result<bool, AcousticError> {
        if self.state == DoorState::Closed {
            return Ok(false);
        }

        self.insert_volumes(acoustic, collision)?;
        self.state = DoorState::Closed;

        self.play_cue(self.cues.close.clone(), audio);
        self.set_loop_volume(self.loop_volume, audio);
        info!(door = self.id.0, "Door closed");
        Ok(true)
    }

    /// Flip the door state
    pub fn toggle<A: AcousticEngine + ?Sized>(
        &mut self,
        acoustic: &mut A,
        collision: &mut CollisionWorld,
        audio: &mut dyn AudioDevice,
    ) -> Result<bool, AcousticError> {
        match self.state {
            DoorState::Closed => self.open(acoustic, collision, audio),
            DoorState::Open => self.close(acoustic, collision, audio),
        }
    }

    /// Stop the closed-door loop, if one is playing
    pub fn stop_loop(&mut self, audio: &mut dyn AudioDevice) {
        if let Some(handle) = self.loop_source.take() {
            if let Err(e) = audio.stop(handle) {
                warn!(door = self.id.0, error = %e, "Failed to stop door loop");
            }
        }
    }

    /// Whether both scenes agree with the door state
    pub fn is_synchronized<A: AcousticEngine + ?Sized>(
        &self,
        acoustic: &A,
        collision: &CollisionWorld,
    ) -> bool {
        let in_acoustic = self.acoustic.is_some_and(|h| acoustic.contains(h));
        let in_collision = self.collision.is_some_and(|h| collision.contains(h));
        in_acoustic == in_collision && in_collision == !self.is_open()
    }

    fn insert_volumes<A: AcousticEngine + ?Sized>(
        &mut self,
        acoustic: &mut A,
        collision: &mut CollisionWorld,
    ) -> Result<(), AcousticError> {
        let handle = acoustic.add_volume(self.volume.size, self.volume.material, self.volume.position)?;
        self.acoustic = Some(handle);
        self.collision = Some(collision.insert(self.volume.collision_volume()));
        Ok(())
    }

    fn play_cue(&self, path: Option<String>, audio: &mut dyn AudioDevice) {
        let Some(path) = path else {
            return;
        };
        if let Err(e) = audio.play_positional(&path, self.volume.position, false, 1.0) {
            warn!(door = self.id.0, path = %path, error = %e, "Failed to play door cue");
        }
    }

    fn set_loop_volume(&self, volume: f32, audio: &mut dyn AudioDevice) {
        if let Some(handle) = self.loop_source {
            if let Err(e) = audio.set_volume(handle, volume) {
                warn!(door = self.id.0, error = %e, "Failed to set door loop volume");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::device::RecordingAudioDevice;
    use crate::audio::material::MaterialLibrary;
    use crate::audio::occlusion::OcclusionScene;
    use crate::geometry::bounds::WorldBounds;

    fn setup() -> (Door, OcclusionScene, CollisionWorld, RecordingAudioDevice) {
        let materials = MaterialLibrary::with_presets();
        let wood = materials.tag("wood").unwrap();
        let door = Door::new(
            DoorId(0),
            RoomId(0),
            "front",
            OpaqueVolume::new(Vec3::new(0.0, 0.0, 1.1), Vec3::new(2.0, 0.2, 2.2), wood),
            DoorCues::new("open.ogg", "close.ogg").with_loop("wind.ogg", 0.4),
            0.5,
        );
        let scene = OcclusionScene::new(
            WorldBounds::new(Vec3::splat(-10.0), Vec3::splat(10.0)),
            materials,
        );
        (door, scene, CollisionWorld::new(), RecordingAudioDevice::new())
    }

    #[test]
    fn test_build_registers_once() {
        let (mut door, mut scene, mut collision, mut audio) = setup();
        door.build(&mut scene, &mut collision, &mut audio).unwrap();
        door.build(&mut scene, &mut collision, &mut audio).unwrap();

        assert_eq!(scene.len(), 1);
        assert_eq!(collision.len(), 1);
        assert_eq!(audio.live_sources(), 1);
        assert!(door.is_synchronized(&scene, &collision));

        let source = audio.source(door.loop_source().unwrap()).unwrap();
        assert_eq!(source.volume, 0.4);
    }

    #[test]
    fn test_open_close_cycle_keeps_scenes_in_sync() {
        let (mut door, mut scene, mut collision, mut audio) = setup();
        door.build(&mut scene, &mut collision, &mut audio).unwrap();
        let loop_source = door.loop_source().unwrap();

        assert!(door.open(&mut scene, &mut collision, &mut audio).unwrap());
        assert!(door.is_open());
        assert!(scene.is_empty());
        assert!(collision.is_empty());
        assert!(door.is_synchronized(&scene, &collision));
        assert_eq!(audio.source(loop_source).unwrap().volume, 0.0);

        assert!(door.close(&mut scene, &mut collision, &mut audio).unwrap());
        assert_eq!(scene.len(), 1);
        assert_eq!(collision.len(), 1);
        assert!(door.is_synchronized(&scene, &collision));
        assert_eq!(audio.source(loop_source).unwrap().volume, 0.4);

        let paths = audio.played_paths();
        assert_eq!(paths, vec!["wind.ogg", "open.ogg", "close.ogg"]);
    }

    #[test]
    fn test_repeated_requests_are_no_ops() {
        let (mut door, mut scene, mut collision, mut audio) = setup();
        door.build(&mut scene, &mut collision, &mut audio).unwrap();

        assert!(!door.close(&mut scene, &mut collision, &mut audio).unwrap());
        assert!(door.open(&mut scene, &mut collision, &mut audio).unwrap());
        assert!(!door.open(&mut scene, &mut collision, &mut audio).unwrap());

        assert_eq!(audio.played_paths(), vec!["wind.ogg", "open.ogg"]);
    }

    #[test]
    fn test_reclosing_does_not_disturb_other_collision_volumes() {
        let (mut door, mut scene, mut collision, mut audio) = setup();
        door.build(&mut scene, &mut collision, &mut audio).unwrap();

        door.open(&mut scene, &mut collision, &mut audio).unwrap();
        let other = collision.insert(crate::physics::CollisionVolume::new(Vec3::X * 5.0, Vec3::ONE));
        door.close(&mut scene, &mut collision, &mut audio).unwrap();
        door.open(&mut scene, &mut collision, &mut audio).unwrap();

        assert!(collision.contains(other));
        assert_eq!(collision.len(), 1);
    }

    #[test]
    fn test_rejected_build_registers_nothing() {
        let (mut door, _, mut collision, mut audio) = setup();
        // Scene too small to hold the door volume
        let mut tiny = OcclusionScene::new(
            WorldBounds::new(Vec3::splat(-0.1), Vec3::splat(0.1)),
            MaterialLibrary::with_presets(),
        );

        let result = door.build(&mut tiny, &mut collision, &mut audio);
        assert!(matches!(result, Err(AcousticError::OutOfBounds { .. })));
        assert!(collision.is_empty());
        assert!(!door.is_built());
    }
}
