//! Shared level fixtures for the integration tests

#![allow(dead_code)]

use echo_engine::prelude::*;

pub const HALL_DOOR: &str = "corridor0_from";

/// Two rooms joined by an east-west corridor with a door at the hall end
///
/// The hall spans x in [-5, 5], the study x in [16, 24]; the door box sits
/// at x in [5.0, 5.2], y in [-1, 1], z in [0, 3].
pub struct SampleLevel {
    pub level: MapAssembly<OcclusionScene>,
    pub hall: RoomId,
    pub study: RoomId,
    pub door: DoorId,
}

pub fn sample_level(config: LevelConfig) -> SampleLevel {
    let mut level = MapAssembly::new(config, MaterialLibrary::with_presets());
    let hall = level.add_room(RoomSpec::new(
        "hall",
        Vec3::ZERO,
        Vec3::new(10.0, 10.0, 3.0),
        0.2,
    ));
    let study = level.add_room(RoomSpec::new(
        "study",
        Vec3::new(20.0, 0.0, 0.0),
        Vec3::new(8.0, 8.0, 3.0),
        0.2,
    ));
    level
        .add_corridor(hall, Side::East, study, Side::West, 2.0)
        .expect("both rooms exist");

    let cues = DoorCues {
        ambient_loop: Some("hum.ogg".to_string()),
        ..DoorCues::new("door_open.ogg", "door_close.ogg")
    };
    let door = level
        .add_door(hall, HALL_DOOR, cues)
        .expect("corridor opening exists");

    SampleLevel {
        level,
        hall,
        study,
        door,
    }
}

/// Compute bounds, attach a fresh occlusion scene and build
pub fn build(level: &mut MapAssembly<OcclusionScene>, audio: &mut dyn AudioDevice) {
    let bounds = level.calculate_bounds();
    let scene = OcclusionScene::new(bounds, level.materials().clone());
    level.attach_acoustic(scene).expect("no engine attached yet");
    level.build(audio).expect("level builds");
}

pub fn built_sample(audio: &mut dyn AudioDevice) -> SampleLevel {
    let mut sample = sample_level(LevelConfig::default());
    build(&mut sample.level, audio);
    sample
}
