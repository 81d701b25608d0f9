//! Headless walkthrough of the demo level
//!
//! Builds the level, then walks a player from the hall through the door into
//! the study and up the stair onto the loft, logging what the acoustic scene
//! lets through along the way. Pass a JSON config path as the first argument
//! to override the level defaults.

mod level;

use echo_engine::prelude::*;
use std::error::Error;
use tracing::{info, warn};

const DT: f32 = 0.1;
const WALK_SPEED: f32 = 2.0;
const EAR_HEIGHT: f32 = 1.6;

fn main() -> Result<(), Box<dyn Error>> {
    echo_engine::init_logging();
    info!("Starting level walkthrough");

    let config = match std::env::args().nth(1) {
        Some(path) => LevelConfig::load(&path)?,
        None => LevelConfig::default(),
    };

    let mut audio = RecordingAudioDevice::new();
    let mut demo = level::define(config)?;
    level::build(&mut demo, &mut audio)?;

    let mut world = World::new();
    let player = world.spawn_actor("player", Vec3::new(2.0, 0.0, 0.0));
    world.insert_one(player, Interactor::default())?;

    log_hearing(&world, &demo, player, "Door closed");

    // The door is closed, so this walk ends against it
    if !walk_to(&mut world, &mut demo, &mut audio, player, Vec2::new(8.0, 0.0), 40)? {
        info!(position = ?position(&world, player), "Blocked by the door");
    }

    world.insert_one(player, InteractRequest)?;
    run_tick(&mut world, &mut demo.level, &mut audio, DT)?;
    log_hearing(&world, &demo, player, "Door open");

    let route = [
        Vec2::new(16.6, 0.0),
        Vec2::new(16.6, -2.75),
        Vec2::new(21.0, -2.75),
        Vec2::new(22.5, -2.75),
    ];
    for waypoint in route {
        if !walk_to(&mut world, &mut demo, &mut audio, player, waypoint, 100)? {
            warn!(?waypoint, position = ?position(&world, player), "Waypoint not reached");
        }
    }

    let feet = position(&world, player);
    let in_study = world.get::<CurrentRoom>(player)?.0 == Some(demo.study);
    info!(
        position = ?feet,
        floor = demo.level.floor_height(feet),
        on_stair = demo.level.is_on_stair(feet),
        in_study,
        "Reached the loft"
    );

    demo.level.set_door_open(demo.door, false, &mut audio)?;
    info!(
        synchronized = demo.level.door_synchronized(demo.door)?,
        "Closed the door behind the player"
    );

    demo.level.stop_sounds(&mut audio);
    info!(
        audio_calls = audio.calls().len(),
        played = ?audio.played_paths(),
        hall = ?demo.level.room(demo.hall).map(|room| room.name.as_str()),
        "Walkthrough finished"
    );
    Ok(())
}

fn position(world: &World, player: Entity) -> Vec3 {
    world
        .get::<Transform>(player)
        .map(|transform| transform.position)
        .unwrap_or_default()
}

/// Steer towards `target` until within reach of it; returns whether it was reached
fn walk_to(
    world: &mut World,
    demo: &mut level::DemoLevel,
    audio: &mut dyn AudioDevice,
    player: Entity,
    target: Vec2,
    max_ticks: usize,
) -> Result<bool, Box<dyn Error>> {
    for _ in 0..max_ticks {
        let offset = target - position(world, player).truncate();
        let velocity = &mut world.query_one_mut::<&mut Velocity>(player)?.0;
        if offset.length() < WALK_SPEED * DT {
            velocity.x = 0.0;
            velocity.y = 0.0;
            return Ok(true);
        }

        let step = offset.normalize() * WALK_SPEED;
        velocity.x = step.x;
        velocity.y = step.y;
        run_tick(world, &mut demo.level, audio, DT)?;
    }
    Ok(false)
}

fn log_hearing(world: &World, demo: &level::DemoLevel, player: Entity, label: &str) {
    let Some(scene) = demo.level.acoustic() else {
        return;
    };
    let ear = position(world, player) + Vec3::Z * EAR_HEIGHT;
    let occluders = scene.occluders_between(ear, demo.fireplace);
    info!(
        transmission = scene.transmission_between(ear, demo.fireplace),
        occlusion = echo_engine::audio::calculate_occlusion(&occluders),
        occluders = occluders.len(),
        "{label}"
    );
}
