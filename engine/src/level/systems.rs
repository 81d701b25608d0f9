//! Per-tick systems driving actors through a built level
//!
//! Run once per tick in this order: [`interaction_system`],
//! [`door_update_system`], [`movement_system`], [`room_tracking_system`].
//! [`run_tick`] does exactly that.

use super::{LevelError, MapAssembly};
use crate::audio::device::AudioDevice;
use crate::audio::occlusion::AcousticEngine;
use crate::core::entity::{
    Body, CurrentRoom, Entity, Grounded, InteractRequest, Interactor, Name, Transform, Velocity,
    World,
};
use tracing::{debug, info, trace, warn};

/// Turn interaction requests into door toggle requests
///
/// Every `InteractRequest` is consumed, whether or not a door was in reach.
/// Returns the number of toggle requests issued.
pub fn interaction_system<A: AcousticEngine>(world: &mut World, level: &mut MapAssembly<A>) -> usize {
    let mut consumed: Vec<Entity> = Vec::new();
    let mut requested = 0;

    for (entity, (transform, interactor)) in world
        .query::<(&Transform, &Interactor)>()
        .with::<&InteractRequest>()
        .iter()
    {
        consumed.push(entity);
        let Some(door) = level.nearest_door(transform.position, interactor.reach) else {
            debug!(?entity, "Nothing in reach to interact with");
            continue;
        };
        match level.request_door_toggle(door) {
            Ok(()) => requested += 1,
            Err(e) => warn!(?entity, error = %e, "Interaction failed"),
        }
    }

    for entity in consumed {
        if let Err(e) = world.remove_one::<InteractRequest>(entity) {
            debug!(?entity, error = %e, "Interaction request already gone");
        }
    }
    requested
}

/// Apply this tick's door toggle requests
pub fn door_update_system<A: AcousticEngine>(
    level: &mut MapAssembly<A>,
    audio: &mut dyn AudioDevice,
) -> Result<usize, LevelError> {
    level.update_doors(audio)
}

/// Integrate velocity, apply gravity, follow the floor and resolve collisions
pub fn movement_system<A: AcousticEngine>(world: &mut World, level: &MapAssembly<A>, dt: f32) {
    let movement = &level.config().movement;
    let mut grounded_updates: Vec<(Entity, Option<Grounded>)> = Vec::new();

    for (entity, (transform, velocity, body, grounded)) in world.query_mut::<(
        &mut Transform,
        &mut Velocity,
        &Body,
        Option<&Grounded>,
    )>() {
        let was_grounded = grounded.is_some();
        velocity.0.z -= movement.gravity * dt;

        let moved = transform.position + velocity.0 * dt;
        let mut next = level.collision().resolve(moved, body.radius, body.height);

        let floor = level.floor_height(next);
        let snap = next.z <= floor
            || (was_grounded && velocity.0.z <= 0.0 && next.z - floor <= movement.step_height);

        let now = if snap {
            next.z = floor;
            velocity.0.z = 0.0;
            Some(Grounded {
                on_stair: level.is_on_stair(next),
            })
        } else {
            None
        };

        if now != grounded.copied() {
            grounded_updates.push((entity, now));
        }
        trace!(?entity, position = ?next, grounded = now.is_some(), "Moved");
        transform.position = next;
    }

    for (entity, grounded) in grounded_updates {
        let result = match grounded {
            Some(grounded) => world.insert_one(entity, grounded).map_err(|e| e.to_string()),
            None => world
                .remove_one::<Grounded>(entity)
                .map(|_| ())
                .map_err(|e| e.to_string()),
        };
        if let Err(error) = result {
            debug!(?entity, %error, "Failed to update grounded state");
        }
    }
}

/// Track which room each actor is in
pub fn room_tracking_system<A: AcousticEngine>(world: &mut World, level: &MapAssembly<A>) {
    for (entity, (transform, current, name)) in
        world.query_mut::<(&Transform, &mut CurrentRoom, Option<&Name>)>()
    {
        let room = level.room_id_at(transform.position);
        if room == current.0 {
            continue;
        }

        let who = name.map_or("unnamed", |name| name.0.as_str());
        match room.and_then(|id| level.room(id)) {
            Some(spec) => info!(?entity, actor = who, room = %spec.name, "Entered room"),
            None => debug!(?entity, actor = who, "Left all rooms"),
        }
        current.0 = room;
    }
}

/// Run every system once, in order
pub fn run_tick<A: AcousticEngine>(
    world: &mut World,
    level: &mut MapAssembly<A>,
    audio: &mut dyn AudioDevice,
    dt: f32,
) -> Result<(), LevelError> {
    interaction_system(world, level);
    door_update_system(level, audio)?;
    movement_system(world, level, dt);
    room_tracking_system(world, level);
    Ok(())
}
