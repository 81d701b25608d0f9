//! Level definition, world bounds and the build sequence
//!
//! A level goes through three phases:
//!
//! 1. Definition: rooms, corridors, doors, stairs, platforms and ambient
//!    sources are registered. Volumes submitted now are queued.
//! 2. Bounds: [`MapAssembly::calculate_bounds`] folds every extent into a
//!    [`WorldBounds`], which the caller uses to construct its acoustic engine
//!    and hand it over with [`MapAssembly::attach_acoustic`].
//! 3. Build: [`MapAssembly::build`] flushes the queue once, then compiles
//!    rooms, corridors, doors, stairs and starts ambient sources, in that
//!    order.
//!
//! Any rejection from the acoustic engine aborts the build. The level is then
//! marked failed and refuses further builds, because its two scenes no longer
//! describe the same geometry.

use super::door::{Door, DoorCues, DoorId};
use super::height::HeightResolver;
use super::LevelError;
use crate::audio::ambient::AmbientSource;
use crate::audio::device::{AudioDevice, SourceHandle};
use crate::audio::material::MaterialLibrary;
use crate::audio::occlusion::{AcousticEngine, AcousticError, AcousticHandle};
use crate::config::LevelConfig;
use crate::geometry::{
    compile_corridor, compile_room, compile_stair, corridor_extent, CompileContext, CorridorSpec,
    OpaqueVolume,
    Opening, PendingVolume, Platform, RoomId, RoomSpec, Side, StairDefinition, WorldBounds,
};
use crate::physics::{CollisionHandle, CollisionWorld};
use glam::Vec3;
use tracing::{debug, error, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildState {
    Defining,
    Built,
    Failed,
}

/// Handles of a static volume applied to the live scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticVolume {
    pub acoustic: AcousticHandle,
    pub collision: Option<CollisionHandle>,
}

/// Owner of a level's definitions and of its live acoustic and collision scenes
#[derive(Debug)]
pub struct MapAssembly<A: AcousticEngine> {
    config: LevelConfig,
    materials: MaterialLibrary,
    rooms: Vec<RoomSpec>,
    corridors: Vec<CorridorSpec>,
    doors: Vec<Door>,
    heights: HeightResolver,
    ambient: Vec<AmbientSource>,
    ambient_sources: Vec<SourceHandle>,
    pending: Vec<PendingVolume>,
    bounds: Option<WorldBounds>,
    acoustic: Option<A>,
    collision: CollisionWorld,
    statics: Vec<StaticVolume>,
    state: BuildState,
}

impl<A: AcousticEngine> MapAssembly<A> {
    pub fn new(config: LevelConfig, materials: MaterialLibrary) -> Self {
        Self {
            config,
            materials,
            rooms: Vec::new(),
            corridors: Vec::new(),
            doors: Vec::new(),
            heights: HeightResolver::new(),
            ambient: Vec::new(),
            ambient_sources: Vec::new(),
            pending: Vec::new(),
            bounds: None,
            acoustic: None,
            collision: CollisionWorld::new(),
            statics: Vec::new(),
            state: BuildState::Defining,
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    // Definition

    pub fn add_room(&mut self, room: RoomSpec) -> RoomId {
        self.warn_if_built("room");
        let id = RoomId(self.rooms.len());
        debug!(room = %room.name, id = id.0, "Added room");
        self.rooms.push(room);
        id
    }

    /// Register an opening; an existing opening with the same id is replaced
    pub fn add_opening(
        &mut self,
        room: RoomId,
        id: impl Into<String>,
        opening: Opening,
    ) -> Result<(), LevelError> {
        self.warn_if_built("opening");
        let spec = self
            .rooms
            .get_mut(room.0)
            .ok_or(LevelError::UnknownRoom(room))?;
        let id = id.into();
        if spec.add_opening(id.clone(), opening).is_some() {
            debug!(room = %spec.name, opening = %id, "Replaced opening");
        }
        Ok(())
    }

    /// Connect two rooms and cut a centred opening into each connected wall
    ///
    /// The openings are named `corridor{n}_from` and `corridor{n}_to`, so a
    /// door can be placed in either.
    pub fn add_corridor(
        &mut self,
        from: RoomId,
        from_side: Side,
        to: RoomId,
        to_side: Side,
        width: f32,
    ) -> Result<usize, LevelError> {
        self.warn_if_built("corridor");
        let from_height = self.room_or_err(from)?.size.z;
        let to_height = self.room_or_err(to)?.size.z;
        let height = from_height.min(to_height);

        let index = self.corridors.len();
        self.rooms[from.0].add_opening(
            format!("corridor{index}_from"),
            Opening::new(from_side, width, height),
        );
        self.rooms[to.0].add_opening(
            format!("corridor{index}_to"),
            Opening::new(to_side, width, height),
        );

        self.corridors.push(CorridorSpec {
            from,
            from_side,
            to,
            to_side,
            width,
        });
        debug!(index, from = from.0, to = to.0, width, "Added corridor");
        Ok(index)
    }

    /// Place a door in a room opening
    ///
    /// A missing room or opening is logged and yields `None`.
    pub fn add_door(&mut self, room: RoomId, opening_id: &str, cues: DoorCues) -> Option<DoorId> {
        self.warn_if_built("door");
        let Some(spec) = self.rooms.get(room.0) else {
            warn!(room = room.0, opening = opening_id, "Door references a missing room");
            return None;
        };
        let Some(opening) = spec.opening(opening_id) else {
            warn!(room = %spec.name, opening = opening_id, "Door references a missing opening");
            return None;
        };

        let size = if opening.side.runs_along_x() {
            Vec3::new(opening.width, spec.wall_thickness, opening.height)
        } else {
            Vec3::new(spec.wall_thickness, opening.width, opening.height)
        };
        let volume = OpaqueVolume::new(
            spec.opening_center(opening),
            size,
            self.materials.resolve(&self.config.materials.door),
        );

        let id = DoorId(self.doors.len());
        self.doors.push(Door::new(
            id,
            room,
            opening_id,
            volume,
            cues,
            self.config.doors.loop_volume,
        ));
        debug!(door = id.0, room = %spec.name, opening = opening_id, "Added door");
        Some(id)
    }

    pub fn add_stair(&mut self, stair: StairDefinition) -> usize {
        self.warn_if_built("stair");
        let index = self.heights.add_stair(stair);
        debug!(index, start = ?stair.start, "Added stair");
        index
    }

    /// Register a platform and submit its slab
    pub fn add_platform(&mut self, platform: Platform) -> Result<usize, LevelError> {
        let slab = platform.volume(&CompileContext::new(&self.materials, &self.config));
        self.submit(slab)?;
        let index = self.heights.add_platform(platform);
        debug!(index, height = platform.height, "Added platform");
        Ok(index)
    }

    pub fn add_ambient(&mut self, source: AmbientSource) {
        self.ambient.push(source);
    }

    /// Apply a volume now if the acoustic engine is attached, otherwise queue it
    pub fn submit(&mut self, volume: PendingVolume) -> Result<(), LevelError> {
        match self.acoustic.as_mut() {
            Some(acoustic) => {
                self.statics
                    .push(apply(acoustic, &mut self.collision, volume)?);
            }
            None => {
                self.pending.push(volume);
                trace!(queued = self.pending.len(), "Queued volume");
            }
        }
        Ok(())
    }

    // Bounds and engine

    /// World bounds enclosing every room, stair and platform plus the margin
    ///
    /// Computed on the first call; later calls return the cached value.
    pub fn calculate_bounds(&mut self) -> WorldBounds {
        if let Some(bounds) = self.bounds {
            return bounds;
        }

        let geometry = &self.config.geometry;
        let ctx = CompileContext::new(&self.materials, &self.config);
        let corridors = self.corridors.iter().filter_map(|corridor| {
            let from = self.rooms.get(corridor.from.0)?;
            let to = self.rooms.get(corridor.to.0)?;
            corridor_extent(
                from,
                corridor.from_side,
                to,
                corridor.to_side,
                corridor.width,
                &ctx,
            )
        });
        let extents = self
            .rooms
            .iter()
            .map(RoomSpec::extent)
            .chain(corridors)
            .chain(
                self.heights
                    .stairs()
                    .iter()
                    .map(|stair| stair.extent(geometry.stair_wall_thickness)),
            )
            .chain(
                self.heights
                    .platforms()
                    .iter()
                    .map(|platform| platform.extent(geometry.platform_thickness)),
            );
        let bounds = WorldBounds::enclosing(extents, geometry.bounds_margin);

        info!(min = ?bounds.min, max = ?bounds.max, "Calculated world bounds");
        self.bounds = Some(bounds);
        bounds
    }

    pub fn bounds(&self) -> Option<WorldBounds> {
        self.bounds
    }

    /// Hand over the acoustic engine built from [`MapAssembly::calculate_bounds`]
    pub fn attach_acoustic(&mut self, engine: A) -> Result<(), LevelError> {
        if self.acoustic.is_some() {
            return Err(LevelError::EngineAlreadyAttached);
        }
        self.acoustic = Some(engine);
        info!(queued = self.pending.len(), "Attached acoustic engine");
        Ok(())
    }

    pub fn is_acoustic_ready(&self) -> bool {
        self.acoustic.is_some()
    }

    pub fn acoustic(&self) -> Option<&A> {
        self.acoustic.as_ref()
    }

    // Build

    /// Apply every queued volume; the queue is empty afterwards
    pub fn flush_pending(&mut self) -> Result<usize, LevelError> {
        let acoustic = self.acoustic.as_mut().ok_or(LevelError::EngineNotReady)?;
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();

        for volume in pending {
            self.statics
                .push(apply(acoustic, &mut self.collision, volume)?);
        }

        if count > 0 {
            info!(count, "Flushed pending volumes");
        }
        Ok(count)
    }

    /// Build the level into the attached acoustic engine and the collision world
    ///
    /// Calling this again after a successful build does nothing.
    pub fn build(&mut self, audio: &mut dyn AudioDevice) -> Result<(), LevelError> {
        match self.state {
            BuildState::Built => {
                debug!("Level already built");
                return Ok(());
            }
            BuildState::Failed => return Err(LevelError::BuildFailed),
            BuildState::Defining => {}
        }
        if self.acoustic.is_none() {
            return Err(LevelError::EngineNotReady);
        }

        match self.run_build(audio) {
            Ok(()) => {
                self.state = BuildState::Built;
                Ok(())
            }
            Err(e) => {
                self.state = BuildState::Failed;
                error!(error = %e, "Level build aborted");
                Err(e)
            }
        }
    }

    fn run_build(&mut self, audio: &mut dyn AudioDevice) -> Result<(), LevelError> {
        let flushed = self.flush_pending()?;
        let ctx = CompileContext::new(&self.materials, &self.config);
        let acoustic = self.acoustic.as_mut().ok_or(LevelError::EngineNotReady)?;
        let before = self.statics.len();

        for room in &self.rooms {
            let volumes = compile_room(room, &ctx);
            apply_all(acoustic, &mut self.collision, &mut self.statics, volumes)?;
        }

        for corridor in &self.corridors {
            let from = self
                .rooms
                .get(corridor.from.0)
                .ok_or(LevelError::UnknownRoom(corridor.from))?;
            let to = self
                .rooms
                .get(corridor.to.0)
                .ok_or(LevelError::UnknownRoom(corridor.to))?;
            let volumes = compile_corridor(
                from,
                corridor.from_side,
                to,
                corridor.to_side,
                corridor.width,
                &ctx,
            );
            apply_all(acoustic, &mut self.collision, &mut self.statics, volumes)?;
        }

        for door in &mut self.doors {
            door.build(acoustic, &mut self.collision, audio)?;
        }

        for stair in self.heights.stairs() {
            let volumes = compile_stair(stair, &ctx);
            apply_all(acoustic, &mut self.collision, &mut self.statics, volumes)?;
        }

        for source in &self.ambient {
            if let Some(handle) = source.start(audio) {
                self.ambient_sources.push(handle);
            }
        }

        info!(
            rooms = self.rooms.len(),
            corridors = self.corridors.len(),
            doors = self.doors.len(),
            stairs = self.heights.stairs().len(),
            ambient = self.ambient_sources.len(),
            volumes = flushed + self.statics.len() - before,
            collision = self.collision.len(),
            "Level built"
        );
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.state == BuildState::Built
    }

    /// Stop every loop the level started
    pub fn stop_sounds(&mut self, audio: &mut dyn AudioDevice) {
        for handle in self.ambient_sources.drain(..) {
            if let Err(e) = audio.stop(handle) {
                warn!(error = %e, "Failed to stop ambient source");
            }
        }
        for door in &mut self.doors {
            door.stop_loop(audio);
        }
    }

    // Doors

    pub fn door(&self, id: DoorId) -> Option<&Door> {
        self.doors.get(id.0)
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Flag a door to toggle on the next [`MapAssembly::update_doors`]
    pub fn request_door_toggle(&mut self, id: DoorId) -> Result<(), LevelError> {
        let door = self.doors.get_mut(id.0).ok_or(LevelError::UnknownDoor(id))?;
        door.request_toggle();
        trace!(door = id.0, "Door toggle requested");
        Ok(())
    }

    /// Apply pending toggle requests, at most one transition per door
    pub fn update_doors(&mut self, audio: &mut dyn AudioDevice) -> Result<usize, LevelError> {
        self.ensure_built()?;
        let acoustic = self.acoustic.as_mut().ok_or(LevelError::EngineNotReady)?;

        let mut transitions = 0;
        for door in &mut self.doors {
            if door.take_toggle_request() && door.toggle(acoustic, &mut self.collision, audio)? {
                transitions += 1;
            }
        }
        Ok(transitions)
    }

    /// Open or close a door; returns whether its state changed
    pub fn set_door_open(
        &mut self,
        id: DoorId,
        open: bool,
        audio: &mut dyn AudioDevice,
    ) -> Result<bool, LevelError> {
        self.ensure_built()?;
        let acoustic = self.acoustic.as_mut().ok_or(LevelError::EngineNotReady)?;
        let door = self.doors.get_mut(id.0).ok_or(LevelError::UnknownDoor(id))?;

        let changed = if open {
            door.open(acoustic, &mut self.collision, audio)?
        } else {
            door.close(acoustic, &mut self.collision, audio)?
        };
        Ok(changed)
    }

    pub fn toggle_door(
        &mut self,
        id: DoorId,
        audio: &mut dyn AudioDevice,
    ) -> Result<bool, LevelError> {
        let open = !self.door(id).ok_or(LevelError::UnknownDoor(id))?.is_open();
        self.set_door_open(id, open, audio)
    }

    /// Whether the door's registrations in both scenes match its state
    pub fn door_synchronized(&self, id: DoorId) -> Result<bool, LevelError> {
        let door = self.door(id).ok_or(LevelError::UnknownDoor(id))?;
        let acoustic = self.acoustic.as_ref().ok_or(LevelError::EngineNotReady)?;
        Ok(door.is_synchronized(acoustic, &self.collision))
    }

    /// Closest door whose box lies within `reach` of `position`
    pub fn nearest_door(&self, position: Vec3, reach: f32) -> Option<DoorId> {
        self.doors
            .iter()
            .map(|door| {
                let half = door.size() * 0.5;
                let closest = position.clamp(door.position() - half, door.position() + half);
                (door.id(), position.distance(closest))
            })
            .filter(|(_, distance)| *distance <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    // Queries

    pub fn room(&self, id: RoomId) -> Option<&RoomSpec> {
        self.rooms.get(id.0)
    }

    pub fn rooms(&self) -> &[RoomSpec] {
        &self.rooms
    }

    pub fn room_id(&self, name: &str) -> Option<RoomId> {
        self.rooms
            .iter()
            .position(|room| room.name == name)
            .map(RoomId)
    }

    pub fn corridors(&self) -> &[CorridorSpec] {
        &self.corridors
    }

    /// First room whose interior contains `position`
    pub fn room_at(&self, position: Vec3) -> Option<&RoomSpec> {
        self.rooms.iter().find(|room| room.contains(position))
    }

    pub fn room_id_at(&self, position: Vec3) -> Option<RoomId> {
        self.rooms
            .iter()
            .position(|room| room.contains(position))
            .map(RoomId)
    }

    pub fn heights(&self) -> &HeightResolver {
        &self.heights
    }

    pub fn floor_height(&self, position: Vec3) -> f32 {
        self.heights.floor_height(position)
    }

    pub fn is_on_stair(&self, position: Vec3) -> bool {
        self.heights.is_on_stair(position)
    }

    pub fn collision(&self) -> &CollisionWorld {
        &self.collision
    }

    /// Static volumes applied so far, in submission order
    pub fn statics(&self) -> &[StaticVolume] {
        &self.statics
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn ambient_sources(&self) -> &[SourceHandle] {
        &self.ambient_sources
    }

    fn room_or_err(&self, id: RoomId) -> Result<&RoomSpec, LevelError> {
        self.rooms.get(id.0).ok_or(LevelError::UnknownRoom(id))
    }

    fn ensure_built(&self) -> Result<(), LevelError> {
        match self.state {
            BuildState::Built => Ok(()),
            BuildState::Failed => Err(LevelError::BuildFailed),
            BuildState::Defining => Err(LevelError::NotBuilt),
        }
    }

    fn warn_if_built(&self, what: &str) {
        if self.state != BuildState::Defining {
            warn!(what, "Level already built; definition will not be compiled");
        }
    }
}

fn apply<A: AcousticEngine + ?Sized>(
    acoustic: &mut A,
    collision: &mut CollisionWorld,
    pending: PendingVolume,
) -> Result<StaticVolume, AcousticError> {
    let volume = pending.volume;
    let acoustic = acoustic.add_volume(volume.size, volume.material, volume.position)?;
    let collision = pending
        .has_collision
        .then(|| collision.insert(volume.collision_volume()));
    Ok(StaticVolume {
        acoustic,
        collision,
    })
}

fn apply_all<A: AcousticEngine + ?Sized>(
    acoustic: &mut A,
    collision: &mut CollisionWorld,
    statics: &mut Vec<StaticVolume>,
    volumes: Vec<PendingVolume>,
) -> Result<(), AcousticError> {
    for volume in volumes {
        statics.push(apply(acoustic, collision, volume)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::device::RecordingAudioDevice;
    use crate::audio::occlusion::OcclusionScene;
    use glam::Vec2;

    fn level() -> MapAssembly<OcclusionScene> {
        MapAssembly::new(LevelConfig::default(), MaterialLibrary::with_presets())
    }

    fn attach(level: &mut MapAssembly<OcclusionScene>) {
        let bounds = level.calculate_bounds();
        let scene = OcclusionScene::new(bounds, level.materials().clone());
        level.attach_acoustic(scene).unwrap();
    }

    #[test]
    fn test_platform_slab_waits_for_engine() {
        let mut level = level();
        level
            .add_platform(Platform::new(Vec2::ZERO, Vec2::splat(2.0), 1.0))
            .unwrap();
        assert_eq!(level.pending_len(), 1);

        attach(&mut level);
        assert_eq!(level.flush_pending().unwrap(), 1);
        assert_eq!(level.flush_pending().unwrap(), 0);
        assert_eq!(level.acoustic().unwrap().submission_count(), 1);

        // With the engine attached, submissions go straight through
        level
            .add_platform(Platform::new(Vec2::splat(3.0), Vec2::splat(4.0), 0.5))
            .unwrap();
        assert_eq!(level.pending_len(), 0);
        assert_eq!(level.acoustic().unwrap().submission_count(), 2);
    }

    #[test]
    fn test_build_requires_engine_and_runs_once() {
        let mut level = level();
        level.add_room(RoomSpec::new("hall", Vec3::ZERO, Vec3::new(6.0, 6.0, 3.0), 0.2));
        let mut audio = RecordingAudioDevice::new();

        assert_eq!(level.build(&mut audio), Err(LevelError::EngineNotReady));

        attach(&mut level);
        level.build(&mut audio).unwrap();
        let submitted = level.acoustic().unwrap().submission_count();
        // Floor, ceiling and one solid piece per wall
        assert_eq!(submitted, 6);
        assert_eq!(level.collision().len(), 4);

        level.build(&mut audio).unwrap();
        assert_eq!(level.acoustic().unwrap().submission_count(), submitted);
    }

    #[test]
    fn test_second_engine_is_rejected() {
        let mut level = level();
        attach(&mut level);
        let extra = OcclusionScene::new(level.calculate_bounds(), MaterialLibrary::new());
        assert_eq!(
            level.attach_acoustic(extra).unwrap_err(),
            LevelError::EngineAlreadyAttached
        );
    }

    #[test]
    fn test_bounds_are_computed_once() {
        let mut level = level();
        level.add_room(RoomSpec::new("a", Vec3::ZERO, Vec3::new(4.0, 4.0, 3.0), 0.2));
        let first = level.calculate_bounds();

        level.add_room(RoomSpec::new("b", Vec3::splat(50.0), Vec3::ONE, 0.2));
        assert_eq!(level.calculate_bounds(), first);
        assert!(first.min.abs_diff_eq(Vec3::new(-7.2, -7.2, -5.2), 1e-4));
        assert!(first.max.abs_diff_eq(Vec3::new(7.2, 7.2, 8.2), 1e-4));
    }

    #[test]
    fn test_diagonal_corridor_fits_inside_bounds() {
        let mut level = level();
        let west = level.add_room(RoomSpec::new(
            "west",
            Vec3::ZERO,
            Vec3::new(10.0, 10.0, 3.0),
            0.2,
        ));
        let east = level.add_room(RoomSpec::new(
            "east",
            Vec3::new(100.0, 85.0, 0.0),
            Vec3::new(10.0, 10.0, 3.0),
            0.2,
        ));
        level
            .add_corridor(west, Side::East, east, Side::West, 2.0)
            .unwrap();

        attach(&mut level);
        let bounds = level.bounds().unwrap();
        // The corridor is laid along x for the full diagonal length
        assert!(bounds.max.x > 110.2);

        let mut audio = RecordingAudioDevice::new();
        level.build(&mut audio).unwrap();
        assert!(level.is_built());
        assert_eq!(level.corridors().len(), 1);
    }

    #[test]
    fn test_door_with_missing_opening_is_skipped() {
        let mut level = level();
        let room = level.add_room(RoomSpec::new("a", Vec3::ZERO, Vec3::new(4.0, 4.0, 3.0), 0.2));

        assert_eq!(level.add_door(room, "nope", DoorCues::default()), None);
        assert_eq!(level.add_door(RoomId(7), "nope", DoorCues::default()), None);
        assert!(level.doors().is_empty());
    }

    #[test]
    fn test_out_of_bounds_volume_fails_build() {
        let mut level = level();
        level.add_room(RoomSpec::new("a", Vec3::ZERO, Vec3::new(4.0, 4.0, 3.0), 0.2));
        let tiny = OcclusionScene::new(
            WorldBounds::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
            MaterialLibrary::with_presets(),
        );
        level.attach_acoustic(tiny).unwrap();

        let mut audio = RecordingAudioDevice::new();
        assert!(matches!(
            level.build(&mut audio),
            Err(LevelError::Acoustic(AcousticError::OutOfBounds { .. }))
        ));
        assert!(!level.is_built());
        assert_eq!(level.build(&mut audio), Err(LevelError::BuildFailed));
    }

    #[test]
    fn test_door_operations_need_a_built_level() {
        let mut level = level();
        let room = level.add_room(
            RoomSpec::new("a", Vec3::ZERO, Vec3::new(4.0, 4.0, 3.0), 0.2)
                .with_opening("door", Opening::new(Side::North, 1.0, 2.0)),
        );
        let door = level.add_door(room, "door", DoorCues::default()).unwrap();
        let mut audio = RecordingAudioDevice::new();

        assert_eq!(
            level.set_door_open(door, true, &mut audio),
            Err(LevelError::NotBuilt)
        );
        assert_eq!(
            level.request_door_toggle(DoorId(3)),
            Err(LevelError::UnknownDoor(DoorId(3)))
        );
    }
}
