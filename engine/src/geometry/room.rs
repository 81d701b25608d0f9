//! Rectangular rooms and their compilation into volumes

use super::volume::{OpaqueVolume, PendingVolume};
use super::wall::{segment_wall, WallPiece, WallSpan};
use super::CompileContext;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Index of a room within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

/// Wall face of a room; z is up, north is +y and east is +x
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    North,
    South,
    East,
    West,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::South, Side::East, Side::West];

    pub fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::South => Side::North,
            Side::East => Side::West,
            Side::West => Side::East,
        }
    }

    /// Unit vector pointing out of the room through this wall
    pub fn outward(self) -> Vec3 {
        match self {
            Side::North => Vec3::Y,
            Side::South => Vec3::NEG_Y,
            Side::East => Vec3::X,
            Side::West => Vec3::NEG_X,
        }
    }

    /// Whether the wall runs along the x axis
    pub fn runs_along_x(self) -> bool {
        matches!(self, Side::North | Side::South)
    }
}

/// Rectangular gap in a wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub side: Side,
    /// Center of the opening as a fraction of the wall span (0.5 = centered)
    pub position: f32,
    pub width: f32,
    pub height: f32,
    /// Clearance between the floor and the bottom of the opening
    pub bottom_offset: f32,
}

impl Opening {
    /// Centered, floor-level opening
    pub fn new(side: Side, width: f32, height: f32) -> Self {
        Self {
            side,
            position: 0.5,
            width,
            height,
            bottom_offset: 0.0,
        }
    }

    pub fn with_position(mut self, position: f32) -> Self {
        self.position = position.clamp(0.0, 1.0);
        self
    }

    pub fn with_bottom_offset(mut self, bottom_offset: f32) -> Self {
        self.bottom_offset = bottom_offset.max(0.0);
        self
    }
}

/// Per-room material names; `None` uses the level default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomMaterials {
    pub wall: Option<String>,
    pub floor: Option<String>,
    pub ceiling: Option<String>,
}

/// Axis-aligned rectangular room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    /// Center of the floor; `center.z` is the floor height
    pub center: Vec3,
    /// Interior width (x), length (y) and height (z)
    pub size: Vec3,
    pub materials: RoomMaterials,
    pub wall_thickness: f32,
    openings: BTreeMap<String, Opening>,
}

impl RoomSpec {
    pub fn new(name: impl Into<String>, center: Vec3, size: Vec3, wall_thickness: f32) -> Self {
        Self {
            name: name.into(),
            center,
            size,
            materials: RoomMaterials::default(),
            wall_thickness,
            openings: BTreeMap::new(),
        }
    }

    pub fn with_materials(mut self, materials: RoomMaterials) -> Self {
        self.materials = materials;
        self
    }

    /// Register an opening, returning the one it replaces
    pub fn add_opening(&mut self, id: impl Into<String>, opening: Opening) -> Option<Opening> {
        self.openings.insert(id.into(), opening)
    }

    pub fn with_opening(mut self, id: impl Into<String>, opening: Opening) -> Self {
        self.add_opening(id, opening);
        self
    }

    pub fn opening(&self, id: &str) -> Option<&Opening> {
        self.openings.get(id)
    }

    pub fn openings(&self) -> impl Iterator<Item = (&str, &Opening)> {
        self.openings.iter().map(|(id, opening)| (id.as_str(), opening))
    }

    /// Openings cut into one wall
    pub fn openings_on(&self, side: Side) -> Vec<&Opening> {
        self.openings
            .values()
            .filter(|opening| opening.side == side)
            .collect()
    }

    pub fn floor_height(&self) -> f32 {
        self.center.z
    }

    /// Interior extent along the wall on `side`
    pub fn wall_span(&self, side: Side) -> WallSpan {
        let (center, extent) = if side.runs_along_x() {
            (self.center.x, self.size.x)
        } else {
            (self.center.y, self.size.y)
        };
        WallSpan {
            start: center - extent * 0.5,
            end: center + extent * 0.5,
            height: self.size.z,
            thickness: self.wall_thickness,
        }
    }

    /// Distance from the room center to the interior face of the wall on `side`
    fn half_depth(&self, side: Side) -> f32 {
        if side.runs_along_x() {
            self.size.y * 0.5
        } else {
            self.size.x * 0.5
        }
    }

    /// Midpoint of the outer face of the wall on `side`, at floor height
    pub fn connection_point(&self, side: Side) -> Vec3 {
        self.center + side.outward() * (self.half_depth(side) + self.wall_thickness)
    }

    /// Center of an opening, in the middle of the wall thickness
    pub fn opening_center(&self, opening: &Opening) -> Vec3 {
        let span = self.wall_span(opening.side);
        let along = span.start + opening.position * span.length();
        let mut point = self.wall_plane_point(opening.side, along);
        point.z = self.center.z + opening.bottom_offset + opening.height * 0.5;
        point
    }

    /// Point on the wall center line at `along` on the wall axis, floor height
    fn wall_plane_point(&self, side: Side, along: f32) -> Vec3 {
        let offset = self.half_depth(side) + self.wall_thickness * 0.5;
        let mut point = self.center + side.outward() * offset;
        if side.runs_along_x() {
            point.x = along;
        } else {
            point.y = along;
        }
        point
    }

    /// World-space box of a wall piece on `side`
    fn piece_volume(&self, side: Side, piece: &WallPiece) -> (Vec3, Vec3) {
        let mut position = self.wall_plane_point(side, piece.center_along());
        position.z = self.center.z + piece.center_height();

        let size = if side.runs_along_x() {
            Vec3::new(piece.length(), self.wall_thickness, piece.height())
        } else {
            Vec3::new(self.wall_thickness, piece.length(), piece.height())
        };
        (position, size)
    }

    /// Whether `point` is inside the interior footprint and height band
    pub fn contains(&self, point: Vec3) -> bool {
        let half = self.size * 0.5;
        (point.x - self.center.x).abs() <= half.x
            && (point.y - self.center.y).abs() <= half.y
            && point.z >= self.center.z
            && point.z <= self.center.z + self.size.z
    }

    /// Outer extent including walls, floor and ceiling slabs
    pub fn extent(&self) -> (Vec3, Vec3) {
        let t = self.wall_thickness;
        let half = Vec3::new(self.size.x * 0.5 + t, self.size.y * 0.5 + t, 0.0);
        let min = Vec3::new(self.center.x - half.x, self.center.y - half.y, self.center.z - t);
        let max = Vec3::new(
            self.center.x + half.x,
            self.center.y + half.y,
            self.center.z + self.size.z + t,
        );
        (min, max)
    }
}

/// Compile a room into floor, ceiling and segmented walls
///
/// Floor and ceiling slabs are oversized by the wall thickness on every side
/// to close the corners, and only block sound. Wall pieces block both.
pub fn compile_room(room: &RoomSpec, ctx: &CompileContext) -> Vec<PendingVolume> {
    let t = room.wall_thickness;
    let wall = ctx.material(room.materials.wall.as_deref(), &ctx.defaults.wall);
    let floor = ctx.material(room.materials.floor.as_deref(), &ctx.defaults.floor);
    let ceiling = ctx.material(room.materials.ceiling.as_deref(), &ctx.defaults.ceiling);

    let slab = Vec3::new(room.size.x + 2.0 * t, room.size.y + 2.0 * t, t);
    let mut volumes = vec![
        PendingVolume::acoustic_only(OpaqueVolume::new(
            room.center - Vec3::Z * (t * 0.5),
            slab,
            floor,
        )),
        PendingVolume::acoustic_only(OpaqueVolume::new(
            room.center + Vec3::Z * (room.size.z + t * 0.5),
            slab,
            ceiling,
        )),
    ];

    for side in Side::ALL {
        let span = room.wall_span(side);
        let openings = room.openings_on(side);
        for piece in segment_wall(&span, &openings, ctx.geometry.wall_epsilon) {
            let (position, size) = room.piece_volume(side, &piece);
            volumes.push(PendingVolume::solid(OpaqueVolume::new(position, size, wall)));
        }
    }

    debug!(room = %room.name, volumes = volumes.len(), "Compiled room");
    volumes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::material::MaterialLibrary;
    use crate::config::LevelConfig;

    fn scenario_room() -> RoomSpec {
        RoomSpec::new("hall", Vec3::new(5.0, 5.0, 0.0), Vec3::new(10.0, 10.0, 5.0), 0.2)
            .with_opening("north_door", Opening::new(Side::North, 2.0, 2.2))
    }

    #[test]
    fn test_wall_spans() {
        let room = scenario_room();
        let north = room.wall_span(Side::North);
        assert_eq!((north.start, north.end), (0.0, 10.0));
        let east = room.wall_span(Side::East);
        assert_eq!((east.start, east.end), (0.0, 10.0));
        assert_eq!(north.height, 5.0);
    }

    #[test]
    fn test_compile_room_volume_layout() {
        let config = LevelConfig::default();
        let materials = MaterialLibrary::with_presets();
        let ctx = CompileContext::new(&materials, &config);
        let room = scenario_room();

        let volumes = compile_room(&room, &ctx);
        // floor + ceiling + 2 north solids + north lintel + 3 full walls
        assert_eq!(volumes.len(), 8);

        let floor = &volumes[0];
        assert!(!floor.has_collision);
        assert_eq!(floor.volume.size, Vec3::new(10.4, 10.4, 0.2));
        assert!((floor.volume.position.z + 0.1).abs() < 1e-6);

        let ceiling = &volumes[1];
        assert!(!ceiling.has_collision);
        assert!((ceiling.volume.position.z - 5.1).abs() < 1e-6);

        assert!(volumes[2..].iter().all(|v| v.has_collision));

        let lintel = volumes
            .iter()
            .find(|v| (v.volume.size.z - 2.8).abs() < 1e-5)
            .unwrap();
        assert!((lintel.volume.position.z - 3.6).abs() < 1e-5);
        assert!((lintel.volume.position.y - 10.1).abs() < 1e-5);
        assert!((lintel.volume.position.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_room_overrides_material() {
        let config = LevelConfig::default();
        let materials = MaterialLibrary::with_presets();
        let ctx = CompileContext::new(&materials, &config);
        let room = scenario_room().with_materials(RoomMaterials {
            wall: Some("glass".to_string()),
            ..Default::default()
        });

        let volumes = compile_room(&room, &ctx);
        let glass = materials.tag("glass").unwrap();
        assert!(volumes[2..].iter().all(|v| v.volume.material == glass));
        assert_eq!(volumes[0].volume.material, materials.tag("stone").unwrap());
    }

    #[test]
    fn test_connection_point_and_contains() {
        let room = scenario_room();
        assert_eq!(room.connection_point(Side::North), Vec3::new(5.0, 10.2, 0.0));
        assert_eq!(room.connection_point(Side::West), Vec3::new(-0.2, 5.0, 0.0));

        assert!(room.contains(Vec3::new(1.0, 9.0, 1.0)));
        assert!(!room.contains(Vec3::new(1.0, 11.0, 1.0)));
        assert!(!room.contains(Vec3::new(1.0, 9.0, 6.0)));
    }

    #[test]
    fn test_opening_center() {
        let room = scenario_room();
        let door = room.opening("north_door").unwrap();
        let center = room.opening_center(door);
        assert!((center - Vec3::new(5.0, 10.1, 1.1)).length() < 1e-5);
    }
}
