//! Level geometry compilers
//!
//! Pure functions turning room, corridor, stair and platform descriptions
//! into axis-aligned volumes. Nothing here touches the acoustic engine or the
//! collision world; the level assembly decides when and where volumes land.

pub mod bounds;
pub mod corridor;
pub mod platform;
pub mod room;
pub mod stair;
pub mod volume;
pub mod wall;

pub use bounds::WorldBounds;
pub use corridor::{compile_corridor, corridor_extent, CorridorAxis, CorridorSpec};
pub use platform::Platform;
pub use room::{compile_room, Opening, RoomId, RoomMaterials, RoomSpec, Side};
pub use stair::{compile_stair, ClimbDirection, StairDefinition, NOT_ON_STAIR};
pub use volume::{OpaqueVolume, PendingVolume};
pub use wall::{segment_wall, WallPiece, WallPieceKind, WallSpan};

use crate::audio::material::{MaterialLibrary, MaterialTag};
use crate::config::{GeometryConfig, LevelConfig, MaterialDefaults};

/// Everything a compiler reads besides the shape it compiles
#[derive(Debug, Clone, Copy)]
pub struct CompileContext<'a> {
    pub materials: &'a MaterialLibrary,
    pub geometry: &'a GeometryConfig,
    pub defaults: &'a MaterialDefaults,
}

impl<'a> CompileContext<'a> {
    pub fn new(materials: &'a MaterialLibrary, config: &'a LevelConfig) -> Self {
        Self {
            materials,
            geometry: &config.geometry,
            defaults: &config.materials,
        }
    }

    /// Resolve an optional override, falling back to a default material name
    pub fn material(&self, name: Option<&str>, default: &str) -> MaterialTag {
        self.materials.resolve(name.unwrap_or(default))
    }
}
