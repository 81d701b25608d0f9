//! Level assembly and runtime state
//!
//! [`MapAssembly`] collects level definitions, computes world bounds, holds
//! submissions until an acoustic engine is attached and then builds every
//! room, corridor, door and stair into the acoustic and collision scenes.

pub mod assembly;
pub mod door;
pub mod height;
pub mod systems;

pub use assembly::MapAssembly;
pub use door::{Door, DoorCues, DoorId, DoorState};
pub use height::{HeightResolver, GROUND_HEIGHT};

use crate::audio::occlusion::AcousticError;
use crate::geometry::room::RoomId;

/// Errors raised while assembling or running a level
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LevelError {
    #[error("no acoustic engine is attached")]
    EngineNotReady,

    #[error("an acoustic engine is already attached")]
    EngineAlreadyAttached,

    #[error("level has not been built")]
    NotBuilt,

    #[error("a previous build failed; the level must be discarded")]
    BuildFailed,

    #[error("unknown room {0:?}")]
    UnknownRoom(RoomId),

    #[error("unknown door {0:?}")]
    UnknownDoor(DoorId),

    #[error("acoustic engine rejected a volume: {0}")]
    Acoustic(#[from] AcousticError),
}
