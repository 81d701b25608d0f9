//! Straight corridors between two rooms

use super::room::{RoomId, RoomSpec, Side};
use super::volume::{OpaqueVolume, PendingVolume};
use super::CompileContext;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Corridor joining the `from_side` wall of one room to the `to_side` wall of another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorSpec {
    pub from: RoomId,
    pub from_side: Side,
    pub to: RoomId,
    pub to_side: Side,
    /// Interior width between the side walls
    pub width: f32,
}

/// Corridor orientation picked from the dominant axis between its ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorAxis {
    X,
    Y,
}

/// Compile floor, ceiling and side walls between two rooms
///
/// Ends closer than `min_corridor_length` produce nothing.
pub fn compile_corridor(
    from: &RoomSpec,
    from_side: Side,
    to: &RoomSpec,
    to_side: Side,
    width: f32,
    ctx: &CompileContext,
) -> Vec<PendingVolume> {
    let start = from.connection_point(from_side);
    let end = to.connection_point(to_side);
    let delta = end - start;
    let length = delta.length();

    if length < ctx.geometry.min_corridor_length {
        info!(
            from = %from.name,
            to = %to.name,
            length,
            "Skipping corridor with coincident ends"
        );
        return Vec::new();
    }

    let axis = if delta.x.abs() >= delta.y.abs() {
        CorridorAxis::X
    } else {
        CorridorAxis::Y
    };

    let t = ctx.geometry.default_wall_thickness;
    let height = from.size.z.min(to.size.z);
    let floor_z = start.z.min(end.z);
    let mid = Vec3::new((start.x + end.x) * 0.5, (start.y + end.y) * 0.5, floor_z);

    let wall = ctx.material(None, &ctx.defaults.corridor);
    let floor = ctx.material(None, &ctx.defaults.floor);
    let ceiling = ctx.material(None, &ctx.defaults.ceiling);

    let (slab, wall_size, across) = match axis {
        CorridorAxis::X => (
            Vec3::new(length, width + 2.0 * t, t),
            Vec3::new(length, t, height),
            Vec3::Y,
        ),
        CorridorAxis::Y => (
            Vec3::new(width + 2.0 * t, length, t),
            Vec3::new(t, length, height),
            Vec3::X,
        ),
    };

    let wall_offset = across * (width * 0.5 + t * 0.5);
    let wall_center = mid + Vec3::Z * (height * 0.5);

    let volumes = vec![
        PendingVolume::acoustic_only(OpaqueVolume::new(mid - Vec3::Z * (t * 0.5), slab, floor)),
        PendingVolume::acoustic_only(OpaqueVolume::new(
            mid + Vec3::Z * (height + t * 0.5),
            slab,
            ceiling,
        )),
        PendingVolume::solid(OpaqueVolume::new(wall_center - wall_offset, wall_size, wall)),
        PendingVolume::solid(OpaqueVolume::new(wall_center + wall_offset, wall_size, wall)),
    ];

    debug!(from = %from.name, to = %to.name, ?axis, length, "Compiled corridor");
    volumes
}

/// Box enclosing every volume [`compile_corridor`] would emit
///
/// A corridor runs the full distance between its ends along one axis, so
/// diagonally offset rooms push it past both room footprints.
pub fn corridor_extent(
    from: &RoomSpec,
    from_side: Side,
    to: &RoomSpec,
    to_side: Side,
    width: f32,
    ctx: &CompileContext,
) -> Option<(Vec3, Vec3)> {
    compile_corridor(from, from_side, to, to_side, width, ctx)
        .iter()
        .map(|pending| (pending.volume.min(), pending.volume.max()))
        .reduce(|(lo, hi), (min, max)| (lo.min(min), hi.max(max)))
}
