//! Straight ramps with a height profile

use super::volume::{OpaqueVolume, PendingVolume};
use super::CompileContext;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Returned by [`StairDefinition::height`] for positions off the stair
pub const NOT_ON_STAIR: f32 = -1.0;

/// Axis and sense in which a stair rises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClimbDirection {
    PosX,
    NegX,
    PosY,
    NegY,
}

/// Straight stair rising `height_change` over `length`
///
/// `start` is the bottom corner of the climb; the footprint extends `length`
/// in the climb direction and `width` towards positive x or y across it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairDefinition {
    pub start: Vec3,
    pub length: f32,
    pub width: f32,
    pub height_change: f32,
    pub direction: ClimbDirection,
    /// Height of the side walls, if any
    pub side_wall_height: Option<f32>,
}

impl StairDefinition {
    pub fn new(start: Vec3, length: f32, width: f32, height_change: f32, direction: ClimbDirection) -> Self {
        Self {
            start,
            length,
            width,
            height_change,
            direction,
            side_wall_height: None,
        }
    }

    pub fn with_side_walls(mut self, height: f32) -> Self {
        self.side_wall_height = Some(height);
        self
    }

    /// Fraction of the climb covered at `position`, or `None` off the footprint
    ///
    /// Footprint membership and progress come from the same per-direction
    /// projection so they cannot disagree.
    pub fn progress(&self, position: Vec3) -> Option<f32> {
        let (along, across) = match self.direction {
            ClimbDirection::PosX => (position.x - self.start.x, position.y - self.start.y),
            ClimbDirection::NegX => (self.start.x - position.x, position.y - self.start.y),
            ClimbDirection::PosY => (position.y - self.start.y, position.x - self.start.x),
            ClimbDirection::NegY => (self.start.y - position.y, position.x - self.start.x),
        };

        let inside = (0.0..=self.length).contains(&along) && (0.0..=self.width).contains(&across);
        if !inside || self.length <= 0.0 {
            return None;
        }
        Some(along / self.length)
    }

    /// Standing height at `position`, or `None` off the footprint
    pub fn height_at(&self, position: Vec3) -> Option<f32> {
        self.progress(position)
            .map(|progress| self.start.z + progress.clamp(0.0, 1.0) * self.height_change)
    }

    /// Standing height at `position`, or [`NOT_ON_STAIR`]
    pub fn height(&self, position: Vec3) -> f32 {
        self.height_at(position).unwrap_or(NOT_ON_STAIR)
    }

    pub fn contains(&self, position: Vec3) -> bool {
        self.progress(position).is_some()
    }

    /// Footprint corners in the xy plane
    pub fn footprint(&self) -> (Vec3, Vec3) {
        let s = self.start;
        let (min, max) = match self.direction {
            ClimbDirection::PosX => (
                Vec3::new(s.x, s.y, 0.0),
                Vec3::new(s.x + self.length, s.y + self.width, 0.0),
            ),
            ClimbDirection::NegX => (
                Vec3::new(s.x - self.length, s.y, 0.0),
                Vec3::new(s.x, s.y + self.width, 0.0),
            ),
            ClimbDirection::PosY => (
                Vec3::new(s.x, s.y, 0.0),
                Vec3::new(s.x + self.width, s.y + self.length, 0.0),
            ),
            ClimbDirection::NegY => (
                Vec3::new(s.x, s.y - self.length, 0.0),
                Vec3::new(s.x + self.width, s.y, 0.0),
            ),
        };
        (min, max)
    }

    fn climbs_along_x(&self) -> bool {
        matches!(self.direction, ClimbDirection::PosX | ClimbDirection::NegX)
    }

    /// Extent including the ramp block and side walls
    pub fn extent(&self, wall_thickness: f32) -> (Vec3, Vec3) {
        let (mut min, mut max) = self.footprint();
        let low = self.start.z.min(self.start.z + self.height_change);
        let high = self.start.z.max(self.start.z + self.height_change);
        min.z = low;
        max.z = high;

        if let Some(wall_height) = self.side_wall_height {
            let pad = if self.climbs_along_x() {
                Vec3::new(0.0, wall_thickness, 0.0)
            } else {
                Vec3::new(wall_thickness, 0.0, 0.0)
            };
            min -= pad;
            max += pad;
            max.z = max.z.max(self.start.z + self.height_change * 0.5 + wall_height);
        }
        (min, max)
    }
}

/// Compile the ramp block and optional side walls
///
/// The ramp is a single unstepped box filling the space under the climb and
/// only blocks sound; movement height comes from the profile. Side walls
/// stand on the mid-climb elevation and block both.
pub fn compile_stair(stair: &StairDefinition, ctx: &CompileContext) -> Vec<PendingVolume> {
    let material = ctx.material(None, &ctx.defaults.stair);
    let thickness = ctx.geometry.stair_wall_thickness;

    let (min, max) = stair.footprint();
    let center = (min + max) * 0.5;
    let mid_z = stair.start.z + stair.height_change * 0.5;
    let ramp_height = stair.height_change.abs().max(ctx.geometry.platform_thickness);

    let mut volumes = vec![PendingVolume::acoustic_only(OpaqueVolume::new(
        Vec3::new(center.x, center.y, mid_z),
        Vec3::new(max.x - min.x, max.y - min.y, ramp_height),
        material,
    ))];

    if let Some(wall_height) = stair.side_wall_height {
        let z = mid_z + wall_height * 0.5;
        let (size, offset) = if stair.climbs_along_x() {
            (
                Vec3::new(stair.length, thickness, wall_height),
                Vec3::new(0.0, stair.width * 0.5 + thickness * 0.5, 0.0),
            )
        } else {
            (
                Vec3::new(thickness, stair.length, wall_height),
                Vec3::new(stair.width * 0.5 + thickness * 0.5, 0.0, 0.0),
            )
        };
        let base = Vec3::new(center.x, center.y, z);
        volumes.push(PendingVolume::solid(OpaqueVolume::new(base - offset, size, material)));
        volumes.push(PendingVolume::solid(OpaqueVolume::new(base + offset, size, material)));
    }

    debug!(start = ?stair.start, direction = ?stair.direction, volumes = volumes.len(), "Compiled stair");
    volumes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::material::MaterialLibrary;
    use crate::config::LevelConfig;

    fn stair(direction: ClimbDirection) -> StairDefinition {
        StairDefinition::new(Vec3::new(10.0, 0.0, 0.0), 4.0, 2.0, 2.0, direction)
    }

    #[test]
    fn test_height_along_pos_x() {
        let stair = stair(ClimbDirection::PosX);
        assert_eq!(stair.height(Vec3::new(10.0, 1.0, 0.0)), 0.0);
        assert!((stair.height(Vec3::new(12.0, 1.0, 0.0)) - 1.0).abs() < 1e-6);
        assert!((stair.height(Vec3::new(14.0, 1.0, 0.0)) - 2.0).abs() < 1e-6);
        assert_eq!(stair.height(Vec3::new(15.0, 1.0, 0.0)), NOT_ON_STAIR);
        assert_eq!(stair.height(Vec3::new(12.0, 3.0, 0.0)), NOT_ON_STAIR);
    }

    #[test]
    fn test_height_along_neg_x() {
        let stair = stair(ClimbDirection::NegX);
        assert!((stair.height(Vec3::new(9.0, 1.0, 0.0)) - 0.5).abs() < 1e-6);
        assert_eq!(stair.height(Vec3::new(11.0, 1.0, 0.0)), NOT_ON_STAIR);
    }

    #[test]
    fn test_height_along_y_axes() {
        let up = stair(ClimbDirection::PosY);
        assert!((up.height(Vec3::new(11.0, 3.0, 0.0)) - 1.5).abs() < 1e-6);
        assert!(!up.contains(Vec3::new(13.0, 3.0, 0.0)));

        let down = stair(ClimbDirection::NegY);
        assert!((down.height(Vec3::new(11.0, -1.0, 0.0)) - 0.5).abs() < 1e-6);
        assert!(!down.contains(Vec3::new(11.0, 1.0, 0.0)));
    }

    #[test]
    fn test_footprint_matches_contains() {
        for direction in [
            ClimbDirection::PosX,
            ClimbDirection::NegX,
            ClimbDirection::PosY,
            ClimbDirection::NegY,
        ] {
            let stair = stair(direction);
            let (min, max) = stair.footprint();
            let center = (min + max) * 0.5;
            assert!(stair.contains(center), "{direction:?} center");
            assert!(!stair.contains(max + Vec3::new(0.1, 0.1, 0.0)), "{direction:?} outside");
        }
    }

    #[test]
    fn test_compile_with_side_walls() {
        let config = LevelConfig::default();
        let materials = MaterialLibrary::with_presets();
        let ctx = CompileContext::new(&materials, &config);

        let plain = compile_stair(&stair(ClimbDirection::PosX), &ctx);
        assert_eq!(plain.len(), 1);
        assert!(!plain[0].has_collision);
        assert_eq!(plain[0].volume.size, Vec3::new(4.0, 2.0, 2.0));
        assert_eq!(plain[0].volume.position, Vec3::new(12.0, 1.0, 1.0));

        let walled = compile_stair(&stair(ClimbDirection::PosX).with_side_walls(1.0), &ctx);
        assert_eq!(walled.len(), 3);
        assert!(walled[1].has_collision && walled[2].has_collision);
        assert!((walled[1].volume.position.z - 1.5).abs() < 1e-6);
        assert!((walled[1].volume.position.y + 0.05).abs() < 1e-6);
        assert!((walled[2].volume.position.y - 2.05).abs() < 1e-6);
    }
}
