//! Raised flat areas the player can stand on

use super::volume::{OpaqueVolume, PendingVolume};
use super::CompileContext;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Horizontal rectangle with a standing height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub min: Vec2,
    pub max: Vec2,
    /// Height of the top surface
    pub height: f32,
}

impl Platform {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            height,
        }
    }

    /// Whether `position` lies over the platform (edges inclusive)
    pub fn contains(&self, position: Vec3) -> bool {
        let point = position.truncate();
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn extent(&self, thickness: f32) -> (Vec3, Vec3) {
        (
            self.min.extend(self.height - thickness),
            self.max.extend(self.height),
        )
    }

    /// Slab under the top surface; blocks sound only
    pub fn volume(&self, ctx: &CompileContext) -> PendingVolume {
        let thickness = ctx.geometry.platform_thickness;
        let (min, max) = self.extent(thickness);
        PendingVolume::acoustic_only(OpaqueVolume::new(
            (min + max) * 0.5,
            max - min,
            ctx.material(None, &ctx.defaults.platform),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::material::MaterialLibrary;
    use crate::config::LevelConfig;

    #[test]
    fn test_contains_is_inclusive() {
        let platform = Platform::new(Vec2::new(2.0, 2.0), Vec2::new(0.0, 0.0), 1.0);
        assert_eq!(platform.min, Vec2::ZERO);
        assert!(platform.contains(Vec3::new(0.0, 2.0, 5.0)));
        assert!(!platform.contains(Vec3::new(2.1, 1.0, 0.0)));
    }

    #[test]
    fn test_slab_sits_under_surface() {
        let config = LevelConfig::default();
        let materials = MaterialLibrary::with_presets();
        let ctx = CompileContext::new(&materials, &config);

        let platform = Platform::new(Vec2::ZERO, Vec2::new(4.0, 2.0), 1.5);
        let slab = platform.volume(&ctx);
        assert!(!slab.has_collision);
        assert!((slab.volume.max().z - 1.5).abs() < 1e-6);
        assert!((slab.volume.size.z - 0.2).abs() < 1e-6);
        assert_eq!(slab.volume.material, materials.tag("wood").unwrap());
    }
}
