//! Standing height queries

use crate::geometry::platform::Platform;
use crate::geometry::stair::StairDefinition;
use glam::Vec3;

/// Ground plane height used when nothing else matches
pub const GROUND_HEIGHT: f32 = 0.0;

/// Stairs first, then platforms, then the ground plane
///
/// Within each group the first registered match wins.
#[derive(Debug, Clone, Default)]
pub struct HeightResolver {
    stairs: Vec<StairDefinition>,
    platforms: Vec<Platform>,
}

impl HeightResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stair(&mut self, stair: StairDefinition) -> usize {
        self.stairs.push(stair);
        self.stairs.len() - 1
    }

    pub fn add_platform(&mut self, platform: Platform) -> usize {
        self.platforms.push(platform);
        self.platforms.len() - 1
    }

    pub fn stairs(&self) -> &[StairDefinition] {
        &self.stairs
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// First stair whose footprint contains `position`
    pub fn stair_at(&self, position: Vec3) -> Option<&StairDefinition> {
        self.stairs.iter().find(|stair| stair.contains(position))
    }

    /// First platform whose rectangle contains `position`
    pub fn platform_at(&self, position: Vec3) -> Option<&Platform> {
        self.platforms
            .iter()
            .find(|platform| platform.contains(position))
    }

    pub fn floor_height(&self, position: Vec3) -> f32 {
        // Footprint containment decides the match, not the sign of the height,
        // so stairs below the ground plane still resolve
        self.stairs
            .iter()
            .find_map(|stair| stair.height_at(position))
            .or_else(|| self.platform_at(position).map(|platform| platform.height))
            .unwrap_or(GROUND_HEIGHT)
    }

    pub fn is_on_stair(&self, position: Vec3) -> bool {
        self.stair_at(position).is_some()
    }
}
