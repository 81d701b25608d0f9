//! Configuration types for level building

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tolerances and dimensions used by the geometry compilers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Wall pieces shorter than this along any cut axis are dropped
    pub wall_epsilon: f32,
    /// Corridors whose connection points are closer than this are skipped
    pub min_corridor_length: f32,
    /// Padding added around the level when computing world bounds
    pub bounds_margin: f32,
    /// Thickness used for corridor walls and rooms created without one
    pub default_wall_thickness: f32,
    /// Thickness of stair side walls
    pub stair_wall_thickness: f32,
    /// Thickness of platform slabs
    pub platform_thickness: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            wall_epsilon: 0.01,
            min_corridor_length: 0.1,
            bounds_margin: 5.0,
            default_wall_thickness: 0.2,
            stair_wall_thickness: 0.1,
            platform_thickness: 0.2,
        }
    }
}

/// Material names used when a room does not override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDefaults {
    pub wall: String,
    pub floor: String,
    pub ceiling: String,
    pub corridor: String,
    pub door: String,
    pub stair: String,
    pub platform: String,
}

impl Default for MaterialDefaults {
    fn default() -> Self {
        Self {
            wall: "concrete".to_string(),
            floor: "stone".to_string(),
            ceiling: "concrete".to_string(),
            corridor: "concrete".to_string(),
            door: "wood".to_string(),
            stair: "stone".to_string(),
            platform: "wood".to_string(),
        }
    }
}

/// Door sound defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Loop volume while the door is closed
    pub loop_volume: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self { loop_volume: 0.5 }
    }
}

/// Parameters for the built-in movement system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Downward acceleration in units per second squared
    pub gravity: f32,
    /// Largest drop that is followed without falling
    pub step_height: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            step_height: 0.35,
        }
    }
}

/// Complete level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub geometry: GeometryConfig,
    pub materials: MaterialDefaults,
    pub doors: DoorConfig,
    pub movement: MovementConfig,
}

impl LevelConfig {
    /// Parse and validate configuration from JSON; missing fields use defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!(?config, "Parsed level configuration");
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = ?path, "Loading level configuration");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let geometry = &self.geometry;
        positive("geometry.wall_epsilon", geometry.wall_epsilon)?;
        positive("geometry.default_wall_thickness", geometry.default_wall_thickness)?;
        positive("geometry.stair_wall_thickness", geometry.stair_wall_thickness)?;
        positive("geometry.platform_thickness", geometry.platform_thickness)?;
        non_negative("geometry.min_corridor_length", geometry.min_corridor_length)?;
        non_negative("geometry.bounds_margin", geometry.bounds_margin)?;
        non_negative("movement.gravity", self.movement.gravity)?;
        non_negative("movement.step_height", self.movement.step_height)?;

        if !(0.0..=1.0).contains(&self.doors.loop_volume) {
            return Err(ConfigError::Invalid {
                field: "doors.loop_volume",
                reason: format!("{} is outside 0..=1", self.doors.loop_volume),
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be positive"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must not be negative"),
        })
    }
}
