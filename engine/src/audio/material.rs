//! Acoustic material properties and the per-level material library
//!
//! Volumes carry a [`MaterialTag`]; the library that issued the tag is the only
//! place that knows what the tag means. Each level owns its own library, so
//! there is no process-wide lookup table.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Name the library falls back to when nothing else was configured
pub const DEFAULT_MATERIAL: &str = "default";

/// Sound interaction properties of a surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcousticMaterial {
    /// Sound absorption coefficient (0.0 = fully reflective, 1.0 = fully absorptive)
    pub absorption: f32,
    /// Scattering coefficient (0.0 = specular reflection, 1.0 = diffuse)
    pub scattering: f32,
    /// Transmission coefficient (0.0 = fully occluding, 1.0 = transparent to sound)
    pub transmission: f32,
}

impl Default for AcousticMaterial {
    fn default() -> Self {
        Self {
            absorption: 0.1,
            scattering: 0.5,
            transmission: 0.0,
        }
    }
}

impl AcousticMaterial {
    /// Concrete material - hard, reflective
    pub fn concrete() -> Self {
        Self {
            absorption: 0.02,
            scattering: 0.1,
            transmission: 0.0,
        }
    }

    /// Stone masonry - reflective with rough scattering
    pub fn stone() -> Self {
        Self {
            absorption: 0.03,
            scattering: 0.4,
            transmission: 0.0,
        }
    }

    /// Wood material - moderate absorption, leaks a little sound
    pub fn wood() -> Self {
        Self {
            absorption: 0.15,
            scattering: 0.5,
            transmission: 0.1,
        }
    }

    /// Glass material - reflective but transmissive
    pub fn glass() -> Self {
        Self {
            absorption: 0.05,
            scattering: 0.1,
            transmission: 0.8,
        }
    }

    /// Fabric material - highly absorptive
    pub fn fabric() -> Self {
        Self {
            absorption: 0.6,
            scattering: 0.9,
            transmission: 0.3,
        }
    }

    /// Carpet over a solid floor
    pub fn carpet() -> Self {
        Self {
            absorption: 0.45,
            scattering: 0.7,
            transmission: 0.0,
        }
    }

    /// Metal material - highly reflective
    pub fn metal() -> Self {
        Self {
            absorption: 0.01,
            scattering: 0.05,
            transmission: 0.0,
        }
    }
}

/// Opaque reference to a material registered in a [`MaterialLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialTag(u16);

impl MaterialTag {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Named acoustic materials for one level
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    entries: Vec<(String, AcousticMaterial)>,
    fallback: MaterialTag,
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialLibrary {
    /// Create a library holding only the fallback material
    pub fn new() -> Self {
        Self {
            entries: vec![(DEFAULT_MATERIAL.to_string(), AcousticMaterial::default())],
            fallback: MaterialTag(0),
        }
    }

    /// Create a library with the standard presets registered
    pub fn with_presets() -> Self {
        let mut library = Self::new();
        library.register("concrete", AcousticMaterial::concrete());
        library.register("stone", AcousticMaterial::stone());
        library.register("wood", AcousticMaterial::wood());
        library.register("glass", AcousticMaterial::glass());
        library.register("fabric", AcousticMaterial::fabric());
        library.register("carpet", AcousticMaterial::carpet());
        library.register("metal", AcousticMaterial::metal());

        debug!(count = library.entries.len(), "Initialized material library");
        library
    }

    /// Register a material, replacing any previous definition with the same name
    pub fn register(&mut self, name: &str, material: AcousticMaterial) -> MaterialTag {
        if let Some(tag) = self.tag(name) {
            self.entries[tag.index()].1 = material;
            return tag;
        }

        let tag = MaterialTag(self.entries.len() as u16);
        self.entries.push((name.to_string(), material));
        debug!(material = name, "Registered acoustic material");
        tag
    }

    /// Make `name` the material unknown names resolve to
    pub fn set_fallback(&mut self, name: &str) -> bool {
        match self.tag(name) {
            Some(tag) => {
                self.fallback = tag;
                true
            }
            None => false,
        }
    }

    /// Look a material up by name
    pub fn tag(&self, name: &str) -> Option<MaterialTag> {
        self.entries
            .iter()
            .position(|(entry, _)| entry == name)
            .map(|index| MaterialTag(index as u16))
    }

    /// Look a material up by name, falling back when it is unknown
    pub fn resolve(&self, name: &str) -> MaterialTag {
        self.tag(name).unwrap_or_else(|| {
            warn!(
                material = name,
                fallback = self.name(self.fallback),
                "Unknown acoustic material, using fallback"
            );
            self.fallback
        })
    }

    /// Properties behind a tag; foreign tags read as the fallback
    pub fn get(&self, tag: MaterialTag) -> AcousticMaterial {
        self.entries
            .get(tag.index())
            .or_else(|| self.entries.get(self.fallback.index()))
            .map(|(_, material)| *material)
            .unwrap_or_default()
    }

    pub fn name(&self, tag: MaterialTag) -> &str {
        self.entries
            .get(tag.index())
            .map(|(name, _)| name.as_str())
            .unwrap_or(DEFAULT_MATERIAL)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Combined occlusion of several layers (0.0 = open path, 1.0 = fully blocked)
pub fn calculate_occlusion(materials: &[AcousticMaterial]) -> f32 {
    if materials.is_empty() {
        return 0.0;
    }

    let total_transmission = materials
        .iter()
        .map(|m| m.transmission)
        .fold(1.0, |acc, t| acc * t);

    1.0 - total_transmission
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_presets() {
        let concrete = AcousticMaterial::concrete();
        assert!(concrete.absorption < 0.1);
        assert_eq!(concrete.transmission, 0.0);

        let glass = AcousticMaterial::glass();
        assert!(glass.transmission > 0.5);
    }

    #[test]
    fn test_occlusion_calculation() {
        let materials = vec![AcousticMaterial::glass(), AcousticMaterial::fabric()];
        let occlusion = calculate_occlusion(&materials);
        assert!(occlusion > 0.0 && occlusion < 1.0);
        assert_eq!(calculate_occlusion(&[]), 0.0);
    }

    #[test]
    fn test_unknown_material_resolves_to_fallback() {
        let mut library = MaterialLibrary::with_presets();
        assert_eq!(library.resolve("marshmallow"), MaterialTag(0));

        assert!(library.set_fallback("stone"));
        let stone = library.tag("stone").unwrap();
        assert_eq!(library.resolve("marshmallow"), stone);
        assert!(!library.set_fallback("marshmallow"));
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut library = MaterialLibrary::with_presets();
        let before = library.len();
        let wood = library.tag("wood").unwrap();

        let replaced = library.register("wood", AcousticMaterial::metal());
        assert_eq!(replaced, wood);
        assert_eq!(library.len(), before);
        assert_eq!(library.get(wood), AcousticMaterial::metal());
        assert_eq!(library.name(wood), "wood");
    }
}
