//! World bounds handed to the acoustic engine at construction

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned extent of everything a level contains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl WorldBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Fold a set of `(min, max)` extents and pad the result by `margin`
    ///
    /// An empty set yields a cube of half-size `margin` around the origin.
    pub fn enclosing(extents: impl IntoIterator<Item = (Vec3, Vec3)>, margin: f32) -> Self {
        let folded = extents
            .into_iter()
            .fold(None, |acc: Option<(Vec3, Vec3)>, (min, max)| match acc {
                Some((lo, hi)) => Some((lo.min(min), hi.max(max))),
                None => Some((min, max)),
            });

        let (min, max) = folded.unwrap_or((Vec3::ZERO, Vec3::ZERO));
        Self {
            min: min - Vec3::splat(margin),
            max: max + Vec3::splat(margin),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether the box `[min, max]` lies entirely inside the bounds
    pub fn contains_box(&self, min: Vec3, max: Vec3) -> bool {
        min.cmpge(self.min).all() && max.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosing_folds_and_pads() {
        let bounds = WorldBounds::enclosing(
            [
                (Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 5.0)),
                (Vec3::new(-4.0, 2.0, -1.0), Vec3::new(2.0, 20.0, 1.0)),
            ],
            5.0,
        );

        assert_eq!(bounds.min, Vec3::new(-9.0, -5.0, -6.0));
        assert_eq!(bounds.max, Vec3::new(15.0, 25.0, 10.0));
    }

    #[test]
    fn test_empty_level_gets_margin_cube() {
        let bounds = WorldBounds::enclosing(std::iter::empty(), 5.0);
        assert_eq!(bounds.min, Vec3::splat(-5.0));
        assert_eq!(bounds.max, Vec3::splat(5.0));
    }

    #[test]
    fn test_contains_box() {
        let bounds = WorldBounds::new(Vec3::ZERO, Vec3::splat(10.0));
        assert!(bounds.contains_box(Vec3::ONE, Vec3::splat(9.0)));
        assert!(!bounds.contains_box(Vec3::splat(-1.0), Vec3::ONE));
    }
}
