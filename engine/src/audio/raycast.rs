//! Ray-box intersection used for acoustic line-of-sight queries

use glam::Vec3;

/// Ray structure for audio raycasting
#[derive(Debug, Clone, Copy)]
pub struct AudioRay {
    /// Ray origin in world space
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl AudioRay {
    /// Ray from `from` towards `to`, together with the segment length
    ///
    /// Returns `None` when both points coincide.
    pub fn between(from: Vec3, to: Vec3) -> Option<(Self, f32)> {
        let delta = to - from;
        let distance = delta.length();
        if distance < f32::EPSILON {
            return None;
        }

        Some((
            Self {
                origin: from,
                direction: delta / distance,
            },
            distance,
        ))
    }
}

/// Perform a slab test between a ray and the box `[min, max]`
///
/// Returns the distance to the entry point if the ray hits the box within
/// `max_distance`. Rays starting inside the box report distance 0.
pub fn ray_box_intersection(ray: &AudioRay, min: Vec3, max: Vec3, max_distance: f32) -> Option<f32> {
    let inv_dir = Vec3::new(
        if ray.direction.x.abs() < f32::EPSILON {
            f32::INFINITY
        } else {
            1.0 / ray.direction.x
        },
        if ray.direction.y.abs() < f32::EPSILON {
            f32::INFINITY
        } else {
            1.0 / ray.direction.y
        },
        if ray.direction.z.abs() < f32::EPSILON {
            f32::INFINITY
        } else {
            1.0 / ray.direction.z
        },
    );

    // Axis-parallel rays outside the slab can never enter it
    for axis in 0..3 {
        if inv_dir[axis].is_infinite() && (ray.origin[axis] < min[axis] || ray.origin[axis] > max[axis]) {
            return None;
        }
    }

    let t1 = (min - ray.origin) * inv_dir;
    let t2 = (max - ray.origin) * inv_dir;

    let tmin = t1.min(t2);
    let tmax = t1.max(t2);

    let tmin = finite_or(tmin.x, f32::NEG_INFINITY)
        .max(finite_or(tmin.y, f32::NEG_INFINITY))
        .max(finite_or(tmin.z, f32::NEG_INFINITY))
        .max(0.0);
    let tmax = finite_or(tmax.x, f32::INFINITY)
        .min(finite_or(tmax.y, f32::INFINITY))
        .min(finite_or(tmax.z, f32::INFINITY))
        .min(max_distance);

    if tmin <= tmax {
        Some(tmin)
    } else {
        None
    }
}

// NaN shows up when an axis-parallel ray sits exactly on a slab boundary
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value
    }
}
