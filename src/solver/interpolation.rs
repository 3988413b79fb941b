//! Frame-rate independent smoothing toward a target.
//!
//! Each call moves the current value a fraction `1 - exp(-speed * dt)` of the
//! way to the target, so the result depends on elapsed time and not on how
//! that time was split into frames.

use bevy::prelude::*;

/// Squared distance under which a value snaps onto its target.
const SNAP_DISTANCE_SQUARED: f32 = 1e-8;

/// Angle (radians) under which a rotation snaps onto its target.
const SNAP_ANGLE: f32 = 1e-4;

/// Fraction of the remaining distance covered in `dt` seconds.
///
/// `None` means "snap to target" (non-positive speed).
pub fn smoothing_factor(dt: f32, speed: f32) -> Option<f32> {
    if speed <= 0.0 {
        None
    } else {
        Some(1.0 - (-speed * dt).exp())
    }
}

/// Smooth a location toward `target`.
pub fn interp_vec3(current: Vec3, target: Vec3, dt: f32, speed: f32) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }
    let Some(alpha) = smoothing_factor(dt, speed) else {
        return target;
    };
    if current.distance_squared(target) < SNAP_DISTANCE_SQUARED {
        return target;
    }
    current.lerp(target, alpha)
}

/// Smooth a rotation toward `target` along the shortest arc.
pub fn interp_quat(current: Quat, target: Quat, dt: f32, speed: f32) -> Quat {
    if dt <= 0.0 {
        return current;
    }
    let Some(alpha) = smoothing_factor(dt, speed) else {
        return target;
    };
    if current.angle_between(target) < SNAP_ANGLE {
        return target;
    }
    current.slerp(target, alpha).normalize()
}
