//! Closed numeric range used to bound additive foot rotations.

use bevy::prelude::*;

/// Closed `[min, max]` range in degrees.
///
/// Bounds the additive pitch or roll applied when aligning a foot with the
/// ground so steep or noisy geometry cannot rotate the foot implausibly.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct ValueConstraint {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Default for ValueConstraint {
    fn default() -> Self {
        Self {
            min: -360.0,
            max: 360.0,
        }
    }
}

impl ValueConstraint {
    /// Create a constraint from explicit bounds.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Symmetric constraint `[-limit, limit]`.
    pub fn symmetric(limit: f32) -> Self {
        Self::new(-limit.abs(), limit.abs())
    }

    /// Clamp `value` into the range.
    ///
    /// Unlike [`f32::clamp`] this does not panic on an inverted range; the
    /// upper bound wins.
    pub fn constrain(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }
}
