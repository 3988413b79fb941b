//! Per-foot placement configuration.

use bevy::prelude::*;

use super::ValueConstraint;

/// Configuration for the downward ground probe of one foot.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct FootProbeConfig {
    /// Vertical distance added to the posed foot bone location to get the
    /// probe start.
    pub height_offset: f32,

    /// Distance probed downward from the probe start.
    pub distance: f32,

    /// Collision layers the probe tests against (bitmask).
    pub collision_mask: u32,

    /// Entities the probe ignores. Filled at initialization with the owning
    /// character, not authored.
    pub excluded: Vec<Entity>,
}

impl Default for FootProbeConfig {
    fn default() -> Self {
        Self {
            height_offset: 0.0,
            distance: 1.5,
            collision_mask: u32::MAX,
            excluded: Vec::new(),
        }
    }
}

/// Placement parameters for a single foot.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct FootPlacementParams {
    /// Name of the bone sampled for the posed foot transform. Must not be a
    /// bone the IK pass itself moves.
    pub source_bone: String,

    /// Distance of the foot bone above the ground in rest pose.
    pub foot_bone_height: f32,

    /// Distance the leg pole target is pushed away from the leg.
    pub pole_offset: f32,

    /// Vertical offset of the leg pole target.
    pub pole_vertical_offset: f32,

    /// Ground probe settings.
    pub probe: FootProbeConfig,

    /// Limits on the pitch added when aligning the foot to the ground (degrees).
    pub pitch_constraint: ValueConstraint,

    /// Limits on the roll added when aligning the foot to the ground (degrees).
    pub roll_constraint: ValueConstraint,
}

impl Default for FootPlacementParams {
    fn default() -> Self {
        Self {
            source_bone: String::new(),
            foot_bone_height: 0.0,
            pole_offset: 2.0,
            pole_vertical_offset: -1.0,
            probe: FootProbeConfig::default(),
            pitch_constraint: ValueConstraint::default(),
            roll_constraint: ValueConstraint::default(),
        }
    }
}

impl FootPlacementParams {
    /// Parameters for the given source bone with default settings.
    pub fn new(source_bone: impl Into<String>) -> Self {
        Self {
            source_bone: source_bone.into(),
            ..default()
        }
    }

    /// Set the rest-pose foot bone height.
    pub fn with_foot_bone_height(mut self, height: f32) -> Self {
        self.foot_bone_height = height;
        self
    }

    /// Set the pole offsets.
    pub fn with_pole_offsets(mut self, offset: f32, vertical_offset: f32) -> Self {
        self.pole_offset = offset;
        self.pole_vertical_offset = vertical_offset;
        self
    }

    /// Set the probe start offset and probe distance.
    pub fn with_probe(mut self, height_offset: f32, distance: f32) -> Self {
        self.probe.height_offset = height_offset;
        self.probe.distance = distance;
        self
    }

    /// Set the probe collision mask.
    pub fn with_collision_mask(mut self, mask: u32) -> Self {
        self.probe.collision_mask = mask;
        self
    }

    /// Set the additive pitch and roll limits.
    pub fn with_constraints(mut self, pitch: ValueConstraint, roll: ValueConstraint) -> Self {
        self.pitch_constraint = pitch;
        self.roll_constraint = roll;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = FootPlacementParams::new("foot_l");
        assert_eq!(params.source_bone, "foot_l");
        assert_eq!(params.foot_bone_height, 0.0);
        assert_eq!(params.pole_offset, 2.0);
        assert_eq!(params.pole_vertical_offset, -1.0);
        assert_eq!(params.probe.distance, 1.5);
        assert_eq!(params.probe.collision_mask, u32::MAX);
        assert!(params.probe.excluded.is_empty());
    }

    #[test]
    fn builder_sets_fields() {
        let params = FootPlacementParams::new("foot_r")
            .with_foot_bone_height(0.1)
            .with_pole_offsets(1.0, -0.5)
            .with_probe(0.5, 2.0)
            .with_collision_mask(0b10)
            .with_constraints(ValueConstraint::symmetric(30.0), ValueConstraint::symmetric(15.0));

        assert_eq!(params.foot_bone_height, 0.1);
        assert_eq!(params.pole_offset, 1.0);
        assert_eq!(params.pole_vertical_offset, -0.5);
        assert_eq!(params.probe.height_offset, 0.5);
        assert_eq!(params.probe.distance, 2.0);
        assert_eq!(params.probe.collision_mask, 0b10);
        assert_eq!(params.pitch_constraint.max, 30.0);
        assert_eq!(params.roll_constraint.min, -15.0);
    }
}
