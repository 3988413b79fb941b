//! Per-rig foot placement configuration.

use bevy::prelude::*;

/// Rig-level foot placement settings.
///
/// Lives on the character entity next to its
/// [`PelvisFeetData`](crate::dataset::PelvisFeetData).
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct FootPlacementRig {
    /// Interpolation rate shared by every foot and the pelvis (1/seconds).
    pub interp_speed: f32,

    /// Foot slot flattened into the left-foot outputs.
    pub left_foot: usize,

    /// Foot slot flattened into the right-foot outputs.
    pub right_foot: usize,

    /// IK weight reported while every collaborator is available.
    pub ik_weight: f32,

    /// Root entity of the skeleton. Component space is this entity's space.
    /// `None` uses the rig entity itself.
    pub skeleton: Option<Entity>,

    /// Run the dataset validator before each phase and skip the phase when it
    /// fails. Off in release builds by default.
    pub strict_validation: bool,
}

impl Default for FootPlacementRig {
    fn default() -> Self {
        Self {
            interp_speed: 22.5,
            left_foot: 0,
            right_foot: 1,
            ik_weight: 1.0,
            skeleton: None,
            strict_validation: cfg!(debug_assertions),
        }
    }
}

impl FootPlacementRig {
    /// Default rig settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interpolation speed.
    pub fn with_interp_speed(mut self, speed: f32) -> Self {
        self.interp_speed = speed;
        self
    }

    /// Set which foot slots are flattened as left and right.
    pub fn with_feet(mut self, left: usize, right: usize) -> Self {
        self.left_foot = left;
        self.right_foot = right;
        self
    }

    /// Set the skeleton root entity.
    pub fn with_skeleton(mut self, skeleton: Entity) -> Self {
        self.skeleton = Some(skeleton);
        self
    }

    /// Enable or disable strict validation.
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Skeleton root for a rig living on `rig_entity`.
    pub fn skeleton_root(&self, rig_entity: Entity) -> Entity {
        self.skeleton.unwrap_or(rig_entity)
    }
}

/// Vertical extent of the character capsule.
///
/// The capsule centre is the rig entity's global translation.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct CapsuleBounds {
    /// Distance from the capsule centre to its bottom.
    pub half_height: f32,
}

impl CapsuleBounds {
    pub fn new(half_height: f32) -> Self {
        Self { half_height }
    }

    /// World-space vertical coordinate of the capsule bottom.
    pub fn bottom(&self, center: Vec3) -> f32 {
        center.y - self.half_height
    }
}
