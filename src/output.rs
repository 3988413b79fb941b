//! Flattened per-rig outputs.
//!
//! Animation graphs evaluated on their fast path cannot index into
//! variable-length collections, so the interpolated values of the left and
//! right foot slots are copied into named fields here.

use bevy::prelude::*;

use crate::dataset::PelvisFeetData;
use crate::locomotion::{Locomotion, LocomotionFlags};

/// Values consumed by the IK stage of the animation graph.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct FootPlacementOutput {
    pub left_effector: Vec3,
    pub left_pole: Vec3,
    pub left_rotation: Quat,

    pub right_effector: Vec3,
    pub right_pole: Vec3,
    pub right_rotation: Quat,

    /// Additive world translation for the pelvis bone.
    pub pelvis_translation: Vec3,

    pub should_idle: bool,
    pub should_walk: bool,
    pub should_run: bool,

    /// Blend weight of the whole IK stage. Zero while a collaborator the rig
    /// depends on is missing.
    pub ik_alpha: f32,
}

impl Default for FootPlacementOutput {
    fn default() -> Self {
        Self {
            left_effector: Vec3::ZERO,
            left_pole: Vec3::ZERO,
            left_rotation: Quat::IDENTITY,
            right_effector: Vec3::ZERO,
            right_pole: Vec3::ZERO,
            right_rotation: Quat::IDENTITY,
            pelvis_translation: Vec3::ZERO,
            should_idle: true,
            should_walk: false,
            should_run: false,
            ik_alpha: 1.0,
        }
    }
}

impl FootPlacementOutput {
    /// Copy the interpolated values of the `left` and `right` foot slots.
    ///
    /// Returns `false` and copies nothing when either slot does not exist.
    pub fn copy_from(&mut self, data: &PelvisFeetData, left: usize, right: usize) -> bool {
        let slot = |foot: usize| {
            Some((
                *data.interpolated_effector_locations.get(foot)?,
                *data.interpolated_pole_locations.get(foot)?,
                *data.interpolated_rotations.get(foot)?,
            ))
        };
        let (Some(l), Some(r)) = (slot(left), slot(right)) else {
            return false;
        };

        (self.left_effector, self.left_pole, self.left_rotation) = l;
        (self.right_effector, self.right_pole, self.right_rotation) = r;
        self.pelvis_translation = data.interpolated_pelvis_translation;
        true
    }

    /// Update the idle/walk/run flags.
    pub fn set_locomotion(&mut self, locomotion: &Locomotion) {
        self.set_flags(LocomotionFlags::from_locomotion(locomotion));
    }

    pub fn set_flags(&mut self, flags: LocomotionFlags) {
        self.should_idle = flags.should_idle;
        self.should_walk = flags.should_walk;
        self.should_run = flags.should_run;
    }

    pub fn flags(&self) -> LocomotionFlags {
        LocomotionFlags {
            should_idle: self.should_idle,
            should_walk: self.should_walk,
            should_run: self.should_run,
        }
    }
}
