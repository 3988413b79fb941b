//! Per-pelvis foot placement dataset.
//!
//! One [`PelvisFeetData`] exists per pelvis of a rig. It is populated across
//! three phases each frame: pose sampling, solving and interpolation. Every
//! per-foot array is indexed by foot slot and sized once at initialization.

use bevy::prelude::*;
use thiserror::Error;

use crate::config::{FootPlacementParams, FootPlacementRig};
use crate::detection::ProbeHit;
use crate::output::FootPlacementOutput;
use crate::skeleton::FootBones;
use crate::systems::FootPlacementStatus;

/// Reasons a dataset fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// No feet configured.
    #[error("no feet configured")]
    NoFeet,
    /// A per-foot array does not match the configured foot count.
    #[error("`{field}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Foot placement data for all feet attached to one pelvis.
///
/// Adding this to a character entity enables foot placement on it.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
#[require(FootPlacementRig, FootPlacementOutput, FootBones, FootPlacementStatus)]
pub struct PelvisFeetData {
    /// Authored per-foot parameters. Their count fixes the foot count.
    pub params: Vec<FootPlacementParams>,

    /// Whether each foot is currently ground-locked. Written by footstep
    /// notifications, read by the solver.
    pub placement_flags: Vec<bool>,

    pub posed_world_transforms: Vec<Transform>,
    pub posed_component_locations: Vec<Vec3>,

    pub probe_hits: Vec<ProbeHit>,

    pub target_effector_locations: Vec<Vec3>,
    pub target_rotations: Vec<Quat>,
    pub target_pole_locations: Vec<Vec3>,

    pub interpolated_effector_locations: Vec<Vec3>,
    pub interpolated_rotations: Vec<Quat>,
    pub interpolated_pole_locations: Vec<Vec3>,

    /// Additive pelvis translation computed this frame (vertical only).
    pub target_pelvis_translation: Vec3,
    /// Smoothed additive pelvis translation.
    pub interpolated_pelvis_translation: Vec3,
}

impl PelvisFeetData {
    /// Dataset for the given feet. Call
    /// [`initialize_pelvis`](crate::solver::initialize_pelvis) before use.
    pub fn new(params: impl IntoIterator<Item = FootPlacementParams>) -> Self {
        Self {
            params: params.into_iter().collect(),
            ..default()
        }
    }

    /// Number of configured feet.
    pub fn foot_count(&self) -> usize {
        self.params.len()
    }

    /// Check that there is at least one foot and every per-foot array holds
    /// exactly one entry per foot.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let expected = self.foot_count();
        if expected == 0 {
            return Err(DatasetError::NoFeet);
        }

        let lengths = [
            ("placement_flags", self.placement_flags.len()),
            ("posed_world_transforms", self.posed_world_transforms.len()),
            ("posed_component_locations", self.posed_component_locations.len()),
            ("probe_hits", self.probe_hits.len()),
            ("target_effector_locations", self.target_effector_locations.len()),
            ("target_rotations", self.target_rotations.len()),
            ("target_pole_locations", self.target_pole_locations.len()),
            (
                "interpolated_effector_locations",
                self.interpolated_effector_locations.len(),
            ),
            ("interpolated_rotations", self.interpolated_rotations.len()),
            ("interpolated_pole_locations", self.interpolated_pole_locations.len()),
        ];

        match lengths.into_iter().find(|&(_, actual)| actual != expected) {
            Some((field, actual)) => Err(DatasetError::LengthMismatch {
                field,
                expected,
                actual,
            }),
            None => Ok(()),
        }
    }

    /// Whether [`validate`](Self::validate) passes.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Strict-mode gate used by every mutating phase. Non-strict callers trust
    /// initialization.
    pub(crate) fn check(&self, strict: bool) -> Result<(), DatasetError> {
        if strict {
            self.validate()
        } else {
            Ok(())
        }
    }

    /// Set or clear a foot's placement flag.
    ///
    /// Returns `false` when `foot` is not a valid slot.
    pub fn set_placement_active(&mut self, foot: usize, active: bool) -> bool {
        match self.placement_flags.get_mut(foot) {
            Some(flag) => {
                *flag = active;
                true
            }
            None => false,
        }
    }

    /// Whether a foot is currently ground-locked.
    pub fn is_placement_active(&self, foot: usize) -> bool {
        self.placement_flags.get(foot).copied().unwrap_or(false)
    }

    /// Number of feet whose last probe found ground.
    pub fn grounded_feet(&self) -> usize {
        self.probe_hits.iter().filter(|hit| hit.hit).count()
    }
}
