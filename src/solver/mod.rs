//! Foot and pelvis solver.
//!
//! Stateless functions over a [`PelvisFeetData`]. A frame runs them in this
//! order:
//!
//! 1. [`sample_pose`] on the thread that owns the live skeleton.
//! 2. [`solve_targets`]: ground probes, per-foot targets and the pelvis
//!    correction. Probes are read-only world queries.
//! 3. [`interpolate`]: touches only the dataset, no allocation and no queries,
//!    so it may run alongside other rigs' evaluation.
//!
//! [`thread_safe_update`] runs 2 and 3 back to back.
//!
//! Every mutating phase takes a `strict` flag. Strict callers get the dataset
//! validated first and the phase skipped when it fails; non-strict callers
//! promise the dataset was initialized.

mod foot;
mod interpolation;
mod pelvis;
mod pose;

pub use foot::{
    additive_angles, additive_rotation, compute_foot, placement_location, pole_location,
    probe_foot, FootTarget,
};
pub use interpolation::{interp_quat, interp_vec3, smoothing_factor};
pub use pelvis::{correct_pelvis, pelvis_offset};
pub use pose::{sample_pose, PoseSampleError};

use bevy::prelude::*;

use crate::backend::GroundProbe;
use crate::dataset::{DatasetError, PelvisFeetData};
use crate::detection::ProbeHit;

/// Size every per-foot array to the configured foot count and exclude
/// `owner` from every foot's ground probe.
///
/// Call exactly once per rig; a second call would register the owner twice.
pub fn initialize_pelvis(owner: Entity, data: &mut PelvisFeetData) {
    let feet = data.foot_count();

    data.placement_flags.resize(feet, false);
    data.posed_world_transforms.resize(feet, Transform::IDENTITY);
    data.posed_component_locations.resize(feet, Vec3::ZERO);

    data.probe_hits.resize(feet, ProbeHit::miss());

    data.target_effector_locations.resize(feet, Vec3::ZERO);
    data.target_rotations.resize(feet, Quat::IDENTITY);
    data.target_pole_locations.resize(feet, Vec3::ZERO);

    data.interpolated_effector_locations.resize(feet, Vec3::ZERO);
    data.interpolated_rotations.resize(feet, Quat::IDENTITY);
    data.interpolated_pole_locations.resize(feet, Vec3::ZERO);

    for params in &mut data.params {
        params.probe.excluded.push(owner);
    }
}

/// Probe the ground under every foot, compute per-foot targets and the shared
/// pelvis correction.
pub fn solve_targets(
    probe: &impl GroundProbe,
    capsule_center: Vec3,
    capsule_half_height: f32,
    data: &mut PelvisFeetData,
    strict: bool,
) -> Result<(), DatasetError> {
    data.check(strict)?;

    for foot in 0..data.foot_count() {
        let target = compute_foot(
            probe,
            &data.posed_world_transforms[foot],
            data.posed_component_locations[foot],
            &data.params[foot],
            data.placement_flags[foot],
        );

        data.probe_hits[foot] = target.hit;
        data.target_effector_locations[foot] = target.effector;
        data.target_rotations[foot] = target.rotation;
        data.target_pole_locations[foot] = target.pole;
    }

    correct_pelvis(data, capsule_center.y - capsule_half_height);
    Ok(())
}

/// Move every interpolated value toward this frame's targets.
pub fn interpolate(
    data: &mut PelvisFeetData,
    dt: f32,
    speed: f32,
    strict: bool,
) -> Result<(), DatasetError> {
    data.check(strict)?;

    for foot in 0..data.foot_count() {
        data.interpolated_effector_locations[foot] = interp_vec3(
            data.interpolated_effector_locations[foot],
            data.target_effector_locations[foot],
            dt,
            speed,
        );
        data.interpolated_rotations[foot] = interp_quat(
            data.interpolated_rotations[foot],
            data.target_rotations[foot],
            dt,
            speed,
        );
        data.interpolated_pole_locations[foot] = interp_vec3(
            data.interpolated_pole_locations[foot],
            data.target_pole_locations[foot],
            dt,
            speed,
        );
    }

    data.interpolated_pelvis_translation = interp_vec3(
        data.interpolated_pelvis_translation,
        data.target_pelvis_translation,
        dt,
        speed,
    );
    Ok(())
}

/// Solve and interpolate in one call. Returns the smoothed additive pelvis
/// translation.
pub fn thread_safe_update(
    probe: &impl GroundProbe,
    capsule_center: Vec3,
    capsule_half_height: f32,
    data: &mut PelvisFeetData,
    dt: f32,
    speed: f32,
    strict: bool,
) -> Result<Vec3, DatasetError> {
    solve_targets(probe, capsule_center, capsule_half_height, data, strict)?;
    interpolate(data, dt, speed, strict)?;
    Ok(data.interpolated_pelvis_translation)
}
