//! ECS systems driving the foot placement phases.
//!
//! All systems run in `Update`, one per [`FootPlacementSet`](crate::FootPlacementSet)
//! phase. Pose sampling reads the `GlobalTransform`s propagated at the end of
//! the previous frame. Interpolation and output only touch the components of
//! the rig they iterate.

use bevy::prelude::*;

use crate::backend::GroundProbe;
use crate::config::{CapsuleBounds, FootPlacementRig};
use crate::dataset::PelvisFeetData;
use crate::locomotion::Locomotion;
use crate::output::FootPlacementOutput;
use crate::skeleton::{EntityPose, FootBones};
use crate::solver::{initialize_pelvis, interpolate, sample_pose, solve_targets};

/// Per-frame progress of a rig through the phases.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct FootPlacementStatus {
    /// Every foot bone was sampled this frame.
    pub pose_sampled: bool,
    /// Targets were solved this frame.
    pub solved: bool,
    /// An invalid dataset was already reported for this rig.
    pub reported_invalid: bool,
    /// The rig reported `ik_alpha = 0` last frame.
    pub disabled: bool,
}

impl FootPlacementStatus {
    fn begin_frame(&mut self) {
        self.pose_sampled = false;
        self.solved = false;
    }
}

/// Size newly added datasets and set up their bone slots.
pub fn initialize_rigs(
    mut rigs: Query<(Entity, &mut PelvisFeetData, &mut FootBones), Added<PelvisFeetData>>,
) {
    for (entity, mut data, mut bones) in &mut rigs {
        initialize_pelvis(entity, &mut data);
        *bones = FootBones::from_params(&data.params);
        debug!(
            "initialized foot placement on {:?} with {} feet",
            entity,
            data.foot_count()
        );
    }
}

/// Sample the posed foot bones of every rig.
pub fn sample_rig_poses(
    mut rigs: Query<(
        Entity,
        &FootPlacementRig,
        &mut PelvisFeetData,
        &mut FootBones,
        &mut FootPlacementStatus,
    )>,
    names: Query<(Entity, &Name)>,
    parents: Query<&ChildOf>,
    transforms: Query<&'static GlobalTransform>,
) {
    for (entity, rig, mut data, mut bones, mut status) in &mut rigs {
        status.begin_frame();

        if let Err(err) = data.check(rig.strict_validation) {
            if !status.reported_invalid {
                warn!("foot placement on {:?} skipped: {}", entity, err);
                status.reported_invalid = true;
            }
            continue;
        }
        status.reported_invalid = false;

        let root = rig.skeleton_root(entity);
        let Ok(root_transform) = transforms.get(root) else {
            continue;
        };
        if !bones.resolve(root, &names, &parents) {
            continue;
        }

        let pose = EntityPose::new(root_transform, &bones, &transforms);
        match sample_pose(&pose, &mut data, rig.strict_validation) {
            Ok(()) => status.pose_sampled = true,
            Err(err) => debug!("pose sample on {:?} failed: {}", entity, err),
        }
    }
}

/// Solve one rig against a backend's ground probe.
///
/// Backend solve systems call this for every rig they iterate. Rigs without a
/// pose sample this frame or without [`CapsuleBounds`] are skipped.
pub fn solve_rig(
    probe: &impl GroundProbe,
    rig: &FootPlacementRig,
    transform: &GlobalTransform,
    capsule: Option<&CapsuleBounds>,
    data: &mut PelvisFeetData,
    status: &mut FootPlacementStatus,
) {
    if !status.pose_sampled {
        return;
    }
    let Some(capsule) = capsule else {
        return;
    };
    status.solved = solve_targets(
        probe,
        transform.translation(),
        capsule.half_height,
        data,
        rig.strict_validation,
    )
    .is_ok();
}

/// Smooth every solved rig toward this frame's targets.
pub fn interpolate_rigs(
    time: Res<Time>,
    mut rigs: Query<(
        Entity,
        &FootPlacementRig,
        &mut PelvisFeetData,
        &FootPlacementStatus,
    )>,
) {
    let dt = time.delta_secs();
    for (entity, rig, mut data, status) in &mut rigs {
        if !status.solved {
            continue;
        }
        if let Err(err) = interpolate(&mut data, dt, rig.interp_speed, rig.strict_validation) {
            debug!("interpolation on {:?} skipped: {}", entity, err);
        }
    }
}

/// Flatten interpolated values and locomotion flags into [`FootPlacementOutput`].
pub fn write_outputs(
    mut rigs: Query<(
        Entity,
        &FootPlacementRig,
        &PelvisFeetData,
        &mut FootPlacementStatus,
        &mut FootPlacementOutput,
        Option<&Locomotion>,
    )>,
) {
    for (entity, rig, data, mut status, mut output, locomotion) in &mut rigs {
        if let Some(locomotion) = locomotion {
            output.set_locomotion(locomotion);
        }

        let ready = status.solved
            && locomotion.is_some()
            && output.copy_from(data, rig.left_foot, rig.right_foot);
        output.ik_alpha = if ready { rig.ik_weight } else { 0.0 };

        if status.disabled == ready {
            status.disabled = !ready;
            if ready {
                debug!("foot placement on {:?} enabled", entity);
            } else {
                debug!("foot placement on {:?} disabled: collaborator missing", entity);
            }
        }
    }
}
