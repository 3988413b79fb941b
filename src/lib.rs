//! Procedural foot placement and pelvis correction for Bevy character rigs.
//!
//! Each frame the posed foot bones of a rig are probed against the ground.
//! Grounded feet get IK effector targets on the surface, oriented to its
//! normal, with a pole target for knee direction. The pelvis is lowered so the
//! lowest reachable foot touches down. All targets are smoothed over time and
//! flattened into [`FootPlacementOutput`](output::FootPlacementOutput) for the
//! animation graph's IK stage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use avian3d::prelude::*;
//! use msg_foot_ik::prelude::*;
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(PhysicsPlugins::default())
//!     .add_plugins(FootPlacementPlugin::<Avian3dBackend>::default())
//!     .run();
//!
//! fn spawn_character(mut commands: Commands) {
//!     commands.spawn((
//!         Transform::from_xyz(0.0, 1.0, 0.0),
//!         RigidBody::Kinematic,
//!         Collider::capsule(0.3, 1.2),
//!         Locomotion::new(),
//!         PelvisFeetData::new([
//!             FootPlacementParams::new("foot_l").with_foot_bone_height(0.08),
//!             FootPlacementParams::new("foot_r").with_foot_bone_height(0.08),
//!         ]),
//!     ));
//! }
//! ```

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod dataset;
pub mod detection;
pub mod locomotion;
pub mod notify;
pub mod output;
pub mod skeleton;
pub mod solver;
pub mod systems;

#[cfg(feature = "avian3d")]
pub use backend::avian;

pub mod prelude {
    pub use crate::backend::{FootPlacementBackend, GroundProbe, PoseSource};
    pub use crate::config::{
        CapsuleBounds, FootPlacementParams, FootPlacementRig, FootProbeConfig, ValueConstraint,
    };
    pub use crate::dataset::{DatasetError, PelvisFeetData};
    pub use crate::detection::{ProbeFilter, ProbeHit};
    pub use crate::locomotion::{Locomotion, LocomotionFlags, MovementState};
    pub use crate::notify::FootPlacementNotify;
    pub use crate::output::FootPlacementOutput;
    pub use crate::skeleton::FootBones;
    pub use crate::systems::FootPlacementStatus;
    pub use crate::{FootPlacementPlugin, FootPlacementSet};

    #[cfg(feature = "avian3d")]
    pub use crate::backend::Avian3dBackend;
}

/// Phases of a foot placement frame, chained in this order in `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FootPlacementSet {
    /// Size newly added datasets.
    Initialize,
    /// Apply footstep notifications.
    Notify,
    /// Read the posed foot bones.
    PoseSample,
    /// Backend-provided ground probes, per-foot targets and pelvis correction.
    Solve,
    /// Smooth toward this frame's targets.
    Interpolate,
    /// Write [`FootPlacementOutput`](output::FootPlacementOutput).
    Output,
}

/// Main plugin for foot placement.
///
/// Generic over the physics backend `B` that answers the ground probes.
pub struct FootPlacementPlugin<B: backend::FootPlacementBackend> {
    _marker: PhantomData<B>,
}

impl<B: backend::FootPlacementBackend> Default for FootPlacementPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<B: backend::FootPlacementBackend> Plugin for FootPlacementPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<config::FootPlacementRig>()
            .register_type::<config::CapsuleBounds>()
            .register_type::<dataset::PelvisFeetData>()
            .register_type::<locomotion::Locomotion>()
            .register_type::<output::FootPlacementOutput>()
            .register_type::<skeleton::FootBones>()
            .register_type::<systems::FootPlacementStatus>();

        app.add_message::<notify::FootPlacementNotify>();

        app.configure_sets(
            Update,
            (
                FootPlacementSet::Initialize,
                FootPlacementSet::Notify,
                FootPlacementSet::PoseSample,
                FootPlacementSet::Solve,
                FootPlacementSet::Interpolate,
                FootPlacementSet::Output,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                systems::initialize_rigs.in_set(FootPlacementSet::Initialize),
                notify::apply_placement_notifies.in_set(FootPlacementSet::Notify),
                systems::sample_rig_poses.in_set(FootPlacementSet::PoseSample),
                systems::interpolate_rigs.in_set(FootPlacementSet::Interpolate),
                systems::write_outputs.in_set(FootPlacementSet::Output),
            ),
        );

        app.add_plugins(B::plugin());
    }
}
