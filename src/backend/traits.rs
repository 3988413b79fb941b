//! Backend abstraction.
//!
//! The foot placement solver never talks to a physics engine or a skeleton
//! directly. Ground probes go through [`GroundProbe`], posed bone lookups go
//! through [`PoseSource`], and [`FootPlacementBackend`] wires a physics engine's
//! probe into the plugin's solve phase.

use bevy::prelude::*;

use crate::detection::{ProbeFilter, ProbeHit};

/// Trait for physics backend implementations.
///
/// The backend's plugin must register a system in
/// [`FootPlacementSet::Solve`](crate::FootPlacementSet::Solve) that calls
/// [`solve_targets`](crate::solver::solve_targets) with a [`GroundProbe`]
/// backed by the engine's spatial queries.
pub trait FootPlacementBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;
}

/// Answers downward foot probes against world collision geometry.
///
/// Implementations must be read-only with respect to the world so they can be
/// queried from the solve phase.
pub trait GroundProbe {
    /// Cast a ray from `start` to `end` and return the first surface hit.
    fn cast(&self, start: Vec3, end: Vec3, filter: &ProbeFilter) -> ProbeHit;
}

/// Read access to the posed skeleton, before foot IK is applied.
pub trait PoseSource {
    /// World transform of a bone.
    fn bone_world_transform(&self, bone: &str) -> Option<Transform>;

    /// Location of a bone in the skeleton's component space.
    fn bone_component_location(&self, bone: &str) -> Option<Vec3>;
}
