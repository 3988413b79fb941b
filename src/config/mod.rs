//! Authored configuration for the foot placement system.

mod constraint;
mod foot;
mod rig;

pub use constraint::ValueConstraint;
pub use foot::{FootPlacementParams, FootProbeConfig};
pub use rig::{CapsuleBounds, FootPlacementRig};
