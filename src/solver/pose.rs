//! Posed-bone sampling.

use thiserror::Error;

use crate::backend::PoseSource;
use crate::dataset::{DatasetError, PelvisFeetData};

/// Pose sampling failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoseSampleError {
    #[error("invalid foot placement dataset: {0}")]
    InvalidDataset(#[from] DatasetError),
    /// The pose source has no bone with this name. The foot keeps its previous
    /// sample.
    #[error("bone `{bone}` for foot {foot} not found in the posed skeleton")]
    MissingBone { foot: usize, bone: String },
}

/// Sample each foot's source bone from the posed skeleton.
///
/// Must run where live skeleton state is readable and before the solve phase
/// of the same frame. Every foot is visited even if an earlier one fails; the
/// first missing bone is reported.
pub fn sample_pose(
    pose: &impl PoseSource,
    data: &mut PelvisFeetData,
    strict: bool,
) -> Result<(), PoseSampleError> {
    data.check(strict)?;

    let mut missing = None;
    for foot in 0..data.foot_count() {
        let bone = data.params[foot].source_bone.as_str();
        match (
            pose.bone_world_transform(bone),
            pose.bone_component_location(bone),
        ) {
            (Some(world), Some(component)) => {
                data.posed_world_transforms[foot] = world;
                data.posed_component_locations[foot] = component;
            }
            _ => {
                missing.get_or_insert_with(|| PoseSampleError::MissingBone {
                    foot,
                    bone: bone.to_owned(),
                });
            }
        }
    }

    match missing {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
