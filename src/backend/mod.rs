mod traits;

#[cfg(feature = "avian3d")]
pub mod avian;

pub use traits::{FootPlacementBackend, GroundProbe, PoseSource};

#[cfg(feature = "avian3d")]
pub use avian::Avian3dBackend;
