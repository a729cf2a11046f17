//! Analytic pose estimation for square fiducial markers.
//!
//! Given the four refined corner points of a detected marker and the physical
//! side length, [`SquarePoseEstimator`] recovers the rigid marker-to-camera
//! transform from a single view by decomposing the marker-plane homography.

mod camera;
mod square;

pub use camera::CameraIntrinsics;
pub use square::{MarkerPose, PoseError, SquarePoseEstimator};
