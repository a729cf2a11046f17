//! Pinhole camera geometry.
//!
//! Only the ideal pinhole model is carried here; lens distortion correction
//! is out of scope for this pipeline.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Focal lengths below this many pixels cannot turn a pixel offset into a
/// meaningful viewing ray.
const MIN_FOCAL_PX: f64 = 1e-6;

/// Pinhole parameters used to center and scale pixel coordinates before the
/// pose solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Horizontal focal length, pixel units.
    pub fx: f64,
    /// Vertical focal length, pixel units.
    pub fy: f64,
    /// Principal point column, pixel units.
    pub cx: f64,
    /// Principal point row, pixel units.
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Intrinsics with unit focal length and the principal point at the frame
    /// center. This reproduces the legacy behavior of centering raw pixel
    /// coordinates by half the resolution before the pose solve.
    pub fn unit_focal(width: usize, height: usize) -> Self {
        Self {
            fx: 1.0,
            fy: 1.0,
            cx: width as f64 * 0.5,
            cy: height as f64 * 0.5,
        }
    }

    /// `true` when the parameters describe a usable pinhole: every entry
    /// finite and both focal lengths at least [`MIN_FOCAL_PX`] in magnitude.
    pub fn is_usable(self) -> bool {
        [self.fx, self.fy, self.cx, self.cy]
            .iter()
            .all(|v| v.is_finite())
            && self.fx.abs() >= MIN_FOCAL_PX
            && self.fy.abs() >= MIN_FOCAL_PX
    }

    /// Convert an image pixel to camera-centered normalized coordinates.
    ///
    /// The y axis is flipped so the resulting camera frame is right-handed:
    /// x right, y up, z out of the camera toward the scene.
    #[inline]
    pub fn pixel_to_normalized(self, pixel: Point2<f32>) -> Point2<f64> {
        Point2::new(
            (pixel.x as f64 - self.cx) / self.fx,
            (self.cy - pixel.y as f64) / self.fy,
        )
    }
}
