//! Closed-form square pose from one view.
//!
//! The marker is a planar square of known side length. Its corners and the
//! observed image corners are related by a homography `H ~ [a*r1  a*r2  t]`
//! (`a` = half side length), so rotation and translation fall out of the
//! column decomposition of `H` once the projective scale is fixed. The raw
//! rotation is projected onto SO(3) with an SVD to absorb the noise left by
//! corner refinement.

use fidmark_core::homography_from_4pt;
use nalgebra::{Matrix3, Matrix4, Point2, Vector3};

use crate::CameraIntrinsics;

/// Errors from pose estimator construction and per-candidate estimation.
///
/// Construction errors are configuration mistakes and fatal at startup;
/// [`PoseError::DegenerateCorners`] and [`PoseError::BehindCamera`] are
/// per-candidate outcomes the caller treats as a rejected candidate.
#[derive(thiserror::Error, Debug)]
pub enum PoseError {
    #[error("camera intrinsics are invalid (non-finite or zero focal length)")]
    InvalidIntrinsics,
    #[error("marker side length must be positive and finite, got {0}")]
    InvalidSideLength(f64),
    #[error("corner geometry is degenerate (near-collinear or at infinity)")]
    DegenerateCorners,
    #[error("pose solution places the marker behind the camera")]
    BehindCamera,
}

/// Rigid marker-to-camera transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPose {
    /// Orthonormal rotation, det +1.
    pub rotation: Matrix3<f64>,
    /// Marker origin in camera coordinates.
    pub translation: Vector3<f64>,
}

impl MarkerPose {
    /// Distance from the camera center to the marker origin.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.translation.norm()
    }

    /// Homogeneous 4x4 transform mapping marker-local points into camera
    /// coordinates.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }
}

/// Analytic pose solver for a square marker of fixed physical size.
#[derive(Clone, Copy, Debug)]
pub struct SquarePoseEstimator {
    intrinsics: CameraIntrinsics,
    half_side: f64,
}

/// Marker-plane corners in units of the half side length: TL, TR, BR, BL
/// with y up, matching the canonical corner order after decoding.
fn model_corners() -> [Point2<f32>; 4] {
    [
        Point2::new(-1.0, 1.0),
        Point2::new(1.0, 1.0),
        Point2::new(1.0, -1.0),
        Point2::new(-1.0, -1.0),
    ]
}

impl SquarePoseEstimator {
    pub fn new(intrinsics: CameraIntrinsics, side_length: f64) -> Result<Self, PoseError> {
        if !intrinsics.is_usable() {
            return Err(PoseError::InvalidIntrinsics);
        }
        if !(side_length.is_finite() && side_length > 0.0) {
            return Err(PoseError::InvalidSideLength(side_length));
        }
        Ok(Self {
            intrinsics,
            half_side: side_length * 0.5,
        })
    }

    #[inline]
    pub fn intrinsics(&self) -> CameraIntrinsics {
        self.intrinsics
    }

    /// Estimate the marker pose from four corner points in image pixels,
    /// ordered TL, TR, BR, BL in the marker's canonical orientation.
    pub fn estimate(&self, corners: &[Point2<f32>; 4]) -> Result<MarkerPose, PoseError> {
        let mut observed = [Point2::new(0.0_f32, 0.0); 4];
        for (dst, src) in observed.iter_mut().zip(corners) {
            let n = self.intrinsics.pixel_to_normalized(*src);
            *dst = Point2::new(n.x as f32, n.y as f32);
        }

        let h = homography_from_4pt(&model_corners(), &observed)
            .ok_or(PoseError::DegenerateCorners)?
            .h;

        let h1 = h.column(0).into_owned();
        let h2 = h.column(1).into_owned();
        let h3 = h.column(2).into_owned();

        let norm_sum = h1.norm() + h2.norm();
        if norm_sum < 1e-12 {
            return Err(PoseError::DegenerateCorners);
        }
        let mut scale = 2.0 / norm_sum;
        // The projective scale is sign-ambiguous; pick the solution in front
        // of the camera.
        if h3[2] * scale < 0.0 {
            scale = -scale;
        }

        let r1 = h1 * scale;
        let r2 = h2 * scale;
        let r3 = r1.cross(&r2);
        let translation = h3 * scale * self.half_side;

        if translation.iter().any(|v| !v.is_finite()) {
            return Err(PoseError::DegenerateCorners);
        }
        if translation[2] <= 1e-12 {
            return Err(PoseError::BehindCamera);
        }

        let rotation = orthonormalize(Matrix3::from_columns(&[r1, r2, r3]))
            .ok_or(PoseError::DegenerateCorners)?;

        Ok(MarkerPose {
            rotation,
            translation,
        })
    }
}

/// Nearest rotation matrix (Frobenius sense) with det +1.
fn orthonormalize(m: Matrix3<f64>) -> Option<Matrix3<f64>> {
    if m.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let svd = m.svd(true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;
    let mut r = u * v_t;
    if r.determinant() < 0.0 {
        let mut u_fixed = u;
        u_fixed.column_mut(2).neg_mut();
        r = u_fixed * v_t;
    }
    Some(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn intrinsics() -> CameraIntrinsics {
        CameraIntrinsics {
            fx: 500.0,
            fy: 500.0,
            cx: 160.0,
            cy: 120.0,
        }
    }

    /// Project a frontal square of physical side `side` at depth `z` into
    /// pixel corners (TL, TR, BR, BL).
    fn frontal_corners(k: CameraIntrinsics, side: f64, z: f64) -> [Point2<f32>; 4] {
        let half_px_x = k.fx * (side * 0.5) / z;
        let half_px_y = k.fy * (side * 0.5) / z;
        [
            Point2::new((k.cx - half_px_x) as f32, (k.cy - half_px_y) as f32),
            Point2::new((k.cx + half_px_x) as f32, (k.cy - half_px_y) as f32),
            Point2::new((k.cx + half_px_x) as f32, (k.cy + half_px_y) as f32),
            Point2::new((k.cx - half_px_x) as f32, (k.cy + half_px_y) as f32),
        ]
    }

    #[test]
    fn frontal_square_recovers_distance_and_identity_rotation() {
        let k = intrinsics();
        let est = SquarePoseEstimator::new(k, 0.045).expect("estimator");
        let pose = est
            .estimate(&frontal_corners(k, 0.045, 0.5))
            .expect("pose");

        assert_relative_eq!(pose.translation[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(pose.translation[1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(pose.translation[2], 0.5, epsilon = 1e-6);
        assert_relative_eq!(pose.rotation, Matrix3::identity(), epsilon = 1e-9);
        assert_relative_eq!(pose.distance(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn off_center_marker_translates_in_x() {
        let k = intrinsics();
        let est = SquarePoseEstimator::new(k, 0.045).expect("estimator");

        // shift every corner 100px right: x offset of z * 100 / fx at depth z
        let mut corners = frontal_corners(k, 0.045, 0.5);
        for c in &mut corners {
            c.x += 100.0;
        }
        let pose = est.estimate(&corners).expect("pose");

        assert_relative_eq!(pose.translation[0], 0.5 * 100.0 / 500.0, epsilon = 1e-6);
        assert_relative_eq!(pose.translation[2], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn pose_matrix_embeds_rotation_and_translation() {
        let k = intrinsics();
        let est = SquarePoseEstimator::new(k, 0.045).expect("estimator");
        let pose = est
            .estimate(&frontal_corners(k, 0.045, 0.5))
            .expect("pose");

        let m = pose.to_matrix();
        assert_relative_eq!(m[(2, 3)], 0.5, epsilon = 1e-6);
        assert_eq!(m[(3, 0)], 0.0);
        assert_eq!(m[(3, 3)], 1.0);
    }

    #[test]
    fn collinear_corners_are_rejected() {
        let k = intrinsics();
        let est = SquarePoseEstimator::new(k, 0.045).expect("estimator");
        let corners = [
            Point2::new(100.0_f32, 100.0),
            Point2::new(120.0_f32, 100.0),
            Point2::new(140.0_f32, 100.0),
            Point2::new(160.0_f32, 100.0),
        ];
        assert!(matches!(
            est.estimate(&corners),
            Err(PoseError::DegenerateCorners)
        ));
    }

    #[test]
    fn invalid_configuration_is_fatal_at_construction() {
        let bad_k = CameraIntrinsics {
            fx: 0.0,
            fy: 500.0,
            cx: 160.0,
            cy: 120.0,
        };
        assert!(matches!(
            SquarePoseEstimator::new(bad_k, 0.045),
            Err(PoseError::InvalidIntrinsics)
        ));
        assert!(matches!(
            SquarePoseEstimator::new(intrinsics(), 0.0),
            Err(PoseError::InvalidSideLength(_))
        ));
    }
}
