//! The per-frame detection pipeline.

use fidmark_core::GrayImageView;
use fidmark_decode::canonicalize_code;
use log::{debug, trace};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::quad::filter_candidate;
use crate::rectify::rectify_patch;
use crate::refine::refine_corners;
use crate::{ConfigError, DetectorParams, MarkerDetection};

/// Square-marker detector.
///
/// The detector is pure given (frame, candidate polygons, params): it borrows
/// the frame read-only, retains nothing between calls, and candidates are
/// processed independently of each other.
pub struct MarkerDetector {
    params: DetectorParams,
}

impl MarkerDetector {
    /// Create a detector, validating the configuration up front.
    pub fn new(params: DetectorParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Detect markers among the candidate polygons of one frame.
    ///
    /// `polygons` come from an external contour + polygon-approximation step
    /// run on the binarized frame; `frame` must be the *unthresholded*
    /// grayscale image so sub-pixel sampling sees real gradients.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(candidates = polygons.len())))]
    pub fn detect(
        &self,
        frame: &GrayImageView<'_>,
        polygons: &[Vec<Point2<f32>>],
    ) -> Vec<MarkerDetection> {
        let mut out = Vec::new();
        for polygon in polygons {
            if let Some(det) = self.process_candidate(frame, polygon) {
                out.push(det);
            }
        }
        debug!(
            "frame {}x{}: {} candidates, {} markers",
            frame.width,
            frame.height,
            polygons.len(),
            out.len()
        );
        out
    }

    /// Run the full pipeline on a single candidate polygon.
    ///
    /// Every rejection is a normal `None`; this function is safe to fan out
    /// across worker threads, one candidate each, sharing the frame
    /// read-only.
    pub fn process_candidate(
        &self,
        frame: &GrayImageView<'_>,
        polygon: &[Point2<f32>],
    ) -> Option<MarkerDetection> {
        let quad = filter_candidate(polygon, frame.width, frame.height, &self.params)?;
        let corners = refine_corners(frame, &quad, self.params.min_stripe_length)?;

        let patch = rectify_patch(
            frame,
            &corners,
            self.params.grid_size,
            self.params.id_threshold,
        )?;
        if !patch.has_solid_border() {
            trace!("candidate dropped: light cell in border ring");
            return None;
        }

        let id = canonicalize_code(
            patch.inner_code(),
            patch.inner_size(),
            self.params.rotation_rule,
        );

        // The id's rotation says how far the observed patch is from the
        // canonical orientation; shift the corners so corner 0 is the
        // canonical top-left.
        let rot = id.rotation as usize;
        let corners: [Point2<f32>; 4] = std::array::from_fn(|i| corners[(i + 4 - rot) % 4]);

        Some(MarkerDetection { id, corners })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fidmark_core::GrayImage;
    use fidmark_decode::{rotate_inner_code, RotationRule};

    const FRAME_W: usize = 320;
    const FRAME_H: usize = 240;

    /// Render a 6x6 marker (solid border + 4x4 interior code) into a white
    /// frame. `code` is row-major, dark = 1, as produced by the decoder.
    fn render_marker(code: u64, x0: usize, y0: usize, side: usize) -> GrayImage {
        let mut data = vec![255u8; FRAME_W * FRAME_H];
        for y in 0..side {
            for x in 0..side {
                let cx = x * 6 / side;
                let cy = y * 6 / side;
                let on_border = cx == 0 || cy == 0 || cx == 5 || cy == 5;
                let dark = on_border || {
                    let bit = (cy - 1) * 4 + (cx - 1);
                    (code >> bit) & 1 == 1
                };
                if dark {
                    data[(y0 + y) * FRAME_W + (x0 + x)] = 0;
                }
            }
        }
        GrayImage {
            width: FRAME_W,
            height: FRAME_H,
            data,
        }
    }

    fn coarse_polygon(x0: f32, y0: f32, side: f32) -> Vec<Point2<f32>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0 + side, y0),
            Point2::new(x0 + side, y0 + side),
            Point2::new(x0, y0 + side),
        ]
    }

    // canonical under SmallestCode: its rotations are 8, 0x8000 and 0x1000
    const CODE: u64 = 0b0000_0000_0000_0001;

    #[test]
    fn detects_and_decodes_rendered_marker() {
        let img = render_marker(CODE, 110, 70, 102);
        let detector = MarkerDetector::new(DetectorParams::default()).expect("detector");

        let polygons = vec![coarse_polygon(110.0, 70.0, 101.0)];
        let detections = detector.detect(&img.as_view(), &polygons);

        assert_eq!(detections.len(), 1);
        let det = &detections[0];
        assert_eq!(det.code(), CODE);
        assert_eq!(det.id.rotation, 0);

        // refined corners should sit on the physical marker boundary
        assert!((det.corners[0].x - 109.5).abs() < 0.7);
        assert!((det.corners[0].y - 69.5).abs() < 0.7);
        assert!((det.corners[2].x - 211.5).abs() < 0.7);
        assert!((det.corners[2].y - 171.5).abs() < 0.7);
    }

    #[test]
    fn decoded_id_is_invariant_to_candidate_rotation() {
        let img = render_marker(CODE, 110, 70, 102);
        let detector = MarkerDetector::new(DetectorParams::default()).expect("detector");
        let view = img.as_view();

        let base = coarse_polygon(110.0, 70.0, 101.0);
        for start in 0..4 {
            let rotated: Vec<_> = (0..4).map(|i| base[(start + i) % 4]).collect();
            let det = detector
                .process_candidate(&view, &rotated)
                .expect("detected");
            assert_eq!(det.code(), CODE, "start vertex {start}");
            // canonical corner 0 must be the same physical point regardless
            // of which vertex the contour started at
            assert!(
                (det.corners[0].x - 109.5).abs() < 0.7
                    && (det.corners[0].y - 69.5).abs() < 0.7,
                "start vertex {start}: corner 0 at ({:.2},{:.2})",
                det.corners[0].x,
                det.corners[0].y
            );
        }
    }

    #[test]
    fn physically_rotated_marker_reports_rotation_index() {
        // render the same marker rotated a quarter turn clockwise
        let rotated_code = rotate_inner_code(CODE, 4, 1);
        let img = render_marker(rotated_code, 110, 70, 102);
        let detector = MarkerDetector::new(DetectorParams::default()).expect("detector");

        let det = detector
            .process_candidate(&img.as_view(), &coarse_polygon(110.0, 70.0, 101.0))
            .expect("detected");
        assert_eq!(det.code(), CODE);
        assert_eq!(det.id.rotation, 3);
    }

    #[test]
    fn missing_border_cell_rejects_candidate() {
        // punch a light hole into the border ring
        let mut img = render_marker(CODE, 110, 70, 102);
        for y in 70..87 {
            for x in 150..167 {
                img.data[y * FRAME_W + x] = 255;
            }
        }
        let detector = MarkerDetector::new(DetectorParams::default()).expect("detector");
        assert!(detector
            .process_candidate(&img.as_view(), &coarse_polygon(110.0, 70.0, 101.0))
            .is_none());
    }

    #[test]
    fn largest_code_rule_changes_canonical_id() {
        let img = render_marker(CODE, 110, 70, 102);
        let params = DetectorParams {
            rotation_rule: RotationRule::LargestCode,
            ..DetectorParams::default()
        };
        let detector = MarkerDetector::new(params).expect("detector");
        let det = detector
            .process_candidate(&img.as_view(), &coarse_polygon(110.0, 70.0, 101.0))
            .expect("detected");
        assert_eq!(det.code(), 0x8000);
    }
}
