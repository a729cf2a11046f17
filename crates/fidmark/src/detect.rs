//! End-to-end helpers from `image::GrayImage`.
//!
//! Contour extraction and polygon approximation are external to the core
//! pipeline; this module adapts `imageproc` as that external step.

use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use nalgebra::Point2;

use crate::{MarkerTracker, TrackedMarker};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Convert an `image::GrayImage` into the lightweight `fidmark-core` view type.
pub fn gray_view(img: &::image::GrayImage) -> fidmark_core::GrayImageView<'_> {
    fidmark_core::GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Binarize a frame and extract closed candidate polygons.
///
/// Dark markers on a light background end up as hole contours of the
/// binarized image; each contour is simplified with a Douglas-Peucker
/// tolerance of 2% of its perimeter, the setting the detector's quad filter
/// is tuned for.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img), fields(width = img.width(), height = img.height()))
)]
pub fn extract_candidate_polygons(
    img: &::image::GrayImage,
    bin_threshold: u8,
) -> Vec<Vec<Point2<f32>>> {
    let binary = threshold(img, bin_threshold, ThresholdType::Binary);
    let contours = find_contours::<i32>(&binary);

    let mut out = Vec::new();
    for contour in &contours {
        if contour.border_type != BorderType::Hole {
            continue;
        }
        if contour.points.len() < 4 {
            continue;
        }
        let tolerance = 0.02 * arc_length(&contour.points, true);
        let poly = approximate_polygon_dp(&contour.points, tolerance, true);
        out.push(
            poly.iter()
                .map(|p| Point2::new(p.x as f32, p.y as f32))
                .collect(),
        );
    }
    out
}

/// Run the whole pipeline on one grayscale image.
pub fn track_image(
    tracker: &MarkerTracker,
    img: &::image::GrayImage,
    frame_index: u64,
) -> Vec<TrackedMarker> {
    let polygons =
        extract_candidate_polygons(img, tracker.detector().params().bin_threshold);
    tracker.process_frame(&gray_view(img), &polygons, frame_index)
}
