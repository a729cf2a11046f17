//! Perspective rectification of a refined quad into the canonical grid.

use fidmark_core::{homography_from_4pt, warp_perspective_gray, GrayImageView};
use fidmark_decode::BitPatch;
use nalgebra::Point2;

/// Warp the marker interior into a `grid_size` x `grid_size` patch and
/// binarize it.
///
/// Corner `i` of the quad maps to corner `i` of the canonical square, so the
/// input winding carries through to the patch orientation. `None` when the
/// corners do not define a proper homography.
pub(crate) fn rectify_patch(
    frame: &GrayImageView<'_>,
    corners: &[Point2<f32>; 4],
    grid_size: usize,
    threshold: u8,
) -> Option<BitPatch> {
    let g = grid_size as f32;
    let canonical = [
        Point2::new(0.0, 0.0),
        Point2::new(g, 0.0),
        Point2::new(g, g),
        Point2::new(0.0, g),
    ];

    let h_img_from_grid = homography_from_4pt(&canonical, corners)?;
    let warped = warp_perspective_gray(frame, h_img_from_grid, grid_size, grid_size);
    BitPatch::from_gray(&warped, threshold)
}
