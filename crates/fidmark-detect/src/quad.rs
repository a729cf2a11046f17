//! Quad candidate filtering.

use log::trace;
use nalgebra::Point2;

use crate::DetectorParams;

/// Filter a raw contour polygon down to a marker-sized quad.
///
/// Returns the four vertices normalized to screen-clockwise winding, or
/// `None` when the polygon cannot be a marker: wrong vertex count, bounding
/// box outside the configured side range, or too close to the frame border.
pub(crate) fn filter_candidate(
    polygon: &[Point2<f32>],
    frame_width: usize,
    frame_height: usize,
    params: &DetectorParams,
) -> Option<[Point2<f32>; 4]> {
    if polygon.len() != 4 {
        trace!("candidate dropped: {} vertices", polygon.len());
        return None;
    }

    let mut min = polygon[0];
    let mut max = polygon[0];
    for p in polygon {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    let w = max.x - min.x;
    let h = max.y - min.y;
    if w < params.min_side_px
        || h < params.min_side_px
        || w > params.max_side_px
        || h > params.max_side_px
    {
        trace!("candidate dropped: bbox {w:.1}x{h:.1} outside side range");
        return None;
    }

    let margin = params.frame_margin_px;
    if min.x < margin
        || min.y < margin
        || max.x > frame_width as f32 - margin
        || max.y > frame_height as f32 - margin
    {
        trace!("candidate dropped: bbox touches frame margin");
        return None;
    }

    let quad = [polygon[0], polygon[1], polygon[2], polygon[3]];
    Some(normalize_winding(quad))
}

/// Force screen-clockwise winding (positive shoelace area with y down),
/// keeping vertex 0 in place. The rest of the pipeline relies on a stable
/// winding so rectification and pose keep consistent signs.
fn normalize_winding(quad: [Point2<f32>; 4]) -> [Point2<f32>; 4] {
    if signed_area(&quad) >= 0.0 {
        quad
    } else {
        [quad[0], quad[3], quad[2], quad[1]]
    }
}

fn signed_area(quad: &[Point2<f32>; 4]) -> f32 {
    let mut sum = 0.0;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        sum += a.x * b.y - b.x * a.y;
    }
    0.5 * sum
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_W: usize = 640;
    const FRAME_H: usize = 480;

    fn square(x0: f32, y0: f32, side: f32) -> Vec<Point2<f32>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0 + side, y0),
            Point2::new(x0 + side, y0 + side),
            Point2::new(x0, y0 + side),
        ]
    }

    fn params() -> DetectorParams {
        DetectorParams::default()
    }

    #[test]
    fn rejects_non_quadrilaterals() {
        let tri = vec![
            Point2::new(100.0_f32, 100.0),
            Point2::new(200.0_f32, 100.0),
            Point2::new(150.0_f32, 200.0),
        ];
        assert!(filter_candidate(&tri, FRAME_W, FRAME_H, &params()).is_none());

        let mut penta = square(100.0, 100.0, 100.0);
        penta.push(Point2::new(150.0, 90.0));
        assert!(filter_candidate(&penta, FRAME_W, FRAME_H, &params()).is_none());
    }

    #[test]
    fn side_range_boundary_is_inclusive_at_minimum() {
        let at_min = square(100.0, 100.0, 85.0);
        assert!(filter_candidate(&at_min, FRAME_W, FRAME_H, &params()).is_some());

        let below_min = square(100.0, 100.0, 84.0);
        assert!(filter_candidate(&below_min, FRAME_W, FRAME_H, &params()).is_none());
    }

    #[test]
    fn oversized_quad_is_rejected() {
        let big = square(100.0, 100.0, 151.0);
        assert!(filter_candidate(&big, FRAME_W, FRAME_H, &params()).is_none());
    }

    #[test]
    fn margin_violation_is_rejected() {
        let touching = square(5.0, 100.0, 100.0);
        assert!(filter_candidate(&touching, FRAME_W, FRAME_H, &params()).is_none());

        let near_right = square(FRAME_W as f32 - 105.0, 100.0, 100.0);
        assert!(filter_candidate(&near_right, FRAME_W, FRAME_H, &params()).is_none());
    }

    #[test]
    fn counter_clockwise_input_is_rewound() {
        let cw = square(100.0, 100.0, 100.0);
        let ccw = vec![cw[0], cw[3], cw[2], cw[1]];
        let out = filter_candidate(&ccw, FRAME_W, FRAME_H, &params()).expect("accepted");
        assert_eq!(out[0], cw[0]);
        assert_eq!(out[1], cw[1]);
        assert_eq!(out[3], cw[3]);
    }
}
