//! Sub-pixel corner refinement for accepted quad candidates.

use fidmark_core::{fit_line_tls, intersect_lines, FittedLine, GrayImageView};
use log::trace;
use nalgebra::Point2;

use crate::stripe::{build_stripe, stripe_length};

/// Edge samples per quad side. Sides are split into `EDGE_SAMPLES + 1` equal
/// parts and the endpoints are skipped to keep corner pixels out of the fit.
const EDGE_SAMPLES: usize = 6;

/// Refine the four coarse vertices to sub-pixel corners.
///
/// Each side gets [`EDGE_SAMPLES`] stripe-localized edge points and a total
/// least squares line; adjacent lines are intersected so that refined corner
/// `i` replaces input vertex `i`. `None` when a side is degenerate or two
/// adjacent fitted lines are near parallel.
pub(crate) fn refine_corners(
    frame: &GrayImageView<'_>,
    quad: &[Point2<f32>; 4],
    min_stripe_length: usize,
) -> Option<[Point2<f32>; 4]> {
    let mut lines = [FittedLine {
        point: Point2::origin(),
        dir: nalgebra::Vector2::zeros(),
    }; 4];

    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let step = (b - a) / (EDGE_SAMPLES + 1) as f32;
        let spacing = step.norm();
        if spacing < 1.0 {
            trace!("candidate dropped: side {i} shorter than sampling step");
            return None;
        }
        let along = step / spacing;
        let len = stripe_length(spacing, min_stripe_length);

        let mut edge_points = [Point2::<f32>::origin(); EDGE_SAMPLES];
        for (j, out) in edge_points.iter_mut().enumerate() {
            let p = a + step * (j + 1) as f32;
            let stripe = build_stripe(frame, p, along, len);
            *out = stripe.locate_edge();
        }

        lines[i] = match fit_line_tls(&edge_points) {
            Some(line) => line,
            None => {
                trace!("candidate dropped: side {i} line fit failed");
                return None;
            }
        };
    }

    let mut corners = [Point2::<f32>::origin(); 4];
    for i in 0..4 {
        // sides i-1 and i meet at vertex i
        let Some(p) = intersect_lines(&lines[(i + 3) % 4], &lines[i]) else {
            trace!("candidate dropped: near-parallel sides at corner {i}");
            return None;
        };
        corners[i] = p;
    }

    Some(corners)
}
