//! Oriented intensity stripes and sub-pixel edge location.
//!
//! For each sample point on a quad side a small 3xL patch is sampled,
//! oriented so its long axis crosses the physical edge. The dominant
//! intensity transition along that axis gives the edge position to a
//! fraction of a pixel.

use fidmark_core::{sample_bilinear, GrayImageView};
use nalgebra::{Point2, Vector2};

pub(crate) const STRIPE_WIDTH: usize = 3;

/// A sampled stripe with the directions used to build it.
pub(crate) struct Stripe {
    /// Row-major intensities, `len` rows of [`STRIPE_WIDTH`] columns.
    values: Vec<f32>,
    len: usize,
    center: Point2<f32>,
    /// Unit vector perpendicular to the edge (the stripe's long axis).
    across: Vector2<f32>,
}

/// Stripe length for a given spacing between sample points: 80% of the
/// spacing, rounded, clamped to `min_len` and forced odd.
pub(crate) fn stripe_length(spacing: f32, min_len: usize) -> usize {
    let mut len = (0.8 * spacing).round() as usize;
    if len < min_len {
        len = min_len;
    }
    len | 1
}

/// Sample a 3xL stripe centered on `center`.
///
/// `along` must be the unit direction of the quad side; the long axis runs
/// along its 90-degree rotation so the stripe crosses the edge.
pub(crate) fn build_stripe(
    frame: &GrayImageView<'_>,
    center: Point2<f32>,
    along: Vector2<f32>,
    len: usize,
) -> Stripe {
    let across = Vector2::new(along.y, -along.x);
    let half = (len / 2) as i32;

    let mut values = Vec::with_capacity(STRIPE_WIDTH * len);
    for n in -half..=half {
        for m in -1i32..=1 {
            let p = center + along * m as f32 + across * n as f32;
            values.push(sample_bilinear(frame, p.x, p.y));
        }
    }

    Stripe {
        values,
        len,
        center,
        across,
    }
}

impl Stripe {
    #[inline]
    fn row_response(&self, row: usize) -> f32 {
        // (1, 2, 1) smoothing across the width
        let r = &self.values[row * STRIPE_WIDTH..(row + 1) * STRIPE_WIDTH];
        r[0] + 2.0 * r[1] + r[2]
    }

    /// Sub-pixel location of the dominant intensity transition.
    ///
    /// A central-difference derivative runs along the long axis; the extremum
    /// of its magnitude is refined with a parabolic fit through its
    /// neighbors. A flat stripe has no transition: the geometric center is
    /// returned as the documented fallback.
    pub(crate) fn locate_edge(&self) -> Point2<f32> {
        let len = self.len;
        let half = (len / 2) as f32;

        let mut best_row = 0usize;
        let mut best_mag = 0.0f32;
        let mut grads = vec![0.0f32; len];
        for row in 1..len - 1 {
            let g = self.row_response(row + 1) - self.row_response(row - 1);
            grads[row] = g;
            if g.abs() > best_mag {
                best_mag = g.abs();
                best_row = row;
            }
        }

        if best_mag < f32::EPSILON {
            return self.center;
        }

        // parabola through the three magnitudes around the extremum;
        // the extremum row is in 1..len-1 so both neighbors exist
        let m0 = grads[best_row - 1].abs();
        let m1 = grads[best_row].abs();
        let m2 = grads[best_row + 1].abs();
        let denom = m0 - 2.0 * m1 + m2;
        let offset = if denom.abs() < 1e-12 {
            0.0
        } else {
            (0.5 * (m0 - m2) / denom).clamp(-1.0, 1.0)
        };

        let shift = best_row as f32 + offset - half;
        self.center + self.across * shift
    }
}
