//! Total-least-squares line fitting and line intersection.

use nalgebra::{Point2, Vector2};

/// A fitted 2D line in point-direction form. `dir` is unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FittedLine {
    pub point: Point2<f32>,
    pub dir: Vector2<f32>,
}

impl FittedLine {
    /// Perpendicular distance from `p` to the line.
    pub fn distance_to(&self, p: Point2<f32>) -> f32 {
        let d = p - self.point;
        (d.x * self.dir.y - d.y * self.dir.x).abs()
    }
}

/// Fit a line through `points` minimizing the sum of squared perpendicular
/// distances (total least squares).
///
/// The direction is the dominant eigenvector of the 2x2 scatter matrix,
/// obtained in closed form. `None` when fewer than 2 points are given or all
/// points coincide.
pub fn fit_line_tls(points: &[Point2<f32>]) -> Option<FittedLine> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mut cx = 0.0_f64;
    let mut cy = 0.0_f64;
    for p in points {
        cx += p.x as f64;
        cy += p.y as f64;
    }
    cx /= n;
    cy /= n;

    // Central second moments of the point set.
    let mut sxx = 0.0_f64;
    let mut sxy = 0.0_f64;
    let mut syy = 0.0_f64;
    for p in points {
        let dx = p.x as f64 - cx;
        let dy = p.y as f64 - cy;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx + syy < 1e-12 {
        return None;
    }

    let angle = 0.5 * (2.0 * sxy).atan2(sxx - syy);
    let dir = Vector2::new(angle.cos() as f32, angle.sin() as f32);

    Some(FittedLine {
        point: Point2::new(cx as f32, cy as f32),
        dir,
    })
}

/// Intersection of two fitted lines.
///
/// `None` when the lines are near parallel; the 1e-6 cross-product floor keeps
/// ill-conditioned intersections from producing corners far off-frame.
pub fn intersect_lines(a: &FittedLine, b: &FittedLine) -> Option<Point2<f32>> {
    let cross = (a.dir.x as f64) * (b.dir.y as f64) - (a.dir.y as f64) * (b.dir.x as f64);
    if cross.abs() < 1e-6 {
        return None;
    }

    let dx = (b.point.x - a.point.x) as f64;
    let dy = (b.point.y - a.point.y) as f64;
    let t = (dx * b.dir.y as f64 - dy * b.dir.x as f64) / cross;

    Some(Point2::new(
        (a.point.x as f64 + t * a.dir.x as f64) as f32,
        (a.point.y as f64 + t * a.dir.y as f64) as f32,
    ))
}
