//! Hodograph (derivative curve) of a cubic Bézier segment, used to locate
//! critical points (extrema) and inflection points for monotonicity
//! splitting.

#![forbid(unsafe_code)]

use crate::bezier::{Axis, BezierSegment};
use crate::ordinate::EPSILON;

/// Quadratic coefficients `(a, b, c)` of `B'(u) = a·u² + b·u + c` on the
/// given axis, derived from the hodograph
/// `B'(u) = 3[d0(1-u)² + 2 d1(1-u)u + d2 u²]` where `d_i = p_{i+1} - p_i`,
/// expanded into power-basis form: `a = d0 - 2 d1 + d2`, `b = 2(d1 - d0)`,
/// `c = d0`.
fn hodograph_coefficients(segment: BezierSegment, axis: Axis) -> (f64, f64, f64) {
    let p0 = segment.p0.axis(axis).get();
    let p1 = segment.p1.axis(axis).get();
    let p2 = segment.p2.axis(axis).get();
    let p3 = segment.p3.axis(axis).get();

    let d0 = p1 - p0;
    let d1 = p2 - p1;
    let d2 = p3 - p2;

    let a = d0 - 2.0 * d1 + d2;
    let b = 2.0 * (d1 - d0);
    let c = d0;
    (a, b, c)
}

/// Real roots of `a·u² + b·u + c = 0`, via the quadratic formula with
/// discriminant `Δ = b² - 4ac`:
/// - `Δ < 0`: no real root.
/// - `Δ ≈ 0` (within [`EPSILON`]): one (repeated) root.
/// - `Δ > 0`: two roots.
///
/// Falls back to the linear case when `a ≈ 0` (the hodograph degenerates to
/// a line, e.g. when the three control-point deltas are in arithmetic
/// progression).
fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() <= EPSILON {
        if b.abs() <= EPSILON {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < -EPSILON {
        Vec::new()
    } else if discriminant.abs() <= EPSILON {
        vec![-b / (2.0 * a)]
    } else {
        let sqrt_d = discriminant.sqrt();
        vec![(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)]
    }
}

/// Critical points of the segment on the given axis: roots of the
/// hodograph lying in the open interval `(0,1)`. A curve must be split at
/// these points before it can be treated as monotonic on that axis.
pub fn critical_points(segment: BezierSegment, axis: Axis) -> Vec<f64> {
    let (a, b, c) = hodograph_coefficients(segment, axis);
    let mut roots: Vec<f64> = quadratic_roots(a, b, c)
        .into_iter()
        .filter(|&u| u > EPSILON && u < 1.0 - EPSILON)
        .collect();
    roots.sort_by(|x, y| x.total_cmp(y));
    roots.dedup_by(|x, y| (*x - *y).abs() <= EPSILON);
    roots
}

/// Critical points on the input axis specifically, the axis that must be
/// monotonic for a segment to serve as a `Mapping`.
pub fn critical_points_input(segment: BezierSegment) -> Vec<f64> {
    critical_points(segment, Axis::Input)
}

/// Critical points on the output axis specifically, the axis that must be
/// monotonic for a lifted segment to produce a valid `LinearMonotonic`.
pub fn critical_points_output(segment: BezierSegment) -> Vec<f64> {
    critical_points(segment, Axis::Output)
}

/// The union of input- and output-axis critical points, sorted ascending
/// and deduplicated. A segment split at these points is monotonic on both
/// axes, which both [`crate::mapping::Mapping`] (monotonic input) and
/// [`crate::linear_curve::LinearMonotonic`] (monotonic output) require.
fn critical_points_both(segment: BezierSegment) -> Vec<f64> {
    let mut points = critical_points_input(segment);
    points.extend(critical_points_output(segment));
    points.sort_by(|x, y| x.total_cmp(y));
    points.dedup_by(|x, y| (*x - *y).abs() <= EPSILON);
    points
}

/// Inflection points of the 2-D curve `(input(u), output(u))`, from the
/// scalar cross-product hodograph: with `A = P3 - 3 P2 + 3 P1 - P0`,
/// `B = 3 P2 - 6 P1 + 3 P0`, `C = 3 P1 - 3 P0`, inflections are roots of
/// `cross(A,B)·t² + cross(A,C)·t + cross(B,C) = 0` in `(0,1)` (the standard
/// Sederberg inflection-point formula).
///
/// For mapping segments the input axis is the one that must be monotonic;
/// inflection points (which concern curvature of the 2-D shape, not the
/// input-axis derivative) do not by themselves force a split, but are
/// exposed for completeness and for consumers that render the curve.
pub fn inflection_points(segment: BezierSegment) -> Vec<f64> {
    let p0x = segment.p0.input.get();
    let p0y = segment.p0.output.get();
    let p1x = segment.p1.input.get();
    let p1y = segment.p1.output.get();
    let p2x = segment.p2.input.get();
    let p2y = segment.p2.output.get();
    let p3x = segment.p3.input.get();
    let p3y = segment.p3.output.get();

    let ax = p3x - 3.0 * p2x + 3.0 * p1x - p0x;
    let ay = p3y - 3.0 * p2y + 3.0 * p1y - p0y;
    let bx = 3.0 * p2x - 6.0 * p1x + 3.0 * p0x;
    let by = 3.0 * p2y - 6.0 * p1y + 3.0 * p0y;
    let cx = 3.0 * p1x - 3.0 * p0x;
    let cy = 3.0 * p1y - 3.0 * p0y;

    let cross = |ux: f64, uy: f64, vx: f64, vy: f64| ux * vy - uy * vx;

    let coeff_a = cross(ax, ay, bx, by);
    let coeff_b = cross(ax, ay, cx, cy);
    let coeff_c = cross(bx, by, cx, cy);

    let mut roots: Vec<f64> = quadratic_roots(coeff_a, coeff_b, coeff_c)
        .into_iter()
        .filter(|&u| u > EPSILON && u < 1.0 - EPSILON)
        .collect();
    roots.sort_by(|x, y| x.total_cmp(y));
    roots.dedup_by(|x, y| (*x - *y).abs() <= EPSILON);
    roots
}

/// Split the segment at every critical point of either axis, returning
/// subsegments each monotonic in *both* input and output. A segment that is
/// monotonic in input can still have an output-axis extremum (an "upside
/// down U" traced out left-to-right); splitting on the input axis alone
/// would leave such a piece unusable as a [`crate::linear_curve::LinearMonotonic`].
pub fn critical_split(segment: BezierSegment) -> Vec<BezierSegment> {
    let points = critical_points_both(segment);
    if points.is_empty() {
        return vec![segment];
    }

    let mut pieces = Vec::with_capacity(points.len() + 1);
    let mut remaining = segment;
    let mut consumed = 0.0_f64;
    for &u in &points {
        // `u` is a parameter on the *original* segment; re-map it onto the
        // still-unconsumed remainder, whose parameter range is
        // `[consumed, 1]` of the original.
        let local_u = (u - consumed) / (1.0 - consumed);
        let (left, right) = remaining.split_at(local_u);
        pieces.push(left);
        remaining = right;
        consumed = u;
    }
    pieces.push(remaining);
    pieces
}
