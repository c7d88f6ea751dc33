//! Adaptive flatness-driven linearization of a Bézier segment into a run of
//! [`ControlPoint`]s suitable for a [`crate::linear_curve::LinearMonotonic`].

#![forbid(unsafe_code)]

use crate::bezier::{Axis, BezierSegment, ControlPoint};
use crate::hodograph;
use crate::ordinate::EPSILON;

/// Recursion depth cap for [`linearize`]. Bounds worst-case work to
/// `2^MAX_RECURSION_DEPTH` leaf segments regardless of how aggressively the
/// flatness test rejects a pathological input curve.
pub const MAX_RECURSION_DEPTH: u32 = 32;

/// Perpendicular distance of a point from the line through `a`/`b`, used by
/// [`is_flat`]. When `a == b` (a degenerate chord) falls back to Euclidean
/// distance from `a`.
fn perpendicular_distance(point: ControlPoint, a: ControlPoint, b: ControlPoint) -> f64 {
    let (ax, ay) = (a.input.get(), a.output.get());
    let (bx, by) = (b.input.get(), b.output.get());
    let (px, py) = (point.input.get(), point.output.get());

    let dx = bx - ax;
    let dy = by - ay;
    let chord_len = (dx * dx + dy * dy).sqrt();

    if chord_len <= EPSILON {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }

    ((px - ax) * dy - (py - ay) * dx).abs() / chord_len
}

/// A segment is "approximately linear" when the interior control points lie
/// within `tolerance` of the chord `p0p3`.
fn is_flat(segment: BezierSegment, tolerance: f64) -> bool {
    perpendicular_distance(segment.p1, segment.p0, segment.p3) <= tolerance
        && perpendicular_distance(segment.p2, segment.p0, segment.p3) <= tolerance
}

/// Linearize a single monotonic-in-input segment into a run of control
/// points, via recursive subdivision bounded by [`MAX_RECURSION_DEPTH`] and
/// the flatness test (default tolerance [`EPSILON`]).
///
/// The caller is responsible for first splitting the segment at its input
/// -axis critical points (see [`crate::hodograph::critical_split`]) so each
/// segment passed here is already monotonic in input; this function does
/// not re-check that invariant.
pub fn linearize(segment: BezierSegment, tolerance: f64) -> Vec<ControlPoint> {
    let mut out = vec![segment.p0];
    subdivide(segment, tolerance, 0, &mut out);
    out
}

/// Linearize using the crate-default tolerance ([`EPSILON`]).
pub fn linearize_default(segment: BezierSegment) -> Vec<ControlPoint> {
    linearize(segment, EPSILON)
}

fn subdivide(segment: BezierSegment, tolerance: f64, depth: u32, out: &mut Vec<ControlPoint>) {
    if depth >= MAX_RECURSION_DEPTH || is_flat(segment, tolerance) {
        out.push(segment.p3);
        return;
    }
    let (left, right) = segment.split_at(0.5);
    subdivide(left, tolerance, depth + 1, out);
    subdivide(right, tolerance, depth + 1, out);
}

/// Linearize a segment that may not yet be monotonic in input: splits at
/// critical points first (see [`hodograph::critical_split`]), then
/// linearizes each monotonic piece and concatenates the results, dropping
/// the duplicated shared endpoint between consecutive pieces.
pub fn linearize_with_critical_split(segment: BezierSegment, tolerance: f64) -> Vec<ControlPoint> {
    let pieces = hodograph::critical_split(segment);
    let mut out: Vec<ControlPoint> = Vec::new();
    for piece in pieces {
        let points = linearize(piece, tolerance);
        if out.is_empty() {
            out.extend(points);
        } else {
            out.extend(points.into_iter().skip(1));
        }
    }
    out
}
