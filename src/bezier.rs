//! Cubic Bézier segment core: de Casteljau evaluation, splitting, inverse
//! evaluation (`find_u`), and axis extents.

#![forbid(unsafe_code)]

use crate::error::{Error, Result};
use crate::hodograph;
use crate::interval::ContinuousInterval;
use crate::ordinate::{Ordinate, EPSILON};

/// Maximum number of iterations [`BezierSegment::find_u`] will spend before
/// reporting [`Error::ConvergenceFailure`].
pub const FIND_U_MAX_ITERATIONS: usize = 50;

/// Which axis of a [`ControlPoint`] an operation addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// The input (time/parameter) axis.
    Input,
    /// The output axis.
    Output,
}

/// A point `(input, output)` on a curve. Named `input`/`output` rather than
/// the distilled spec's `in`/`out` since `in` is a Rust keyword.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint {
    /// The input-axis coordinate.
    pub input: Ordinate,
    /// The output-axis coordinate.
    pub output: Ordinate,
}

impl ControlPoint {
    /// Construct a control point.
    pub fn new(input: Ordinate, output: Ordinate) -> Self {
        ControlPoint { input, output }
    }

    /// The coordinate on the given axis.
    pub fn axis(self, axis: Axis) -> Ordinate {
        match axis {
            Axis::Input => self.input,
            Axis::Output => self.output,
        }
    }

    /// Pointwise linear interpolation between two control points, used by de
    /// Casteljau evaluation and splitting. Not a general vector-space
    /// operation; only meaningful as an interpolation step.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        ControlPoint {
            input: self.input.lerp(other.input, t),
            output: self.output.lerp(other.output, t),
        }
    }
}

/// A cubic Bézier segment `(p0, p1, p2, p3)`.
///
/// Must be monotonic (non-decreasing or non-increasing) in `input` to be
/// used as a mapping; non-monotonic segments are split at critical points
/// (see [`crate::hodograph`]) before being lifted into a `Mapping`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezierSegment {
    /// First control point (the segment's input-axis start).
    pub p0: ControlPoint,
    /// Second control point.
    pub p1: ControlPoint,
    /// Third control point.
    pub p2: ControlPoint,
    /// Fourth control point (the segment's input-axis end).
    pub p3: ControlPoint,
}

impl BezierSegment {
    /// Construct a segment, failing with [`Error::InvalidBounds`] unless
    /// `p0.input <= p3.input`.
    pub fn new(p0: ControlPoint, p1: ControlPoint, p2: ControlPoint, p3: ControlPoint) -> Result<Self> {
        if p3.input < p0.input {
            return Err(Error::InvalidBounds {
                op: "BezierSegment::new",
                start: p0.input.to_string(),
                end: p3.input.to_string(),
            });
        }
        Ok(BezierSegment { p0, p1, p2, p3 })
    }

    /// Evaluate the segment at parameter `u`.
    ///
    /// Uses de Casteljau's algorithm rather than the expanded Bernstein
    /// polynomial so `u = 0` and `u = 1` return `p0`/`p3` exactly.
    pub fn evaluate(self, u: f64) -> ControlPoint {
        let a = self.p0.lerp(self.p1, u);
        let b = self.p1.lerp(self.p2, u);
        let c = self.p2.lerp(self.p3, u);
        let d = a.lerp(b, u);
        let e = b.lerp(c, u);
        d.lerp(e, u)
    }

    /// Split the segment at parameter `u`, returning two segments whose
    /// union reproduces the original and which meet `C⁰`-continuously at
    /// `evaluate(u)`.
    pub fn split_at(self, u: f64) -> (BezierSegment, BezierSegment) {
        let a = self.p0.lerp(self.p1, u);
        let b = self.p1.lerp(self.p2, u);
        let c = self.p2.lerp(self.p3, u);
        let d = a.lerp(b, u);
        let e = b.lerp(c, u);
        let p = d.lerp(e, u);
        (
            BezierSegment {
                p0: self.p0,
                p1: a,
                p2: d,
                p3: p,
            },
            BezierSegment {
                p0: p,
                p1: e,
                p2: c,
                p3: self.p3,
            },
        )
    }

    /// The bounding interval of the given axis over `u ∈ [0,1]`, using the
    /// hodograph's critical points rather than just the endpoints (the
    /// extremum of a cubic need not lie at an endpoint).
    pub fn extents(self, axis: Axis) -> ContinuousInterval {
        let mut lo = self.p0.axis(axis).min(self.p3.axis(axis));
        let mut hi = self.p0.axis(axis).max(self.p3.axis(axis));
        for u in hodograph::critical_points(self, axis) {
            let v = self.evaluate(u).axis(axis);
            lo = lo.min(v);
            hi = hi.max(v);
        }
        ContinuousInterval::new(lo, hi).expect("extents computed from min/max are ordered")
    }

    /// Solve `evaluate(u).axis(axis) == target` for `u ∈ [0,1]`.
    ///
    /// Uses the Illinois-modified regula falsi method: ordinary false
    /// position can stagnate with one bracket endpoint fixed for many
    /// iterations when the function is strongly convex/concave near the
    /// root; Illinois halves the stale endpoint's function value each time
    /// it is retained, restoring the superlinear convergence of secant
    /// methods while still guaranteeing the root stays bracketed (unlike
    /// Newton's method, which can leave the bracket entirely in near-flat
    /// regions).
    ///
    /// Fails with [`Error::OutOfBounds`] if `target` lies outside the axis
    /// extents of the segment, and with [`Error::ConvergenceFailure`] if
    /// [`FIND_U_MAX_ITERATIONS`] is exhausted without reaching tolerance.
    pub fn find_u(self, target: Ordinate, axis: Axis) -> Result<f64> {
        let extents = self.extents(axis);
        if !extents.overlaps(target) && !extents.is_end_point(target) {
            return Err(Error::OutOfBounds {
                op: "BezierSegment::find_u",
                value: target.to_string(),
                bounds: extents.to_string(),
            });
        }

        let f = |u: f64| self.evaluate(u).axis(axis) - target;

        let mut a = 0.0_f64;
        let mut b = 1.0_f64;
        let mut fa = f(a);
        let mut fb = f(b);

        if fa.abs() <= EPSILON {
            return Ok(a);
        }
        if fb.abs() <= EPSILON {
            return Ok(b);
        }
        if fa.get().signum() == fb.get().signum() {
            // Monotonic segment with target exactly at an endpoint-adjacent
            // plateau; endpoints already ruled out above, so widen search is
            // not attempted — report as out of bounds for this axis.
            return Err(Error::OutOfBounds {
                op: "BezierSegment::find_u",
                value: target.to_string(),
                bounds: extents.to_string(),
            });
        }

        for iteration in 0..FIND_U_MAX_ITERATIONS {
            let u = b - fb.get() * (b - a) / (fb.get() - fa.get());
            let fu = f(u);

            if fu.get().abs() <= EPSILON {
                return Ok(u);
            }

            if fa.get().signum() == fu.get().signum() {
                a = u;
                fa = fu;
                // Illinois modification: halve the stale endpoint's value.
                fb = Ordinate::from_f64_unchecked(fb.get() / 2.0);
            } else {
                b = u;
                fb = fu;
                fa = Ordinate::from_f64_unchecked(fa.get() / 2.0);
            }

            if (b - a).abs() <= EPSILON {
                return Ok(u);
            }

            if iteration == FIND_U_MAX_ITERATIONS - 1 {
                return Err(Error::ConvergenceFailure {
                    op: "BezierSegment::find_u",
                    iterations: FIND_U_MAX_ITERATIONS,
                    target: target.to_string(),
                });
            }
        }

        Err(Error::ConvergenceFailure {
            op: "BezierSegment::find_u",
            iterations: FIND_U_MAX_ITERATIONS,
            target: target.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp(i: f64, o: f64) -> ControlPoint {
        ControlPoint::new(Ordinate::from(i), Ordinate::from(o))
    }

    fn linear_segment() -> BezierSegment {
        // A cubic that happens to be a straight ramp: evaluate(u) = u*10 on
        // both axes.
        BezierSegment::new(cp(0.0, 0.0), cp(3.333, 3.333), cp(6.667, 6.667), cp(10.0, 10.0)).unwrap()
    }

    #[test]
    fn endpoints_are_exact() {
        let seg = linear_segment();
        assert_eq!(seg.evaluate(0.0), seg.p0);
        assert_eq!(seg.evaluate(1.0), seg.p3);
    }

    #[test]
    fn split_preserves_endpoints_and_meets_continuously() {
        let seg = linear_segment();
        let (left, right) = seg.split_at(0.4);
        assert_eq!(left.p0, seg.p0);
        assert_eq!(right.p3, seg.p3);
        assert_eq!(left.p3, right.p0);
        assert!(left.p3.input.approx_eq(seg.evaluate(0.4).input));
    }

    #[test]
    fn find_u_on_straight_ramp() {
        let seg = linear_segment();
        let u = seg.find_u(Ordinate::from(5.0), Axis::Input).unwrap();
        assert!((u - 0.5).abs() < 1e-4);
    }

    #[test]
    fn find_u_out_of_bounds() {
        let seg = linear_segment();
        assert!(matches!(
            seg.find_u(Ordinate::from(20.0), Axis::Input),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn find_u_accepts_endpoint_targets() {
        let seg = linear_segment();
        let u0 = seg.find_u(Ordinate::from(0.0), Axis::Input).unwrap();
        let u1 = seg.find_u(Ordinate::from(10.0), Axis::Input).unwrap();
        assert!(u0.abs() < 1e-4);
        assert!((u1 - 1.0).abs() < 1e-4);
    }

    #[test]
    fn extents_cover_an_interior_extremum() {
        // Upside-down U in output: p0=(0,0), p1=(1,5), p2=(5,5), p3=(5,1)
        let seg = BezierSegment::new(cp(0.0, 0.0), cp(1.0, 5.0), cp(5.0, 5.0), cp(5.0, 1.0)).unwrap();
        let out_extents = seg.extents(Axis::Output);
        assert!(out_extents.end().get() > 1.0);
    }
}
