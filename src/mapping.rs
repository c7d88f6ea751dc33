//! `Mapping`: a tagged union of the three leaf mapping kinds
//! (`Empty`, `Affine`, `LinearMonotonic`), each exposing a uniform
//! projection/inversion/trim/split/join contract.

#![forbid(unsafe_code)]

use crate::affine::AffineTransform1D;
use crate::bezier::ControlPoint;
use crate::error::{Error, Result};
use crate::interval::ContinuousInterval;
use crate::linear_curve::LinearMonotonic;
use crate::ordinate::Ordinate;
use crate::projection::ProjectionResult;

use tracing::instrument;

/// A hole: input in `defined_range`, no output defined.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MappingEmpty {
    /// The input range this hole covers.
    pub defined_range: ContinuousInterval,
}

/// An affine mapping restricted to `input_bounds`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MappingAffine {
    input_bounds: ContinuousInterval,
    xform: AffineTransform1D,
}

impl MappingAffine {
    /// Construct from explicit bounds and transform.
    pub fn new(input_bounds: ContinuousInterval, xform: AffineTransform1D) -> Self {
        MappingAffine { input_bounds, xform }
    }

    /// The infinite identity mapping `(INF, identity)`.
    pub fn identity_infinite() -> Self {
        MappingAffine {
            input_bounds: ContinuousInterval::infinite(),
            xform: AffineTransform1D::IDENTITY,
        }
    }

    /// The underlying transform.
    pub fn xform(self) -> AffineTransform1D {
        self.xform
    }
}

/// Owns a [`LinearMonotonic`] curve.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MappingLinearMonotonic {
    curve: LinearMonotonic,
}

impl MappingLinearMonotonic {
    /// Wrap a curve.
    pub fn new(curve: LinearMonotonic) -> Self {
        MappingLinearMonotonic { curve }
    }

    /// The underlying curve.
    pub fn curve(&self) -> &LinearMonotonic {
        &self.curve
    }
}

/// Tagged union of the three leaf mapping kinds. Dispatch is a plain
/// `match`, not a trait object: the set of variants is closed, and the
/// `join` matrix (§4.9 of the design) requires an explicit entry for every
/// pair, which a trait object would hide behind dynamic dispatch instead of
/// the compiler enforcing exhaustiveness.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mapping {
    /// A hole with no defined output.
    Empty(MappingEmpty),
    /// An affine transform over a bounded input range.
    Affine(MappingAffine),
    /// A piecewise-linear monotonic curve.
    LinearMonotonic(MappingLinearMonotonic),
}

impl Mapping {
    /// Construct an empty mapping over the given input range.
    pub fn empty(defined_range: ContinuousInterval) -> Self {
        Mapping::Empty(MappingEmpty { defined_range })
    }

    /// Construct an affine mapping.
    pub fn affine(input_bounds: ContinuousInterval, xform: AffineTransform1D) -> Self {
        Mapping::Affine(MappingAffine::new(input_bounds, xform))
    }

    /// Construct a linear-monotonic mapping.
    pub fn linear(curve: LinearMonotonic) -> Self {
        Mapping::LinearMonotonic(MappingLinearMonotonic::new(curve))
    }

    /// The infinite identity affine mapping.
    pub fn identity_infinite() -> Self {
        Mapping::Affine(MappingAffine::identity_infinite())
    }

    /// `true` if this is the `Empty` variant.
    pub fn is_empty(&self) -> bool {
        matches!(self, Mapping::Empty(_))
    }

    /// The input bounds of this mapping.
    pub fn input_bounds(&self) -> ContinuousInterval {
        match self {
            Mapping::Empty(e) => e.defined_range,
            Mapping::Affine(a) => a.input_bounds,
            Mapping::LinearMonotonic(l) => l.curve.input_bounds(),
        }
    }

    /// The output bounds of this mapping. `None` for `Empty` (callers that
    /// need a concrete interval treat it as equal to the input range, per
    /// §4.8).
    pub fn output_bounds(&self) -> Option<ContinuousInterval> {
        match self {
            Mapping::Empty(_) => None,
            Mapping::Affine(a) => Some(a.xform.apply_interval(a.input_bounds)),
            Mapping::LinearMonotonic(l) => Some(l.curve.output_bounds()),
        }
    }

    /// The output bounds, or the input range for `Empty` mappings.
    pub fn output_bounds_or_input(&self) -> ContinuousInterval {
        self.output_bounds().unwrap_or_else(|| self.input_bounds())
    }

    /// Project `x` forward. Accepts `x == input_bounds().end` (the endpoint
    /// rule). `Empty` always returns `OutOfBounds`.
    pub fn project(&self, x: Ordinate) -> ProjectionResult {
        let bounds = self.input_bounds();
        let in_range = bounds.overlaps(x) || bounds.is_end_point(x);
        match self {
            Mapping::Empty(_) => ProjectionResult::OutOfBounds,
            Mapping::Affine(a) => {
                if in_range {
                    ProjectionResult::Ordinate(a.xform.apply(x))
                } else {
                    ProjectionResult::OutOfBounds
                }
            }
            Mapping::LinearMonotonic(l) => match l.curve.output_at_input(x) {
                Ok(y) => ProjectionResult::Ordinate(y),
                Err(_) => ProjectionResult::OutOfBounds,
            },
        }
    }

    /// Project `x` forward, as a `Result` (convenience wrapper over
    /// [`Self::project`] for callers that prefer `?`-propagation over
    /// matching on [`ProjectionResult`]).
    pub fn project_r(&self, x: Ordinate) -> Result<Ordinate> {
        match self.project(x) {
            ProjectionResult::Ordinate(o) => Ok(o),
            ProjectionResult::Interval(i) => Ok(i.start()),
            ProjectionResult::OutOfBounds => Err(Error::OutOfBounds {
                op: "Mapping::project",
                value: x.to_string(),
                bounds: self.input_bounds().to_string(),
            }),
        }
    }

    /// Project `y` backward through the inverse mapping.
    pub fn project_inv(&self, y: Ordinate) -> ProjectionResult {
        match self {
            Mapping::Empty(_) => ProjectionResult::OutOfBounds,
            Mapping::Affine(a) => {
                let bounds = self.output_bounds().expect("non-empty");
                if bounds.overlaps(y) || bounds.is_end_point(y) {
                    ProjectionResult::Ordinate(a.xform.inverse().apply(y))
                } else {
                    ProjectionResult::OutOfBounds
                }
            }
            Mapping::LinearMonotonic(l) => match l.curve.input_at_output(y) {
                Ok(x) => ProjectionResult::Ordinate(x),
                Err(_) => ProjectionResult::OutOfBounds,
            },
        }
    }

    /// Restrict to `t ∩ input_bounds()`. Returns `Empty` if the
    /// intersection is empty.
    pub fn shrink_to_input_interval(&self, t: ContinuousInterval) -> Result<Self> {
        let bounds = self.input_bounds();
        let restricted = match bounds.intersect(t) {
            Some(r) => r,
            None => return Ok(Mapping::empty(bounds)),
        };
        if restricted.is_instant() {
            return Ok(Mapping::empty(restricted));
        }
        match self {
            Mapping::Empty(_) => Ok(Mapping::empty(restricted)),
            Mapping::Affine(a) => Ok(Mapping::affine(restricted, a.xform)),
            Mapping::LinearMonotonic(l) => match l.curve.trim_input(restricted) {
                Ok(curve) => Ok(Mapping::linear(curve)),
                Err(_) => Ok(Mapping::empty(restricted)),
            },
        }
    }

    /// Restrict by output range: project `t` back to input via the inverse
    /// and then restrict by [`Self::shrink_to_input_interval`].
    pub fn shrink_to_output_interval(&self, t: ContinuousInterval) -> Result<Self> {
        let own_bounds = self.input_bounds();
        let own_output = match self.output_bounds() {
            Some(b) => b,
            None => return Ok(Mapping::empty(own_bounds)),
        };
        let restricted_output = match own_output.intersect(t) {
            Some(r) => r,
            None => return Ok(Mapping::empty(own_bounds)),
        };
        match self {
            Mapping::Empty(_) => Ok(Mapping::empty(own_bounds)),
            Mapping::Affine(a) => {
                let inv = a.xform.inverse();
                let restricted_input = inv.apply_interval(restricted_output);
                self.shrink_to_input_interval(restricted_input)
            }
            Mapping::LinearMonotonic(l) => match l.curve.trim_output(restricted_output) {
                Ok(curve) => Ok(Mapping::linear(curve)),
                Err(_) => Ok(Mapping::empty(own_bounds)),
            },
        }
    }

    /// Split at `x`, which must be strictly interior to `input_bounds()`.
    pub fn split_at_input_ord(&self, x: Ordinate) -> Result<(Self, Self)> {
        let bounds = self.input_bounds();
        if x <= bounds.start() || x >= bounds.end() {
            return Err(Error::OutOfBounds {
                op: "Mapping::split_at_input_ord",
                value: x.to_string(),
                bounds: bounds.to_string(),
            });
        }
        match self {
            Mapping::Empty(_) => {
                let left = ContinuousInterval::new(bounds.start(), x)?;
                let right = ContinuousInterval::new(x, bounds.end())?;
                Ok((Mapping::empty(left), Mapping::empty(right)))
            }
            Mapping::Affine(a) => {
                let left = ContinuousInterval::new(bounds.start(), x)?;
                let right = ContinuousInterval::new(x, bounds.end())?;
                Ok((Mapping::affine(left, a.xform), Mapping::affine(right, a.xform)))
            }
            Mapping::LinearMonotonic(l) => {
                let (left, right) = l.curve.split_at_input_ord(x)?;
                Ok((Mapping::linear(left), Mapping::linear(right)))
            }
        }
    }

    /// Split at every ordinate in `xs`: ascending, in-bounds, de-duplicated.
    pub fn split_at_each_input_ord(&self, xs: &[Ordinate]) -> Result<Vec<Self>> {
        let bounds = self.input_bounds();
        let mut sorted: Vec<Ordinate> = xs
            .iter()
            .copied()
            .filter(|&x| x > bounds.start() && x < bounds.end())
            .collect();
        sorted.sort();
        sorted.dedup_by(|a, b| a.approx_eq(*b));

        let mut pieces = Vec::with_capacity(sorted.len() + 1);
        let mut current = self.clone();
        for x in sorted {
            let (left, right) = current.split_at_input_ord(x)?;
            pieces.push(left);
            current = right;
        }
        pieces.push(current);
        Ok(pieces)
    }

    /// Invert: swap input/output roles, producing a mapping of the same
    /// variant. Defined for all three variants since each is individually
    /// monotonic and 1-to-1.
    pub fn invert(&self) -> Result<Self> {
        match self {
            Mapping::Empty(e) => Ok(Mapping::Empty(*e)),
            Mapping::Affine(a) => {
                let inv = a.xform.inverse();
                let new_bounds = a.xform.apply_interval(a.input_bounds);
                Ok(Mapping::affine(new_bounds, inv))
            }
            Mapping::LinearMonotonic(l) => {
                let inverted = l.curve.invert()?;
                Ok(Mapping::linear(inverted))
            }
        }
    }

    /// Sample this mapping to a two-knot `LinearMonotonic` over its own
    /// input bounds. Used when composing an `Affine` with a `Linear` so
    /// both sides of the composition share a representation (§4.9).
    fn sample_to_linear(&self) -> Result<LinearMonotonic> {
        let bounds = self.input_bounds();
        let start_out = self.project_r(bounds.start())?;
        let end_out = self.project_r(bounds.end())?;
        LinearMonotonic::new(vec![
            ControlPoint::new(bounds.start(), start_out),
            ControlPoint::new(bounds.end(), end_out),
        ])
    }

    /// Compose `a2c = b2c ∘ a2b`. Implements the §4.9 dispatch matrix.
    #[instrument(skip_all, level = "debug")]
    pub fn join(a2b: &Mapping, b2c: &Mapping) -> Result<Mapping> {
        if a2b.is_empty() || b2c.is_empty() {
            return Ok(Mapping::empty(a2b.input_bounds()));
        }

        let a2b_output = a2b.output_bounds().expect("checked non-empty above");
        let b2c_input = b2c.input_bounds();
        let b_range = match a2b_output.intersect(b2c_input) {
            Some(r) if !r.is_instant() => r,
            _ => return Ok(Mapping::empty(a2b.input_bounds())),
        };

        let a2b_trimmed = a2b.shrink_to_output_interval(b_range)?;
        let b2c_trimmed = b2c.shrink_to_input_interval(b_range)?;

        if a2b_trimmed.is_empty() || b2c_trimmed.is_empty() {
            return Ok(Mapping::empty(a2b.input_bounds()));
        }

        match (&a2b_trimmed, &b2c_trimmed) {
            (Mapping::Affine(ab), Mapping::Affine(bc)) => Ok(Mapping::affine(
                ab.input_bounds,
                AffineTransform1D::compose(bc.xform, ab.xform),
            )),
            (Mapping::Affine(_), Mapping::LinearMonotonic(_)) => {
                let ab_curve = a2b_trimmed.sample_to_linear()?;
                let composed = compose_linear_linear(&ab_curve, b2c_trimmed.as_linear_curve().unwrap())?;
                Ok(Mapping::linear(composed))
            }
            (Mapping::LinearMonotonic(ab), Mapping::Affine(bc)) => {
                let knots: Vec<ControlPoint> = ab
                    .curve
                    .knots()
                    .iter()
                    .map(|k| ControlPoint::new(k.input, bc.xform.apply(k.output)))
                    .collect();
                Ok(Mapping::linear(LinearMonotonic::new(knots)?))
            }
            (Mapping::LinearMonotonic(ab), Mapping::LinearMonotonic(_)) => {
                let composed = compose_linear_linear(&ab.curve, b2c_trimmed.as_linear_curve().unwrap())?;
                Ok(Mapping::linear(composed))
            }
            _ => unreachable!("Empty already handled above"),
        }
    }

    fn as_linear_curve(&self) -> Option<&LinearMonotonic> {
        match self {
            Mapping::LinearMonotonic(l) => Some(&l.curve),
            _ => None,
        }
    }
}

/// `c = b2c ∘ a2b` for two `LinearMonotonic` curves sharing the `b` space
/// (§4.10):
/// 1. Subdivide `a2b` at every interior `b2c` input knot, projected
///    backward through `a2b`.
/// 2. Re-project each resulting knot's output forward through `b2c`.
/// 3. Collapse knots whose input differs by less than ε.
fn compose_linear_linear(a2b: &LinearMonotonic, b2c: &LinearMonotonic) -> Result<LinearMonotonic> {
    let a_bounds = a2b.input_bounds();

    let mut split_points: Vec<Ordinate> = Vec::new();
    for k in b2c.knots() {
        if let Ok(x) = a2b.input_at_output(k.input) {
            if x > a_bounds.start() && x < a_bounds.end() {
                split_points.push(x);
            }
        }
    }
    split_points.sort();
    split_points.dedup_by(|x, y| x.approx_eq(*y));

    let mut knot_inputs: Vec<Ordinate> = vec![a_bounds.start()];
    knot_inputs.extend(split_points);
    knot_inputs.push(a_bounds.end());
    knot_inputs.dedup_by(|x, y| x.approx_eq(*y));

    let mut new_knots = Vec::with_capacity(knot_inputs.len());
    for x in knot_inputs {
        let b_val = a2b.output_at_input(x)?;
        let c_val = b2c.output_at_input(b_val)?;
        new_knots.push(ControlPoint::new(x, c_val));
    }
    new_knots.dedup_by(|a, b| a.input.approx_eq(b.input));

    LinearMonotonic::new(new_knots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ord(v: f64) -> Ordinate {
        Ordinate::from(v)
    }

    fn iv(a: f64, b: f64) -> ContinuousInterval {
        ContinuousInterval::new(ord(a), ord(b)).unwrap()
    }

    #[test]
    fn endpoint_rule_accepts_bound_end() {
        let m = Mapping::affine(iv(0.0, 10.0), AffineTransform1D::IDENTITY);
        assert_eq!(m.project(ord(10.0)), ProjectionResult::Ordinate(ord(10.0)));
        assert_eq!(m.project(ord(11.0)), ProjectionResult::OutOfBounds);
    }

    #[test]
    fn empty_always_out_of_bounds() {
        let m = Mapping::empty(iv(0.0, 10.0));
        assert_eq!(m.project(ord(5.0)), ProjectionResult::OutOfBounds);
    }

    #[test]
    fn s1_affine_through_affine() {
        let a = Mapping::affine(iv(0.0, 8.0), AffineTransform1D::new(ord(1.0), ord(1.0)).unwrap());
        let identity = Mapping::identity_infinite();
        let joined = Mapping::join(&identity, &a).unwrap();
        assert_eq!(joined.project(ord(3.0)), ProjectionResult::Ordinate(ord(4.0)));
        assert_eq!(joined.input_bounds(), iv(0.0, 8.0));
    }

    #[test]
    fn s2_disjoint_join_is_empty() {
        let a = Mapping::affine(iv(-2.0, 2.0), AffineTransform1D::new(ord(0.0), ord(1.0)).unwrap());
        let b = Mapping::affine(iv(8.0, 12.0), AffineTransform1D::new(ord(0.0), ord(1.0)).unwrap());
        let joined = Mapping::join(&a, &b).unwrap();
        assert!(joined.is_empty());
    }

    #[test]
    fn s6_endpoint_regression() {
        let m = Mapping::affine(iv(0.0, 10.0), AffineTransform1D::IDENTITY);
        assert_eq!(m.project(ord(10.0)), ProjectionResult::Ordinate(ord(10.0)));
        assert_eq!(m.project(ord(11.0)), ProjectionResult::OutOfBounds);
    }

    #[test]
    fn invert_round_trips_affine() {
        let m = Mapping::affine(iv(0.0, 10.0), AffineTransform1D::new(ord(2.0), ord(3.0)).unwrap());
        let inv = m.invert().unwrap();
        let y = m.project_r(ord(4.0)).unwrap();
        let back = inv.project_r(y).unwrap();
        assert!(back.approx_eq(ord(4.0)));
    }

    #[test]
    fn split_at_input_ord_produces_contiguous_mappings() {
        let m = Mapping::affine(iv(0.0, 10.0), AffineTransform1D::IDENTITY);
        let (left, right) = m.split_at_input_ord(ord(4.0)).unwrap();
        assert_eq!(left.input_bounds(), iv(0.0, 4.0));
        assert_eq!(right.input_bounds(), iv(4.0, 10.0));
    }

    #[test]
    fn join_linear_through_affine() {
        let curve = LinearMonotonic::new(vec![ControlPoint::new(ord(0.0), ord(0.0)), ControlPoint::new(ord(10.0), ord(20.0))]).unwrap();
        let ab = Mapping::linear(curve);
        let bc = Mapping::affine(iv(-100.0, 100.0), AffineTransform1D::new(ord(1.0), ord(2.0)).unwrap());
        let ac = Mapping::join(&ab, &bc).unwrap();
        assert_eq!(ac.project(ord(10.0)), ProjectionResult::Ordinate(ord(41.0)));
    }
}
