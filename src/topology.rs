//! `Topology`: an ordered, right-met sequence of [`Mapping`]s covering a
//! single connected input interval, plus the `join` algorithm that composes
//! two topologies through a shared intermediate domain.

#![forbid(unsafe_code)]

use crate::affine::AffineTransform1D;
use crate::bezier::{BezierSegment, ControlPoint};
use crate::error::{Error, Result};
use crate::hodograph;
use crate::interval::ContinuousInterval;
use crate::linear_curve::LinearMonotonic;
use crate::linearize;
use crate::mapping::Mapping;
use crate::ordinate::Ordinate;
use crate::projection::ProjectionResult;

use tracing::instrument;

/// An ordered, right-met sequence of mappings covering a single connected
/// input interval. `k = 0` is the unique empty topology.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topology {
    mappings: Vec<Mapping>,
}

impl Topology {
    /// Construct from a slice of mappings, validating that they are
    /// right-met (each mapping's input end equals the next's input start).
    /// An empty slice collapses to the zero-length topology.
    pub fn from_mappings(mappings: Vec<Mapping>) -> Result<Self> {
        for pair in mappings.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.input_bounds().end() != b.input_bounds().start() {
                return Err(Error::InvalidBounds {
                    op: "Topology::from_mappings",
                    start: a.input_bounds().end().to_string(),
                    end: b.input_bounds().start().to_string(),
                });
            }
        }
        Ok(Topology { mappings })
    }

    /// Lift a [`LinearMonotonic`] curve, splitting at critical points first
    /// to guarantee each resulting mapping is individually monotonic. A
    /// curve is constructed already monotonic in output by
    /// [`LinearMonotonic::new`]'s invariant, so no splitting is actually
    /// required here; this constructor exists for symmetry with
    /// [`Self::from_bezier`] and as the single entry point callers use
    /// regardless of how the curve was produced.
    pub fn from_linear(curve: LinearMonotonic) -> Result<Self> {
        Topology::from_mappings(vec![Mapping::linear(curve)])
    }

    /// Lift a sequence of Bézier segments: each is split at its input- and
    /// output-axis critical points (§4.5) so every resulting piece is
    /// monotonic on both axes, then each piece is linearized (§4.6) into a
    /// `LinearMonotonic` mapping.
    pub fn from_bezier(segments: &[BezierSegment], tolerance: f64) -> Result<Self> {
        let mut mappings = Vec::new();
        for &segment in segments {
            for piece in hodograph::critical_split(segment) {
                let points = linearize::linearize(piece, tolerance);
                let curve = LinearMonotonic::new(points)?;
                mappings.push(Mapping::linear(curve));
            }
        }
        Topology::from_mappings(mappings)
    }

    /// The identity topology over a bounded interval.
    pub fn identity_over(interval: ContinuousInterval) -> Self {
        Topology {
            mappings: vec![Mapping::affine(interval, AffineTransform1D::IDENTITY)],
        }
    }

    /// The identity topology over `(−∞, +∞)`.
    pub fn identity_infinite() -> Self {
        Topology {
            mappings: vec![Mapping::identity_infinite()],
        }
    }

    /// The unique zero-length topology.
    pub fn empty() -> Self {
        Topology { mappings: Vec::new() }
    }

    /// The topology's mappings.
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// `true` if this topology has no mappings.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Input bounds: `[m0.start, m_{k-1}.end)`. The zero-length topology has
    /// the degenerate bounds `[0, 0)`.
    pub fn input_bounds(&self) -> ContinuousInterval {
        match (self.mappings.first(), self.mappings.last()) {
            (Some(first), Some(last)) => {
                ContinuousInterval::new(first.input_bounds().start(), last.input_bounds().end())
                    .expect("right-met sequence is ordered")
            }
            _ => ContinuousInterval::zero(),
        }
    }

    /// Output bounds: the extend-union of all non-empty mappings' output
    /// bounds, or `None` if every mapping is empty (including the
    /// zero-length topology).
    pub fn output_bounds(&self) -> Option<ContinuousInterval> {
        self.mappings
            .iter()
            .filter_map(|m| m.output_bounds())
            .reduce(|a, b| a.extend(b))
    }

    /// `k+1` strictly ascending input end points: `m0.start`, then every
    /// `m_i.end`.
    pub fn end_points_input(&self) -> Vec<Ordinate> {
        if self.mappings.is_empty() {
            return Vec::new();
        }
        let mut points = Vec::with_capacity(self.mappings.len() + 1);
        points.push(self.mappings[0].input_bounds().start());
        for m in &self.mappings {
            points.push(m.input_bounds().end());
        }
        points
    }

    /// The deduplicated, ascending set of output interval endpoints across
    /// all non-empty mappings.
    pub fn end_points_output(&self) -> Vec<Ordinate> {
        let mut points: Vec<Ordinate> = Vec::new();
        for m in &self.mappings {
            if let Some(b) = m.output_bounds() {
                points.push(b.start());
                points.push(b.end());
            }
        }
        points.sort();
        points.dedup_by(|a, b| a.approx_eq(*b));
        points
    }

    /// Restrict to `t ∩ input_bounds()`: mappings fully outside `t` are
    /// dropped, mappings overlapping its edge are clipped via
    /// `split_at_input_ord`.
    pub fn trim_in_input_space(&self, t: ContinuousInterval) -> Result<Self> {
        let own = self.input_bounds();
        let target = match own.intersect(t) {
            Some(r) if !r.is_instant() => r,
            _ => return Ok(Topology::empty()),
        };

        let mut out = Vec::new();
        for m in &self.mappings {
            let bounds = m.input_bounds();
            let clipped = match bounds.intersect(target) {
                Some(r) if !r.is_instant() => r,
                _ => continue,
            };
            out.push(m.shrink_to_input_interval(clipped)?);
        }
        Topology::from_mappings(out)
    }

    /// Restrict by output range: for each mapping, intersect its output
    /// with `t`, restrict it, and insert `Empty` mappings on either side so
    /// the overall input tiling is preserved.
    pub fn trim_in_output_space(&self, t: ContinuousInterval) -> Result<Self> {
        let mut out = Vec::with_capacity(self.mappings.len());
        for m in &self.mappings {
            let bounds = m.input_bounds();
            match m.output_bounds() {
                None => out.push(Mapping::empty(bounds)),
                Some(own_output) => match own_output.intersect(t) {
                    None => out.push(Mapping::empty(bounds)),
                    Some(restricted) if restricted.is_instant() && !own_output.is_instant() => {
                        out.push(Mapping::empty(bounds))
                    }
                    Some(restricted) => {
                        let trimmed = m.shrink_to_output_interval(restricted)?;
                        let trimmed_bounds = trimmed.input_bounds();
                        if trimmed_bounds.start() > bounds.start() {
                            out.push(Mapping::empty(ContinuousInterval::new(
                                bounds.start(),
                                trimmed_bounds.start(),
                            )?));
                        }
                        out.push(trimmed);
                        if trimmed_bounds.end() < bounds.end() {
                            out.push(Mapping::empty(ContinuousInterval::new(
                                trimmed_bounds.end(),
                                bounds.end(),
                            )?));
                        }
                    }
                },
            }
        }
        Topology::from_mappings(out)
    }

    /// Split at each input ordinate in `xs` (ascending, in-bounds,
    /// de-duplicated).
    pub fn split_at_input_ords(&self, xs: &[Ordinate]) -> Result<Self> {
        let mut out = Vec::new();
        for m in &self.mappings {
            let bounds = m.input_bounds();
            let local: Vec<Ordinate> = xs
                .iter()
                .copied()
                .filter(|&x| x > bounds.start() && x < bounds.end())
                .collect();
            if local.is_empty() {
                out.push(m.clone());
                continue;
            }
            out.extend(m.split_at_each_input_ord(&local)?);
        }
        Topology::from_mappings(out)
    }

    /// Split at each output ordinate in `ys`: points are projected back
    /// through every non-empty mapping's inverse, filtered to the open
    /// input interval, sorted, then used as input splits.
    pub fn split_at_output_ords(&self, ys: &[Ordinate]) -> Result<Self> {
        let mut input_points: Vec<Ordinate> = Vec::new();
        for m in &self.mappings {
            if m.is_empty() {
                continue;
            }
            let bounds = m.input_bounds();
            for &y in ys {
                if let Some(x) = m.project_inv(y).ordinate() {
                    if x > bounds.start() && x < bounds.end() {
                        input_points.push(x);
                    }
                }
            }
        }
        input_points.sort();
        input_points.dedup_by(|a, b| a.approx_eq(*b));
        self.split_at_input_ords(&input_points)
    }

    /// Locate the mapping containing `x` (via binary search on end points)
    /// and project through it.
    pub fn project(&self, x: Ordinate) -> ProjectionResult {
        let bounds = self.input_bounds();
        if self.is_empty() || !(bounds.overlaps(x) || bounds.is_end_point(x)) {
            return ProjectionResult::OutOfBounds;
        }
        let idx = match self
            .mappings
            .binary_search_by(|m| m.input_bounds().start().cmp(&x))
        {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let idx = idx.min(self.mappings.len() - 1);
        self.mappings[idx].project(x)
    }

    /// Scan every mapping and collect each inverse result; may return
    /// multiple ordinates since the topology as a whole need not be
    /// output-monotonic.
    pub fn project_inv(&self, y: Ordinate) -> Vec<Ordinate> {
        let mut results = Vec::new();
        for m in &self.mappings {
            if let Some(x) = m.project_inv(y).ordinate() {
                results.push(x);
            }
        }
        results
    }

    /// Invert each mapping, then group contiguous runs whose inverted
    /// input intervals remain right-met into separate topologies.
    ///
    /// Grouping criterion: walk the inverted mappings in original order,
    /// starting a new group whenever the next inverted mapping does not
    /// right-meet the running group's current end point. Since each
    /// individual `Mapping` is already guaranteed monotonic by
    /// construction, a non-monotonic seam in the overall inverse can only
    /// occur between mappings, i.e. exactly at these adjacency checks.
    pub fn invert(&self) -> Result<Vec<Self>> {
        let mut inverted = Vec::with_capacity(self.mappings.len());
        for m in &self.mappings {
            inverted.push(m.invert()?);
        }

        let mut groups: Vec<Vec<Mapping>> = Vec::new();
        for m in inverted {
            match groups.last_mut() {
                Some(group) if group.last().unwrap().input_bounds().end() == m.input_bounds().start() => {
                    group.push(m);
                }
                _ => groups.push(vec![m]),
            }
        }

        groups.into_iter().map(Topology::from_mappings).collect()
    }

    /// Compose `a2c = b2c ∘ a2b` through a shared intermediate domain
    /// (§4.12):
    /// 1. If `a2b.output_bounds` is an instant, project it through `b2c`
    ///    and return a constant topology (or empty if out of bounds).
    /// 2. Intersect the `b`-space ranges; empty if disjoint.
    /// 3. Trim both sides to that range.
    /// 4. Mutually subdivide at each other's end points.
    /// 5. Pairwise-compose overlapping mappings via [`Mapping::join`].
    #[instrument(skip_all, level = "debug")]
    pub fn join(a2b: &Topology, b2c: &Topology) -> Result<Topology> {
        let a2b_output = match a2b.output_bounds() {
            Some(b) => b,
            None => return Ok(Topology::empty()),
        };

        if a2b_output.is_instant() {
            return match b2c.project(a2b_output.start()).ordinate() {
                Some(c_val) => {
                    let curve = LinearMonotonic::new(vec![
                        ControlPoint::new(a2b.input_bounds().start(), c_val),
                        ControlPoint::new(a2b.input_bounds().end(), c_val),
                    ])?;
                    Topology::from_linear(curve)
                }
                None => Ok(Topology::empty()),
            };
        }

        let b_range = match a2b_output.intersect(b2c.input_bounds()) {
            Some(r) if !r.is_instant() => r,
            _ => return Ok(Topology::empty()),
        };

        let a2b_trimmed = a2b.trim_in_output_space(b_range)?;
        let b2c_trimmed = b2c.trim_in_input_space(b_range)?;

        let a2b_split = a2b_trimmed.split_at_output_ords(&b2c_trimmed.end_points_input())?;
        let b2c_split = b2c_trimmed.split_at_input_ords(&a2b_split.end_points_output())?;

        let mut result_mappings = Vec::new();
        for ab in &a2b_split.mappings {
            if ab.is_empty() {
                continue;
            }
            let ab_output = match ab.output_bounds() {
                Some(o) => o,
                None => continue,
            };
            for bc in &b2c_split.mappings {
                if bc.is_empty() {
                    continue;
                }
                if ab_output.intersects(bc.input_bounds()) {
                    let composed = Mapping::join(ab, bc)?;
                    if !composed.is_empty() {
                        result_mappings.push(composed);
                    }
                }
            }
        }

        Topology::from_mappings(result_mappings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::AffineTransform1D;

    fn ord(v: f64) -> Ordinate {
        Ordinate::from(v)
    }

    fn iv(a: f64, b: f64) -> ContinuousInterval {
        ContinuousInterval::new(ord(a), ord(b)).unwrap()
    }

    #[test]
    fn end_points_input_strictly_ascending() {
        let t = Topology::from_mappings(vec![
            Mapping::affine(iv(0.0, 5.0), AffineTransform1D::IDENTITY),
            Mapping::affine(iv(5.0, 10.0), AffineTransform1D::IDENTITY),
        ])
        .unwrap();
        let points = t.end_points_input();
        assert_eq!(points, vec![ord(0.0), ord(5.0), ord(10.0)]);
    }

    #[test]
    fn rejects_non_right_met_sequence() {
        let result = Topology::from_mappings(vec![
            Mapping::affine(iv(0.0, 5.0), AffineTransform1D::IDENTITY),
            Mapping::affine(iv(6.0, 10.0), AffineTransform1D::IDENTITY),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn s1_identity_join_is_identity() {
        let a = Topology::from_mappings(vec![Mapping::affine(
            iv(0.0, 8.0),
            AffineTransform1D::new(ord(1.0), ord(1.0)).unwrap(),
        )])
        .unwrap();
        let identity = Topology::identity_infinite();
        let joined = Topology::join(&identity, &a).unwrap();
        assert_eq!(joined.project(ord(3.0)).ordinate(), Some(ord(4.0)));
        assert_eq!(joined.input_bounds(), iv(0.0, 8.0));
    }

    #[test]
    fn s3_linear_v_shape() {
        let curve = LinearMonotonic::new(vec![
            ControlPoint::new(ord(0.0), ord(0.0)),
            ControlPoint::new(ord(5.0), ord(40.0)),
        ])
        .unwrap();
        let rising = Mapping::linear(curve);
        let curve2 = LinearMonotonic::new(vec![
            ControlPoint::new(ord(5.0), ord(40.0)),
            ControlPoint::new(ord(10.0), ord(0.0)),
        ])
        .unwrap();
        let falling = Mapping::linear(curve2);
        let t = Topology::from_mappings(vec![rising, falling]).unwrap();

        assert!(t.project(ord(2.0)).ordinate().unwrap().approx_eq(ord(16.0)));
        assert_eq!(t.project(ord(5.0)).ordinate(), Some(ord(40.0)));
        assert!(t.project(ord(8.0)).ordinate().unwrap().approx_eq(ord(16.0)));

        let mut inverses = t.project_inv(ord(16.0));
        inverses.sort();
        assert_eq!(inverses.len(), 2);
        assert!(inverses[0].approx_eq(ord(2.0)));
        assert!(inverses[1].approx_eq(ord(8.0)));
    }

    #[test]
    fn s5_trim_in_output_space_with_hole() {
        let rising = Mapping::linear(
            LinearMonotonic::new(vec![ControlPoint::new(ord(0.0), ord(0.0)), ControlPoint::new(ord(10.0), ord(10.0))]).unwrap(),
        );
        let falling = Mapping::linear(
            LinearMonotonic::new(vec![ControlPoint::new(ord(10.0), ord(10.0)), ControlPoint::new(ord(20.0), ord(0.0))]).unwrap(),
        );
        let t = Topology::from_mappings(vec![rising, falling]).unwrap();
        let trimmed = t.trim_in_output_space(iv(1.0, 8.0)).unwrap();
        // Each of the two source mappings restricts to an output-space
        // sub-range strictly inside its own input bounds, so both the left
        // and right uncovered sub-intervals need an `Empty` mapping to keep
        // the input tiling whole: empty[0,1) linear[1,8) empty[8,10)
        // empty[10,12) linear[12,19) empty[19,20).
        assert_eq!(trimmed.mappings().len(), 6);
        assert!(trimmed.mappings()[0].is_empty());
        assert!(!trimmed.mappings()[1].is_empty());
        assert!(trimmed.mappings()[2].is_empty());
        assert!(trimmed.mappings()[3].is_empty());
        assert!(!trimmed.mappings()[4].is_empty());
        assert!(trimmed.mappings()[5].is_empty());
        assert_eq!(trimmed.input_bounds(), t.input_bounds());
    }

    #[test]
    fn s6_endpoint_projection_regression() {
        let t = Topology::identity_over(iv(0.0, 10.0));
        assert_eq!(t.project(ord(10.0)).ordinate(), Some(ord(10.0)));
        assert_eq!(t.project(ord(11.0)), ProjectionResult::OutOfBounds);
    }

    #[test]
    fn s4_bezier_critical_split_into_two_topology_mappings() {
        let seg = BezierSegment::new(
            ControlPoint::new(ord(0.0), ord(0.0)),
            ControlPoint::new(ord(1.0), ord(5.0)),
            ControlPoint::new(ord(5.0), ord(5.0)),
            ControlPoint::new(ord(5.0), ord(1.0)),
        )
        .unwrap();
        let t = Topology::from_bezier(&[seg], 0.01).unwrap();
        assert_eq!(t.mappings().len(), 2);
        assert_eq!(t.input_bounds(), iv(0.0, 5.0));
    }

    #[test]
    fn property_trim_in_input_space_matches_intersection() {
        let t = Topology::identity_over(iv(0.0, 10.0));
        let trimmed = t.trim_in_input_space(iv(2.0, 6.0)).unwrap();
        assert_eq!(trimmed.input_bounds(), iv(2.0, 6.0));
    }
}
