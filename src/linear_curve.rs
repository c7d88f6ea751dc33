//! `LinearMonotonic`: a piecewise-linear curve defined by a strictly
//! input-ascending knot list, monotonic (non-decreasing or non-increasing)
//! in output across the whole slice.

#![forbid(unsafe_code)]

use crate::bezier::ControlPoint;
use crate::error::{Error, Result};
use crate::interval::ContinuousInterval;
use crate::ordinate::Ordinate;

/// A piecewise-linear curve over knots `k[0..n]` with `k[i].input <
/// k[i+1].input` and output monotonic (non-decreasing or non-increasing)
/// across the whole slice.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearMonotonic {
    knots: Vec<ControlPoint>,
}

/// Whether the output column is non-decreasing or non-increasing across the
/// knot list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputDirection {
    NonDecreasing,
    NonIncreasing,
}

fn output_direction(knots: &[ControlPoint]) -> Result<OutputDirection> {
    let mut direction = None;
    for pair in knots.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b.output > a.output {
            match direction {
                None => direction = Some(OutputDirection::NonDecreasing),
                Some(OutputDirection::NonIncreasing) => {
                    return Err(Error::NonMonotonic {
                        op: "LinearMonotonic::new",
                        axis: "output",
                    })
                }
                Some(OutputDirection::NonDecreasing) => {}
            }
        } else if b.output < a.output {
            match direction {
                None => direction = Some(OutputDirection::NonIncreasing),
                Some(OutputDirection::NonDecreasing) => {
                    return Err(Error::NonMonotonic {
                        op: "LinearMonotonic::new",
                        axis: "output",
                    })
                }
                Some(OutputDirection::NonIncreasing) => {}
            }
        }
    }
    Ok(direction.unwrap_or(OutputDirection::NonDecreasing))
}

impl LinearMonotonic {
    /// Construct from a knot list. Fails with [`Error::InvalidBounds`] if
    /// fewer than two knots are given or the input column is not strictly
    /// ascending; fails with [`Error::NonMonotonic`] if the output column
    /// reverses direction partway through.
    pub fn new(knots: Vec<ControlPoint>) -> Result<Self> {
        if knots.len() < 2 {
            return Err(Error::InvalidBounds {
                op: "LinearMonotonic::new",
                start: "<2 knots>".to_string(),
                end: knots.len().to_string(),
            });
        }
        for pair in knots.windows(2) {
            if pair[1].input <= pair[0].input {
                return Err(Error::InvalidBounds {
                    op: "LinearMonotonic::new",
                    start: pair[0].input.to_string(),
                    end: pair[1].input.to_string(),
                });
            }
        }
        output_direction(&knots)?;
        Ok(LinearMonotonic { knots })
    }

    /// The knot list.
    pub fn knots(&self) -> &[ControlPoint] {
        &self.knots
    }

    /// The input-axis bounds `[k[0].input, k[n-1].input)`.
    pub fn input_bounds(&self) -> ContinuousInterval {
        let first = self.knots.first().expect("non-empty by invariant");
        let last = self.knots.last().expect("non-empty by invariant");
        ContinuousInterval::new(first.input, last.input).expect("strictly ascending input by invariant")
    }

    /// The output-axis bounds spanning the knot list's output extremes.
    pub fn output_bounds(&self) -> ContinuousInterval {
        let mut lo = self.knots[0].output;
        let mut hi = self.knots[0].output;
        for k in &self.knots {
            lo = lo.min(k.output);
            hi = hi.max(k.output);
        }
        ContinuousInterval::new(lo, hi).expect("min/max are ordered")
    }

    fn direction(&self) -> OutputDirection {
        output_direction(&self.knots).expect("constructed instances are already validated")
    }

    /// Evaluate the curve at input `x`, linearly interpolating between the
    /// bracketing knots. Accepts `x == input_bounds().end` (the endpoint
    /// rule) even though the interval itself is right-open. Fails with
    /// [`Error::OutOfBounds`] otherwise.
    pub fn output_at_input(&self, x: Ordinate) -> Result<Ordinate> {
        let bounds = self.input_bounds();
        if !bounds.overlaps(x) && !bounds.is_end_point(x) {
            return Err(Error::OutOfBounds {
                op: "LinearMonotonic::output_at_input",
                value: x.to_string(),
                bounds: bounds.to_string(),
            });
        }

        // Binary search for the last knot with input <= x.
        let idx = match self.knots.binary_search_by(|k| k.input.cmp(&x)) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let idx = idx.min(self.knots.len() - 2);
        let a = self.knots[idx];
        let b = self.knots[idx + 1];
        if x == a.input {
            return Ok(a.output);
        }
        if x == b.input {
            return Ok(b.output);
        }
        let t = (x - a.input).get() / (b.input - a.input).get();
        Ok(a.output.lerp(b.output, t))
    }

    /// Solve for an input producing output `y`, valid because the curve is
    /// monotonic in output. If `y` is attained by a flat run of knots
    /// (constant output across multiple consecutive knots), returns the
    /// least such input (documented tie-break).
    pub fn input_at_output(&self, y: Ordinate) -> Result<Ordinate> {
        let bounds = self.output_bounds();
        if !bounds.overlaps(y) && !bounds.is_end_point(y) {
            return Err(Error::OutOfBounds {
                op: "LinearMonotonic::input_at_output",
                value: y.to_string(),
                bounds: bounds.to_string(),
            });
        }

        let ascending = self.direction() == OutputDirection::NonDecreasing;

        for pair in self.knots.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (lo, hi) = if ascending {
                (a.output, b.output)
            } else {
                (b.output, a.output)
            };
            if y < lo || y > hi {
                continue;
            }
            if hi == lo {
                // Flat run: least input is `a.input` regardless of scan
                // direction, since knots are visited in ascending input
                // order.
                return Ok(a.input);
            }
            if y == a.output {
                return Ok(a.input);
            }
            if y == b.output {
                return Ok(b.input);
            }
            let t = (y - a.output).get() / (b.output - a.output).get();
            return Ok(a.input.lerp(b.input, t));
        }

        Err(Error::OutOfBounds {
            op: "LinearMonotonic::input_at_output",
            value: y.to_string(),
            bounds: bounds.to_string(),
        })
    }

    /// Restrict to the portion with input in `[t.start, t.end]`, inserting
    /// interpolated endpoint knots so the trimmed curve's bounds match `t`
    /// exactly (clamped to this curve's own bounds).
    pub fn trim_input(&self, t: ContinuousInterval) -> Result<Self> {
        let own = self.input_bounds();
        let lo = t.start().max(own.start());
        let hi = t.end().min(own.end());
        if lo > hi {
            return Err(Error::NoOverlap {
                op: "LinearMonotonic::trim_input",
                a: own.to_string(),
                b: t.to_string(),
            });
        }

        let lo_out = self.output_at_input(lo)?;
        let hi_out = self.output_at_input(hi)?;

        let mut knots = vec![ControlPoint::new(lo, lo_out)];
        for k in &self.knots {
            if k.input > lo && k.input < hi {
                knots.push(*k);
            }
        }
        if hi > lo {
            knots.push(ControlPoint::new(hi, hi_out));
        }
        LinearMonotonic::new(knots)
    }

    /// Restrict by output range: project `t` back to input via
    /// [`Self::input_at_output`] and trim by that input range.
    pub fn trim_output(&self, t: ContinuousInterval) -> Result<Self> {
        let own = self.output_bounds();
        let lo_y = t.start().max(own.start());
        let hi_y = t.end().min(own.end());
        if lo_y > hi_y {
            return Err(Error::NoOverlap {
                op: "LinearMonotonic::trim_output",
                a: own.to_string(),
                b: t.to_string(),
            });
        }
        let ascending = self.direction() == OutputDirection::NonDecreasing;
        let (x_lo, x_hi) = if ascending {
            (self.input_at_output(lo_y)?, self.input_at_output(hi_y)?)
        } else {
            (self.input_at_output(hi_y)?, self.input_at_output(lo_y)?)
        };
        self.trim_input(ContinuousInterval::new(x_lo, x_hi)?)
    }

    /// Split at input `x`, returning two curves sharing an interpolated
    /// knot at `x`. Fails with [`Error::OutOfBounds`] unless `x` is
    /// strictly interior to `input_bounds()`.
    pub fn split_at_input_ord(&self, x: Ordinate) -> Result<(Self, Self)> {
        let bounds = self.input_bounds();
        if x <= bounds.start() || x >= bounds.end() {
            return Err(Error::OutOfBounds {
                op: "LinearMonotonic::split_at_input_ord",
                value: x.to_string(),
                bounds: bounds.to_string(),
            });
        }
        let y = self.output_at_input(x)?;
        let mut left: Vec<ControlPoint> = self.knots.iter().copied().filter(|k| k.input < x).collect();
        left.push(ControlPoint::new(x, y));
        let mut right = vec![ControlPoint::new(x, y)];
        right.extend(self.knots.iter().copied().filter(|k| k.input > x));
        Ok((LinearMonotonic::new(left)?, LinearMonotonic::new(right)?))
    }

    /// Split at every ordinate in `xs`, stably and in order. Points outside
    /// the open input interval are ignored; duplicates (within
    /// [`crate::ordinate::EPSILON`]) collapse to a single split.
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

    /// Invert the curve: swap input and output columns, producing a curve
    /// monotonic in what was the input axis. Collapses consecutive knots
    /// that would otherwise tie on the new input axis (flat runs in the
    /// forward curve's output) to their first representative, since the
    /// inverted knot list must be *strictly* ascending in its new input
    /// column.
    pub fn invert(&self) -> Result<Self> {
        let ascending = self.direction() == OutputDirection::NonDecreasing;

        let mut swapped: Vec<ControlPoint> = self
            .knots
            .iter()
            .map(|k| ControlPoint::new(k.output, k.input))
            .collect();
        if !ascending {
            swapped.reverse();
        }

        let mut deduped: Vec<ControlPoint> = Vec::with_capacity(swapped.len());
        for k in swapped {
            match deduped.last() {
                Some(last) if last.input.approx_eq(k.input) => {
                    // Flat run in the original output column: keep the
                    // least original-input representative per the crate's
                    // documented tie-break (see `input_at_output`).
                    if k.output < last.output {
                        *deduped.last_mut().unwrap() = k;
                    }
                }
                _ => deduped.push(k),
            }
        }

        LinearMonotonic::new(deduped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp(i: f64, o: f64) -> ControlPoint {
        ControlPoint::new(Ordinate::from(i), Ordinate::from(o))
    }

    fn v_shape() -> LinearMonotonic {
        // Not globally monotonic in output -- used only for split tests
        // that operate on a single monotonic run.
        LinearMonotonic::new(vec![cp(0.0, 0.0), cp(5.0, 40.0)]).unwrap()
    }

    #[test]
    fn rejects_too_few_knots() {
        assert!(LinearMonotonic::new(vec![cp(0.0, 0.0)]).is_err());
    }

    #[test]
    fn rejects_non_ascending_input() {
        assert!(LinearMonotonic::new(vec![cp(0.0, 0.0), cp(0.0, 1.0)]).is_err());
    }

    #[test]
    fn rejects_direction_reversal_in_output() {
        assert!(LinearMonotonic::new(vec![cp(0.0, 0.0), cp(1.0, 5.0), cp(2.0, 1.0)]).is_err());
    }

    #[test]
    fn output_at_input_interpolates_and_accepts_endpoint() {
        let curve = v_shape();
        assert_eq!(curve.output_at_input(Ordinate::from(2.5)).unwrap(), Ordinate::from(20.0));
        assert_eq!(curve.output_at_input(Ordinate::from(5.0)).unwrap(), Ordinate::from(40.0));
        assert!(curve.output_at_input(Ordinate::from(5.0001)).is_err());
    }

    #[test]
    fn input_at_output_ties_to_least_input_on_flat_run() {
        let curve = LinearMonotonic::new(vec![cp(0.0, 0.0), cp(1.0, 5.0), cp(3.0, 5.0), cp(4.0, 10.0)]).unwrap();
        let x = curve.input_at_output(Ordinate::from(5.0)).unwrap();
        assert_eq!(x, Ordinate::from(1.0));
    }

    #[test]
    fn split_at_input_ord_shares_interpolated_knot() {
        let curve = v_shape();
        let (left, right) = curve.split_at_input_ord(Ordinate::from(2.0)).unwrap();
        assert_eq!(*left.knots().last().unwrap(), *right.knots().first().unwrap());
        assert_eq!(left.knots().last().unwrap().output, Ordinate::from(16.0));
    }

    #[test]
    fn split_at_each_input_ord_ignores_out_of_range_and_dedups() {
        let curve = v_shape();
        let pieces = curve
            .split_at_each_input_ord(&[Ordinate::from(-1.0), Ordinate::from(2.0), Ordinate::from(2.0000001), Ordinate::from(10.0)])
            .unwrap();
        assert_eq!(pieces.len(), 2);
    }

    #[test]
    fn invert_then_forward_round_trips() {
        let curve = v_shape();
        let inverted = curve.invert().unwrap();
        let y = curve.output_at_input(Ordinate::from(3.0)).unwrap();
        let x_back = inverted.output_at_input(y).unwrap();
        assert!(x_back.approx_eq(Ordinate::from(3.0)));
    }

    #[test]
    fn trim_input_clips_and_preserves_values() {
        let curve = v_shape();
        let trimmed = curve.trim_input(ContinuousInterval::new(Ordinate::from(1.0), Ordinate::from(4.0)).unwrap()).unwrap();
        assert_eq!(trimmed.input_bounds().start(), Ordinate::from(1.0));
        assert_eq!(trimmed.input_bounds().end(), Ordinate::from(4.0));
        assert_eq!(trimmed.output_at_input(Ordinate::from(1.0)).unwrap(), Ordinate::from(8.0));
    }
}
