//! Result of projecting a point or interval through a [`crate::mapping::Mapping`]
//! or [`crate::topology::Topology`].

#![forbid(unsafe_code)]

use crate::interval::ContinuousInterval;
use crate::ordinate::Ordinate;

/// The outcome of projecting a single ordinate or interval through a mapping.
///
/// A point can project to either a single ordinate (the common case) or an
/// interval (when the forward mapping is locally flat, so a single input
/// ordinate corresponds to a run of output ordinates, or vice versa for
/// inverse projection). `OutOfBounds` is returned instead of `Err` by callers
/// that want to report a missed projection as a value rather than unwind —
/// see `Mapping::project_r`/`Topology::project_r` for the `Result`-returning
/// counterparts that convert this variant into [`crate::error::Error::OutOfBounds`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProjectionResult {
    /// Projection landed on a single ordinate.
    Ordinate(Ordinate),
    /// Projection landed on a whole run of ordinates (a flat segment).
    Interval(ContinuousInterval),
    /// The queried point was outside the mapping's domain.
    OutOfBounds,
}

impl ProjectionResult {
    /// `true` if this is the `OutOfBounds` variant.
    pub fn is_out_of_bounds(self) -> bool {
        matches!(self, ProjectionResult::OutOfBounds)
    }

    /// The single ordinate, if this is the `Ordinate` variant.
    pub fn as_ordinate(self) -> Option<Ordinate> {
        match self {
            ProjectionResult::Ordinate(o) => Some(o),
            _ => None,
        }
    }

    /// The interval, if this is the `Interval` variant.
    pub fn as_interval(self) -> Option<ContinuousInterval> {
        match self {
            ProjectionResult::Interval(i) => Some(i),
            _ => None,
        }
    }

    /// Collapse either variant to a representative ordinate: the ordinate
    /// itself, or the start of the interval. Returns `None` for
    /// `OutOfBounds`.
    ///
    /// Used by callers (e.g. `Topology::join`) that only need one
    /// representative value and treat a flat run as "starts here", matching
    /// the crate-wide convention of tie-breaking to the least-input/least-
    /// output representative (see `LinearMonotonic::output_at_input`).
    pub fn ordinate(self) -> Option<Ordinate> {
        match self {
            ProjectionResult::Ordinate(o) => Some(o),
            ProjectionResult::Interval(i) => Some(i.start()),
            ProjectionResult::OutOfBounds => None,
        }
    }
}
