//! Shared error type for the mapping/topology algebra.
//!
//! Every fallible public entry point in this crate returns `Result<T, Error>`
//! with one shared enum rather than a per-module error, because the error
//! kinds in play (out-of-bounds projection, non-invertible transforms,
//! non-finite ordinates, ...) cut across every module: an `OutOfBounds` can
//! originate from an `Ordinate` division, an `AffineTransform1D::apply`, or a
//! `Topology::project`, and callers generally want to match on the *kind* of
//! failure rather than which module raised it.

#![forbid(unsafe_code)]

/// Errors raised by the ordinate, mapping, and topology algebra.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A point projection fell outside the input or output bounds of the
    /// mapping/topology being queried (the endpoint-inclusion exception of
    /// the `Mapping` contract does not count as out of bounds).
    #[error("{op}: {value} is out of bounds {bounds}")]
    OutOfBounds {
        /// Name of the operation that raised the error.
        op: &'static str,
        /// The offending ordinate, formatted.
        value: String,
        /// The bounds it was checked against, formatted.
        bounds: String,
    },

    /// An interval or mapping was constructed with `end < start`, or with
    /// declared bounds that conflict with its backing data.
    #[error("{op}: invalid bounds (start={start}, end={end})")]
    InvalidBounds {
        /// Name of the operation that raised the error.
        op: &'static str,
        /// The offending start value, formatted.
        start: String,
        /// The offending end value, formatted.
        end: String,
    },

    /// A curve could not be made monotonic by critical-point splitting.
    #[error("{op}: not monotonic in {axis} over the requested range")]
    NonMonotonic {
        /// Name of the operation that raised the error.
        op: &'static str,
        /// Which axis failed to be monotonic (`"input"` or `"output"`).
        axis: &'static str,
    },

    /// An affine transform had `scale = 0`, or a mapping/topology that is
    /// not individually 1-to-1 was asked to invert.
    #[error("{op}: not invertible ({reason})")]
    NonInvertible {
        /// Name of the operation that raised the error.
        op: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// Division by zero, a NaN input, or a non-finite ordinate where a
    /// finite one was required.
    #[error("{op}: numeric domain error on value {value}")]
    NumericDomain {
        /// Name of the operation that raised the error.
        op: &'static str,
        /// The offending value, formatted.
        value: String,
    },

    /// `BezierSegment::find_u` exceeded its iteration cap without bracketing
    /// a root to within tolerance.
    #[error("{op}: root finder failed to converge after {iterations} iterations (target={target})")]
    ConvergenceFailure {
        /// Name of the operation that raised the error.
        op: &'static str,
        /// Iterations spent before giving up.
        iterations: usize,
        /// The target value the root finder was searching for.
        target: String,
    },

    /// `shrink_to_input_interval` (or an equivalent restriction) was asked to
    /// intersect with a disjoint interval where the caller requires a
    /// non-empty result.
    #[error("{op}: {a} does not overlap {b}")]
    NoOverlap {
        /// Name of the operation that raised the error.
        op: &'static str,
        /// The first interval, formatted.
        a: String,
        /// The second interval, formatted.
        b: String,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
