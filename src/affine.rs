//! 1-D affine transform: `x ↦ scale·x + offset`.

#![forbid(unsafe_code)]

use crate::error::{Error, Result};
use crate::interval::ContinuousInterval;
use crate::ordinate::Ordinate;

/// `x ↦ scale·x + offset`, with `scale` always non-zero.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffineTransform1D {
    offset: Ordinate,
    scale: Ordinate,
}

impl AffineTransform1D {
    /// `x ↦ x` (offset 0, scale 1).
    pub const IDENTITY: AffineTransform1D = AffineTransform1D {
        offset: Ordinate::ZERO,
        scale: Ordinate::ONE,
    };

    /// Construct a transform, failing with [`Error::NonInvertible`] if
    /// `scale == 0` (a zero-scale affine map is not 1-to-1 and cannot
    /// participate in the `Mapping` algebra, which requires every variant
    /// to be invertible).
    pub fn new(offset: Ordinate, scale: Ordinate) -> Result<Self> {
        if scale == Ordinate::ZERO {
            return Err(Error::NonInvertible {
                op: "AffineTransform1D::new",
                reason: "scale must be non-zero".to_string(),
            });
        }
        Ok(AffineTransform1D { offset, scale })
    }

    /// The additive offset.
    pub fn offset(self) -> Ordinate {
        self.offset
    }

    /// The multiplicative scale (always non-zero).
    pub fn scale(self) -> Ordinate {
        self.scale
    }

    /// Apply the transform to a single ordinate.
    pub fn apply(self, x: Ordinate) -> Ordinate {
        self.scale * x + self.offset
    }

    /// Apply the transform to an interval, re-ordering the mapped endpoints
    /// so the result is a valid `[start, end)` (required when `scale < 0`,
    /// which reverses orientation).
    pub fn apply_interval(self, interval: ContinuousInterval) -> ContinuousInterval {
        let a = self.apply(interval.start());
        let b = self.apply(interval.end());
        // `a`/`b` are finite-or-infinite Ordinates freshly computed from a
        // valid interval and a non-zero scale, so the endpoints cannot
        // coincide with a reversed order that fails the invariant check.
        ContinuousInterval::new(a.min(b), a.max(b)).expect("affine image endpoints are ordered")
    }

    /// The inverse transform `y ↦ (y − offset) / scale`.
    ///
    /// Always succeeds: `scale != 0` is an invariant upheld by every public
    /// constructor of `AffineTransform1D`, so this can never hit the
    /// `NonInvertible` case the distilled spec documents for the general
    /// "inverse of an affine transform" operation.
    pub fn inverse(self) -> AffineTransform1D {
        let inv_scale = Ordinate::ONE.checked_div(self.scale).expect("scale is non-zero by invariant");
        AffineTransform1D {
            offset: -self.offset * inv_scale,
            scale: inv_scale,
        }
    }

    /// Compose `outer ∘ inner`, i.e. `x ↦ outer.apply(inner.apply(x))`.
    pub fn compose(outer: AffineTransform1D, inner: AffineTransform1D) -> AffineTransform1D {
        AffineTransform1D {
            scale: outer.scale * inner.scale,
            offset: outer.scale * inner.offset + outer.offset,
        }
    }
}
