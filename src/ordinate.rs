//! Scalar ordinate type: a finite real (or `±∞` sentinel) coordinate with a
//! total order and an explicit epsilon-equality predicate distinct from
//! `PartialEq`.

#![forbid(unsafe_code)]

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Default tolerance used by [`Ordinate::approx_eq`] and by the curve/mapping
/// algebra wherever the distilled spec calls for "ε" without naming a caller
/// -supplied tolerance (linearization flatness, `find_u` convergence, ...).
pub const EPSILON: f64 = 1e-6;

/// A scalar coordinate in a 1-D normed vector space of time or parameter.
///
/// Backed by `f64`. NaN is never a valid `Ordinate`; every public
/// constructor rejects it with [`Error::NumericDomain`]. `±∞` are valid
/// sentinel values used by unbounded intervals and mappings.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ordinate(f64);

impl Ordinate {
    /// The additive identity.
    pub const ZERO: Ordinate = Ordinate(0.0);
    /// The multiplicative identity.
    pub const ONE: Ordinate = Ordinate(1.0);
    /// The `+∞` sentinel.
    pub const INFINITY: Ordinate = Ordinate(f64::INFINITY);
    /// The `−∞` sentinel.
    pub const NEG_INFINITY: Ordinate = Ordinate(f64::NEG_INFINITY);

    /// Construct an `Ordinate`, rejecting NaN.
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() {
            return Err(Error::NumericDomain {
                op: "Ordinate::new",
                value: "NaN".to_string(),
            });
        }
        Ok(Ordinate(value))
    }

    /// Construct an `Ordinate` from a known-finite, known-non-NaN `f64`.
    ///
    /// Used internally where the value is freshly computed from already
    /// -validated operands (e.g. `scale * x + offset` on two `Ordinate`s);
    /// debug-asserts the non-NaN invariant rather than re-propagating a
    /// `Result` through every arithmetic call site.
    pub(crate) fn from_f64_unchecked(value: f64) -> Self {
        debug_assert!(!value.is_nan(), "Ordinate constructed from NaN");
        Ordinate(value)
    }

    /// The raw `f64` value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// `true` if this value is `+∞` or `−∞`.
    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }

    /// `true` if this value is neither `±∞` nor NaN (NaN is unreachable by
    /// construction, so this is equivalent to `!is_infinite()`).
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Epsilon-equality against the crate-default [`EPSILON`].
    pub fn approx_eq(self, other: Self) -> bool {
        self.approx_eq_with(other, EPSILON)
    }

    /// Epsilon-equality against an explicit tolerance.
    pub fn approx_eq_with(self, other: Self, epsilon: f64) -> bool {
        if self.0 == other.0 {
            return true;
        }
        (self.0 - other.0).abs() <= epsilon
    }

    /// Checked division, failing with [`Error::NumericDomain`] on division
    /// by zero.
    pub fn checked_div(self, rhs: Self) -> Result<Self> {
        if rhs.0 == 0.0 {
            return Err(Error::NumericDomain {
                op: "Ordinate::div",
                value: format!("{self} / {rhs}"),
            });
        }
        Ok(Ordinate::from_f64_unchecked(self.0 / rhs.0))
    }

    /// Linear interpolation `self + (other - self) * t`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Ordinate::from_f64_unchecked(self.0 + (other.0 - self.0) * t)
    }

    /// The minimum of two ordinates.
    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// The maximum of two ordinates.
    pub fn max(self, other: Self) -> Self {
        if self >= other {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for Ordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for Ordinate {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Ordinate {}

impl PartialOrd for Ordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Ordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Ordinate never holds NaN, so total_cmp gives the usual order
        // (including correctly ordering ±∞).
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Ordinate {
    /// Infallible conversion for literal/known-finite call sites; panics in
    /// debug builds on NaN the same way `Ordinate::from_f64_unchecked` does.
    fn from(value: f64) -> Self {
        Ordinate::from_f64_unchecked(value)
    }
}

impl Add for Ordinate {
    type Output = Ordinate;
    fn add(self, rhs: Self) -> Self::Output {
        Ordinate::from_f64_unchecked(self.0 + rhs.0)
    }
}
impl Sub for Ordinate {
    type Output = Ordinate;
    fn sub(self, rhs: Self) -> Self::Output {
        Ordinate::from_f64_unchecked(self.0 - rhs.0)
    }
}
impl Mul for Ordinate {
    type Output = Ordinate;
    fn mul(self, rhs: Self) -> Self::Output {
        Ordinate::from_f64_unchecked(self.0 * rhs.0)
    }
}
impl Neg for Ordinate {
    type Output = Ordinate;
    fn neg(self) -> Self::Output {
        Ordinate::from_f64_unchecked(-self.0)
    }
}
impl Div for Ordinate {
    type Output = Ordinate;
    /// Unchecked division for call sites that have already ruled out a zero
    /// divisor; prefer [`Ordinate::checked_div`] at public API boundaries.
    fn div(self, rhs: Self) -> Self::Output {
        Ordinate::from_f64_unchecked(self.0 / rhs.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Ordinate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Ordinate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok(Ordinate::from_f64_unchecked(value))
    }
}
