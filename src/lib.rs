//! Temporal projection over piecewise-monotonic mappings.
//!
//! This crate composes heterogeneous one-dimensional functions — affine,
//! linear-piecewise, and cubic Bézier — into a single [`topology::Topology`]
//! mapping an input ordinate domain to an output ordinate domain, and
//! `join`s two such topologies through a shared intermediate domain to
//! produce a new one.
//!
//! ## Layout
//!
//! - [`ordinate`] / [`interval`] — the scalar and interval primitives
//!   everything else is built on.
//! - [`affine`] — 1-D affine transforms.
//! - [`bezier`] / [`hodograph`] / [`linearize`] — the cubic Bézier toolkit:
//!   evaluation, inverse evaluation, critical-point extraction, and
//!   adaptive linearization into piecewise-linear runs.
//! - [`linear_curve`] — piecewise-linear monotonic curves.
//! - [`mapping`] — the `Mapping` tagged union (`Empty`/`Affine`/
//!   `LinearMonotonic`) and its `join` dispatch.
//! - [`topology`] — sequences of mappings and the `Topology::join` algorithm.
//!
//! Everything here is a pure, synchronous, allocation-owning value type: no
//! global state, no interior mutability, no `unsafe`.

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Shared error type for the mapping/topology algebra.
pub mod error;
/// Scalar ordinate type.
pub mod ordinate;
/// Right-open interval over ordinates.
pub mod interval;
/// 1-D affine transform.
pub mod affine;
/// Projection result sum type.
pub mod projection;
/// Cubic Bézier segment core.
pub mod bezier;
/// Hodograph-based critical-point extraction.
pub mod hodograph;
/// Adaptive flatness-driven linearization.
pub mod linearize;
/// Piecewise-linear monotonic curve.
pub mod linear_curve;
/// The `Mapping` tagged union and its `join` dispatch.
pub mod mapping;
/// Sequences of mappings and the `Topology::join` algorithm.
pub mod topology;

pub use crate::affine::AffineTransform1D;
pub use crate::bezier::{Axis, BezierSegment, ControlPoint};
pub use crate::error::{Error, Result};
pub use crate::interval::ContinuousInterval;
pub use crate::linear_curve::LinearMonotonic;
pub use crate::mapping::{Mapping, MappingAffine, MappingEmpty, MappingLinearMonotonic};
pub use crate::ordinate::{Ordinate, EPSILON};
pub use crate::projection::ProjectionResult;
pub use crate::topology::Topology;
