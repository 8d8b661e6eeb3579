//! Core data model for `virtual-punch`.
//!
//! This crate provides the shared types every other crate in the workspace
//! builds on:
//!
//! - linear algebra type aliases (`Real`, `Pt2`, `Mat3`, and friends),
//! - the course model (controls, courses, GPS and mobile options),
//! - the calibration context (affine matrix, image size, sensitivity radii),
//! - the derived outputs (virtual controls, parsed course data).
//!
//! Coordinate spaces (conceptually):
//! `relative [0,1] → image pixel → (affine) → lat/lng`
//!
//! Everything here is plain data with serde support; the JSON shape uses
//! camelCase field names because that is what the tracking client consumes.
//!
//! # Example
//!
//! ```
//! use virtual_punch_core::{AffineMatrix, CalibrationOptions};
//!
//! let opts = CalibrationOptions {
//!     calibration: Some(AffineMatrix {
//!         a: 0.00001,
//!         b: 0.0,
//!         c: 18.0,
//!         d: 0.0,
//!         e: -0.00001,
//!         f: 59.5,
//!     }),
//!     image_width: Some(1000.0),
//!     image_height: Some(800.0),
//! };
//! let p = opts.calibration.unwrap().apply(500.0, 200.0);
//! assert!((p.lng - 18.005).abs() < 1e-9);
//! ```

/// Linear algebra type aliases.
mod math;
/// Test utilities for cross-crate testing.
///
/// This module is public to allow usage in integration tests across
/// the workspace, but is not intended for production use.
pub mod test_utils;
/// Course model, calibration context and derived outputs.
mod types;

pub use math::*;
pub use types::*;
