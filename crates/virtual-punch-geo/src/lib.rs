//! Coordinate transforms for map calibration.
//!
//! This crate converts between the three coordinate spaces a course lives in:
//!
//! - **relative / pixel space**: positions on the scanned map image,
//! - **projected grid**: a national Transverse Mercator grid (SWEREF 99 TM by
//!   default), the space world files are expressed in,
//! - **geographic**: latitude/longitude in decimal degrees.
//!
//! Modules:
//!
//! - [`affine`]: forward pixel → lat/lng mapping and least-squares fitting
//!   from ground control points.
//! - [`grid`]: Gauss–Krüger (four-term series) grid ↔ geodetic conversion.
//! - [`world_file`]: six-line world files and corner bounding boxes.
//! - [`geodesy`]: great-circle distances.
//!
//! All functions are pure; nothing here performs I/O.

pub mod affine;
pub mod geodesy;
pub mod grid;
pub mod world_file;

pub use affine::*;
pub use geodesy::*;
pub use grid::*;
pub use world_file::*;
