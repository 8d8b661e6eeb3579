//! High-level entry crate for `virtual-punch`: orienteering course import and
//! GPS-based virtual punching.
//!
//! This crate ties the workspace together:
//! - Course-file import (IOF XML 3.0 `CourseData`, Purple Pen events with forks)
//! - Planning normalization for hand-edited controls and courses
//! - Map calibration (affine fit from reference points, world files, SWEREF 99 TM)
//! - Geofenced virtual controls, map-crop remapping and course length
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> anyhow::Result<()> {
//! use virtual_punch::prelude::*;
//!
//! let xml = br#"<CourseData><RaceCourseData>
//!   <Control type="Start"><Id>S1</Id><MapPosition x="0" y="100"/></Control>
//!   <Control><Id>31</Id><MapPosition x="100" y="0"/></Control>
//!   <Course><Name>Short</Name>
//!     <CourseControl><Control>S1</Control></CourseControl>
//!     <CourseControl><Control>31</Control></CourseControl>
//!   </Course>
//! </RaceCourseData></CourseData>"#;
//!
//! // Import
//! let data = parse_course_file(xml)?;
//!
//! // Calibrate a 1000×800 image: top-left at (18.0, 59.5), 1e-5 degrees per pixel
//! let matrix = AffineMatrix { a: 1e-5, b: 0.0, c: 18.0, d: 0.0, e: -1e-5, f: 59.5 };
//! let calibration = CalibrationOptions::new(matrix, 1000.0, 800.0);
//!
//! // Geofence
//! let course = &data.courses[0];
//! let radii = SensitivityRadii::default();
//! let set = build_virtual_controls(course, &data.controls, &calibration, &radii);
//! assert!(set.is_complete());
//! assert_eq!(set.controls.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`core`] - Data model: controls, courses, calibration, outputs
//! - [`geo`] - Coordinate conversions: affine fit, world files, grid projection
//! - [`course`] - Course-file parsing and planning normalization
//! - [`pipeline`] - Virtual controls, crop remapping, course geometry
//!
//! # Coordinate Spaces
//!
//! | Space | Unit | Converted by |
//! |-------|------|--------------|
//! | Map position (course file) | paper mm, y up | [`course`] → relative |
//! | Relative | `[0, 1]`, y down | × image size → pixel |
//! | Image pixel | px, y down | [`AffineMatrix`] → lat/lng |
//! | Projected grid | m (northing, easting) | [`GridProjection`] → lat/lng |

// ═══════════════════════════════════════════════════════════════════════════════
// Workspace Crates
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared data model.
///
/// Re-exports everything from `virtual_punch_core`.
pub mod core {
    pub use virtual_punch_core::*;
}

/// Coordinate conversions.
///
/// Includes the least-squares affine fit, world-file reading, the SWEREF 99
/// TM Krüger series and haversine distances.
///
/// Re-exports everything from `virtual_punch_geo`.
pub mod geo {
    pub use virtual_punch_geo::*;
}

/// Course-file parsing and planning normalization.
///
/// Re-exports everything from `virtual_punch_course`.
pub mod course {
    pub use virtual_punch_course::*;
}

/// Derived products: virtual controls, crop remapping, course length.
///
/// Re-exports everything from `virtual_punch_pipeline`.
pub mod pipeline {
    pub use virtual_punch_pipeline::*;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Convenience Re-exports (Top-Level)
// ═══════════════════════════════════════════════════════════════════════════════

// Data model
pub use virtual_punch_core::{
    AffineMatrix, CalibrationOptions, Control, ControlKind, Course, CourseFormat, GpsMode, LatLng,
    MobileOptions, ParsedCourseData, Real, Sensitivity, SensitivityRadii, VirtualControl,
    VirtualControlSet,
};

// Geo
pub use virtual_punch_geo::{
    AffineFit, CalibrationError, GeoBounds, GridProjection, WorldFile, WorldFileError,
    calibration_from_world_file, derive_lat_lng_from_control, haversine_distance_m, solve_affine,
};

// Course files
pub use virtual_punch_course::{
    CourseParseError, PlanningDraft, normalize_planning, parse_course_file,
    parse_iof_course_data, parse_purple_pen,
};

// Pipeline
pub use virtual_punch_pipeline::{
    CropRect, build_virtual_controls, control_coverage_rect, estimate_course_length_meters,
    remap_controls_for_crop,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude (Quick Start)
// ═══════════════════════════════════════════════════════════════════════════════

/// Convenient re-exports for common use cases.
///
/// ```
/// use virtual_punch::prelude::*;
/// ```
pub mod prelude {
    // Import
    pub use crate::{ParsedCourseData, parse_course_file};

    // Model
    pub use crate::{
        AffineMatrix, CalibrationOptions, Control, ControlKind, Course, LatLng, Sensitivity,
        SensitivityRadii, VirtualControl, VirtualControlSet,
    };

    // Derived products
    pub use crate::{
        build_virtual_controls, derive_lat_lng_from_control, estimate_course_length_meters,
    };
}
