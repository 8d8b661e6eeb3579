//! Derived course products for GPS tracking.
//!
//! Every function here takes its full context as arguments (controls,
//! calibration, sensitivity table) and reads no global state, so calls are
//! independent and safe to run in parallel.
//!
//! - [`virtual_controls`]: turn a course into geofenced [`VirtualControl`]s.
//! - [`crop`]: remap relative control positions after cropping the map image.
//! - [`geometry`]: straight-line course length from resolved positions.
//!
//! ```
//! use virtual_punch_core::SensitivityRadii;
//! use virtual_punch_core::test_utils::{course_through, diagonal_controls, reference_calibration};
//! use virtual_punch_pipeline::{build_virtual_controls, estimate_course_length_meters};
//!
//! let controls = diagonal_controls();
//! let course = course_through("1", &["S1", "31", "F1"]);
//! let calibration = reference_calibration();
//!
//! let radii = SensitivityRadii::default();
//! let set = build_virtual_controls(&course, &controls, &calibration, &radii);
//! assert_eq!(set.controls.len(), 3);
//! assert!(estimate_course_length_meters(&course, &controls, &calibration).is_some());
//! ```
//!
//! [`VirtualControl`]: virtual_punch_core::VirtualControl

pub mod crop;
pub mod geometry;
pub mod virtual_controls;

pub use crop::{CropRect, control_coverage_rect, remap_controls_for_crop};
pub use geometry::{
    estimate_course_length_meters, path_length_meters, virtual_controls_length_meters,
};
pub use virtual_controls::{build_virtual_controls, control_radius};
