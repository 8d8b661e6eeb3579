//! Utilities and common fixtures for testing course processing.
//!
//! This module is public to allow use across workspace test suites,
//! but is not intended for production use. It provides a reference
//! calibration and small hand-built courses.

use crate::{AffineMatrix, CalibrationOptions, Control, ControlKind, Course, Real};

/// Width of the reference map image in pixels.
pub const REFERENCE_WIDTH: Real = 1000.0;
/// Height of the reference map image in pixels.
pub const REFERENCE_HEIGHT: Real = 800.0;

/// North-up calibration of a 1000×800 image near Stockholm.
///
/// One pixel is 1e-5 degrees in both axes; the top-left pixel sits at
/// lng 18.0, lat 59.5.
pub fn reference_matrix() -> AffineMatrix {
    AffineMatrix {
        a: 0.00001,
        b: 0.0,
        c: 18.0,
        d: 0.0,
        e: -0.00001,
        f: 59.5,
    }
}

/// [`reference_matrix`] together with the reference image size.
pub fn reference_calibration() -> CalibrationOptions {
    CalibrationOptions::new(reference_matrix(), REFERENCE_WIDTH, REFERENCE_HEIGHT)
}

/// A control placed at a relative image position.
pub fn relative_control(id: &str, kind: ControlKind, rel_x: Real, rel_y: Real) -> Control {
    Control::new(id, id, kind).with_relative(rel_x, rel_y)
}

/// A control with no coordinates at all.
pub fn unresolved_control(id: &str) -> Control {
    Control::new(id, id, ControlKind::Control)
}

/// Start, three controls on a diagonal and a finish, all relative.
pub fn diagonal_controls() -> Vec<Control> {
    vec![
        relative_control("S1", ControlKind::Start, 0.1, 0.1),
        relative_control("31", ControlKind::Control, 0.3, 0.3),
        relative_control("32", ControlKind::Control, 0.5, 0.5),
        relative_control("33", ControlKind::Control, 0.7, 0.7),
        relative_control("F1", ControlKind::Finish, 0.9, 0.9),
    ]
}

/// A course visiting the given control ids in order.
pub fn course_through(id: &str, control_ids: &[&str]) -> Course {
    Course::new(
        id,
        format!("Course {id}"),
        control_ids.iter().map(|s| s.to_string()).collect(),
    )
}
