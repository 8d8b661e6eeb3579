//! Geofenced controls for one course.

use log::debug;
use std::collections::HashMap;
use virtual_punch_core::{
    CalibrationOptions, Control, Course, Real, SensitivityRadii, VirtualControl, VirtualControlSet,
};
use virtual_punch_geo::derive_lat_lng_from_control;

/// Geofence radius for a control on a course.
///
/// Precedence: the control's own positive `gps_radius`, then the course's
/// custom radius (custom sensitivity only), then the sensitivity table.
pub fn control_radius(control: &Control, course: &Course, radii: &SensitivityRadii) -> Real {
    control
        .positive_gps_radius()
        .or_else(|| course.effective_custom_radius())
        .unwrap_or_else(|| radii.radius_for(course.gps_mode.sensitivity))
}

/// Controls keyed by id. The first control with a given id wins, matching
/// [`virtual_punch_core::ParsedCourseData::control`].
pub(crate) fn controls_by_id(controls: &[Control]) -> HashMap<&str, &Control> {
    let mut by_id = HashMap::with_capacity(controls.len());
    for control in controls {
        by_id.entry(control.id.as_str()).or_insert(control);
    }
    by_id
}

/// Resolve every control of `course` into a [`VirtualControl`].
///
/// References to ids not present in `all_controls` are skipped without a
/// trace. Controls that exist but have no resolvable position are excluded
/// and their codes listed in `missing_control_codes`, in course order. The
/// course's `gps_mode.enabled` flag is not consulted; callers decide whether
/// to use the result.
pub fn build_virtual_controls(
    course: &Course,
    all_controls: &[Control],
    calibration: &CalibrationOptions,
    radii: &SensitivityRadii,
) -> VirtualControlSet {
    let by_id = controls_by_id(all_controls);

    let mut out = VirtualControlSet::default();
    for control in course
        .control_ids
        .iter()
        .filter_map(|id| by_id.get(id.as_str()).copied())
    {
        let Some(pos) = derive_lat_lng_from_control(control, calibration) else {
            out.missing_control_codes.push(control.code.clone());
            continue;
        };
        out.controls.push(VirtualControl {
            id: control.id.clone(),
            code: control.code.clone(),
            kind: control.kind,
            order: out.controls.len(),
            lat: pos.lat,
            lng: pos.lng,
            radius: control_radius(control, course, radii),
            description: control.description.clone(),
        });
    }

    debug!(
        "course {}: {} virtual controls, {} unresolved",
        course.id,
        out.controls.len(),
        out.missing_control_codes.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtual_punch_core::test_utils::{
        course_through, diagonal_controls, reference_calibration, unresolved_control,
    };
    use virtual_punch_core::{ControlKind, Sensitivity};

    #[test]
    fn resolves_in_course_order() {
        let controls = diagonal_controls();
        let course = course_through("1", &["S1", "32", "31", "F1"]);
        let set = build_virtual_controls(
            &course,
            &controls,
            &reference_calibration(),
            &SensitivityRadii::default(),
        );

        assert!(set.is_complete());
        let codes: Vec<&str> = set.controls.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["S1", "32", "31", "F1"]);
        let orders: Vec<usize> = set.controls.iter().map(|c| c.order).collect();
        assert_eq!(orders, [0, 1, 2, 3]);
        assert_eq!(set.controls[0].kind, ControlKind::Start);

        // 32 sits at (0.5, 0.5) of a 1000×800 image.
        let c32 = &set.controls[1];
        assert!((c32.lng - 18.005).abs() < 1e-9);
        assert!((c32.lat - 59.496).abs() < 1e-9);
        assert_eq!(c32.radius, 20.0);
    }

    #[test]
    fn unresolved_and_dangling_references() {
        let mut controls = diagonal_controls();
        let mut lost = unresolved_control("34");
        lost.code = "134".into();
        controls.push(lost);
        let course = course_through("1", &["S1", "34", "99", "F1"]);

        let set = build_virtual_controls(
            &course,
            &controls,
            &reference_calibration(),
            &SensitivityRadii::default(),
        );
        assert_eq!(set.controls.len(), 2);
        assert_eq!(set.missing_control_codes, ["134"]);
        assert_eq!(set.controls[1].order, 1);
    }

    #[test]
    fn duplicate_ids_resolve_to_the_first_control() {
        let mut controls = diagonal_controls();
        let mut shadow = unresolved_control("31").with_lat_lng(10.0, 10.0);
        shadow.code = "shadow".into();
        controls.push(shadow);
        let course = course_through("1", &["31"]);

        let set = build_virtual_controls(
            &course,
            &controls,
            &reference_calibration(),
            &SensitivityRadii::default(),
        );
        assert_eq!(set.controls.len(), 1);
        assert_eq!(set.controls[0].code, "31");
        assert!((set.controls[0].lat - 10.0).abs() > 1.0);
    }

    #[test]
    fn without_calibration_only_absolute_controls_resolve() {
        let mut controls = diagonal_controls();
        controls[1] = controls[1].clone().with_lat_lng(59.4, 18.1);
        let course = course_through("1", &["S1", "31", "F1"]);

        let set = build_virtual_controls(
            &course,
            &controls,
            &CalibrationOptions::default(),
            &SensitivityRadii::default(),
        );
        assert_eq!(set.controls.len(), 1);
        assert_eq!(set.controls[0].id, "31");
        assert_eq!(set.controls[0].order, 0);
        assert_eq!(set.missing_control_codes, ["S1", "F1"]);
    }

    #[test]
    fn radius_precedence() {
        let radii = SensitivityRadii::default();
        let mut course = course_through("1", &[]);
        let mut control = unresolved_control("31");

        course.gps_mode.sensitivity = Sensitivity::Relaxed;
        assert_eq!(control_radius(&control, &course, &radii), 35.0);

        // A custom radius only counts under the custom policy.
        course.gps_mode.custom_radius = Some(42.0);
        assert_eq!(control_radius(&control, &course, &radii), 35.0);
        course.gps_mode.sensitivity = Sensitivity::Custom;
        assert_eq!(control_radius(&control, &course, &radii), 42.0);

        control.gps_radius = Some(7.0);
        assert_eq!(control_radius(&control, &course, &radii), 7.0);

        // Custom without a usable radius falls back to the table.
        control.gps_radius = Some(0.0);
        course.gps_mode.custom_radius = Some(-1.0);
        assert_eq!(control_radius(&control, &course, &radii), radii.standard);
    }

    #[test]
    fn disabled_gps_mode_still_builds() {
        let controls = diagonal_controls();
        let mut course = course_through("1", &["S1", "F1"]);
        course.gps_mode.enabled = false;
        let set = build_virtual_controls(
            &course,
            &controls,
            &reference_calibration(),
            &SensitivityRadii::default(),
        );
        assert_eq!(set.controls.len(), 2);
    }
}
