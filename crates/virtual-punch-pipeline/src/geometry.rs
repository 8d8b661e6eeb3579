//! Course length from resolved control positions.

use virtual_punch_core::{CalibrationOptions, Control, Course, LatLng, Real, VirtualControl};
use virtual_punch_geo::{derive_lat_lng_from_control, haversine_distance_m};

use crate::virtual_controls::controls_by_id;

/// Sum of great-circle leg lengths along `points`, in meters.
///
/// `None` with fewer than two points.
pub fn path_length_meters(points: &[LatLng]) -> Option<Real> {
    if points.len() < 2 {
        return None;
    }
    Some(
        points
            .windows(2)
            .map(|w| haversine_distance_m(w[0], w[1]))
            .sum(),
    )
}

/// Straight-line course length in whole meters.
///
/// Controls are visited in course order; dangling references and controls
/// without a resolvable position are skipped, so the leg bridges the gap.
/// `None` if fewer than two controls resolve.
pub fn estimate_course_length_meters(
    course: &Course,
    all_controls: &[Control],
    calibration: &CalibrationOptions,
) -> Option<u64> {
    let by_id = controls_by_id(all_controls);
    let points: Vec<LatLng> = course
        .control_ids
        .iter()
        .filter_map(|id| by_id.get(id.as_str()))
        .filter_map(|c| derive_lat_lng_from_control(c, calibration))
        .collect();
    path_length_meters(&points).map(round_meters)
}

/// Straight-line length of already built virtual controls, in whole meters.
pub fn virtual_controls_length_meters(controls: &[VirtualControl]) -> Option<u64> {
    let points: Vec<LatLng> = controls.iter().map(|c| LatLng::new(c.lat, c.lng)).collect();
    path_length_meters(&points).map(round_meters)
}

fn round_meters(m: Real) -> u64 {
    m.round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtual_punch_core::test_utils::{
        course_through, diagonal_controls, reference_calibration, unresolved_control,
    };

    #[test]
    fn fewer_than_two_resolved_is_none() {
        let mut controls = diagonal_controls();
        controls.push(unresolved_control("40"));
        let calib = reference_calibration();

        assert_eq!(
            estimate_course_length_meters(&course_through("1", &[]), &controls, &calib),
            None
        );
        let gappy = course_through("1", &["S1", "40", "99"]);
        assert_eq!(estimate_course_length_meters(&gappy, &controls, &calib), None);
        assert_eq!(path_length_meters(&[LatLng::new(59.0, 18.0)]), None);
    }

    #[test]
    fn gaps_are_bridged() -> anyhow::Result<()> {
        let mut controls = diagonal_controls();
        controls.push(unresolved_control("40"));
        let calib = reference_calibration();

        let direct = course_through("1", &["S1", "F1"]);
        let with_gap = course_through("1", &["S1", "40", "F1"]);
        let direct = estimate_course_length_meters(&direct, &controls, &calib)
            .ok_or_else(|| anyhow::anyhow!("no length"))?;
        let with_gap = estimate_course_length_meters(&with_gap, &controls, &calib)
            .ok_or_else(|| anyhow::anyhow!("no length"))?;
        assert_eq!(direct, with_gap);
        Ok(())
    }

    #[test]
    fn duplicate_ids_measure_the_first_control() {
        let mut controls = diagonal_controls();
        controls.push(unresolved_control("F1").with_lat_lng(10.0, 10.0));
        let calib = reference_calibration();
        let course = course_through("1", &["S1", "F1"]);

        let length = estimate_course_length_meters(&course, &controls, &calib);
        let first_only = estimate_course_length_meters(&course, &diagonal_controls(), &calib);
        assert!(length.is_some());
        assert_eq!(length, first_only);
    }

    #[test]
    fn length_grows_as_controls_are_appended() {
        let controls = diagonal_controls();
        let calib = reference_calibration();
        let order = ["S1", "33", "31", "32", "F1", "S1"];

        let mut previous = 0;
        for n in 2..=order.len() {
            let course = course_through("1", &order[..n]);
            let length = estimate_course_length_meters(&course, &controls, &calib).unwrap_or(0);
            assert!(length >= previous, "{n}: {length} < {previous}");
            previous = length;
        }
        assert!(previous > 0);
    }

    #[test]
    fn leg_length_matches_haversine() {
        let a = LatLng::new(59.5, 18.0);
        let b = LatLng::new(59.5, 18.01);
        let len = path_length_meters(&[a, b]).unwrap_or_default();
        assert!((len - haversine_distance_m(a, b)).abs() < 1e-9);
        // About 564 m per 0.01° of longitude at this latitude.
        assert!((len - 564.0).abs() < 2.0, "len {len}");
    }

    #[test]
    fn virtual_controls_length() {
        let vc = |lat, lng| VirtualControl {
            id: "x".into(),
            code: "x".into(),
            kind: Default::default(),
            order: 0,
            lat,
            lng,
            radius: 20.0,
            description: None,
        };
        let controls = [vc(59.0, 18.0), vc(60.0, 18.0)];
        assert_eq!(virtual_controls_length_meters(&controls), Some(111_195));
        assert_eq!(virtual_controls_length_meters(&controls[..1]), None);
    }
}
