//! Relative-coordinate remapping for cropped map images.
//!
//! A crop is expressed in the relative coordinates of the uncropped image.
//! After cropping, a control at `rel_x` sits at
//! `(rel_x − left) / (right − left)` of the new image (same for `y`).

use serde::{Deserialize, Serialize};
use virtual_punch_core::{Control, Real, clamp_unit};

/// Crop window in relative coordinates of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: Real,
    pub top: Real,
    pub right: Real,
    pub bottom: Real,
}

impl Default for CropRect {
    /// The whole image.
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: 1.0,
            bottom: 1.0,
        }
    }
}

impl CropRect {
    pub fn width(&self) -> Real {
        self.right - self.left
    }

    pub fn height(&self) -> Real {
        self.bottom - self.top
    }

    /// Relative position inside the crop of a source position.
    ///
    /// `None` if either result is non-finite (e.g. a zero-width crop).
    pub fn remap(&self, rel_x: Real, rel_y: Real) -> Option<(Real, Real)> {
        let x = (rel_x - self.left) / self.width();
        let y = (rel_y - self.top) / self.height();
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }
}

/// Re-express every control's relative position in the crop's coordinates.
///
/// Controls without a relative position pass through unchanged; a remap that
/// does not produce finite values drops the relative position. Absolute
/// `lat`/`lng` are never touched.
pub fn remap_controls_for_crop(controls: &[Control], crop: &CropRect) -> Vec<Control> {
    controls
        .iter()
        .map(|control| {
            let mut out = control.clone();
            if let Some((x, y)) = control.relative() {
                let remapped = crop.remap(x, y);
                out.rel_x = remapped.map(|r| r.0);
                out.rel_y = remapped.map(|r| r.1);
            }
            out
        })
        .collect()
}

/// Smallest rectangle covering every control with a relative position,
/// grown by `margin` on each side and clamped to the unit square.
///
/// Returns `None` if no control has a relative position.
pub fn control_coverage_rect(controls: &[Control], margin: Real) -> Option<CropRect> {
    let margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };
    let mut points = controls
        .iter()
        .filter_map(Control::relative)
        .filter(|(x, y)| x.is_finite() && y.is_finite());

    let (x0, y0) = points.next()?;
    let init = CropRect {
        left: x0,
        top: y0,
        right: x0,
        bottom: y0,
    };
    let rect = points.fold(init, |r, (x, y)| CropRect {
        left: r.left.min(x),
        top: r.top.min(y),
        right: r.right.max(x),
        bottom: r.bottom.max(y),
    });

    Some(CropRect {
        left: clamp_unit(rect.left - margin),
        top: clamp_unit(rect.top - margin),
        right: clamp_unit(rect.right + margin),
        bottom: clamp_unit(rect.bottom + margin),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtual_punch_core::ControlKind;
    use virtual_punch_core::test_utils::{relative_control, unresolved_control};

    fn approx(a: Real, b: Real) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn coverage_rect_with_margin() {
        let controls = vec![
            relative_control("31", ControlKind::Control, 0.2, 0.3),
            relative_control("32", ControlKind::Control, 0.8, 0.7),
            unresolved_control("33"),
        ];
        let rect = control_coverage_rect(&controls, 0.1).unwrap();
        assert!(approx(rect.left, 0.1));
        assert!(approx(rect.top, 0.2));
        assert!(approx(rect.right, 0.9));
        assert!(approx(rect.bottom, 0.8));
    }

    #[test]
    fn coverage_rect_clamps_and_needs_a_control() {
        let controls = vec![relative_control("31", ControlKind::Control, 0.05, 0.95)];
        let rect = control_coverage_rect(&controls, 0.1).unwrap();
        assert_eq!(rect.left, 0.0);
        assert_eq!(rect.bottom, 1.0);
        assert!(approx(rect.right, 0.15));

        assert_eq!(control_coverage_rect(&[unresolved_control("1")], 0.1), None);
        assert_eq!(control_coverage_rect(&[], 0.0), None);
    }

    #[test]
    fn identity_crop_keeps_positions() {
        let controls = vec![relative_control("31", ControlKind::Control, 0.25, 0.75)];
        let out = remap_controls_for_crop(&controls, &CropRect::default());
        assert_eq!(out, controls);
    }

    #[test]
    fn remap_into_sub_window() {
        let controls = vec![
            relative_control("31", ControlKind::Control, 0.5, 0.5),
            unresolved_control("32").with_lat_lng(59.0, 18.0),
        ];
        let crop = CropRect {
            left: 0.25,
            top: 0.5,
            right: 0.75,
            bottom: 1.0,
        };
        let out = remap_controls_for_crop(&controls, &crop);
        assert_eq!(out[0].relative(), Some((0.5, 0.0)));
        assert_eq!(out[1], controls[1]);
    }

    #[test]
    fn crop_corners_map_to_unit_corners() {
        let crop = CropRect {
            left: 0.2,
            top: 0.3,
            right: 0.7,
            bottom: 0.9,
        };
        let controls = vec![
            relative_control("S1", ControlKind::Start, crop.left, crop.top),
            relative_control("F1", ControlKind::Finish, crop.right, crop.bottom),
            relative_control("31", ControlKind::Control, 0.45, 0.6),
        ];
        let out = remap_controls_for_crop(&controls, &crop);
        let rel: Vec<(Real, Real)> = out.iter().filter_map(Control::relative).collect();
        assert_eq!(rel.len(), 3);

        let expected = [(0.0, 0.0), (1.0, 1.0), (0.5, 0.5)];
        for ((x, y), (ex, ey)) in rel.iter().zip(expected) {
            assert!(approx(*x, ex) && approx(*y, ey), "({x}, {y}) vs ({ex}, {ey})");
        }
    }

    #[test]
    fn degenerate_crop_drops_relative_position() {
        let controls = vec![relative_control("31", ControlKind::Control, 0.5, 0.5)];
        let crop = CropRect {
            left: 0.5,
            top: 0.0,
            right: 0.5,
            bottom: 1.0,
        };
        let out = remap_controls_for_crop(&controls, &crop);
        assert_eq!(out[0].rel_x, None);
        assert_eq!(out[0].rel_y, None);
        assert_eq!(out[0].id, "31");
    }
}
