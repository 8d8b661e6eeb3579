//! Calibration context: pixel → geographic mapping and the image it applies to.

use crate::{Mat3, Pt2, Real, Vec3};
use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees (WGS84 / SWEREF99 datum).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: Real,
    pub lng: Real,
}

impl LatLng {
    pub fn new(lat: Real, lng: Real) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Six-parameter affine map from image pixels to geographic coordinates.
///
/// ```text
/// lng = a·px + b·py + c
/// lat = d·px + e·py + f
/// ```
///
/// Pixel `y` grows downward, so a north-up map has `e < 0`. The matrix is a
/// value: recalibrating an event replaces it wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineMatrix {
    pub a: Real,
    pub b: Real,
    pub c: Real,
    pub d: Real,
    pub e: Real,
    pub f: Real,
}

impl AffineMatrix {
    /// Forward map of an absolute pixel position.
    #[inline]
    pub fn apply(&self, px: Real, py: Real) -> LatLng {
        LatLng {
            lng: self.a * px + self.b * py + self.c,
            lat: self.d * px + self.e * py + self.f,
        }
    }

    /// Homogeneous 3×3 form mapping `(px, py, 1)` to `(lng, lat, 1)`.
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::new(self.a, self.b, self.c, self.d, self.e, self.f, 0.0, 0.0, 1.0)
    }

    /// Build from the first two rows of a homogeneous matrix.
    pub fn from_mat3(m: &Mat3) -> Self {
        Self {
            a: m[(0, 0)],
            b: m[(0, 1)],
            c: m[(0, 2)],
            d: m[(1, 0)],
            e: m[(1, 1)],
            f: m[(1, 2)],
        }
    }

    /// Inverse map: the pixel a geographic position falls on.
    ///
    /// Returns `None` if the matrix is singular or the result is not finite.
    pub fn pixel_for(&self, pos: LatLng) -> Option<Pt2> {
        let inv = self.to_mat3().try_inverse()?;
        let v = inv * Vec3::new(pos.lng, pos.lat, 1.0);
        (v.x.is_finite() && v.y.is_finite()).then(|| Pt2::new(v.x, v.y))
    }
}

/// Everything needed to turn a relative control position into lat/lng.
///
/// All fields are optional because an event may not be calibrated yet; every
/// consumer treats a missing piece as "cannot resolve".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationOptions {
    #[serde(default)]
    pub calibration: Option<AffineMatrix>,
    #[serde(default)]
    pub image_width: Option<Real>,
    #[serde(default)]
    pub image_height: Option<Real>,
}

impl CalibrationOptions {
    pub fn new(calibration: AffineMatrix, image_width: Real, image_height: Real) -> Self {
        Self {
            calibration: Some(calibration),
            image_width: Some(image_width),
            image_height: Some(image_height),
        }
    }

    /// Image size if both dimensions are finite and positive.
    pub fn image_size(&self) -> Option<(Real, Real)> {
        let w = self.image_width.filter(|w| w.is_finite() && *w > 0.0)?;
        let h = self.image_height.filter(|h| h.is_finite() && *h > 0.0)?;
        Some((w, h))
    }
}
