//! Transverse Mercator grid ↔ geodetic conversion (Gauss–Krüger).
//!
//! Implements the four-term Krüger series in the formulation published by
//! Lantmäteriet for SWEREF 99. The same code serves any Transverse Mercator
//! zone; [`GridProjection::sweref99_tm`] is the default used for Swedish
//! orienteering maps.
//!
//! Notation: `x` is northing, `y` is easting (geodetic convention). Both
//! directions are plain arithmetic with no validity checks; feeding
//! coordinates far outside the zone produces meaningless but finite output.

use serde::{Deserialize, Serialize};
use virtual_punch_core::{LatLng, Real};

/// Reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major axis `a` in meters.
    pub semi_major_axis: Real,
    /// Flattening `f`.
    pub flattening: Real,
}

impl Ellipsoid {
    /// GRS 80, the ellipsoid of SWEREF 99 and ETRS89.
    pub const GRS80: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_378_137.0,
        flattening: 1.0 / 298.257_222_101,
    };
}

/// A projected position in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub northing: Real,
    pub easting: Real,
}

/// Parameters of one Transverse Mercator zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridProjection {
    pub ellipsoid: Ellipsoid,
    /// Central meridian in degrees.
    pub central_meridian: Real,
    pub scale_factor: Real,
    pub false_northing: Real,
    pub false_easting: Real,
}

impl Default for GridProjection {
    fn default() -> Self {
        Self::sweref99_tm()
    }
}

impl GridProjection {
    /// SWEREF 99 TM (EPSG:3006).
    pub fn sweref99_tm() -> Self {
        Self {
            ellipsoid: Ellipsoid::GRS80,
            central_meridian: 15.0,
            scale_factor: 0.9996,
            false_northing: 0.0,
            false_easting: 500_000.0,
        }
    }

    /// Series constants shared by both directions.
    fn constants(&self) -> SeriesConstants {
        let f = self.ellipsoid.flattening;
        let e2 = f * (2.0 - f);
        let n = f / (2.0 - f);
        let a_roof =
            self.ellipsoid.semi_major_axis / (1.0 + n) * (1.0 + n.powi(2) / 4.0 + n.powi(4) / 64.0);
        SeriesConstants { e2, n, a_roof }
    }

    /// Convert a grid position to latitude/longitude (inverse Krüger series).
    pub fn grid_to_geodetic(&self, northing: Real, easting: Real) -> LatLng {
        let SeriesConstants { e2, n, a_roof } = self.constants();

        let delta1 = n / 2.0 - 2.0 * n.powi(2) / 3.0 + 37.0 * n.powi(3) / 96.0 - n.powi(4) / 360.0;
        let delta2 = n.powi(2) / 48.0 + n.powi(3) / 15.0 - 437.0 * n.powi(4) / 1440.0;
        let delta3 = 17.0 * n.powi(3) / 480.0 - 37.0 * n.powi(4) / 840.0;
        let delta4 = 4397.0 * n.powi(4) / 161_280.0;

        let a_star = e2 + e2.powi(2) + e2.powi(3) + e2.powi(4);
        let b_star = -(7.0 * e2.powi(2) + 17.0 * e2.powi(3) + 30.0 * e2.powi(4)) / 6.0;
        let c_star = (224.0 * e2.powi(3) + 889.0 * e2.powi(4)) / 120.0;
        let d_star = -(4279.0 * e2.powi(4)) / 1260.0;

        let k0_a = self.scale_factor * a_roof;
        let xi = (northing - self.false_northing) / k0_a;
        let eta = (easting - self.false_easting) / k0_a;

        let deltas = [delta1, delta2, delta3, delta4];
        let mut xi_prim = xi;
        let mut eta_prim = eta;
        for (j, delta) in deltas.iter().enumerate() {
            let k = 2.0 * (j + 1) as Real;
            xi_prim -= delta * (k * xi).sin() * (k * eta).cosh();
            eta_prim -= delta * (k * xi).cos() * (k * eta).sinh();
        }

        let phi_star = (xi_prim.sin() / eta_prim.cosh()).asin();
        let delta_lambda = (eta_prim.sinh() / xi_prim.cos()).atan();

        let s2 = phi_star.sin().powi(2);
        let lat = phi_star
            + phi_star.sin()
                * phi_star.cos()
                * (a_star + b_star * s2 + c_star * s2.powi(2) + d_star * s2.powi(3));
        let lng = self.central_meridian.to_radians() + delta_lambda;

        LatLng {
            lat: lat.to_degrees(),
            lng: lng.to_degrees(),
        }
    }

    /// Convert latitude/longitude to a grid position (forward Krüger series).
    pub fn geodetic_to_grid(&self, pos: LatLng) -> GridPoint {
        let SeriesConstants { e2, n, a_roof } = self.constants();

        let a = e2;
        let b = (5.0 * e2.powi(2) - e2.powi(3)) / 6.0;
        let c = (104.0 * e2.powi(3) - 45.0 * e2.powi(4)) / 120.0;
        let d = 1237.0 * e2.powi(4) / 1260.0;

        let beta1 =
            n / 2.0 - 2.0 * n.powi(2) / 3.0 + 5.0 * n.powi(3) / 16.0 + 41.0 * n.powi(4) / 180.0;
        let beta2 = 13.0 * n.powi(2) / 48.0 - 3.0 * n.powi(3) / 5.0 + 557.0 * n.powi(4) / 1440.0;
        let beta3 = 61.0 * n.powi(3) / 240.0 - 103.0 * n.powi(4) / 140.0;
        let beta4 = 49_561.0 * n.powi(4) / 161_280.0;

        let phi = pos.lat.to_radians();
        let delta_lambda = (pos.lng - self.central_meridian).to_radians();

        let s2 = phi.sin().powi(2);
        let phi_star = phi - phi.sin() * phi.cos() * (a + b * s2 + c * s2.powi(2) + d * s2.powi(3));
        let xi_prim = (phi_star.tan() / delta_lambda.cos()).atan();
        let eta_prim = (phi_star.cos() * delta_lambda.sin()).atanh();

        let betas = [beta1, beta2, beta3, beta4];
        let mut xi = xi_prim;
        let mut eta = eta_prim;
        for (j, beta) in betas.iter().enumerate() {
            let k = 2.0 * (j + 1) as Real;
            xi += beta * (k * xi_prim).sin() * (k * eta_prim).cosh();
            eta += beta * (k * xi_prim).cos() * (k * eta_prim).sinh();
        }

        let k0_a = self.scale_factor * a_roof;
        GridPoint {
            northing: k0_a * xi + self.false_northing,
            easting: k0_a * eta + self.false_easting,
        }
    }
}

struct SeriesConstants {
    e2: Real,
    n: Real,
    a_roof: Real,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_meridian_maps_to_false_easting() {
        let proj = GridProjection::sweref99_tm();
        let pos = proj.grid_to_geodetic(6_600_000.0, 500_000.0);
        assert!((pos.lng - 15.0).abs() < 1e-12, "lng {}", pos.lng);
        assert!(pos.lat > 59.0 && pos.lat < 60.0, "lat {}", pos.lat);
    }

    #[test]
    fn equator_on_central_meridian_is_origin() {
        let proj = GridProjection::sweref99_tm();
        let pos = proj.grid_to_geodetic(0.0, 500_000.0);
        assert!(pos.lat.abs() < 1e-12);
        assert!((pos.lng - 15.0).abs() < 1e-12);
    }

    #[test]
    fn stockholm_grid_position() {
        // Central Stockholm is roughly N 6 580 800, E 674 000 in SWEREF 99 TM.
        let proj = GridProjection::sweref99_tm();
        let grid = proj.geodetic_to_grid(LatLng::new(59.3293, 18.0686));
        assert!((grid.northing - 6_580_800.0).abs() < 1000.0, "N {}", grid.northing);
        assert!((grid.easting - 674_000.0).abs() < 1000.0, "E {}", grid.easting);
    }

    #[test]
    fn inverse_undoes_forward_inside_zone() {
        let proj = GridProjection::sweref99_tm();
        for &(lat, lng) in &[(55.6, 13.0), (59.33, 18.07), (67.85, 20.22)] {
            let grid = proj.geodetic_to_grid(LatLng::new(lat, lng));
            let back = proj.grid_to_geodetic(grid.northing, grid.easting);
            assert!((back.lat - lat).abs() < 1e-8, "lat {lat}: {}", back.lat);
            assert!((back.lng - lng).abs() < 1e-8, "lng {lng}: {}", back.lng);
        }
    }

    #[test]
    fn projection_config_defaults_to_sweref() {
        let proj: GridProjection = serde_json::from_str(r#"{"central_meridian": 18.0}"#).unwrap();
        assert_eq!(proj.central_meridian, 18.0);
        assert_eq!(proj.false_easting, 500_000.0);
        assert_eq!(proj.ellipsoid, Ellipsoid::GRS80);
    }
}
