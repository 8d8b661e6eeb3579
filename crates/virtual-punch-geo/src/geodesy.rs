//! Great-circle distances on a spherical Earth.

use virtual_punch_core::{LatLng, Real};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: Real = 6_371_000.0;

/// Haversine distance between two positions, in meters.
pub fn haversine_distance_m(a: LatLng, b: LatLng) -> Real {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}
