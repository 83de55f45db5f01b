//! Geodetic primitives.
//!
//! Platform-agnostic lat/lon math on a spherical Earth. All coordinates
//! use WGS84 (degrees); distances are in nautical miles throughout,
//! matching the rest of the planner.

use serde::{Deserialize, Serialize};

/// A geographic coordinate, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }
}

/// Earth radius in nautical miles (spherical mean).
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Haversine great-circle distance between two points, in nautical miles.
pub fn haversine_nm(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_NM * h.sqrt().asin()
}

/// Initial great-circle bearing from point A to point B in degrees [0, 360).
pub fn initial_bearing(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    let bearing = y.atan2(x).to_degrees();
    (bearing + 360.0) % 360.0
}

/// Destination point after travelling `dist_nm` nautical miles from
/// `origin` on the given initial bearing. Spherical Earth; the result
/// longitude is normalized to [-180, 180].
pub fn move_position(origin: &GeoPoint, bearing_deg: f64, dist_nm: f64) -> GeoPoint {
    let d = dist_nm / EARTH_RADIUS_NM;
    let b = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * b.cos()).asin();
    let lon2 = lon1
        + (b.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());

    GeoPoint {
        lat: lat2.to_degrees(),
        lon: (lon2.to_degrees() + 540.0) % 360.0 - 180.0,
    }
}
