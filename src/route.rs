//! Route segments and polyline flattening.
//!
//! The routing service answers each leg request with a segment of
//! `[lon, lat]` coordinate pairs (GeoJSON axis order), one segment per
//! pair of consecutive itinerary stops. Concatenated in itinerary order
//! they form the full route polyline the tracker works on.

use serde::{Deserialize, Serialize};

use crate::geo::{haversine_nm, GeoPoint};

/// One routed leg as returned by the routing service.
///
/// `coords` is an ordered sequence of `[lon, lat]` pairs. A segment may
/// bend around obstacles, so it usually carries more points than just
/// its two endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSegment {
    pub coords: Vec<[f64; 2]>,
}

/// Flatten routed segments into a single continuous polyline.
///
/// Segments are concatenated in the order given. Every segment after the
/// first starts on the previous segment's last coordinate, so its first
/// coordinate is dropped to avoid a zero-length edge at the junction.
/// Segments with fewer than 2 coordinates carry no edge and are skipped.
pub fn flatten_segments(segments: &[RouteSegment]) -> Vec<GeoPoint> {
    let mut polyline: Vec<GeoPoint> = Vec::new();

    for (i, segment) in segments.iter().enumerate() {
        if segment.coords.len() < 2 {
            log::warn!(
                "Skipping route segment {i} with {} coordinate(s)",
                segment.coords.len()
            );
            continue;
        }

        let skip = if polyline.is_empty() { 0 } else { 1 };
        polyline.extend(
            segment.coords[skip..]
                .iter()
                .map(|&[lon, lat]| GeoPoint { lat, lon }),
        );
    }

    polyline
}

/// Total haversine length of a polyline in nautical miles.
pub fn polyline_length_nm(polyline: &[GeoPoint]) -> f64 {
    polyline
        .windows(2)
        .map(|w| haversine_nm(&w[0], &w[1]))
        .sum()
}
