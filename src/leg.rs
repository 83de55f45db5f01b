//! Leg tracking for a vessel underway.
//!
//! Given the live vessel position, the routed segments, and the named
//! itinerary stops, determines the nearest point on the route, the
//! active leg, distance covered and remaining, instantaneous heading,
//! and an ETA at a given speed. Everything is recomputed from scratch
//! per call; the tracker holds no state between position updates.

use serde::{Deserialize, Serialize};

use crate::geo::{haversine_nm, initial_bearing, GeoPoint};
use crate::route::{flatten_segments, RouteSegment};

/// A named itinerary stop the route passes through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub position: GeoPoint,
}

/// Result of projecting a position onto the route polyline.
#[derive(Debug, Clone, Serialize)]
pub struct SnapResult {
    /// Nearest point on the polyline.
    pub point: GeoPoint,
    /// Index of the polyline edge the snap landed on (0-based).
    pub segment_index: usize,
    /// Fractional position along that edge, clamped to [0, 1].
    pub t: f64,
    /// Distance from the queried position to the snapped point, in
    /// nautical miles.
    pub distance_nm: f64,
}

/// Snapshot of the vessel's situation on the route.
///
/// Distances and bearing are unrounded; use [`LegContext::display`] for
/// the integer-rounded presentation values.
#[derive(Debug, Clone, Serialize)]
pub struct LegContext {
    /// Index of the departed waypoint in the caller's itinerary list.
    pub from_index: usize,
    pub from_name: String,
    /// Index of the next waypoint in the caller's itinerary list.
    pub to_index: usize,
    pub to_name: String,
    /// Nautical miles from the route start to the snapped position.
    pub nm_covered: f64,
    /// Nautical miles from the snapped position to the next waypoint.
    pub nm_remaining: f64,
    /// Hours to the next waypoint at `speed_kn`, 0 when speed is 0.
    pub eta_hours: f64,
    /// Heading along the route at the snapped position, degrees [0, 360).
    pub bearing_deg: f64,
    pub snapped: GeoPoint,
    pub speed_kn: f64,
}

/// Integer-rounded presentation values for a [`LegContext`].
#[derive(Debug, Clone, Serialize)]
pub struct LegDisplay {
    pub nm_covered: i64,
    pub nm_remaining: i64,
    pub bearing_deg: i64,
    pub eta_hours: f64,
}

impl LegContext {
    /// Round distances and bearing to the nearest integer for display.
    pub fn display(&self) -> LegDisplay {
        LegDisplay {
            nm_covered: self.nm_covered.round() as i64,
            nm_remaining: self.nm_remaining.round() as i64,
            bearing_deg: self.bearing_deg.round() as i64,
            eta_hours: self.eta_hours,
        }
    }

    /// Serialize the snapshot as a JSON string for the frontend.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("JSON serialize error: {e}"))
    }
}

/// Project a position onto the nearest edge of a polyline.
///
/// Each edge is treated as a straight line in raw lon/lat coordinates
/// (equirectangular approximation, fine at single-edge scale), but the
/// candidate points are scored by true haversine distance so the chosen
/// edge and the reported offset are in real nautical miles. Linear scan
/// over all edges; the first edge wins ties.
///
/// Returns None if the polyline has fewer than 2 points.
pub fn snap_to_polyline(position: &GeoPoint, polyline: &[GeoPoint]) -> Option<SnapResult> {
    if polyline.len() < 2 {
        return None;
    }

    let mut best: Option<SnapResult> = None;

    for (i, edge) in polyline.windows(2).enumerate() {
        let a = &edge[0];
        let b = &edge[1];

        let dx = b.lon - a.lon;
        let dy = b.lat - a.lat;
        let len_sq = dx * dx + dy * dy;

        // Degenerate edge: collapse onto its start point
        let t = if len_sq > 0.0 {
            let dot = (position.lon - a.lon) * dx + (position.lat - a.lat) * dy;
            (dot / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let candidate = GeoPoint {
            lat: a.lat + t * (b.lat - a.lat),
            lon: a.lon + t * (b.lon - a.lon),
        };
        let dist = haversine_nm(position, &candidate);

        let is_better = match &best {
            Some(prev) => dist < prev.distance_nm,
            None => true,
        };

        if is_better {
            best = Some(SnapResult {
                point: candidate,
                segment_index: i,
                t,
                distance_nm: dist,
            });
        }
    }

    best
}

/// Nautical miles along the polyline from its start to a snapped point:
/// every whole edge before the snapped edge, plus the swept fraction of
/// the snapped edge itself.
pub fn distance_along_nm(polyline: &[GeoPoint], snap: &SnapResult) -> f64 {
    let mut along = 0.0;
    for j in 0..snap.segment_index {
        along += haversine_nm(&polyline[j], &polyline[j + 1]);
    }
    along + snap.t * haversine_nm(&polyline[snap.segment_index], &polyline[snap.segment_index + 1])
}

/// Index of the polyline point nearest to `position`.
fn nearest_polyline_index(position: &GeoPoint, polyline: &[GeoPoint]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;
    for (i, p) in polyline.iter().enumerate() {
        let d = haversine_nm(position, p);
        if d < best_dist {
            best_dist = d;
            best_idx = i;
        }
    }
    best_idx
}

/// Track the vessel against the routed itinerary.
///
/// Returns None when there is no position fix, when the segments flatten
/// to fewer than 2 polyline points, or when no waypoints are supplied.
///
/// Waypoints are re-sorted by their nearest polyline point before the
/// active leg is identified, so an itinerary list whose order only
/// approximately matches the routed order still resolves correctly. A
/// polyline that passes close to itself can still map two waypoints to
/// neighbouring indices and misattribute the leg; known limitation.
///
/// Once the vessel is past the last waypoint's projected index, the last
/// two waypoints stay reported as the active leg and the remaining
/// distance is 0; there is no separate "arrived" state.
pub fn track(
    position: Option<GeoPoint>,
    segments: &[RouteSegment],
    waypoints: &[Waypoint],
    speed_kn: f64,
) -> Option<LegContext> {
    let position = position?;
    if waypoints.is_empty() {
        return None;
    }

    let polyline = flatten_segments(segments);
    let snap = snap_to_polyline(&position, &polyline)?;
    let nm_covered = distance_along_nm(&polyline, &snap);

    // Reconstruct travel order: each waypoint keyed by its nearest
    // polyline point, sorted ascending (stable, so itinerary order
    // breaks exact ties)
    let mut order: Vec<(usize, usize)> = waypoints
        .iter()
        .enumerate()
        .map(|(w, wp)| (w, nearest_polyline_index(&wp.position, &polyline)))
        .collect();
    order.sort_by_key(|&(_, idx)| idx);

    // First waypoint strictly ahead of the snapped edge becomes `to`;
    // its predecessor in travel order becomes `from`. Past the last
    // waypoint, fall back to the final two.
    let (from_pos, to_pos) = match order.iter().position(|&(_, idx)| idx > snap.segment_index) {
        Some(p) => (p.saturating_sub(1), p),
        None => {
            let last = order.len() - 1;
            (last.saturating_sub(1), last)
        }
    };
    let (from_index, _) = order[from_pos];
    let (to_index, to_polyline_idx) = order[to_pos];

    let seg = snap.segment_index;
    let nm_remaining = if to_polyline_idx > seg {
        let mut rem = (1.0 - snap.t) * haversine_nm(&polyline[seg], &polyline[seg + 1]);
        for j in (seg + 1)..to_polyline_idx {
            rem += haversine_nm(&polyline[j], &polyline[j + 1]);
        }
        rem
    } else {
        // Vessel already at or past the nominal target
        0.0
    };

    // Heading toward the next polyline point beyond the snapped edge;
    // on the final edge there is no further point, so use its endpoint
    let target = if seg + 2 < polyline.len() {
        &polyline[seg + 2]
    } else {
        &polyline[seg + 1]
    };
    let bearing_deg = initial_bearing(&snap.point, target);

    let eta_hours = if speed_kn > 0.0 {
        nm_remaining / speed_kn
    } else {
        0.0
    };

    Some(LegContext {
        from_index,
        from_name: waypoints[from_index].name.clone(),
        to_index,
        to_name: waypoints[to_index].name.clone(),
        nm_covered,
        nm_remaining,
        eta_hours,
        bearing_deg,
        snapped: snap.point,
        speed_kn,
    })
}
