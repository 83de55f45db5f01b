//! Screen-space label deconfliction.
//!
//! Waypoint labels cluster when the map is zoomed out. This module
//! computes small pixel offsets that push overlapping labels apart so
//! they stay readable. The caller supplies the map projection and owns
//! the recompute policy (debounce pan/zoom; ~120 ms works well).

use crate::geo::GeoPoint;

/// A position in map-viewport pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Labels closer than this on screen are considered overlapping.
const OVERLAP_THRESHOLD_PX: f64 = 52.0;

/// Pairs closer than this are left alone; the repulsion direction is
/// numerically meaningless for near-coincident points.
const STABILITY_FLOOR_PX: f64 = 0.5;

/// Extra separation added on top of resolving the overlap.
const MARGIN_PX: f64 = 3.0;

/// Compute one `[dx, dy]` pixel offset per input point.
///
/// Single O(N²) pass over unordered pairs: each overlapping pair pushes
/// both points apart along their connecting line by half the penetration
/// depth plus a margin. Pushes accumulate, so a label crowded from
/// several sides receives the sum of all repulsions. There is no
/// relaxation loop; marker counts are tens, not thousands.
pub fn compute_offsets<F>(points: &[GeoPoint], project: F) -> Vec<[f64; 2]>
where
    F: Fn(&GeoPoint) -> ScreenPoint,
{
    let screen: Vec<ScreenPoint> = points.iter().map(&project).collect();
    let mut offsets = vec![[0.0, 0.0]; points.len()];

    for i in 0..screen.len() {
        for j in (i + 1)..screen.len() {
            let dx = screen[j].x - screen[i].x;
            let dy = screen[j].y - screen[i].y;
            let dist = (dx * dx + dy * dy).sqrt();

            if dist >= OVERLAP_THRESHOLD_PX || dist <= STABILITY_FLOOR_PX {
                continue;
            }

            let push = (OVERLAP_THRESHOLD_PX - dist) / 2.0 + MARGIN_PX;
            let ux = dx / dist;
            let uy = dy / dist;

            offsets[i][0] -= ux * push;
            offsets[i][1] -= uy * push;
            offsets[j][0] += ux * push;
            offsets[j][1] += uy * push;
        }
    }

    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon)
    }

    /// Fake projection: 100 px per degree, y growing southward like a
    /// real map viewport.
    fn project(p: &GeoPoint) -> ScreenPoint {
        ScreenPoint {
            x: p.lon * 100.0,
            y: -p.lat * 100.0,
        }
    }

    #[test]
    fn overlapping_pair_pushed_apart() {
        // 10 px apart horizontally, third point 500 px away
        let points = vec![pt(46.0, -2.00), pt(46.0, -1.90), pt(46.0, 3.0)];
        let offsets = compute_offsets(&points, project);

        // Expected push: (52 - 10) / 2 + 3 = 24 px each, opposite signs
        assert!((offsets[0][0] + 24.0).abs() < 1e-9, "Got {}", offsets[0][0]);
        assert!((offsets[1][0] - 24.0).abs() < 1e-9, "Got {}", offsets[1][0]);
        assert!(offsets[0][1].abs() < 1e-9);
        assert!(offsets[1][1].abs() < 1e-9);

        // Distant point untouched
        assert_eq!(offsets[2], [0.0, 0.0]);
    }

    #[test]
    fn separated_points_not_moved() {
        let points = vec![pt(46.0, -2.0), pt(46.0, -1.0)];
        let offsets = compute_offsets(&points, project);
        assert_eq!(offsets, vec![[0.0, 0.0], [0.0, 0.0]]);
    }

    #[test]
    fn coincident_points_left_alone() {
        // Below the stability floor there is no meaningful push direction
        let points = vec![pt(46.0, -2.0), pt(46.0, -2.0)];
        let offsets = compute_offsets(&points, project);
        assert_eq!(offsets, vec![[0.0, 0.0], [0.0, 0.0]]);
    }

    #[test]
    fn pushes_accumulate_from_multiple_neighbours() {
        // Three labels 20 px apart on a row: the middle one is pushed
        // from both sides and the pushes cancel; the outer ones add up
        let points = vec![pt(46.0, -2.0), pt(46.0, -1.8), pt(46.0, -1.6)];
        let offsets = compute_offsets(&points, project);

        assert!(offsets[1][0].abs() < 1e-9, "Got {}", offsets[1][0]);
        // Outer points: pushed by the middle (20 px) and by each other (40 px)
        let expected = (52.0 - 20.0) / 2.0 + 3.0 + (52.0 - 40.0) / 2.0 + 3.0;
        assert!((offsets[0][0] + expected).abs() < 1e-9, "Got {}", offsets[0][0]);
        assert!((offsets[2][0] - expected).abs() < 1e-9, "Got {}", offsets[2][0]);
    }

    #[test]
    fn diagonal_pair_pushed_along_connecting_line() {
        // 30 px apart on a 45° diagonal
        let step_deg = 30.0 / (100.0 * std::f64::consts::SQRT_2);
        let a = pt(46.00, -2.00);
        let b = pt(46.0 - step_deg, -2.0 + step_deg);
        let offsets = compute_offsets(&[a, b], project);

        let push = (52.0 - 30.0) / 2.0 + 3.0;
        let component = push / std::f64::consts::SQRT_2;
        assert!((offsets[1][0] - component).abs() < 1e-6);
        assert!((offsets[1][1] - component).abs() < 1e-6);
        assert!((offsets[0][0] + component).abs() < 1e-6);
        assert!((offsets[0][1] + component).abs() < 1e-6);
    }

    #[test]
    fn empty_input() {
        let offsets = compute_offsets(&[], project);
        assert!(offsets.is_empty());
    }
}
