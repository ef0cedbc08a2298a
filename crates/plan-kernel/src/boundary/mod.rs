//! Room boundary reconstruction.
//!
//! Turns the member walls of a room into an ordered ring:
//! 1. Walk the wall graph from its leftmost vertex ([`WallGraph::trace`])
//! 2. Normalize winding and reject self-intersecting or flat results
//! 3. Fall back to a convex hull (small rooms) or a centroid-angle sort
//!    (larger ones, with the hull as a last resort)
//! 4. Fall back to the bounding rectangle if all else is degenerate
//!
//! Every stage is a pure function; the result records which stage won.

pub mod fallback;
pub mod graph;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::point::Point;
use crate::geometry::polygon::{is_simple, normalize_winding, signed_area};

pub use fallback::{bounding_rect, centroid_sort, convex_hull};
pub use graph::WallGraph;

/// Rooms with at most this many points are treated as partially drawn and
/// go straight to the convex hull when the walk fails.
pub const SMALL_ROOM_POINTS: usize = 6;

/// Rings flatter than this (px²) are not polygons.
const MIN_RING_AREA: f64 = 1e-6;

/// Which stage of the pipeline produced a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryMethod {
    /// Fewer than three usable points.
    #[default]
    Empty,
    Traced,
    ConvexHull,
    CentroidSort,
    BoundingRect,
}

/// Output of [`reconstruct`]: an empty ring or a simple ring of ≥3 vertices
/// with negative signed area.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconstruction {
    pub polygon: Vec<Point>,
    pub method: BoundaryMethod,
}

impl Reconstruction {
    fn new(polygon: Vec<Point>, method: BoundaryMethod) -> Self {
        Self { polygon, method }
    }

    pub fn is_empty(&self) -> bool {
        self.polygon.is_empty()
    }
}

/// Normalize `ring` and keep it only if it is a usable simple polygon.
pub fn accept_ring(ring: Vec<Point>) -> Option<Vec<Point>> {
    if ring.len() < 3 {
        return None;
    }
    let ring = normalize_winding(ring);
    if signed_area(&ring).abs() < MIN_RING_AREA || !is_simple(&ring) {
        return None;
    }
    Some(ring)
}

/// Rebuild a room boundary from its wall graph. Never fails.
pub fn reconstruct<K: Copy + Ord>(graph: &WallGraph<K>) -> Reconstruction {
    let points = graph.points();
    if points.len() < 3 {
        return Reconstruction::default();
    }

    let traced = graph.trace();
    let traced_len = traced.len();
    if let Some(ring) = accept_ring(traced) {
        return Reconstruction::new(ring, BoundaryMethod::Traced);
    }
    debug!(
        points = points.len(),
        traced = traced_len,
        "boundary walk rejected, using fallback ordering"
    );

    let fallback = if points.len() <= SMALL_ROOM_POINTS {
        accept_ring(convex_hull(&points)).map(|r| (r, BoundaryMethod::ConvexHull))
    } else {
        accept_ring(centroid_sort(&points))
            .map(|r| (r, BoundaryMethod::CentroidSort))
            .or_else(|| accept_ring(convex_hull(&points)).map(|r| (r, BoundaryMethod::ConvexHull)))
    };
    if let Some((ring, method)) = fallback {
        return Reconstruction::new(ring, method);
    }

    match bounding_rect(&points) {
        Some(rect) => Reconstruction::new(normalize_winding(rect), BoundaryMethod::BoundingRect),
        None => {
            debug!(points = points.len(), "all boundary points are axis-aligned collinear");
            Reconstruction::default()
        }
    }
}

/// Insert `point` into `boundary` between the two consecutive vertices whose
/// edge it lies on (distance to both ends sums to the edge length within
/// `tolerance`). Returns false if no edge matches or the point is already a
/// vertex.
pub fn insert_boundary_vertex(boundary: &mut Vec<Point>, point: Point, tolerance: f64) -> bool {
    if boundary.iter().any(|v| v.distance_to(&point) <= tolerance) {
        return false;
    }
    let n = boundary.len();
    for i in 0..n {
        let a = boundary[i];
        let b = boundary[(i + 1) % n];
        let detour = a.distance_to(&point) + point.distance_to(&b) - a.distance_to(&b);
        if detour.abs() <= tolerance {
            boundary.insert(i + 1, point);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from(points: &[(f64, f64)], walls: &[(u32, u32)]) -> WallGraph<u32> {
        let mut g = WallGraph::new();
        for &(a, b) in walls {
            let pa = points[a as usize];
            let pb = points[b as usize];
            g.add_wall(a, Point::new(pa.0, pa.1), b, Point::new(pb.0, pb.1));
        }
        g
    }

    fn ring(points: &[(f64, f64)]) -> WallGraph<u32> {
        let walls: Vec<(u32, u32)> = (0..points.len() as u32)
            .map(|i| (i, (i + 1) % points.len() as u32))
            .collect();
        graph_from(points, &walls)
    }

    #[test]
    fn test_rectangle_is_traced_with_negative_winding() {
        let r = reconstruct(&ring(&[(0.0, 0.0), (200.0, 0.0), (200.0, 100.0), (0.0, 100.0)]));
        assert_eq!(r.method, BoundaryMethod::Traced);
        assert_eq!(r.polygon.len(), 4);
        assert!(signed_area(&r.polygon) < 0.0);
    }

    #[test]
    fn test_two_points_give_nothing() {
        let g = graph_from(&[(0.0, 0.0), (10.0, 10.0)], &[(0, 1)]);
        let r = reconstruct(&g);
        assert!(r.is_empty());
        assert_eq!(r.method, BoundaryMethod::Empty);
    }

    #[test]
    fn test_open_corner_closes_implicitly() {
        // Two walls meeting at a corner: the walk dead-ends after three
        // vertices and the ring closes back to the start.
        let g = graph_from(&[(0.0, 0.0), (100.0, 0.0), (100.0, 50.0)], &[(0, 1), (1, 2)]);
        let r = reconstruct(&g);
        assert_eq!(r.polygon.len(), 3);
        assert!(signed_area(&r.polygon) < 0.0);
    }

    #[test]
    fn test_crossing_walls_use_hull() {
        // Two disconnected crossing walls: the walk covers only one of them.
        let mut g = WallGraph::new();
        g.add_wall(0u32, Point::new(0.0, 0.0), 1, Point::new(100.0, 100.0));
        g.add_wall(2u32, Point::new(0.0, 100.0), 3, Point::new(100.0, 0.0));
        let r = reconstruct(&g);
        assert_eq!(r.method, BoundaryMethod::ConvexHull);
        assert_eq!(r.polygon.len(), 4);
        assert!((signed_area(&r.polygon).abs() - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_collinear_diagonal_points_use_bounding_rect() {
        let g = graph_from(
            &[(0.0, 0.0), (10.0, 10.0), (20.0, 20.0)],
            &[(0, 1), (1, 2)],
        );
        let r = reconstruct(&g);
        assert_eq!(r.method, BoundaryMethod::BoundingRect);
        assert_eq!(r.polygon.len(), 4);
    }

    #[test]
    fn test_collinear_axis_points_are_empty() {
        let g = graph_from(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)], &[(0, 1), (1, 2)]);
        assert!(reconstruct(&g).is_empty());
    }

    #[test]
    fn test_many_scattered_walls_use_centroid_sort() {
        // Four disconnected chords on a circle: the walk dead-ends after one.
        let mut g = WallGraph::new();
        for i in 0..4u32 {
            let a = i as f64 * std::f64::consts::FRAC_PI_2;
            let b = a + 0.3;
            g.add_wall(
                2 * i,
                Point::new(100.0 * a.cos(), 100.0 * a.sin()),
                2 * i + 1,
                Point::new(100.0 * b.cos(), 100.0 * b.sin()),
            );
        }
        let r = reconstruct(&g);
        assert_eq!(r.polygon.len(), 8);
        assert_eq!(r.method, BoundaryMethod::CentroidSort);
        assert!(is_simple(&r.polygon));
    }

    #[test]
    fn test_insert_boundary_vertex_between_neighbors() {
        let mut boundary = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(200.0, 100.0),
            Point::new(200.0, 0.0),
        ];
        assert!(insert_boundary_vertex(&mut boundary, Point::new(100.0, 100.0), 0.5));
        assert_eq!(boundary[2], Point::new(100.0, 100.0));
        // Closing edge (last -> first).
        assert!(insert_boundary_vertex(&mut boundary, Point::new(100.0, 0.0), 0.5));
        assert_eq!(boundary.last(), Some(&Point::new(100.0, 0.0)));
        // Existing vertices and far points are left alone.
        assert!(!insert_boundary_vertex(&mut boundary, Point::new(0.0, 0.0), 0.5));
        assert!(!insert_boundary_vertex(&mut boundary, Point::new(50.0, 50.0), 0.5));
        assert_eq!(boundary.len(), 6);
    }
}
