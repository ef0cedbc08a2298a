//! Point-to-segment and segment-to-segment primitives.

use super::point::{orientation, Orientation, Point};

/// Closest point to `point` on segment `[a, b]` and its parameter `t ∈ [0, 1]`.
///
/// A degenerate segment (`a == b`) behaves as the single point `a` with `t = 0`.
pub fn closest_point_on_segment(point: Point, a: Point, b: Point) -> (Point, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (a, 0.0);
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Euclidean distance from `point` to segment `[a, b]`.
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let (closest, _) = closest_point_on_segment(point, a, b);
    point.distance_to(&closest)
}

/// Whether `q` lies inside the bounding box of `[p, r]`.
///
/// Only meaningful when `p`, `q`, `r` are already known to be collinear.
fn within_bounds(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Whether segments `[p1, q1]` and `[p2, q2]` share at least one point.
///
/// Touching counts, including segments that only share an endpoint. Callers
/// validating a polygon must skip adjacent edge pairs themselves.
pub fn segments_intersect(p1: Point, q1: Point, p2: Point, q2: Point) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && within_bounds(p1, p2, q1))
        || (o2 == Orientation::Collinear && within_bounds(p1, q2, q1))
        || (o3 == Orientation::Collinear && within_bounds(p2, p1, q2))
        || (o4 == Orientation::Collinear && within_bounds(p2, q1, q2))
}
