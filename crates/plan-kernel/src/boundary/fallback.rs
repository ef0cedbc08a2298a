//! Orderings used when the graph walk does not give a simple polygon.

use crate::geometry::point::{cross, Point};
use crate::geometry::polygon::{centroid, Rect};

/// Convex hull by Andrew's monotone chain.
///
/// Collinear points on the hull are dropped, so fully collinear input yields
/// fewer than three vertices.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Points ordered by angle around their vertex average, nearer first on ties.
pub fn centroid_sort(points: &[Point]) -> Vec<Point> {
    let Some(center) = centroid(points) else {
        return Vec::new();
    };
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| {
        center
            .angle_to(a)
            .total_cmp(&center.angle_to(b))
            .then(center.distance_squared_to(a).total_cmp(&center.distance_squared_to(b)))
    });
    sorted
}

/// Corners of the bounding box, or `None` when the box has no area.
pub fn bounding_rect(points: &[Point]) -> Option<Vec<Point>> {
    let rect = Rect::from_points(points)?;
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Some(rect.corners().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon::{is_simple, signed_area};

    #[test]
    fn test_hull_drops_interior_points() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Point::new(5.0, 5.0)));
        assert!((signed_area(&hull).abs() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_hull_of_collinear_points_is_degenerate() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)];
        assert!(convex_hull(&pts).len() < 3);
    }

    #[test]
    fn test_centroid_sort_untangles_star() {
        // A hexagon listed in scrambled order.
        let pts: Vec<Point> = [0, 3, 1, 4, 2, 5]
            .iter()
            .map(|&i| {
                let a = i as f64 * std::f64::consts::TAU / 6.0;
                Point::new(100.0 * a.cos(), 100.0 * a.sin())
            })
            .collect();
        assert!(!is_simple(&pts));
        assert!(is_simple(&centroid_sort(&pts)));
    }

    #[test]
    fn test_bounding_rect() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(20.0, 10.0), Point::new(5.0, 3.0)];
        let rect = bounding_rect(&pts).unwrap();
        assert_eq!(rect.len(), 4);
        assert!((signed_area(&rect).abs() - 200.0).abs() < 1e-9);

        let flat = vec![Point::new(0.0, 0.0), Point::new(20.0, 0.0)];
        assert!(bounding_rect(&flat).is_none());
    }
}
