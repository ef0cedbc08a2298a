//! Polygon helpers shared by reconstruction, queries and area derivation.
//!
//! Polygons are implicit rings: the last vertex connects back to the first.

use serde::{Deserialize, Serialize};

use super::point::Point;
use super::segment::segments_intersect;

/// Signed shoelace area, `Σ(x_i·y_{i+1} − x_{i+1}·y_i) / 2`.
///
/// On the y-down canvas a negative value means the ring runs
/// counter-clockwise on screen.
pub fn signed_area(polygon: &[Point]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let n = polygon.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Reverse `polygon` if needed so its signed area is not positive.
pub fn normalize_winding(mut polygon: Vec<Point>) -> Vec<Point> {
    if signed_area(&polygon) > 0.0 {
        polygon.reverse();
    }
    polygon
}

/// True if no two non-adjacent edges of the ring touch.
pub fn is_simple(polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let (a1, a2) = (polygon[i], polygon[(i + 1) % n]);
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            let (b1, b2) = (polygon[j], polygon[(j + 1) % n]);
            if segments_intersect(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

/// Vertex average. Good enough as a pivot for angular sorting.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Bounding box of `points`, or `None` for an empty slice.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(
            Rect {
                min: first,
                max: first,
            },
            |r, p| Rect {
                min: Point::new(r.min.x.min(p.x), r.min.y.min(p.y)),
                max: Point::new(r.max.x.max(p.x), r.max.y.max(p.y)),
            },
        ))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corners starting at `min`, in the same order as a shoelace ring.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_signed_area_sign_follows_order() {
        let sq = square();
        assert_eq!(signed_area(&sq), 100.0);
        let mut rev = sq.clone();
        rev.reverse();
        assert_eq!(signed_area(&rev), -100.0);
    }

    #[test]
    fn test_normalize_winding_makes_area_negative() {
        let ring = normalize_winding(square());
        assert!(signed_area(&ring) < 0.0);
        // Already normalized rings are left alone.
        let again = normalize_winding(ring.clone());
        assert_eq!(again, ring);
    }

    #[test]
    fn test_bowtie_is_not_simple() {
        let bowtie = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        assert!(!is_simple(&bowtie));
        assert!(is_simple(&square()));
    }

    #[test]
    fn test_triangle_is_simple() {
        let tri = vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 3.0)];
        assert!(is_simple(&tri));
    }

    #[test]
    fn test_centroid_and_rect() {
        let sq = square();
        assert_eq!(centroid(&sq), Some(Point::new(5.0, 5.0)));
        assert_eq!(centroid(&[]), None);

        let rect = Rect::from_points(&sq).unwrap();
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 10.0);
        assert!(rect.contains(&Point::new(10.0, 3.0)));
        assert!(!rect.contains(&Point::new(11.0, 3.0)));
        assert_eq!(rect.corners()[2], Point::new(10.0, 10.0));
    }
}
