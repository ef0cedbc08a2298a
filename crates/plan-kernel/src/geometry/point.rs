use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Displacement between two canvas points.
pub type Vec2 = Vector2<f64>;

/// A point in canvas pixel space (y axis pointing down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        self.lerp(other, 0.5)
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }

    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Angle of the direction from `self` to `other`, in `(-π, π]`.
    pub fn angle_to(&self, other: &Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

impl Add<Vec2> for Point {
    type Output = Point;
    fn add(self, rhs: Vec2) -> Self::Output {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Vec2;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<Vec2> for Point {
    type Output = Point;
    fn sub(self, rhs: Vec2) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Z component of `(a - o) × (b - o)`.
///
/// Positive when `o → a → b` turns counter-clockwise in y-up coordinates.
pub fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a - o).perp(&(b - o))
}

/// Turn direction of an ordered triple, in y-up terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

const ORIENTATION_EPS: f64 = 1e-9;

pub fn orientation(p: Point, q: Point, r: Point) -> Orientation {
    let c = cross(p, q, r);
    if c.abs() < ORIENTATION_EPS {
        Orientation::Collinear
    } else if c > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}
