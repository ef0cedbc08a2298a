//! Area and length derivation.
//!
//! The kernel works in canvas pixels; these helpers are the only place the
//! pixels-per-unit scale is applied.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::boundary::{BoundaryMethod, Reconstruction};
use crate::config::KernelConfig;
use crate::geometry::point::Point;
use crate::geometry::polygon::{signed_area, Rect};

/// Shoelace area of `boundary` in square units, rounded to the nearest unit.
pub fn polygon_area(boundary: &[Point], scale: f64) -> f64 {
    if boundary.len() < 3 || scale <= 0.0 {
        return 0.0;
    }
    (signed_area(boundary).abs() / (scale * scale)).round()
}

/// Area of a `width` × `height` pixel rectangle in square units, rounded.
pub fn rect_area(width: f64, height: f64, scale: f64) -> f64 {
    if scale <= 0.0 {
        return 0.0;
    }
    (width.abs() * height.abs() / (scale * scale)).round()
}

/// What an area is computed from.
#[derive(Debug, Clone, Copy)]
pub enum AreaSource<'a> {
    Boundary(&'a [Point]),
    Bounds(Rect),
}

impl<'a> AreaSource<'a> {
    /// The box itself for a bounding-rectangle boundary, the ring otherwise.
    /// An empty ring has no area.
    pub fn for_reconstruction(rebuilt: &'a Reconstruction) -> Self {
        match rebuilt.method {
            BoundaryMethod::BoundingRect => Rect::from_points(&rebuilt.polygon)
                .map_or(Self::Boundary(&rebuilt.polygon), Self::Bounds),
            _ => Self::Boundary(&rebuilt.polygon),
        }
    }
}

pub fn compute_area(source: AreaSource<'_>, scale: f64) -> f64 {
    match source {
        AreaSource::Boundary(boundary) => polygon_area(boundary, scale),
        AreaSource::Bounds(rect) => rect_area(rect.width(), rect.height(), scale),
    }
}

/// A length split into whole units and sub-units (feet and inches by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthParts {
    pub whole: u64,
    pub fraction: u32,
}

impl fmt::Display for LengthParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}' {}\"", self.whole, self.fraction)
    }
}

/// Convert a pixel length to whole units plus rounded sub-units.
///
/// A fraction that rounds up to a full unit carries into `whole`.
pub fn length_to_units(pixels: f64, config: &KernelConfig) -> LengthParts {
    if config.scale <= 0.0 || !pixels.is_finite() {
        return LengthParts {
            whole: 0,
            fraction: 0,
        };
    }
    let units = pixels.abs() / config.scale;
    let whole = units.floor();
    let per_unit = config.subunits_per_unit.max(1);
    let fraction = ((units - whole) * per_unit as f64).round() as u32;
    if fraction >= per_unit {
        LengthParts {
            whole: whole as u64 + 1,
            fraction: 0,
        }
    } else {
        LengthParts {
            whole: whole as u64,
            fraction,
        }
    }
}

pub fn units_to_pixels(units: f64, scale: f64) -> f64 {
    units * scale
}
