//! Tunable thresholds for snapping, hit-testing and topology edits.
//!
//! Every distance here is in canvas pixels. `scale` is the only bridge to
//! real-world units and is applied by [`crate::measure`].

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;

/// Kernel-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// A pointer closer than this to a wall feature snaps onto it.
    pub snap_threshold: f64,
    /// Radius around a vertex that starts an endpoint drag.
    pub endpoint_hover_radius: f64,
    /// Interior snap points and split points must stay this far from the
    /// wall's own endpoints.
    pub min_endpoint_distance: f64,
    /// Pointer-to-wall distance that counts as a wall hit.
    pub wall_hit_radius: f64,
    /// Points closer than this are the same vertex.
    pub coincidence: f64,
    /// How far a split point may sit off the wall line.
    pub on_wall_tolerance: f64,
    /// Pixels per length unit.
    pub scale: f64,
    /// Sub-units per unit when formatting lengths (12 for feet/inches).
    pub subunits_per_unit: u32,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 15.0,
            endpoint_hover_radius: 10.0,
            min_endpoint_distance: 10.0,
            wall_hit_radius: 8.0,
            coincidence: 0.5,
            on_wall_tolerance: 1.0,
            scale: 20.0,
            subunits_per_unit: 12,
        }
    }
}

impl KernelConfig {
    /// Default thresholds with a different pixels-per-unit scale.
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Tighter thresholds for dense plans drawn at high zoom.
    pub fn precise() -> Self {
        Self {
            snap_threshold: 6.0,
            endpoint_hover_radius: 5.0,
            min_endpoint_distance: 4.0,
            wall_hit_radius: 4.0,
            coincidence: 0.1,
            on_wall_tolerance: 0.25,
            ..Self::default()
        }
    }

    pub fn points_coincident(&self, a: &Point, b: &Point) -> bool {
        a.distance_to(b) < self.coincidence
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }
}
