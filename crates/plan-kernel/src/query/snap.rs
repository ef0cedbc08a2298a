//! Pointer snapping onto wall endpoints and wall interiors.
//!
//! Candidates are compared by pixel distance to the pointer and must be
//! strictly closer than `snap_threshold`. On equal distances the first
//! candidate in `walls` order wins (start before end before interior).

use serde::{Deserialize, Serialize};

use crate::config::KernelConfig;
use crate::geometry::point::Point;
use crate::geometry::segment::closest_point_on_segment;
use crate::topology::{WallId, WallSegment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

/// Where the pointer should land.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    pub point: Point,
    pub wall_id: WallId,
    /// Set for endpoint snaps.
    pub endpoint: Option<Endpoint>,
    /// Interior snap: committing here means splitting `wall_id`.
    pub split_wall: bool,
    pub distance: f64,
}

fn endpoint_candidates(segment: &WallSegment) -> [(Point, Endpoint); 2] {
    [(segment.start, Endpoint::Start), (segment.end, Endpoint::End)]
}

/// Keep `candidate` if it beats the current best and the threshold.
fn consider(best: &mut Option<SnapResult>, candidate: SnapResult, threshold: f64) {
    if candidate.distance >= threshold {
        return;
    }
    if best.map_or(true, |b| candidate.distance < b.distance) {
        *best = Some(candidate);
    }
}

/// Nearest wall endpoint to `point`, skipping the wall `exclude` (usually the
/// one being drawn or dragged).
pub fn find_closest_endpoint(
    point: Point,
    walls: &[WallSegment],
    exclude: Option<WallId>,
    config: &KernelConfig,
) -> Option<SnapResult> {
    let mut best = None;
    for segment in walls.iter().filter(|s| Some(s.id) != exclude) {
        for (at, endpoint) in endpoint_candidates(segment) {
            consider(
                &mut best,
                SnapResult {
                    point: at,
                    wall_id: segment.id,
                    endpoint: Some(endpoint),
                    split_wall: false,
                    distance: point.distance_to(&at),
                },
                config.snap_threshold,
            );
        }
    }
    best
}

/// Like [`find_closest_endpoint`], but a wall's interior is also a target
/// when the closest point on it keeps more than `min_endpoint_distance` from
/// both of that wall's endpoints.
pub fn find_closest_snap_point(
    point: Point,
    walls: &[WallSegment],
    exclude: Option<WallId>,
    config: &KernelConfig,
) -> Option<SnapResult> {
    let mut best = None;
    for segment in walls.iter().filter(|s| Some(s.id) != exclude) {
        for (at, endpoint) in endpoint_candidates(segment) {
            consider(
                &mut best,
                SnapResult {
                    point: at,
                    wall_id: segment.id,
                    endpoint: Some(endpoint),
                    split_wall: false,
                    distance: point.distance_to(&at),
                },
                config.snap_threshold,
            );
        }

        let (on_wall, _) = closest_point_on_segment(point, segment.start, segment.end);
        let clearance = on_wall
            .distance_to(&segment.start)
            .min(on_wall.distance_to(&segment.end));
        if clearance > config.min_endpoint_distance {
            consider(
                &mut best,
                SnapResult {
                    point: on_wall,
                    wall_id: segment.id,
                    endpoint: None,
                    split_wall: true,
                    distance: point.distance_to(&on_wall),
                },
                config.snap_threshold,
            );
        }
    }
    best
}
