use serde::{Deserialize, Serialize};

use crate::config::KernelConfig;
use crate::geometry::point::Point;
use crate::geometry::polygon::signed_area;
use crate::geometry::segment::closest_point_on_segment;
use crate::topology::{RoomId, TopologyStore, VertexId, WallId, WallSegment};

/// Even-odd ray cast. Fewer than three vertices never contain anything.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// A wall under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallHit {
    pub wall_id: WallId,
    /// Closest point on the wall to the pointer.
    pub click_point: Point,
    pub distance: f64,
}

/// Nearest wall within `wall_hit_radius` of `point`.
pub fn hit_test_wall(point: Point, walls: &[WallSegment], config: &KernelConfig) -> Option<WallHit> {
    walls
        .iter()
        .map(|s| {
            let (click_point, _) = closest_point_on_segment(point, s.start, s.end);
            WallHit {
                wall_id: s.id,
                click_point,
                distance: point.distance_to(&click_point),
            }
        })
        .filter(|h| h.distance <= config.wall_hit_radius)
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Room containing `point`. Nested or overlapping rooms resolve to the one
/// with the smallest footprint.
pub fn hit_test_room(point: Point, store: &TopologyStore) -> Option<RoomId> {
    store
        .rooms()
        .iter()
        .filter_map(|(id, room)| {
            if room.boundary.len() >= 3 {
                point_in_polygon(point, &room.boundary)
                    .then(|| (id, signed_area(&room.boundary).abs()))
            } else {
                let bounds = store.room_bounds(id)?;
                bounds
                    .contains(&point)
                    .then(|| (id, bounds.width() * bounds.height()))
            }
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Vertex close enough to the pointer to grab.
pub fn vertex_near(point: Point, store: &TopologyStore) -> Option<VertexId> {
    store.nearest_vertex(point, store.config().endpoint_hover_radius)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hit {
    Wall(WallHit),
    Room { room_id: RoomId },
}

/// What the pointer is over. Walls sit on top of rooms.
pub fn hit_test(point: Point, store: &TopologyStore) -> Option<Hit> {
    if let Some(wall) = hit_test_wall(point, &store.wall_segments(), store.config()) {
        return Some(Hit::Wall(wall));
    }
    hit_test_room(point, store).map(|room_id| Hit::Room { room_id })
}
