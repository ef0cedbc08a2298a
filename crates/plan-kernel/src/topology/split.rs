use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::entities::*;
use super::store::TopologyStore;
use crate::boundary::{insert_boundary_vertex, BoundaryMethod};
use crate::error::EditError;
use crate::geometry::point::Point;
use crate::geometry::segment::closest_point_on_segment;
use crate::measure::polygon_area;

/// The two walls (and the vertex between them) that replaced a split wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitOutcome {
    /// `start → vertex`
    pub first: WallId,
    /// `vertex → end`
    pub second: WallId,
    pub vertex: VertexId,
}

impl TopologyStore {
    /// Split `wall_id` at `point`, replacing it with two walls that meet at a
    /// new vertex.
    ///
    /// `point` is projected onto the wall; it must sit within
    /// `on_wall_tolerance` of it, keep `min_endpoint_distance` from both ends
    /// and stay clear of every fixture on the wall. Fixtures move to
    /// whichever half holds their center. Rooms containing the wall get both
    /// halves instead and are re-derived.
    #[instrument(skip(self), fields(point = ?[point.x, point.y]))]
    pub fn split_wall(&self, wall_id: WallId, point: Point) -> Result<(Self, SplitOutcome), EditError> {
        let wall = *self
            .walls
            .get(wall_id)
            .ok_or(EditError::WallNotFound { wall: wall_id })?;
        let segment = self
            .wall_segment(wall_id)
            .ok_or(EditError::WallNotFound { wall: wall_id })?;

        let (on_wall, _) = closest_point_on_segment(point, segment.start, segment.end);
        let off = point.distance_to(&on_wall);
        if off > self.config.on_wall_tolerance {
            return Err(EditError::PointNotOnWall {
                wall: wall_id,
                distance: off,
            });
        }

        let offset = segment.start.distance_to(&on_wall);
        let nearest_end = offset.min(on_wall.distance_to(&segment.end));
        if nearest_end < self.config.min_endpoint_distance {
            return Err(EditError::TooCloseToEndpoint {
                distance: nearest_end,
                minimum: self.config.min_endpoint_distance,
            });
        }

        let on_wall_fixtures = self.fixtures_on_wall(wall_id);
        if let Some((fixture, _)) = on_wall_fixtures.iter().find(|(_, f)| f.covers(offset)) {
            return Err(EditError::SplitInsideFixture { fixture: *fixture });
        }

        let mut next = self.clone();
        let vertex = next.vertices.insert(Vertex { point: on_wall });
        let lineage = Some(wall.lineage.unwrap_or(wall_id));
        next.walls.remove(wall_id);
        let first = next.walls.insert(Wall {
            start: wall.start,
            end: vertex,
            lineage,
        });
        let second = next.walls.insert(Wall {
            start: vertex,
            end: wall.end,
            lineage,
        });

        for (id, fixture) in on_wall_fixtures {
            if let Some(f) = next.fixtures.get_mut(id) {
                if fixture.position < offset {
                    f.wall_id = first;
                } else {
                    f.wall_id = second;
                    f.position = fixture.position - offset;
                }
            }
        }

        // A traced ring only gains the split point, so it is patched in place.
        // Any other ring is re-derived from the new walls.
        let affected = next.rooms_with_wall(wall_id);
        let tolerance = next.config.on_wall_tolerance;
        let scale = next.config.scale;
        let mut stale = Vec::new();
        for &room_id in &affected {
            if let Some(room) = next.rooms.get_mut(room_id) {
                room.wall_ids.remove(&wall_id);
                room.wall_ids.insert(first);
                room.wall_ids.insert(second);
                let patched = room.boundary_method == BoundaryMethod::Traced
                    && insert_boundary_vertex(&mut room.boundary, on_wall, tolerance);
                if patched {
                    room.area = polygon_area(&room.boundary, scale);
                } else {
                    stale.push(room_id);
                }
            }
        }
        next.refresh_rooms(&stale);

        debug!(?wall_id, ?first, ?second, rooms = affected.len(), rederived = stale.len(), "wall split");
        Ok((
            next,
            SplitOutcome {
                first,
                second,
                vertex,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon::signed_area;
    use crate::topology::test_plans::{p, rect_room};

    #[test]
    fn test_split_replaces_wall_in_room() {
        let (store, room, walls) = rect_room();
        let (store, out) = store.split_wall(walls[0], p(80.0, 0.0)).unwrap();

        assert!(store.wall(walls[0]).is_none());
        let r = store.room(room).unwrap();
        assert!(!r.wall_ids.contains(&walls[0]));
        assert!(r.wall_ids.contains(&out.first));
        assert!(r.wall_ids.contains(&out.second));
        assert_eq!(r.boundary.len(), 5);
        assert!(r.boundary.contains(&p(80.0, 0.0)));
        assert!(signed_area(&r.boundary) < 0.0);
        assert_eq!(r.area, 50.0);

        let first = store.wall_segment(out.first).unwrap();
        let second = store.wall_segment(out.second).unwrap();
        assert_eq!(first.start, p(0.0, 0.0));
        assert_eq!(first.end, p(80.0, 0.0));
        assert_eq!(second.start, p(80.0, 0.0));
        assert_eq!(second.end, p(200.0, 0.0));
        assert_eq!(store.wall(out.first).unwrap().lineage, Some(walls[0]));
    }

    #[test]
    fn test_split_patches_traced_boundary_in_place() {
        let (store, room, walls) = rect_room();
        let (store, _) = store.split_wall(walls[0], p(80.0, 0.0)).unwrap();
        let r = store.room(room).unwrap();
        assert_eq!(r.boundary_method, BoundaryMethod::Traced);

        let at = r.boundary.iter().position(|v| *v == p(80.0, 0.0)).unwrap();
        let n = r.boundary.len();
        let mut neighbors = [r.boundary[(at + n - 1) % n], r.boundary[(at + 1) % n]];
        neighbors.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(neighbors, [p(0.0, 0.0), p(200.0, 0.0)]);

        // Same ring a full re-derivation gives.
        let mut fresh = store.clone();
        fresh.refresh_room(room);
        assert_eq!(fresh.room(room).unwrap().boundary, r.boundary);
    }

    #[test]
    fn test_split_rederives_untraced_boundary() {
        // Two parallel walls: the walk dead-ends, so the room is a hull.
        let store = TopologyStore::default();
        let (store, top) = store.add_wall(p(0.0, 0.0), p(200.0, 0.0)).unwrap();
        let (store, bottom) = store.add_wall(p(0.0, 100.0), p(200.0, 100.0)).unwrap();
        let (store, room) = store.add_room("Porch", 2.4, [top, bottom]).unwrap();
        assert_eq!(store.room(room).unwrap().boundary_method, BoundaryMethod::ConvexHull);

        let (store, _) = store.split_wall(top, p(80.0, 0.0)).unwrap();
        let r = store.room(room).unwrap();
        assert_eq!(r.boundary_method, BoundaryMethod::ConvexHull);
        // The hull drops the collinear split point.
        assert_eq!(r.boundary.len(), 4);
        assert!(!r.boundary.contains(&p(80.0, 0.0)));
        assert_eq!(r.area, 50.0);
    }

    #[test]
    fn test_split_projects_point_onto_wall() {
        let (store, _, walls) = rect_room();
        let (store, out) = store.split_wall(walls[0], p(100.0, 0.6)).unwrap();
        assert_eq!(store.vertex(out.vertex).unwrap().point, p(100.0, 0.0));
    }

    #[test]
    fn test_split_rejects_off_wall_point() {
        let (store, _, walls) = rect_room();
        let err = store.split_wall(walls[0], p(100.0, 30.0)).unwrap_err();
        assert!(matches!(err, EditError::PointNotOnWall { .. }));
    }

    #[test]
    fn test_split_rejects_point_near_endpoint() {
        let (store, _, walls) = rect_room();
        let err = store.split_wall(walls[0], p(195.0, 0.0)).unwrap_err();
        assert!(matches!(err, EditError::TooCloseToEndpoint { .. }));
    }

    #[test]
    fn test_split_moves_fixtures_to_their_half() {
        let (store, _, walls) = rect_room();
        let (store, door) = store.add_fixture(walls[0], 40.0, 20.0).unwrap();
        let (store, window) = store.add_fixture(walls[0], 150.0, 30.0).unwrap();

        let err = store.split_wall(walls[0], p(45.0, 0.0)).unwrap_err();
        assert_eq!(err, EditError::SplitInsideFixture { fixture: door });

        let (store, out) = store.split_wall(walls[0], p(100.0, 0.0)).unwrap();
        let door = store.fixture(door).unwrap();
        let window = store.fixture(window).unwrap();
        assert_eq!(door.wall_id, out.first);
        assert_eq!(door.position, 40.0);
        assert_eq!(window.wall_id, out.second);
        assert_eq!(window.position, 50.0);
    }

    #[test]
    fn test_split_of_split_keeps_root_lineage() {
        let (store, _, walls) = rect_room();
        let (store, out) = store.split_wall(walls[0], p(100.0, 0.0)).unwrap();
        let (store, again) = store.split_wall(out.second, p(150.0, 0.0)).unwrap();
        assert_eq!(store.wall(again.first).unwrap().lineage, Some(walls[0]));
        assert_eq!(store.wall(again.second).unwrap().lineage, Some(walls[0]));
    }
}
