use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::entities::*;
use super::store::TopologyStore;
use crate::error::EditError;
use crate::geometry::point::Point;
use crate::geometry::segment::distance_to_segment;

/// Result of recombining the segments of a previously split wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOutcome {
    pub merged: WallId,
    /// Segment ids that no longer exist, in chain order.
    pub removed: Vec<WallId>,
}

impl TopologyStore {
    /// Recombine every segment split from the same drawn wall as `wall_id`
    /// into a single wall spanning the chain.
    ///
    /// Refused when the chain is broken, a join vertex was dragged off the
    /// line, another wall hangs off a join, or a fixture covers a join.
    /// Fixtures on the segments are re-homed onto the merged wall.
    #[instrument(skip(self))]
    pub fn merge_wall(&self, wall_id: WallId) -> Result<(Self, MergeOutcome), EditError> {
        let wall = self
            .walls
            .get(wall_id)
            .ok_or(EditError::WallNotFound { wall: wall_id })?;
        let root = wall
            .lineage
            .ok_or(EditError::NothingToMerge { wall: wall_id })?;

        let members: Vec<WallId> = self
            .walls
            .iter()
            .filter(|(_, w)| w.lineage == Some(root))
            .map(|(id, _)| id)
            .collect();
        if members.len() < 2 {
            return Err(EditError::NothingToMerge { wall: wall_id });
        }
        let chain = self
            .order_chain(&members)
            .ok_or(EditError::BrokenLineage { wall: wall_id })?;

        let (Some(first), Some(last)) = (
            chain.first().and_then(|&id| self.walls.get(id)),
            chain.last().and_then(|&id| self.walls.get(id)),
        ) else {
            return Err(EditError::BrokenLineage { wall: wall_id });
        };
        let (start, end) = (first.start, last.end);
        let start_point = self.vertex_point(start)?;
        let end_point = self.vertex_point(end)?;

        // Offset of each segment's start along the merged wall.
        let mut offsets = Vec::with_capacity(chain.len());
        let mut joins = Vec::with_capacity(chain.len() - 1);
        let mut running = 0.0;
        for (i, &id) in chain.iter().enumerate() {
            offsets.push(running);
            let segment = self
                .wall_segment(id)
                .ok_or(EditError::BrokenLineage { wall: wall_id })?;
            running += segment.length();
            if i + 1 < chain.len() {
                joins.push((self.walls[id].end, running));
            }
        }

        let chain_set: BTreeSet<WallId> = chain.iter().copied().collect();
        for &(vertex, _) in &joins {
            let point = self.vertex_point(vertex)?;
            let distance = distance_to_segment(point, start_point, end_point);
            if distance > self.config.on_wall_tolerance {
                return Err(EditError::NotCollinear { vertex, distance });
            }
            if self
                .walls_at_vertex(vertex)
                .iter()
                .any(|w| !chain_set.contains(w))
            {
                return Err(EditError::JunctionInUse { vertex });
            }
        }

        let mut rehomed = Vec::new();
        for (segment_offset, &id) in offsets.iter().zip(&chain) {
            for (fixture_id, fixture) in self.fixtures_on_wall(id) {
                let position = segment_offset + fixture.position;
                let moved = WallFixture {
                    wall_id: id,
                    position,
                    width: fixture.width,
                };
                if joins.iter().any(|&(_, at)| moved.covers(at)) {
                    return Err(EditError::FixtureBlocksMerge { fixture: fixture_id });
                }
                rehomed.push((fixture_id, position));
            }
        }

        let mut next = self.clone();
        let merged = next.walls.insert(Wall {
            start,
            end,
            lineage: None,
        });
        for (fixture_id, position) in rehomed {
            if let Some(f) = next.fixtures.get_mut(fixture_id) {
                f.wall_id = merged;
                f.position = position;
            }
        }
        for &id in &chain {
            next.walls.remove(id);
        }
        for &(vertex, _) in &joins {
            next.prune_vertex(vertex);
        }

        let affected: Vec<RoomId> = next
            .rooms
            .iter()
            .filter(|(_, r)| r.wall_ids.iter().any(|w| chain_set.contains(w)))
            .map(|(id, _)| id)
            .collect();
        for &room_id in &affected {
            if let Some(room) = next.rooms.get_mut(room_id) {
                room.wall_ids.retain(|w| !chain_set.contains(w));
                room.wall_ids.insert(merged);
            }
        }
        next.refresh_rooms(&affected);

        debug!(?merged, segments = chain.len(), rooms = affected.len(), "walls merged");
        Ok((
            next,
            MergeOutcome {
                merged,
                removed: chain,
            },
        ))
    }

    /// Delete a fixture, then try to merge the wall it sat on back together.
    ///
    /// A merge that is not possible is not an error; the fixture is removed
    /// either way and the outcome is `None`.
    #[instrument(skip(self))]
    pub fn remove_fixture(
        &self,
        fixture_id: FixtureId,
    ) -> Result<(Self, Option<MergeOutcome>), EditError> {
        let fixture = *self
            .fixtures
            .get(fixture_id)
            .ok_or(EditError::FixtureNotFound { fixture: fixture_id })?;
        let mut next = self.clone();
        next.fixtures.remove(fixture_id);

        let has_lineage = next
            .walls
            .get(fixture.wall_id)
            .is_some_and(|w| w.lineage.is_some());
        if !has_lineage {
            return Ok((next, None));
        }
        match next.merge_wall(fixture.wall_id) {
            Ok((merged, outcome)) => Ok((merged, Some(outcome))),
            Err(reason) => {
                debug!(%reason, "fixture removed, segments left split");
                Ok((next, None))
            }
        }
    }

    /// Order segments into a `start → end` chain, or `None` if they do not
    /// form exactly one.
    fn order_chain(&self, members: &[WallId]) -> Option<Vec<WallId>> {
        let walls: Vec<(WallId, Wall)> = members
            .iter()
            .map(|&id| self.walls.get(id).map(|w| (id, *w)))
            .collect::<Option<_>>()?;
        let (head, head_wall) = *walls
            .iter()
            .find(|(_, w)| !walls.iter().any(|(_, o)| o.end == w.start))?;

        let mut chain = vec![head];
        let mut tail = head_wall.end;
        while chain.len() < walls.len() {
            let (id, w) = walls
                .iter()
                .find(|(id, w)| w.start == tail && !chain.contains(id))?;
            chain.push(*id);
            tail = w.end;
        }
        Some(chain)
    }

    fn vertex_point(&self, vertex: VertexId) -> Result<Point, EditError> {
        self.vertices
            .get(vertex)
            .map(|v| v.point)
            .ok_or(EditError::VertexNotFound { vertex })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::test_plans::{p, rect_room};

    #[test]
    fn test_merge_inverts_split() {
        let (store, room, walls) = rect_room();
        let original = store.wall_segment(walls[0]).unwrap();
        let vertex_count = store.vertices().len();

        let (split, out) = store.split_wall(walls[0], p(70.0, 0.0)).unwrap();
        let (merged, outcome) = split.merge_wall(out.second).unwrap();

        let wall = merged.wall_segment(outcome.merged).unwrap();
        assert_eq!(wall.start, original.start);
        assert_eq!(wall.end, original.end);
        assert_eq!(outcome.removed, vec![out.first, out.second]);
        assert_eq!(merged.vertices().len(), vertex_count);
        assert_eq!(merged.wall(outcome.merged).unwrap().lineage, None);

        let r = merged.room(room).unwrap();
        assert_eq!(r.wall_ids.len(), 4);
        assert!(r.wall_ids.contains(&outcome.merged));
        assert_eq!(r.boundary.len(), 4);
        assert_eq!(r.area, 50.0);
    }

    #[test]
    fn test_merge_three_segments() {
        let (store, _, walls) = rect_room();
        let (store, a) = store.split_wall(walls[0], p(50.0, 0.0)).unwrap();
        let (store, _) = store.split_wall(a.second, p(120.0, 0.0)).unwrap();
        let (store, outcome) = store.merge_wall(a.first).unwrap();
        assert_eq!(outcome.removed.len(), 3);
        let wall = store.wall_segment(outcome.merged).unwrap();
        assert_eq!(wall.start, p(0.0, 0.0));
        assert_eq!(wall.end, p(200.0, 0.0));
    }

    #[test]
    fn test_unsplit_wall_has_nothing_to_merge() {
        let (store, _, walls) = rect_room();
        assert_eq!(
            store.merge_wall(walls[1]).unwrap_err(),
            EditError::NothingToMerge { wall: walls[1] }
        );
    }

    #[test]
    fn test_fixture_over_join_blocks_merge() {
        let (store, _, walls) = rect_room();
        let (store, out) = store.split_wall(walls[0], p(100.0, 0.0)).unwrap();
        // Door on the second half, hanging over its start.
        let (store, door) = store.add_fixture(out.second, 15.0, 30.0).unwrap();
        assert_eq!(
            store.merge_wall(out.first).unwrap_err(),
            EditError::FixtureBlocksMerge { fixture: door }
        );
    }

    #[test]
    fn test_fixtures_are_rehomed_on_merge() {
        let (store, _, walls) = rect_room();
        let (store, out) = store.split_wall(walls[0], p(100.0, 0.0)).unwrap();
        let (store, window) = store.add_fixture(out.second, 50.0, 20.0).unwrap();
        let (store, outcome) = store.merge_wall(out.first).unwrap();
        let window = store.fixture(window).unwrap();
        assert_eq!(window.wall_id, outcome.merged);
        assert_eq!(window.position, 150.0);
    }

    #[test]
    fn test_partition_at_join_blocks_merge() {
        let (store, _, walls) = rect_room();
        let (store, out) = store.split_wall(walls[0], p(100.0, 0.0)).unwrap();
        let (store, _) = store.add_wall(p(100.0, 0.0), p(100.0, 100.0)).unwrap();
        assert_eq!(
            store.merge_wall(out.first).unwrap_err(),
            EditError::JunctionInUse { vertex: out.vertex }
        );
    }

    #[test]
    fn test_bent_join_blocks_merge() {
        let (store, _, walls) = rect_room();
        let (store, out) = store.split_wall(walls[0], p(100.0, 0.0)).unwrap();
        let store = store.move_vertex(out.vertex, p(100.0, -40.0)).unwrap();
        assert!(matches!(
            store.merge_wall(out.first),
            Err(EditError::NotCollinear { .. })
        ));
    }

    #[test]
    fn test_removing_last_fixture_merges_wall() {
        let (store, _, walls) = rect_room();
        let (store, door) = store.add_fixture(walls[0], 60.0, 30.0).unwrap();
        // The editor split the wall right after the door.
        let (store, out) = store.split_wall(walls[0], p(120.0, 0.0)).unwrap();

        let (store, merged) = store.remove_fixture(door).unwrap();
        let outcome = merged.expect("wall should merge once the door is gone");
        assert!(store.fixtures().is_empty());
        assert!(store.wall(out.first).is_none());
        assert_eq!(store.wall_segment(outcome.merged).unwrap().end, p(200.0, 0.0));
    }

    #[test]
    fn test_removing_fixture_with_blocked_merge_keeps_segments() {
        let (store, _, walls) = rect_room();
        let (store, out) = store.split_wall(walls[0], p(100.0, 0.0)).unwrap();
        let (store, door) = store.add_fixture(out.first, 30.0, 20.0).unwrap();
        let (store, blocker) = store.add_fixture(out.second, 15.0, 30.0).unwrap();

        let (store, merged) = store.remove_fixture(door).unwrap();
        assert!(merged.is_none());
        assert!(store.fixture(door).is_none());
        assert!(store.fixture(blocker).is_some());
        assert!(store.wall(out.first).is_some());
    }
}
