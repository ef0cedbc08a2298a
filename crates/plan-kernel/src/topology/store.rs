use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::{debug, instrument, warn};

use super::entities::*;
use crate::boundary::{reconstruct, WallGraph};
use crate::config::KernelConfig;
use crate::error::EditError;
use crate::geometry::point::Point;
use crate::geometry::polygon::Rect;
use crate::measure::{compute_area, AreaSource};

// ─── Topology Store ──────────────────────────────────────────────────────────

/// Arena-based snapshot of a floor plan.
///
/// Edit entry points borrow the current snapshot and return a new one;
/// the receiver is never modified, so a renderer holding it keeps seeing a
/// consistent plan. Room boundaries and areas in a returned snapshot are
/// always up to date with its walls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyStore {
    pub(crate) vertices: SlotMap<VertexId, Vertex>,
    pub(crate) walls: SlotMap<WallId, Wall>,
    pub(crate) rooms: SlotMap<RoomId, Room>,
    pub(crate) fixtures: SlotMap<FixtureId, WallFixture>,
    pub(crate) config: KernelConfig,
}

impl TopologyStore {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Same plan under a new configuration, with every room re-derived.
    pub fn with_config(&self, config: KernelConfig) -> Self {
        let mut next = self.clone();
        next.config = config;
        let all: Vec<RoomId> = next.rooms.keys().collect();
        next.refresh_rooms(&all);
        next
    }

    // ── Read access ──────────────────────────────────────────────────────

    pub fn vertices(&self) -> &SlotMap<VertexId, Vertex> {
        &self.vertices
    }

    pub fn walls(&self) -> &SlotMap<WallId, Wall> {
        &self.walls
    }

    pub fn rooms(&self) -> &SlotMap<RoomId, Room> {
        &self.rooms
    }

    pub fn fixtures(&self) -> &SlotMap<FixtureId, WallFixture> {
        &self.fixtures
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn wall(&self, id: WallId) -> Option<&Wall> {
        self.walls.get(id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn fixture(&self, id: FixtureId) -> Option<&WallFixture> {
        self.fixtures.get(id)
    }

    /// Wall `id` with its endpoints resolved.
    pub fn wall_segment(&self, id: WallId) -> Option<WallSegment> {
        let wall = self.walls.get(id)?;
        Some(WallSegment {
            id,
            start: self.vertices.get(wall.start)?.point,
            end: self.vertices.get(wall.end)?.point,
        })
    }

    /// Every resolvable wall, in arena order.
    pub fn wall_segments(&self) -> Vec<WallSegment> {
        self.walls
            .keys()
            .filter_map(|id| self.wall_segment(id))
            .collect()
    }

    pub fn walls_at_vertex(&self, vertex: VertexId) -> Vec<WallId> {
        self.walls
            .iter()
            .filter(|(_, w)| w.start == vertex || w.end == vertex)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn rooms_with_wall(&self, wall: WallId) -> Vec<RoomId> {
        self.rooms
            .iter()
            .filter(|(_, r)| r.wall_ids.contains(&wall))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn fixtures_on_wall(&self, wall: WallId) -> Vec<(FixtureId, WallFixture)> {
        self.fixtures
            .iter()
            .filter(|(_, f)| f.wall_id == wall)
            .map(|(id, f)| (id, *f))
            .collect()
    }

    /// Closest vertex within `radius` of `point`.
    pub fn nearest_vertex(&self, point: Point, radius: f64) -> Option<VertexId> {
        self.vertices
            .iter()
            .map(|(id, v)| (id, v.point.distance_to(&point)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// `vertex` plus any other vertex sitting on top of it.
    pub fn coincident_vertices(&self, vertex: VertexId) -> Vec<VertexId> {
        let Some(anchor) = self.vertices.get(vertex) else {
            return Vec::new();
        };
        self.vertices
            .iter()
            .filter(|(id, v)| *id == vertex || self.config.points_coincident(&v.point, &anchor.point))
            .map(|(id, _)| id)
            .collect()
    }

    /// Bounding box of a room's member walls.
    pub fn room_bounds(&self, room: RoomId) -> Option<Rect> {
        let room = self.rooms.get(room)?;
        let points: Vec<Point> = room
            .wall_ids
            .iter()
            .filter_map(|&id| self.wall_segment(id))
            .flat_map(|s| [s.start, s.end])
            .collect();
        Rect::from_points(&points)
    }

    /// Wall graph of a room's members. Dangling wall ids are skipped.
    pub fn room_graph(&self, room_id: RoomId) -> Option<WallGraph<VertexId>> {
        let room = self.rooms.get(room_id)?;
        let mut graph = WallGraph::new();
        for &wall_id in &room.wall_ids {
            let Some(wall) = self.walls.get(wall_id) else {
                warn!(?room_id, ?wall_id, "room references a missing wall, skipping it");
                continue;
            };
            let (Some(a), Some(b)) = (self.vertices.get(wall.start), self.vertices.get(wall.end))
            else {
                warn!(?room_id, ?wall_id, "wall references a missing vertex, skipping it");
                continue;
            };
            graph.add_wall(wall.start, a.point, wall.end, b.point);
        }
        Some(graph)
    }

    // ── Caller-driven creation and deletion ──────────────────────────────

    #[instrument(skip(self), fields(start = ?[start.x, start.y], end = ?[end.x, end.y]))]
    pub fn add_wall(&self, start: Point, end: Point) -> Result<(Self, WallId), EditError> {
        let length = start.distance_to(&end);
        if self.config.is_zero_length(length) {
            return Err(EditError::ZeroLengthWall { length });
        }
        let mut next = self.clone();
        let a = next.weld_vertex(start);
        let b = next.weld_vertex(end);
        if a == b {
            return Err(EditError::ZeroLengthWall { length });
        }
        let wall = next.walls.insert(Wall {
            start: a,
            end: b,
            lineage: None,
        });
        debug!(?wall, "wall added");
        Ok((next, wall))
    }

    #[instrument(skip(self, name, walls))]
    pub fn add_room(
        &self,
        name: &str,
        height: f64,
        walls: impl IntoIterator<Item = WallId>,
    ) -> Result<(Self, RoomId), EditError> {
        let wall_ids: BTreeSet<WallId> = walls.into_iter().collect();
        if let Some(&wall) = wall_ids.iter().find(|id| !self.walls.contains_key(**id)) {
            return Err(EditError::WallNotFound { wall });
        }
        let mut next = self.clone();
        let room = next.rooms.insert(Room::new(name, height, wall_ids));
        next.refresh_room(room);
        debug!(?room, "room added");
        Ok((next, room))
    }

    #[instrument(skip(self))]
    pub fn add_fixture(
        &self,
        wall: WallId,
        position: f64,
        width: f64,
    ) -> Result<(Self, FixtureId), EditError> {
        let segment = self
            .wall_segment(wall)
            .ok_or(EditError::WallNotFound { wall })?;
        if !width.is_finite() || width <= 0.0 {
            return Err(EditError::InvalidFixtureWidth { width });
        }
        let fixture = WallFixture {
            wall_id: wall,
            position,
            width,
        };
        let (lo, hi) = fixture.extent();
        let length = segment.length();
        if lo < 0.0 || hi > length {
            return Err(EditError::FixtureOutOfBounds {
                position,
                width,
                length,
            });
        }
        let mut next = self.clone();
        let id = next.fixtures.insert(fixture);
        debug!(fixture = ?id, "fixture added");
        Ok((next, id))
    }

    /// Delete a wall together with its fixtures and drop it from every room.
    #[instrument(skip(self))]
    pub fn remove_wall(&self, wall: WallId) -> Result<Self, EditError> {
        let removed = *self.walls.get(wall).ok_or(EditError::WallNotFound { wall })?;
        let mut next = self.clone();
        next.walls.remove(wall);
        next.fixtures.retain(|_, f| f.wall_id != wall);
        let affected = next.rooms_with_wall(wall);
        for &room in &affected {
            if let Some(r) = next.rooms.get_mut(room) {
                r.wall_ids.remove(&wall);
            }
        }
        next.prune_vertex(removed.start);
        next.prune_vertex(removed.end);
        next.refresh_rooms(&affected);
        debug!(rooms = affected.len(), "wall removed");
        Ok(next)
    }

    /// Delete a room. Its walls stay.
    pub fn remove_room(&self, room: RoomId) -> Result<Self, EditError> {
        if !self.rooms.contains_key(room) {
            return Err(EditError::RoomNotFound { room });
        }
        let mut next = self.clone();
        next.rooms.remove(room);
        Ok(next)
    }

    // ── Internal maintenance ─────────────────────────────────────────────

    /// Existing vertex within the coincidence tolerance of `point`, or a new one.
    pub(crate) fn weld_vertex(&mut self, point: Point) -> VertexId {
        match self.nearest_vertex(point, self.config.coincidence) {
            Some(id) if self.config.points_coincident(&self.vertices[id].point, &point) => id,
            _ => self.vertices.insert(Vertex { point }),
        }
    }

    /// Remove `vertex` if no wall references it any more.
    pub(crate) fn prune_vertex(&mut self, vertex: VertexId) {
        if self.walls_at_vertex(vertex).is_empty() {
            self.vertices.remove(vertex);
        }
    }

    /// Point every wall end at `from` to `into`, then drop `from`.
    ///
    /// A wall that ends up running from `into` to itself is removed together
    /// with its fixtures and its room memberships.
    pub(crate) fn weld_into(&mut self, from: VertexId, into: VertexId) {
        let mut collapsed = Vec::new();
        for (id, wall) in self.walls.iter_mut() {
            if wall.start == from {
                wall.start = into;
            }
            if wall.end == from {
                wall.end = into;
            }
            if wall.start == wall.end {
                collapsed.push(id);
            }
        }
        for wall in collapsed {
            self.walls.remove(wall);
            self.fixtures.retain(|_, f| f.wall_id != wall);
            for room in self.rooms.values_mut() {
                room.wall_ids.remove(&wall);
            }
        }
        self.prune_vertex(from);
    }

    /// Re-derive a room's boundary and area from its current walls.
    pub(crate) fn refresh_room(&mut self, room_id: RoomId) {
        let Some(graph) = self.room_graph(room_id) else {
            return;
        };
        let rebuilt = reconstruct(&graph);
        let area = compute_area(AreaSource::for_reconstruction(&rebuilt), self.config.scale);
        if let Some(room) = self.rooms.get_mut(room_id) {
            debug!(?room_id, method = ?rebuilt.method, vertices = rebuilt.polygon.len(), area, "room re-derived");
            room.boundary = rebuilt.polygon;
            room.boundary_method = rebuilt.method;
            room.area = area;
        }
    }

    pub(crate) fn refresh_rooms(&mut self, rooms: &[RoomId]) {
        for &room in rooms {
            self.refresh_room(room);
        }
    }
}
