use std::collections::BTreeSet;

use tracing::{info, instrument};

use super::entities::*;
use super::store::TopologyStore;
use crate::error::EditError;
use crate::geometry::point::Point;
use crate::query::vertex_near;

/// An in-flight endpoint drag.
///
/// The grabbed vertex, any vertices stacked on top of it, their walls and
/// the rooms those walls belong to are resolved once when the drag starts.
/// Updates only move the cached vertices on a preview snapshot; rooms are
/// re-derived on [`DragSession::commit`].
#[derive(Debug, Clone)]
pub struct DragSession {
    original: TopologyStore,
    preview: TopologyStore,
    anchor: VertexId,
    vertices: Vec<VertexId>,
    walls: Vec<WallId>,
    rooms: Vec<RoomId>,
}

impl DragSession {
    /// Start dragging the vertex under `point`, if any is within
    /// `endpoint_hover_radius`.
    pub fn begin(store: &TopologyStore, point: Point) -> Option<Self> {
        let vertex = vertex_near(point, store)?;
        Self::for_vertex(store, vertex).ok()
    }

    #[instrument(skip(store))]
    pub fn for_vertex(store: &TopologyStore, anchor: VertexId) -> Result<Self, EditError> {
        if !store.vertices.contains_key(anchor) {
            return Err(EditError::VertexNotFound { vertex: anchor });
        }
        let vertices = store.coincident_vertices(anchor);
        let walls: Vec<WallId> = store
            .walls
            .iter()
            .filter(|(_, w)| vertices.contains(&w.start) || vertices.contains(&w.end))
            .map(|(id, _)| id)
            .collect();
        let rooms: Vec<RoomId> = walls
            .iter()
            .flat_map(|&w| store.rooms_with_wall(w))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            original: store.clone(),
            preview: store.clone(),
            anchor,
            vertices,
            walls,
            rooms,
        })
    }

    /// Move every grabbed vertex to `to`.
    pub fn update(&mut self, to: Point) {
        for &id in &self.vertices {
            if let Some(v) = self.preview.vertices.get_mut(id) {
                v.point = to;
            }
        }
    }

    pub fn anchor(&self) -> VertexId {
        self.anchor
    }

    /// Current preview. Room boundaries and areas here are stale until commit.
    pub fn preview(&self) -> &TopologyStore {
        &self.preview
    }

    /// Walls touched by the drag.
    pub fn walls(&self) -> &[WallId] {
        &self.walls
    }

    /// Rooms that will be re-derived on commit.
    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }

    /// Touched walls at their preview positions.
    pub fn preview_segments(&self) -> Vec<WallSegment> {
        self.walls
            .iter()
            .filter_map(|&id| self.preview.wall_segment(id))
            .collect()
    }

    /// Finish the drag and return the plan with affected rooms re-derived.
    ///
    /// A grabbed vertex dropped within `coincidence` of a vertex outside the
    /// drag is welded onto it, so dropping a loose wall end on a corner
    /// closes the room. Rooms on both sides of a weld are re-derived.
    pub fn commit(self) -> TopologyStore {
        let mut plan = self.preview;
        let mut rooms: BTreeSet<RoomId> = self.rooms.iter().copied().collect();
        let mut welded = 0;
        for &dragged in &self.vertices {
            let Some(target) = weld_target(&plan, dragged, &self.vertices) else {
                continue;
            };
            rooms.extend(
                plan.walls_at_vertex(target)
                    .into_iter()
                    .flat_map(|w| plan.rooms_with_wall(w)),
            );
            plan.weld_into(dragged, target);
            welded += 1;
        }
        let rooms: Vec<RoomId> = rooms.into_iter().collect();
        plan.refresh_rooms(&rooms);

        let to = plan.vertices.get(self.anchor).map(|v| [v.point.x, v.point.y]);
        info!(
            anchor = ?self.anchor,
            ?to,
            vertices = self.vertices.len(),
            walls = self.walls.len(),
            rooms = rooms.len(),
            welded,
            "drag committed"
        );
        plan
    }

    /// Abandon the drag; the plan it started from is returned untouched.
    pub fn cancel(self) -> TopologyStore {
        self.original
    }
}

/// Nearest vertex outside `dragged` that `vertex` now coincides with.
fn weld_target(plan: &TopologyStore, vertex: VertexId, dragged: &[VertexId]) -> Option<VertexId> {
    let drop = plan.vertices.get(vertex)?.point;
    plan.vertices
        .iter()
        .filter(|(id, v)| !dragged.contains(id) && plan.config.points_coincident(&v.point, &drop))
        .min_by(|(_, a), (_, b)| {
            a.point
                .distance_squared_to(&drop)
                .total_cmp(&b.point.distance_squared_to(&drop))
        })
        .map(|(id, _)| id)
}

impl TopologyStore {
    /// Move a vertex (and anything stacked on it) in one step, welding it
    /// onto any vertex it lands on.
    pub fn move_vertex(&self, vertex: VertexId, to: Point) -> Result<Self, EditError> {
        let mut session = DragSession::for_vertex(self, vertex)?;
        session.update(to);
        Ok(session.commit())
    }
}
