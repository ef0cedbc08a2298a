use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::boundary::BoundaryMethod;
use crate::geometry::point::Point;

// ─── Entity Keys ─────────────────────────────────────────────────────────────

new_key_type! {
    pub struct VertexId;
    pub struct WallId;
    pub struct RoomId;
    pub struct FixtureId;
}

// ─── Plan Entities ──────────────────────────────────────────────────────────

/// A wall endpoint shared by every wall that references it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub point: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub start: VertexId,
    pub end: VertexId,
    /// The drawn wall this segment was split from, if any. Segments sharing
    /// a lineage are candidates for merging back together.
    pub lineage: Option<WallId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub height: f64,
    /// Derived: area in square units, rounded.
    pub area: f64,
    /// Authoritative membership.
    pub wall_ids: BTreeSet<WallId>,
    /// Derived: ordered ring, empty when the walls do not enclose anything.
    pub boundary: Vec<Point>,
    pub boundary_method: BoundaryMethod,
}

impl Room {
    pub fn new(name: impl Into<String>, height: f64, wall_ids: BTreeSet<WallId>) -> Self {
        Self {
            name: name.into(),
            height,
            area: 0.0,
            wall_ids,
            boundary: Vec::new(),
            boundary_method: BoundaryMethod::Empty,
        }
    }
}

/// A door or window sitting on a wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallFixture {
    pub wall_id: WallId,
    /// Distance in pixels from the wall's start vertex to the fixture center.
    pub position: f64,
    pub width: f64,
}

impl WallFixture {
    /// Offsets along the wall covered by the fixture.
    pub fn extent(&self) -> (f64, f64) {
        let half = self.width / 2.0;
        (self.position - half, self.position + half)
    }

    pub fn covers(&self, offset: f64) -> bool {
        let (lo, hi) = self.extent();
        offset >= lo && offset <= hi
    }
}

/// A wall with its endpoints resolved to coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub id: WallId,
    pub start: Point,
    pub end: Point,
}

impl WallSegment {
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}
