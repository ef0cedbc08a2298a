use serde::{Deserialize, Serialize};

use plan_kernel::measure::length_to_units;
use plan_kernel::{
    BoundaryMethod, FixtureId, Hit, KernelConfig, Point, RoomId, SnapResult, TopologyStore,
    WallId, WallSegment,
};

fn default_room_height() -> f64 {
    2.4
}

/// Messages from the canvas UI to the plan kernel.
/// Serialized as JSON with a `type` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToKernel {
    /// Replace the kernel thresholds; rooms are re-derived under the new scale.
    Configure {
        config: KernelConfig,
    },

    // -- Drawing --
    AddWall {
        start: Point,
        end: Point,
    },
    AddRoom {
        name: String,
        #[serde(default = "default_room_height")]
        height: f64,
        walls: Vec<WallId>,
    },
    /// Place a door or window centered `position` px from the wall start.
    AddFixture {
        wall: WallId,
        position: f64,
        width: f64,
    },
    RemoveWall {
        wall: WallId,
    },
    RemoveRoom {
        room: RoomId,
    },
    /// Remove a fixture and merge its wall back together if possible.
    RemoveFixture {
        fixture: FixtureId,
    },

    // -- Topology --
    SplitWall {
        wall: WallId,
        point: Point,
    },
    MergeWall {
        wall: WallId,
    },

    // -- Pointer queries --
    Snap {
        point: Point,
        #[serde(default)]
        exclude: Option<WallId>,
        /// Also offer wall interiors as split targets.
        #[serde(default)]
        interior: bool,
    },
    HitTest {
        point: Point,
    },

    // -- Endpoint drag --
    BeginDrag {
        point: Point,
    },
    DragTo {
        point: Point,
    },
    EndDrag,
    CancelDrag,
}

/// Messages from the plan kernel back to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum KernelToUi {
    /// The plan changed; full redraw data.
    PlanUpdated {
        walls: Vec<WallView>,
        rooms: Vec<RoomView>,
        fixtures: Vec<FixtureView>,
    },

    SnapFound { snap: Option<SnapResult> },

    HitFound { hit: Option<Hit> },

    /// Walls touched by the drag in progress, at their preview positions.
    DragPreview { walls: Vec<WallView> },

    /// The edit was refused; the plan is unchanged.
    Rejected { reason: String },

    /// The message could not be handled at all.
    Error { message: String },
}

/// A wall ready to draw, with its dimension label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallView {
    pub id: WallId,
    pub start: Point,
    pub end: Point,
    pub length: f64,
    pub label: String,
}

impl WallView {
    pub fn new(segment: &WallSegment, config: &KernelConfig) -> Self {
        let length = segment.length();
        Self {
            id: segment.id,
            start: segment.start,
            end: segment.end,
            length,
            label: length_to_units(length, config).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    pub id: RoomId,
    pub name: String,
    pub height: f64,
    pub area: f64,
    pub boundary: Vec<Point>,
    pub boundary_method: BoundaryMethod,
    pub wall_ids: Vec<WallId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureView {
    pub id: FixtureId,
    pub wall_id: WallId,
    pub position: f64,
    pub width: f64,
}

/// Full redraw payload for `plan`.
pub fn plan_updated(plan: &TopologyStore) -> KernelToUi {
    let config = plan.config();
    KernelToUi::PlanUpdated {
        walls: plan
            .wall_segments()
            .iter()
            .map(|s| WallView::new(s, config))
            .collect(),
        rooms: plan
            .rooms()
            .iter()
            .map(|(id, room)| RoomView {
                id,
                name: room.name.clone(),
                height: room.height,
                area: room.area,
                boundary: room.boundary.clone(),
                boundary_method: room.boundary_method,
                wall_ids: room.wall_ids.iter().copied().collect(),
            })
            .collect(),
        fixtures: plan
            .fixtures()
            .iter()
            .map(|(id, f)| FixtureView {
                id,
                wall_id: f.wall_id,
                position: f.position,
                width: f.width,
            })
            .collect(),
    }
}
