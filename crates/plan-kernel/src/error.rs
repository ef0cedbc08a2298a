use crate::topology::{FixtureId, RoomId, VertexId, WallId};

/// Why a topology edit was refused.
///
/// Edits never leave a half-applied snapshot behind: on error the caller
/// still holds the store it started from. The `Display` text is meant to be
/// shown to the user as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("wall not found: {wall:?}")]
    WallNotFound { wall: WallId },

    #[error("room not found: {room:?}")]
    RoomNotFound { room: RoomId },

    #[error("fixture not found: {fixture:?}")]
    FixtureNotFound { fixture: FixtureId },

    #[error("vertex not found: {vertex:?}")]
    VertexNotFound { vertex: VertexId },

    #[error("wall would have zero length ({length:.3} px)")]
    ZeroLengthWall { length: f64 },

    #[error("split point is {distance:.1} px away from the wall")]
    PointNotOnWall { wall: WallId, distance: f64 },

    #[error("split point is {distance:.1} px from an endpoint (minimum {minimum:.1} px)")]
    TooCloseToEndpoint { distance: f64, minimum: f64 },

    #[error("split point falls inside fixture {fixture:?}")]
    SplitInsideFixture { fixture: FixtureId },

    #[error("fixture at {position:.1} px with width {width:.1} px does not fit on a {length:.1} px wall")]
    FixtureOutOfBounds { position: f64, width: f64, length: f64 },

    #[error("fixture width must be positive, got {width}")]
    InvalidFixtureWidth { width: f64 },

    #[error("wall {wall:?} has no sibling segments to merge with")]
    NothingToMerge { wall: WallId },

    #[error("segments split from wall {wall:?} no longer form a chain")]
    BrokenLineage { wall: WallId },

    #[error("fixture {fixture:?} spans a join and blocks the merge")]
    FixtureBlocksMerge { fixture: FixtureId },

    #[error("join vertex {vertex:?} is shared with another wall")]
    JunctionInUse { vertex: VertexId },

    #[error("join vertex {vertex:?} is {distance:.1} px off the merged wall line")]
    NotCollinear { vertex: VertexId, distance: f64 },
}
