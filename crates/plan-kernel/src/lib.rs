pub mod geometry;
pub mod query;
pub mod boundary;
pub mod topology;
pub mod measure;
pub mod config;
pub mod error;

// Re-export the types callers touch on every edit.
pub use boundary::{reconstruct, BoundaryMethod, Reconstruction, WallGraph};
pub use config::KernelConfig;
pub use error::EditError;
pub use geometry::point::Point;
pub use query::{Endpoint, Hit, SnapResult, WallHit};
pub use topology::{
    DragSession, FixtureId, MergeOutcome, Room, RoomId, SplitOutcome, TopologyStore, Vertex,
    VertexId, Wall, WallFixture, WallId, WallSegment,
};
