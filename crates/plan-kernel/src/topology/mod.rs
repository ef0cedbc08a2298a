//! Wall/room/fixture topology and the edits that maintain it.

pub mod entities;
pub mod store;
pub mod split;
pub mod merge;
pub mod drag;

pub use drag::DragSession;
pub use entities::*;
pub use merge::MergeOutcome;
pub use split::SplitOutcome;
pub use store::TopologyStore;
