//! Read-only pointer queries: snapping, hit-testing and vertex picking.

pub mod hit;
pub mod snap;

pub use hit::{hit_test, hit_test_room, hit_test_wall, point_in_polygon, vertex_near, Hit, WallHit};
pub use snap::{find_closest_endpoint, find_closest_snap_point, Endpoint, SnapResult};
