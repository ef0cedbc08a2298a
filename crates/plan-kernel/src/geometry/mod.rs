pub mod point;
pub mod segment;
pub mod polygon;
