pub mod geometry;
pub mod select;
