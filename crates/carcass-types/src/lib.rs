pub mod geometry;
pub mod piece;
pub mod space;

pub use geometry::*;
pub use piece::*;
pub use space::*;
