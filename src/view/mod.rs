mod depth;
mod geometry;

pub use depth::{DepthEncoding, DepthLookup, Disparity};
pub use geometry::{DerivedGeometry, ViewingParameters};
