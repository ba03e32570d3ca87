mod dither;
mod engine;
mod links;

pub use dither::DotStyle;
pub use engine::{SeedPolicy, SirdsEngine, StereoConfig, row_seed};
pub use links::{HIDDEN_TOLERANCE, Link, LinkTable, PassStats};
