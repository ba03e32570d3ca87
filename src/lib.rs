//! Single-image random-dot stereograms (SIRDS) from stereo depth buffers.
//!
//! The host renders its scene once per eye, reads back the two depth
//! targets and hands them to a [`SirdsEngine`]. The engine links every
//! pair of columns that must show the same dot, then fills each scan-line
//! with random dots that respect those links.
//!
//! ```text
//!   ViewingParameters ──init_geometry──▶ DerivedGeometry
//!                                             │
//!   left depth ┐                              ▼
//!              ├─ render ─▶ per row: LinkTable ─▶ dither ─▶ [Rgba]
//!   right depth┘
//! ```

pub mod cli;
pub mod error;
pub mod scene;
pub mod sirds;
pub mod view;

pub use error::SirdsError;
pub use sirds::{DotStyle, LinkTable, PassStats, SeedPolicy, SirdsEngine, StereoConfig};
pub use view::{DepthEncoding, DerivedGeometry, Disparity, ViewingParameters};

/// Pixel format of the output buffer (0xAARRGGBB).
pub type Rgba = u32;
