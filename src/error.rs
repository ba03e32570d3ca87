use thiserror::Error;

/// Things that can go wrong when configuring or running the engine.
///
/// Every variant is raised *before* any row is processed, so a failed
/// call never leaves a half-written output buffer behind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SirdsError {
    /// Far plane must lie strictly behind the near plane.
    #[error("invalid depth range: z_near {near} must be < z_far {far}")]
    DepthRange { near: f32, far: f32 },

    /// Zero-sized output.
    #[error("invalid output resolution {width}x{height}")]
    Resolution { width: usize, height: usize },

    /// A viewing distance or the pixel density is not a positive number.
    #[error("viewing parameter `{name}` must be finite and > 0 (got {value})")]
    ViewingParameter { name: &'static str, value: f32 },

    /// Depth buffer does not match the configured resolution.
    #[error("{eye} depth buffer has {actual} samples, expected {expected}")]
    DepthLength {
        eye: &'static str,
        expected: usize,
        actual: usize,
    },

    /// `render` called before a successful `init_geometry`.
    #[error("viewing geometry not initialised; call init_geometry first")]
    StaleGeometry,

    /// Requested scan-line lies outside the configured height.
    #[error("row {row} out of range (height {height})")]
    Row { row: usize, height: usize },
}
