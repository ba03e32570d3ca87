//! Command-line knobs shared by the host programs.

use clap::Args;

use crate::{
    Rgba,
    sirds::{DotStyle, SeedPolicy, StereoConfig},
    view::{DepthEncoding, ViewingParameters},
};

/// Viewing set-up and stereogram appearance.
#[derive(Args, Debug, Clone)]
pub struct StereoArgs {
    /// Eye-to-screen distance in millimetres.
    #[arg(long, default_value_t = 400.0)]
    pub view_distance: f32,

    /// Depth of the scene behind the screen, in millimetres.
    #[arg(long, default_value_t = 200.0)]
    pub offset_distance: f32,

    /// Distance between the eyes in millimetres.
    #[arg(long, default_value_t = 65.0)]
    pub eye_separation: f32,

    /// Display density, dots per inch.
    #[arg(long, default_value_t = 96.0)]
    pub dpi: f32,

    /// Dot bias: a random byte above this picks `color2`.
    #[arg(long, default_value_t = 127)]
    pub density: u8,

    /// First dot colour, `RRGGBB` or `AARRGGBB` (optional `#`/`0x`).
    #[arg(long, value_parser = parse_color, default_value = "000000")]
    pub color1: Rgba,

    /// Second dot colour.
    #[arg(long, value_parser = parse_color, default_value = "FFFFFF")]
    pub color2: Rgba,

    /// Cross-eyed instead of wall-eyed viewing.
    #[arg(long)]
    pub reverse: bool,

    /// Keep links that only one eye can see.
    #[arg(long)]
    pub keep_hidden: bool,

    /// Seed of the dot field.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Draw a fresh dot field every frame.
    #[arg(long)]
    pub shimmer: bool,
}

impl StereoArgs {
    /// Viewing parameters with clip planes set for an output `height`
    /// pixels tall.
    pub fn viewing(&self, height: usize) -> ViewingParameters {
        ViewingParameters {
            view_distance: self.view_distance,
            offset_distance: self.offset_distance,
            eye_separation: self.eye_separation,
            pmm: ViewingParameters::pmm_from_dpi(self.dpi),
            z_near: 0.0,
            z_far: 0.0,
        }
        .with_screen_planes(height)
    }

    pub fn config(&self) -> StereoConfig {
        StereoConfig {
            style: DotStyle {
                density: self.density,
                color1: self.color1,
                color2: self.color2,
            },
            reverse: self.reverse,
            remove_hidden: !self.keep_hidden,
            encoding: DepthEncoding::Perspective,
            seed: if self.shimmer {
                SeedPolicy::PerFrame(self.seed)
            } else {
                SeedPolicy::Fixed(self.seed)
            },
        }
    }
}

/// Parse `RRGGBB` / `AARRGGBB`, with an optional `#` or `0x` prefix.
/// Six-digit colours are made opaque.
pub fn parse_color(s: &str) -> Result<Rgba, String> {
    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    let value = u32::from_str_radix(hex, 16).map_err(|e| format!("bad colour `{s}`: {e}"))?;
    match hex.len() {
        6 => Ok(0xFF00_0000 | value),
        8 => Ok(value),
        n => Err(format!("bad colour `{s}`: expected 6 or 8 hex digits, got {n}")),
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
