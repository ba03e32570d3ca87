//! ---------------------------------------------------------------------------
//! Stereogram engine
//!
//! * Owns the viewing geometry, the identity link template and the output
//!   frame-buffer in **0xAARRGGBB** format.
//! * `render` fans the scan-lines out over the rayon pool. Every worker
//!   links and paints whole rows into its own slice of the buffer, so no
//!   locking is needed.
//! * Dots come from a per-row `StdRng` seeded from the frame seed and the
//!   row index, which makes a pass reproducible.
//! ---------------------------------------------------------------------------

use log::{debug, trace, warn};
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use super::{
    dither::DotStyle,
    links::{LinkTable, PassStats},
};
use crate::{
    Rgba,
    error::SirdsError,
    view::{DepthEncoding, DepthLookup, DerivedGeometry, ViewingParameters},
};

/// How each pass picks its frame seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Every pass uses the same seed: identical input, identical pixels.
    Fixed(u64),
    /// A fresh dot field per pass, derived from the base seed and the
    /// engine's pass counter.
    PerFrame(u64),
}

impl Default for SeedPolicy {
    fn default() -> Self {
        SeedPolicy::Fixed(0)
    }
}

impl SeedPolicy {
    /// Seed for pass number `frame`.
    #[inline]
    pub fn frame_seed(self, frame: u64) -> u64 {
        match self {
            SeedPolicy::Fixed(seed) => seed,
            SeedPolicy::PerFrame(base) => base ^ frame.wrapping_mul(0x9E37_79B9_7F4A_7C15),
        }
    }
}

/// Seed of the dot generator for row `y`.
#[inline]
pub fn row_seed(frame_seed: u64, y: usize) -> u64 {
    frame_seed ^ y as u64
}

/// Everything that changes what a pass looks like, short of the geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoConfig {
    pub style: DotStyle,
    /// Cross-eyed instead of wall-eyed viewing.
    pub reverse: bool,
    /// Host's preferred hidden-surface setting; `render` takes it per call.
    pub remove_hidden: bool,
    pub encoding: DepthEncoding,
    pub seed: SeedPolicy,
}

/// One stereogram context. Several may live side by side.
pub struct SirdsEngine {
    config: StereoConfig,
    geom: Option<DerivedGeometry>,
    template: LinkTable,
    pixels: Vec<Rgba>,
    frame: u64,
}

impl Default for SirdsEngine {
    fn default() -> Self {
        Self::new(StereoConfig::default())
    }
}

impl SirdsEngine {
    pub fn new(config: StereoConfig) -> Self {
        Self {
            config,
            geom: None,
            template: LinkTable::identity(0),
            pixels: Vec::new(),
            frame: 0,
        }
    }

    /*──────────────────────────── accessors ─────────────────────────────*/

    #[inline]
    pub fn config(&self) -> &StereoConfig {
        &self.config
    }

    #[inline]
    pub fn geometry(&self) -> Option<&DerivedGeometry> {
        self.geom.as_ref()
    }

    /// Output of the last pass (row-major, top-left origin).
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Number of passes rendered so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn set_config(&mut self, config: StereoConfig) {
        self.config = config;
    }

    pub fn set_density(&mut self, density: u8) {
        self.config.style.density = density;
    }

    pub fn set_colors(&mut self, color1: Rgba, color2: Rgba) {
        self.config.style.color1 = color1;
        self.config.style.color2 = color2;
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.config.reverse = reverse;
    }

    pub fn set_seed_policy(&mut self, seed: SeedPolicy) {
        self.config.seed = seed;
    }

    /*──────────────────────────── configure ─────────────────────────────*/

    /// (Re)derive the geometry for a `width` × `height` output and resize
    /// the frame-buffer if the resolution changed.
    ///
    /// On error nothing changes, including any previous geometry.
    pub fn init_geometry(
        &mut self,
        params: &ViewingParameters,
        width: usize,
        height: usize,
    ) -> Result<&DerivedGeometry, SirdsError> {
        let geom = DerivedGeometry::new(params, width, height).inspect_err(|e| {
            warn!("rejected viewing geometry {width}x{height}: {e}");
        })?;

        if self.pixels.len() != geom.pixel_count() || self.template.len() != width {
            debug!("stereogram buffer resized to {width}x{height}");
            self.pixels.clear();
            self.pixels.resize(geom.pixel_count(), 0);
            self.template = LinkTable::identity(width);
        }
        if self.geom.as_ref() != Some(&geom) {
            debug!(
                "viewing geometry: vd {:.4} es {:.4} os {:.4} planes {:.4}..{:.4}",
                geom.vd, geom.es, geom.os, geom.z_near, geom.z_far
            );
        }

        let geom = &*self.geom.insert(geom);
        Ok(geom)
    }

    /*──────────────────────────── synthesise ────────────────────────────*/

    /// Turn a left/right depth-buffer pair into the stereogram.
    pub fn render(
        &mut self,
        left: &[f32],
        right: &[f32],
        remove_hidden: bool,
    ) -> Result<&[Rgba], SirdsError> {
        self.render_with_stats(left, right, remove_hidden)
            .map(|(pixels, _)| pixels)
    }

    /// [`render`](Self::render), also reporting what the linker did.
    pub fn render_with_stats(
        &mut self,
        left: &[f32],
        right: &[f32],
        remove_hidden: bool,
    ) -> Result<(&[Rgba], PassStats), SirdsError> {
        let geom = self.checked_geometry(left, right)?;
        let lookup = DepthLookup::new(geom, self.config.reverse, self.config.encoding);
        let style = self.config.style;
        let frame_seed = self.config.seed.frame_seed(self.frame);
        let width = geom.width_px;
        let template = &self.template;

        let stats = self
            .pixels
            .par_chunks_mut(width)
            .zip(left.par_chunks(width))
            .zip(right.par_chunks(width))
            .enumerate()
            .map_init(
                || template.clone(),
                |links, (y, ((row, zll), zlr))| {
                    links.reset_from(template);
                    let stats = links.link_row(&lookup, zll, zlr, remove_hidden);
                    let mut rng = StdRng::seed_from_u64(row_seed(frame_seed, y));
                    style.fill_row(links, row, &mut rng);
                    stats
                },
            )
            .reduce(PassStats::default, |a, b| a + b);

        trace!("pass {} (seed {frame_seed:#x}): {stats:?}", self.frame);
        self.frame += 1;
        Ok((self.pixels.as_slice(), stats))
    }

    /// Link a single scan-line without painting it.
    pub fn row_links(
        &self,
        left: &[f32],
        right: &[f32],
        y: usize,
        remove_hidden: bool,
    ) -> Result<LinkTable, SirdsError> {
        let geom = self.checked_geometry(left, right)?;
        if y >= geom.height_px {
            return Err(SirdsError::Row {
                row: y,
                height: geom.height_px,
            });
        }
        let lookup = DepthLookup::new(geom, self.config.reverse, self.config.encoding);
        let span = y * geom.width_px..(y + 1) * geom.width_px;

        let mut links = self.template.clone();
        links.link_row(&lookup, &left[span.clone()], &right[span], remove_hidden);
        Ok(links)
    }

    /// Loan the finished buffer to `submit(&[Rgba], width, height)`,
    /// typically a window's `update_with_buffer`.
    pub fn present<F, T>(&self, submit: F) -> T
    where
        F: FnOnce(&[Rgba], usize, usize) -> T,
    {
        let (w, h) = self
            .geom
            .map_or((0, 0), |g| (g.width_px, g.height_px));
        submit(&self.pixels, w, h)
    }

    fn checked_geometry(&self, left: &[f32], right: &[f32]) -> Result<DerivedGeometry, SirdsError> {
        let geom = self.geom.ok_or(SirdsError::StaleGeometry)?;
        let expected = geom.pixel_count();
        for (eye, buf) in [("left", left), ("right", right)] {
            if buf.len() != expected {
                warn!("{eye} depth buffer rejected: {} samples, expected {expected}", buf.len());
                return Err(SirdsError::DepthLength {
                    eye,
                    expected,
                    actual: buf.len(),
                });
            }
        }
        Ok(geom)
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
