use crate::error::SirdsError;

/// Millimetres per inch, for DPI → pixels-per-mm.
const MM_PER_INCH: f32 = 25.4;

/// Physical viewing set-up, in millimetres (except `pmm`).
///
/// * `z_near` / `z_far` are the clip planes the host rendered its depth
///   buffers with, already in the *scaled* units of [`DerivedGeometry`].
///   [`with_screen_planes`](Self::with_screen_planes) fills them the way
///   a stereogram host usually does: near plane on the screen, far plane
///   `offset_distance` behind it.
/// * Immutable for the duration of one synthesis pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewingParameters {
    pub view_distance: f32,
    pub offset_distance: f32,
    pub eye_separation: f32,
    /// Pixels per millimetre of the output device.
    pub pmm: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for ViewingParameters {
    /// 40 cm viewing distance, 20 cm depth range, 65 mm eyes on a 96 DPI
    /// screen. Clip planes are left unset (0).
    fn default() -> Self {
        Self {
            view_distance: 400.0,
            offset_distance: 200.0,
            eye_separation: 65.0,
            pmm: Self::pmm_from_dpi(96.0),
            z_near: 0.0,
            z_far: 0.0,
        }
    }
}

impl ViewingParameters {
    /// Pixels per millimetre for a display of `dpi` dots per inch.
    #[inline]
    pub fn pmm_from_dpi(dpi: f32) -> f32 {
        dpi / MM_PER_INCH
    }

    /// Place the near plane at the screen (`vd`) and the far plane
    /// `os` behind it, for an output `height` pixels tall.
    pub fn with_screen_planes(mut self, height: usize) -> Self {
        let h = height.max(1) as f32;
        let vd = self.pmm * self.view_distance / h;
        let os = self.pmm * self.offset_distance / h;
        self.z_near = vd;
        self.z_far = vd + os;
        self
    }
}

/// Scaled distances derived from [`ViewingParameters`] and the output
/// resolution. All lengths are in units of *screen heights*.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedGeometry {
    pub vd: f32,
    pub es: f32,
    pub os: f32,
    pub half_width: f32,
    pub height: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub width_px: usize,
    pub height_px: usize,
}

impl DerivedGeometry {
    /// Validate `params` and derive the scaled geometry for a
    /// `width` × `height` output.
    pub fn new(params: &ViewingParameters, width: usize, height: usize) -> Result<Self, SirdsError> {
        if width == 0 || height == 0 {
            return Err(SirdsError::Resolution { width, height });
        }
        positive("pmm", params.pmm)?;
        positive("view_distance", params.view_distance)?;
        positive("eye_separation", params.eye_separation)?;
        if !params.offset_distance.is_finite() {
            return Err(SirdsError::ViewingParameter {
                name: "offset_distance",
                value: params.offset_distance,
            });
        }

        let (near, far) = (params.z_near, params.z_far);
        if !(near.is_finite() && far.is_finite() && near > 0.0 && near < far) {
            return Err(SirdsError::DepthRange { near, far });
        }

        let h = height as f32;
        Ok(Self {
            vd: params.pmm * params.view_distance / h,
            es: params.pmm * params.eye_separation / h,
            os: params.pmm * params.offset_distance / h,
            half_width: width as f32 / 2.0,
            height: h,
            z_near: near,
            z_far: far,
            width_px: width,
            height_px: height,
        })
    }

    /// Number of samples in one depth buffer / the output buffer.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width_px * self.height_px
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), SirdsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SirdsError::ViewingParameter { name, value })
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
