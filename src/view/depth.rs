//! Depth sample → horizontal disparity.
//!
//! A sample from the left-eye buffer is turned back into an eye-space
//! distance `z`, then into
//!
//! * the pixel shift `v` between the two dots that show that point, and
//! * the column of the *partner* (right-eye) buffer that sees the same
//!   world point, by similar triangles through the screen plane.

use super::geometry::DerivedGeometry;

/// How the host stored depth in its buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepthEncoding {
    /// Window-space perspective depth in `[0, 1]` (1 = far plane):
    ///
    /// ```text
    /// zp = f/(f-n) - n·f / ((f-n)·z)
    /// ```
    ///
    /// This is what a `[0,1]` left-handed perspective projection leaves in
    /// the depth target. Note `f/(f-n) = 0.5 + (n+f)/(2(f-n))`.
    #[default]
    Perspective,
    /// Samples already hold eye-space distance in scaled units.
    Linear,
}

impl DepthEncoding {
    /// Eye-space distance of a buffer sample.
    #[inline]
    pub fn linearize(self, zp: f32, near: f32, far: f32) -> f32 {
        match self {
            DepthEncoding::Perspective => {
                let zp = zp.clamp(0.0, 1.0);
                let range = far - near;
                (-near * far / range) / (zp - 0.5 - (near + far) / (2.0 * range))
            }
            DepthEncoding::Linear => zp.clamp(near, far),
        }
    }

    /// Buffer sample for eye-space distance `z` (inverse of
    /// [`linearize`](Self::linearize)).
    #[inline]
    pub fn encode(self, z: f32, near: f32, far: f32) -> f32 {
        match self {
            DepthEncoding::Perspective => {
                let z = z.clamp(near, far);
                let range = far - near;
                (far / range - near * far / (range * z)).clamp(0.0, 1.0)
            }
            DepthEncoding::Linear => z.clamp(near, far),
        }
    }
}

/// Result of one depth lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disparity {
    /// Signed pixel shift between the two dots of this point.
    pub shift: f32,
    /// Column in the partner buffer; may lie outside the row.
    pub partner: i32,
}

impl Disparity {
    /// Partner column if it lies inside a row of `width` pixels.
    #[inline]
    pub fn partner_column(&self, width: usize) -> Option<usize> {
        usize::try_from(self.partner).ok().filter(|&x| x < width)
    }
}

/// Everything a depth lookup needs, copied once per pass so the row
/// workers can share it by value.
#[derive(Clone, Copy, Debug)]
pub struct DepthLookup {
    geom: DerivedGeometry,
    reverse: bool,
    encoding: DepthEncoding,
}

impl DepthLookup {
    pub fn new(geom: DerivedGeometry, reverse: bool, encoding: DepthEncoding) -> Self {
        Self {
            geom,
            reverse,
            encoding,
        }
    }

    #[inline]
    pub fn geometry(&self) -> &DerivedGeometry {
        &self.geom
    }

    /// Eye-space distance of sample `zp`.
    #[inline]
    pub fn eye_depth(&self, zp: f32) -> f32 {
        self.encoding.linearize(zp, self.geom.z_near, self.geom.z_far)
    }

    /// Disparity of sample `zp` seen at column `x`.
    ///
    /// ```text
    /// v  = h·es·(z - vd)/z          (reverse: h·es·(vd - z)/z)
    /// x1 = ((x - w/2)/h · z/vd - es) · vd/z · h + w/2
    /// ```
    #[inline]
    pub fn disparity(&self, zp: f32, x: usize) -> Disparity {
        let g = &self.geom;
        let z = self.eye_depth(zp);

        let shift = if self.reverse {
            g.height * g.es * (g.vd - z) / z
        } else {
            g.height * g.es * (z - g.vd) / z
        };

        // project through the screen plane into the other eye
        let mut xvd = (x as f32 - g.half_width) / g.height;
        xvd *= z / g.vd;
        xvd -= g.es;
        xvd *= g.vd / z;
        let partner = (xvd * g.height + g.half_width).round() as i32;

        Disparity { shift, partner }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
