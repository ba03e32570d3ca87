//! Analytic depth source for the demo programs and tests.
//! Stands in for "render each eye, read the depth target back": spheres
//! floating in front of a flat backdrop, ray-cast once per eye.

use glam::{Vec3, vec3};

use crate::view::{DepthEncoding, DerivedGeometry};

/// Which eye a depth buffer belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// Horizontal eye offset in units of the eye separation.
    #[inline]
    fn offset(self) -> f32 {
        match self {
            Eye::Left => -0.5,
            Eye::Right => 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    /// Centre in scene space: x/y in screen heights, z behind the screen.
    pub center: Vec3,
    pub radius: f32,
}

/// Spheres in front of a backdrop on the far plane.
///
/// Scene space: the screen is the plane `z = 0`, one unit is one screen
/// height, `+y` is up and `+z` points away from the viewer. Eyes sit at
/// `(±es/2, 0, -vd)`, so eye-space depth is `z + vd`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepthScene {
    pub spheres: Vec<Sphere>,
}

impl DepthScene {
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// A ring of `count` spheres orbiting the centre, turned by `t` radians.
    pub fn orbit(count: usize, t: f32, geom: &DerivedGeometry) -> Self {
        let depth = (geom.z_far - geom.vd).max(0.0);
        let ring = 0.25 * geom.half_width / geom.height;
        let spheres = (0..count)
            .map(|i| {
                let a = t + i as f32 * std::f32::consts::TAU / count.max(1) as f32;
                let (s, c) = a.sin_cos();
                Sphere {
                    center: vec3(ring * c, 0.2 * s, depth * (0.45 + 0.25 * c)),
                    radius: 0.12,
                }
            })
            .collect();
        Self { spheres }
    }

    /// Eye-space depth of the first hit along the ray through pixel
    /// `(px, py)`, clamped to the clip planes.
    pub fn eye_depth(&self, eye: Eye, px: usize, py: usize, geom: &DerivedGeometry) -> f32 {
        // each eye looks straight ahead; dir.z == vd so the ray parameter
        // t maps to eye depth t·vd
        let origin = vec3(geom.es * eye.offset(), 0.0, -geom.vd);
        let sx = (px as f32 - geom.half_width) / geom.height;
        let sy = (geom.height * 0.5 - py as f32) / geom.height;
        let dir = vec3(sx, sy, geom.vd);

        let hit = self
            .spheres
            .iter()
            .filter_map(|s| ray_sphere(origin, dir, s))
            .fold(f32::INFINITY, f32::min);

        (hit * geom.vd).clamp(geom.z_near, geom.z_far)
    }

    /// One full depth buffer, row-major, in `encoding`.
    pub fn depth_buffer(&self, eye: Eye, geom: &DerivedGeometry, encoding: DepthEncoding) -> Vec<f32> {
        let (w, h) = (geom.width_px, geom.height_px);
        let mut buf = Vec::with_capacity(w * h);
        for py in 0..h {
            for px in 0..w {
                let z = self.eye_depth(eye, px, py, geom);
                buf.push(encoding.encode(z, geom.z_near, geom.z_far));
            }
        }
        buf
    }
}

/// Nearest positive ray parameter where `origin + t·dir` meets `s`.
fn ray_sphere(origin: Vec3, dir: Vec3, s: &Sphere) -> Option<f32> {
    let oc = origin - s.center;
    let a = dir.length_squared();
    let b = oc.dot(dir);
    let c = oc.length_squared() - s.radius * s.radius;
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    [(-b - root) / a, (-b + root) / a]
        .into_iter()
        .find(|&t| t > 0.0)
}

/*──────────────────────────────── Tests ───────────────────────────────*/
