use rand::RngCore;

use super::links::LinkTable;
use crate::Rgba;

/// Dot appearance: two colours and the bias between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DotStyle {
    /// A random byte above `density` picks `color2`, otherwise `color1`.
    pub density: u8,
    pub color1: Rgba,
    pub color2: Rgba,
}

impl Default for DotStyle {
    /// Even black/white noise.
    fn default() -> Self {
        Self {
            density: 127,
            color1: 0xFF_00_00_00,
            color2: 0xFF_FF_FF_FF,
        }
    }
}

impl DotStyle {
    /// Colour for one random byte.
    #[inline]
    pub fn pick(&self, r: u8) -> Rgba {
        if r > self.density { self.color2 } else { self.color1 }
    }

    /// Paint one scan-line from its finished `links`.
    ///
    /// Chain heads draw a fresh dot from `rng`; every other column copies
    /// the pixel its `prev` link points at, which lies to its left and has
    /// therefore already been written.
    pub fn fill_row<R: RngCore>(&self, links: &LinkTable, row: &mut [Rgba], rng: &mut R) {
        debug_assert_eq!(links.len(), row.len());
        for x in 0..row.len() {
            let from = links.prev(x);
            row[x] = if from != x {
                row[from]
            } else {
                self.pick((rng.next_u32() & 0xff) as u8)
            };
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const RED: Rgba = 0xFF_FF_00_00;
    const BLUE: Rgba = 0xFF_00_00_FF;

    fn style(density: u8) -> DotStyle {
        DotStyle {
            density,
            color1: RED,
            color2: BLUE,
        }
    }

    #[test]
    fn density_threshold() {
        let s = style(100);
        assert_eq!(s.pick(100), RED);
        assert_eq!(s.pick(101), BLUE);
        assert_eq!(style(255).pick(255), RED);
        assert_eq!(style(0).pick(0), RED);
        assert_eq!(style(0).pick(1), BLUE);
    }

    #[test]
    fn full_density_is_solid_color1() {
        let links = LinkTable::identity(32);
        let mut row = vec![0; 32];
        style(255).fill_row(&links, &mut row, &mut StdRng::seed_from_u64(7));
        assert!(row.iter().all(|&px| px == RED));
    }

    #[test]
    fn chained_columns_share_a_dot() {
        let mut links = LinkTable::identity(12);
        links.splice(1, 5);
        links.splice(5, 9);
        links.splice(2, 7);
        let mut row = vec![0; 12];
        style(127).fill_row(&links, &mut row, &mut StdRng::seed_from_u64(42));

        assert_eq!(row[1], row[5]);
        assert_eq!(row[5], row[9]);
        assert_eq!(row[2], row[7]);
        assert!(row.iter().all(|&px| px == RED || px == BLUE));
    }

    #[test]
    fn same_seed_same_row() {
        let links = LinkTable::identity(64);
        let mut a = vec![0; 64];
        let mut b = vec![0; 64];
        style(127).fill_row(&links, &mut a, &mut StdRng::seed_from_u64(3));
        style(127).fill_row(&links, &mut b, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
