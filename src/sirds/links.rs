//! Per-scan-line equivalence links.
//!
//! Every column of a row owns one [`Link`]. Columns that must show the
//! same dot are spliced into one chain. `prev` always points to a column
//! **at or left of** the current one, so a single left-to-right sweep can
//! copy each dot from an already written pixel. A column with
//! `prev == self` heads its chain; `next` is bookkeeping for the splice.
//!
//! The table is a flat index arena; nothing is allocated while a row is
//! being linked.

use std::ops::{Add, AddAssign};

use crate::view::DepthLookup;

/// Largest disparity mismatch (pixels) between the two eyes that still
/// counts as "both eyes see this point".
pub const HIDDEN_TOLERANCE: f32 = 3.0;

/// One column's links. `next` is the forward index the splice records;
/// nothing on the render path reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub next: u32,
    pub prev: u32,
}

/// Counters gathered while linking rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    pub rows: usize,
    /// Constraints accepted and spliced.
    pub accepted: usize,
    /// Constraints dropped by hidden-surface removal.
    pub hidden: usize,
    /// Columns whose partner dot fell outside the row.
    pub out_of_range: usize,
}

impl Add for PassStats {
    type Output = PassStats;

    fn add(mut self, rhs: PassStats) -> PassStats {
        self += rhs;
        self
    }
}

impl AddAssign for PassStats {
    fn add_assign(&mut self, rhs: PassStats) {
        self.rows += rhs.rows;
        self.accepted += rhs.accepted;
        self.hidden += rhs.hidden;
        self.out_of_range += rhs.out_of_range;
    }
}

/// Equivalence links for one scan-line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkTable {
    links: Vec<Link>,
}

impl LinkTable {
    /// Every column alone in its own chain.
    pub fn identity(width: usize) -> Self {
        let links = (0..width as u32).map(|x| Link { next: x, prev: x }).collect();
        Self { links }
    }

    /// Overwrite `self` with `template` without reallocating.
    pub fn reset_from(&mut self, template: &LinkTable) {
        if self.links.len() == template.links.len() {
            self.links.copy_from_slice(&template.links);
        } else {
            self.links.clone_from(&template.links);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[inline]
    pub fn link(&self, x: usize) -> Link {
        self.links[x]
    }

    /// Column this one copies its dot from (`x` itself for a chain head).
    #[inline]
    pub fn prev(&self, x: usize) -> usize {
        self.links[x].prev as usize
    }

    /// Head of the chain containing `x`.
    pub fn head(&self, mut x: usize) -> usize {
        loop {
            let p = self.prev(x);
            if p == x {
                return x;
            }
            x = p;
        }
    }

    /// Partition of the row into chains, each sorted by column, ordered
    /// by their head column.
    pub fn chains(&self) -> Vec<Vec<usize>> {
        let mut heads = vec![0usize; self.len()];
        let mut slot = vec![usize::MAX; self.len()];
        let mut out: Vec<Vec<usize>> = Vec::new();
        for x in 0..self.len() {
            let p = self.prev(x);
            // prev never points right, so heads[p] is already known
            heads[x] = if p == x { x } else { heads[p] };
            let h = heads[x];
            if slot[h] == usize::MAX {
                slot[h] = out.len();
                out.push(Vec::new());
            }
            out[slot[h]].push(x);
        }
        out
    }

    /// Force columns `a` and `b` into one chain.
    ///
    /// Walks the chain of the right column leftwards, merging the chain of
    /// the left column into it so the result stays sorted. Both chains
    /// must already be sorted, which every table built only through this
    /// method is.
    pub fn splice(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (mut left, mut right) = if a < b { (a, b) } else { (b, a) };

        let mut st = self.prev(right);
        while st != left && st != right {
            if st > left {
                right = st;
            } else {
                self.join(left, right);
                right = left;
                left = st;
            }
            st = self.prev(right);
        }
        self.join(left, right);
    }

    #[inline]
    fn join(&mut self, left: usize, right: usize) {
        self.links[left].next = right as u32;
        self.links[right].prev = left as u32;
    }

    /// Link one scan-line from its left/right depth rows.
    ///
    /// * `zll` – left-eye depth row, `zlr` – right-eye depth row.
    /// * With `remove_hidden`, pairs whose two eyes disagree by more than
    ///   [`HIDDEN_TOLERANCE`] pixels are left unlinked.
    pub fn link_row(
        &mut self,
        lookup: &DepthLookup,
        zll: &[f32],
        zlr: &[f32],
        remove_hidden: bool,
    ) -> PassStats {
        let width = self.len();
        debug_assert_eq!(zll.len(), width);
        debug_assert_eq!(zlr.len(), width);

        let mut stats = PassStats {
            rows: 1,
            ..PassStats::default()
        };

        for left in 0..width {
            let d = lookup.disparity(zll[left], left);
            let right = left as i64 + d.shift.round() as i64;
            let Some(right) = usize::try_from(right).ok().filter(|&r| r < width) else {
                stats.out_of_range += 1;
                continue;
            };
            if right == left {
                continue;
            }

            // what the other eye thinks of the same point
            let s = match d.partner_column(width) {
                Some(xr) => d.shift - lookup.disparity(zlr[xr], xr).shift,
                None => 0.0,
            };
            if remove_hidden && s.abs() > HIDDEN_TOLERANCE {
                stats.hidden += 1;
                continue;
            }

            self.splice(left, right);
            stats.accepted += 1;
        }
        stats
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{DepthEncoding, DerivedGeometry, ViewingParameters};

    /// Every column must reach its head through strictly decreasing steps.
    fn assert_sorted_chains(table: &LinkTable) {
        for x in 0..table.len() {
            let p = table.prev(x);
            assert!(p <= x, "prev[{x}] = {p} points right");
        }
    }

    fn lookup(width: usize) -> DepthLookup {
        let p = ViewingParameters {
            view_distance: 2.0,
            offset_distance: 1.0,
            eye_separation: 4.0,
            pmm: 1.0,
            z_near: 0.5,
            z_far: 2.0,
        };
        let g = DerivedGeometry::new(&p, width, 1).unwrap();
        DepthLookup::new(g, true, DepthEncoding::Perspective)
    }

    #[test]
    fn identity_is_all_singletons() {
        let t = LinkTable::identity(4);
        assert_eq!(t.chains(), vec![vec![0], vec![1], vec![2], vec![3]]);
        assert_eq!(t.link(2), Link { next: 2, prev: 2 });
    }

    #[test]
    fn splice_two_singletons() {
        let mut t = LinkTable::identity(6);
        t.splice(1, 4);
        assert_eq!(t.prev(4), 1);
        assert_eq!(t.link(1).next, 4);
        assert_eq!(t.chains(), vec![vec![0], vec![1, 4], vec![2], vec![3], vec![5]]);
    }

    #[test]
    fn splice_is_order_independent_for_pairs() {
        let mut a = LinkTable::identity(6);
        let mut b = LinkTable::identity(6);
        a.splice(1, 4);
        b.splice(4, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn splice_interleaves_sorted_chains() {
        let mut t = LinkTable::identity(10);
        t.splice(0, 4);
        t.splice(4, 8);
        t.splice(2, 6);
        // bridge the two chains through their middles
        t.splice(4, 6);
        assert_sorted_chains(&t);
        // 8 keeps hanging off 4; 6 is threaded in next to it
        assert_eq!(t.prev(8), 4);
        assert_eq!(t.prev(6), 4);
        assert_eq!(t.prev(4), 2);
        assert_eq!(t.prev(2), 0);
        assert_eq!(
            t.chains(),
            vec![vec![0, 2, 4, 6, 8], vec![1], vec![3], vec![5], vec![7], vec![9]]
        );
    }

    #[test]
    fn splice_already_joined_is_noop() {
        let mut t = LinkTable::identity(5);
        t.splice(0, 2);
        t.splice(2, 4);
        let before = t.clone();
        t.splice(0, 4);
        assert_eq!(t, before);
    }

    #[test]
    fn splice_self_is_noop() {
        let mut t = LinkTable::identity(3);
        t.splice(1, 1);
        assert_eq!(t, LinkTable::identity(3));
    }

    #[test]
    fn head_walks_to_chain_start() {
        let mut t = LinkTable::identity(7);
        t.splice(1, 3);
        t.splice(3, 6);
        assert_eq!(t.head(6), 1);
        assert_eq!(t.head(3), 1);
        assert_eq!(t.head(5), 5);
    }

    #[test]
    fn reset_restores_template() {
        let template = LinkTable::identity(5);
        let mut t = template.clone();
        t.splice(0, 3);
        t.reset_from(&template);
        assert_eq!(t, template);

        let mut other = LinkTable::identity(2);
        other.reset_from(&template);
        assert_eq!(other, template);
    }

    #[test]
    fn hidden_removal_drops_inconsistent_pairs() {
        // near blob at 10..12 shifts by 5; right eye sees only backdrop
        let width = 20;
        let near = DepthEncoding::Perspective.encode(8.0 / 9.0, 0.5, 2.0);
        let mut zll = vec![1.0f32; width];
        zll[10] = near;
        zll[11] = near;
        let zlr = vec![1.0f32; width];
        let lk = lookup(width);

        let mut kept = LinkTable::identity(width);
        let stats = kept.link_row(&lk, &zll, &zlr, false);
        assert_eq!(kept.head(15), 10);
        assert_eq!(kept.head(16), 11);
        assert_eq!(stats.hidden, 0);

        let mut culled = LinkTable::identity(width);
        let stats = culled.link_row(&lk, &zll, &zlr, true);
        assert_eq!(stats.hidden, 2);
        assert_eq!(culled, LinkTable::identity(width));
    }

    #[test]
    fn mismatch_tolerance_is_inclusive() {
        // column 10 at z = 8/7: shift 3 to column 13, right-eye partner at 3
        let width = 20;
        let enc = DepthEncoding::Perspective;
        let lk = lookup(width);
        let zlr = vec![1.0f32; width];
        let mut zll = vec![1.0f32; width];
        zll[10] = enc.encode(8.0 / 7.0, 0.5, 2.0);

        let d = lk.disparity(zll[10], 10);
        assert_eq!(d.partner_column(width), Some(3));
        let s = d.shift - lk.disparity(zlr[3], 3).shift;
        assert!((s - HIDDEN_TOLERANCE).abs() < 1e-4, "mismatch {s}");

        let mut t = LinkTable::identity(width);
        let stats = t.link_row(&lk, &zll, &zlr, true);
        assert_eq!((stats.accepted, stats.hidden), (1, 0));
        assert_eq!(t.head(13), 10);
    }

    #[test]
    fn mismatch_above_tolerance_is_hidden() {
        // z = 10/9: shift 3.2 still lands on 13, partner rounds to 3
        let width = 20;
        let enc = DepthEncoding::Perspective;
        let lk = lookup(width);
        let mut zlr = vec![1.0f32; width];
        let mut zll = vec![1.0f32; width];
        zll[10] = enc.encode(10.0 / 9.0, 0.5, 2.0);

        let mut t = LinkTable::identity(width);
        let stats = t.link_row(&lk, &zll, &zlr, true);
        assert_eq!((stats.accepted, stats.hidden), (0, 1));
        assert_eq!(t, LinkTable::identity(width));

        // the right eye seeing the same surface closes the gap
        zlr[3] = enc.encode(8.0 / 7.0, 0.5, 2.0);
        let mut t = LinkTable::identity(width);
        let stats = t.link_row(&lk, &zll, &zlr, true);
        assert_eq!((stats.accepted, stats.hidden), (1, 0));
        assert_eq!(t.head(13), 10);
    }

    #[test]
    fn hidden_removal_only_refines_partition() {
        let width = 64;
        let lk = lookup(width);
        let enc = DepthEncoding::Perspective;
        // a staircase of depths with a discontinuity between the eyes
        let zll: Vec<f32> = (0..width)
            .map(|x| enc.encode(0.6 + (x % 13) as f32 * 0.1, 0.5, 2.0))
            .collect();
        let zlr: Vec<f32> = (0..width)
            .map(|x| enc.encode(0.6 + ((x + 5) % 11) as f32 * 0.12, 0.5, 2.0))
            .collect();

        let mut all = LinkTable::identity(width);
        let mut culled = LinkTable::identity(width);
        all.link_row(&lk, &zll, &zlr, false);
        culled.link_row(&lk, &zll, &zlr, true);
        assert_sorted_chains(&all);
        assert_sorted_chains(&culled);

        for a in 0..width {
            for b in 0..width {
                if culled.head(a) == culled.head(b) {
                    assert_eq!(all.head(a), all.head(b), "culling merged {a} and {b}");
                }
            }
        }
    }

    #[test]
    fn stats_add_up() {
        let a = PassStats { rows: 1, accepted: 2, hidden: 3, out_of_range: 4 };
        let b = PassStats { rows: 1, accepted: 1, hidden: 0, out_of_range: 2 };
        assert_eq!(a + b, PassStats { rows: 2, accepted: 3, hidden: 3, out_of_range: 6 });
    }
}
