//! Boundary policies mapping logical coordinates to storage coordinates.
//!
//! Each variant of [`Topology`] carries only the parameters it needs; the
//! coordinate mapping is a match over the tag so every boundary rule stays
//! enumerable and testable on its own.

/// Boolean exclusion pattern for the hole topology.
///
/// Stores an `n_x * n_y` mask in row-major order, `true` marking an excluded
/// cell. The mask is fixed at construction, so a lattice reset can re-carve
/// the identical hole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoleMask {
    cells: Vec<bool>,
    n_x: usize,
    n_y: usize,
}

impl HoleMask {
    /// Default centered patch: an odd square of side 3 when both dimensions
    /// are at least 3, otherwise a single cell.
    pub fn centered(n_x: usize, n_y: usize) -> Self {
        let side = if n_x >= 3 && n_y >= 3 { 3 } else { 1 };
        let pattern = vec![vec![true; side]; side];
        Self::from_pattern(n_x, n_y, &pattern, None)
    }

    /// Stamp a caller-supplied pattern onto an `n_x * n_y` mask.
    ///
    /// `anchor` is the lattice coordinate where `pattern[0][0]` lands; when
    /// omitted the pattern is centered. Cells falling outside the lattice
    /// are clipped.
    pub fn from_pattern(
        n_x: usize,
        n_y: usize,
        pattern: &[Vec<bool>],
        anchor: Option<(usize, usize)>,
    ) -> Self {
        let p_x = pattern.len();
        let p_y = pattern.first().map_or(0, |row| row.len());
        let (a_x, a_y) = anchor.unwrap_or((
            n_x.saturating_sub(p_x) / 2,
            n_y.saturating_sub(p_y) / 2,
        ));

        let mut cells = vec![false; n_x * n_y];
        for (i, row) in pattern.iter().enumerate() {
            for (j, &excluded) in row.iter().enumerate() {
                if !excluded {
                    continue;
                }
                // checked addition keeps clipping total even for anchors
                // near usize::MAX
                match (a_x.checked_add(i), a_y.checked_add(j)) {
                    (Some(x), Some(y)) if x < n_x && y < n_y => cells[x * n_y + y] = true,
                    _ => {}
                }
            }
        }
        Self { cells, n_x, n_y }
    }

    /// Whether the cell at `(x, y)` is excluded.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.n_x && y < self.n_y && self.cells[x * self.n_y + y]
    }
}

/// Boundary policy of a lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// Finite lattice; coordinates outside `[0, n_x) x [0, n_y)` are absent.
    Bounded,
    /// Both axes wrap; no coordinate is absent.
    Torus,
    /// `y` wraps, `x` is bounded.
    Cylinder,
    /// `y` wraps with a half-twist: each odd wrap mirrors `x` to
    /// `n_x - 1 - x`. `x` itself is bounded.
    Mobius,
    /// Bounded lattice with an excluded region carved out.
    Hole(HoleMask),
}

impl Topology {
    /// Hole topology with the default centered patch.
    pub fn hole(n_x: usize, n_y: usize) -> Self {
        Topology::Hole(HoleMask::centered(n_x, n_y))
    }

    /// Hole topology with a caller-supplied pattern and anchor.
    pub fn hole_with_pattern(
        n_x: usize,
        n_y: usize,
        pattern: &[Vec<bool>],
        anchor: Option<(usize, usize)>,
    ) -> Self {
        Topology::Hole(HoleMask::from_pattern(n_x, n_y, pattern, anchor))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Topology::Bounded => "bounded",
            Topology::Torus => "torus",
            Topology::Cylinder => "cylinder",
            Topology::Mobius => "mobius",
            Topology::Hole(_) => "hole",
        }
    }

    /// Wrap topologies carry no independent randomizable state, so a reset
    /// has nothing to preserve and is rejected.
    pub fn supports_reset(&self) -> bool {
        matches!(self, Topology::Bounded | Topology::Hole(_))
    }

    /// Map a logical coordinate to a storage coordinate, or `None` when the
    /// coordinate is absent under this boundary policy.
    ///
    /// This mapping is total over all of `i64 x i64`. The hole exclusion is
    /// applied at resolution time by the lattice (via the spin sentinel),
    /// not here.
    pub fn map(&self, x: i64, y: i64, n_x: usize, n_y: usize) -> Option<(usize, usize)> {
        let (nx, ny) = (n_x as i64, n_y as i64);
        match self {
            Topology::Bounded | Topology::Hole(_) => {
                if (0..nx).contains(&x) && (0..ny).contains(&y) {
                    Some((x as usize, y as usize))
                } else {
                    None
                }
            }
            Topology::Torus => Some((x.rem_euclid(nx) as usize, y.rem_euclid(ny) as usize)),
            Topology::Cylinder => {
                if (0..nx).contains(&x) {
                    Some((x as usize, y.rem_euclid(ny) as usize))
                } else {
                    None
                }
            }
            Topology::Mobius => {
                if !(0..nx).contains(&x) {
                    return None;
                }
                // An odd number of traversals around the y axis lands on the
                // mirrored edge of the strip.
                let wraps = y.div_euclid(ny);
                let x = if wraps.rem_euclid(2) == 1 { nx - 1 - x } else { x };
                Some((x as usize, y.rem_euclid(ny) as usize))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_map() {
        let t = Topology::Bounded;
        assert_eq!(t.map(2, 3, 4, 4), Some((2, 3)));
        assert_eq!(t.map(-1, 0, 4, 4), None);
        assert_eq!(t.map(0, 4, 4, 4), None);
        assert_eq!(t.map(i64::MAX, i64::MIN, 4, 4), None);
    }

    #[test]
    fn test_torus_full_periodicity() {
        let t = Topology::Torus;
        for x in -3..8 {
            for y in -3..8 {
                assert_eq!(t.map(x, y, 3, 4), t.map(x + 3, y + 4, 3, 4));
            }
        }
        assert_eq!(t.map(-1, -1, 3, 4), Some((2, 3)));
    }

    #[test]
    fn test_cylinder_wraps_y_only() {
        let t = Topology::Cylinder;
        assert_eq!(t.map(1, 7, 4, 4), t.map(1, 3, 4, 4));
        assert_eq!(t.map(1, -1, 4, 4), Some((1, 3)));
        assert_eq!(t.map(-1, 2, 4, 4), None);
        assert_eq!(t.map(4, 2, 4, 4), None);
    }

    #[test]
    fn test_mobius_seam_identity() {
        let t = Topology::Mobius;
        let (n_x, n_y) = (5, 4);
        for x in 0..n_x as i64 {
            // crossing the seam once mirrors x
            assert_eq!(
                t.map(x, n_y as i64, n_x, n_y),
                t.map(n_x as i64 - 1 - x, 0, n_x, n_y)
            );
            // crossing it twice returns to the start
            assert_eq!(t.map(x, 2 * n_y as i64, n_x, n_y), t.map(x, 0, n_x, n_y));
        }
        // one step below the strip lands mirrored on the top row
        assert_eq!(t.map(0, -1, n_x, n_y), Some((4, 3)));
        // x stays bounded
        assert_eq!(t.map(-1, 2, n_x, n_y), None);
        assert_eq!(t.map(5, 2, n_x, n_y), None);
    }

    #[test]
    fn test_centered_hole_mask() {
        let mask = HoleMask::centered(5, 5);
        for x in 0..5 {
            for y in 0..5 {
                let inside = (1..4).contains(&x) && (1..4).contains(&y);
                assert_eq!(mask.contains(x, y), inside, "cell ({x}, {y})");
            }
        }
        // too small for a 3x3 patch: single cell
        let tiny = HoleMask::centered(2, 2);
        assert_eq!((0..2).flat_map(|x| (0..2).map(move |y| (x, y)))
            .filter(|&(x, y)| tiny.contains(x, y))
            .count(), 1);
    }

    #[test]
    fn test_custom_pattern_anchored_and_clipped() {
        let pattern = vec![vec![true, true], vec![true, true]];
        let mask = HoleMask::from_pattern(4, 4, &pattern, Some((3, 3)));
        // only the in-bounds corner cell survives clipping
        assert!(mask.contains(3, 3));
        assert!(!mask.contains(0, 0));
        assert!(!mask.contains(3, 2));
        // out-of-range queries are simply false
        assert!(!mask.contains(7, 7));
    }

    #[test]
    fn test_extreme_anchor_is_fully_clipped() {
        // an anchor at the far end of the coordinate space must clip every
        // cell rather than wrap around
        let pattern = vec![vec![true, true], vec![true, true]];
        for anchor in [(usize::MAX, usize::MAX), (usize::MAX, 0), (0, usize::MAX)] {
            let mask = HoleMask::from_pattern(4, 4, &pattern, Some(anchor));
            for x in 0..4 {
                for y in 0..4 {
                    assert!(!mask.contains(x, y), "cell ({x}, {y}) under {anchor:?}");
                }
            }
        }
    }
}
