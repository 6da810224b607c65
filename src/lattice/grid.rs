//! The 2D spin lattice: storage, initialization, coordinate resolution,
//! and the snapshot history consumed by external renderers.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::HOLE_SPIN;
use crate::error::IsingError;
use crate::lattice::site::Site;
use crate::lattice::topology::Topology;

/// A finite 2D lattice of [`Site`]s under a boundary policy.
///
/// Owns its own random stream, so two lattices built from the same seed
/// evolve identically regardless of what happens elsewhere in the process.
/// When history recording is enabled, frame `k` of the history is the spin
/// state after exactly `k` completed engine steps; frame 0 is the initial
/// state.
#[derive(Debug, Clone)]
pub struct Lattice {
    n_x: usize,
    n_y: usize,
    topology: Topology,
    sites: Vec<Site>,
    history: Vec<DMatrix<i8>>,
    record_history: bool,
    rng: StdRng,
}

impl Lattice {
    /// Bounded lattice with history recording enabled.
    pub fn new(n_x: usize, n_y: usize, seed: u64) -> Result<Self, IsingError> {
        Self::with_topology(n_x, n_y, Topology::Bounded, seed, true)
    }

    /// Lattice with an explicit boundary policy.
    ///
    /// Every site gets an iid uniform spin in `{-1, +1}`; hole cells are
    /// forced to the sentinel afterwards.
    pub fn with_topology(
        n_x: usize,
        n_y: usize,
        topology: Topology,
        seed: u64,
        record_history: bool,
    ) -> Result<Self, IsingError> {
        if n_x == 0 || n_y == 0 {
            return Err(IsingError::InvalidParameter(format!(
                "lattice dimensions must be positive, got {n_x} x {n_y}"
            )));
        }

        let sites = (0..n_x)
            .flat_map(|x| (0..n_y).map(move |y| Site::new(x, y, 1)))
            .collect();

        let mut lattice = Self {
            n_x,
            n_y,
            topology,
            sites,
            history: Vec::new(),
            record_history,
            rng: StdRng::seed_from_u64(seed),
        };
        lattice.randomize();
        if lattice.record_history {
            let initial = lattice.snapshot();
            lattice.history.push(initial);
        }
        Ok(lattice)
    }

    /// New lattice cloned from an existing one: same topology, same current
    /// spins, same history, but an independent random stream.
    pub fn from_lattice(source: &Lattice, seed: u64) -> Self {
        Self {
            n_x: source.n_x,
            n_y: source.n_y,
            topology: source.topology.clone(),
            sites: source.sites.clone(),
            history: source.history.clone(),
            record_history: source.record_history,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn n_x(&self) -> usize {
        self.n_x
    }

    pub fn n_y(&self) -> usize {
        self.n_y
    }

    /// Total cell count, holes included.
    pub fn len(&self) -> usize {
        self.n_x * self.n_y
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Resolve a logical coordinate to a site under this lattice's boundary
    /// policy.
    ///
    /// Total over all of `i64 x i64`: out-of-domain coordinates and hole
    /// cells yield `None`, never a panic.
    pub fn resolve(&self, x: i64, y: i64) -> Option<&Site> {
        let (sx, sy) = self.topology.map(x, y, self.n_x, self.n_y)?;
        let site = &self.sites[sx * self.n_y + sy];
        if site.is_hole() {
            None
        } else {
            Some(site)
        }
    }

    /// Spin value at a storage coordinate. Panics if out of range; use
    /// [`resolve`](Self::resolve) for logical coordinates.
    pub fn spin(&self, x: usize, y: usize) -> i8 {
        self.sites[x * self.n_y + y].spin
    }

    /// Overwrite the spin at a storage coordinate (e.g. when loading a
    /// prepared configuration). Hole cells are left untouched.
    pub fn set_spin(&mut self, x: usize, y: usize, spin: i8) {
        let site = &mut self.sites[x * self.n_y + y];
        if !site.is_hole() {
            site.spin = spin;
        }
    }

    /// Reverse the spin at a storage coordinate. Hole cells never flip.
    pub fn flip(&mut self, x: usize, y: usize) {
        self.sites[x * self.n_y + y].flip();
    }

    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    /// Sum of all spin values; hole cells contribute zero.
    pub fn total_spin(&self) -> i64 {
        self.sites.iter().map(|s| s.spin as i64).sum()
    }

    /// Reinitialize every spin from the lattice's random stream, re-carving
    /// the identical hole mask.
    ///
    /// Wrap topologies (torus, cylinder, Möbius) have no independent hole
    /// pattern to preserve, so reset is rejected for them.
    pub fn reset(&mut self) -> Result<(), IsingError> {
        if !self.topology.supports_reset() {
            return Err(IsingError::UnsupportedTopologyOperation {
                topology: self.topology.name(),
            });
        }
        self.randomize();
        self.history.clear();
        if self.record_history {
            let initial = self.snapshot();
            self.history.push(initial);
        }
        Ok(())
    }

    /// Current spin state as an `n_x x n_y` matrix of `{-1, 0, 1}` values.
    pub fn snapshot(&self) -> DMatrix<i8> {
        DMatrix::from_fn(self.n_x, self.n_y, |x, y| self.sites[x * self.n_y + y].spin)
    }

    /// Ordered snapshot history; frame 0 is the initial state.
    pub fn history(&self) -> &[DMatrix<i8>] {
        &self.history
    }

    pub fn history_frame(&self, k: usize) -> Option<&DMatrix<i8>> {
        self.history.get(k)
    }

    pub fn records_history(&self) -> bool {
        self.record_history
    }

    /// Turn history recording on or off from this point on. Frames already
    /// recorded are kept.
    pub fn set_record_history(&mut self, enabled: bool) {
        self.record_history = enabled;
    }

    /// Append the current state to the history. Called once per completed
    /// update step, not per flip attempt.
    pub(crate) fn push_snapshot(&mut self) {
        if self.record_history {
            let frame = self.snapshot();
            self.history.push(frame);
        }
    }

    fn randomize(&mut self) {
        for site in self.sites.iter_mut() {
            site.spin = if self.rng.gen_bool(0.5) { 1 } else { -1 };
        }
        if let Topology::Hole(mask) = &self.topology {
            for site in self.sites.iter_mut() {
                if mask.contains(site.x, site.y) {
                    site.spin = HOLE_SPIN;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_spins_are_unit() {
        let lattice = Lattice::new(6, 6, 42).unwrap();
        assert!(lattice.sites().all(|s| s.spin == 1 || s.spin == -1));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(Lattice::new(0, 4, 1).is_err());
        assert!(Lattice::new(4, 0, 1).is_err());
    }

    #[test]
    fn test_same_seed_same_lattice() {
        let a = Lattice::new(8, 8, 7).unwrap();
        let b = Lattice::new(8, 8, 7).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());

        let c = Lattice::new(8, 8, 8).unwrap();
        assert_ne!(a.snapshot(), c.snapshot());
    }

    #[test]
    fn test_resolve_is_total() {
        for topology in [
            Topology::Bounded,
            Topology::Torus,
            Topology::Cylinder,
            Topology::Mobius,
            Topology::hole(4, 4),
        ] {
            let lattice = Lattice::with_topology(4, 4, topology, 1, false).unwrap();
            for x in [-9, -1, 0, 3, 4, 17, i64::MIN, i64::MAX] {
                for y in [-9, -1, 0, 3, 4, 17, i64::MIN, i64::MAX] {
                    // must not panic; Some or None are both fine
                    let _ = lattice.resolve(x, y);
                }
            }
        }
    }

    #[test]
    fn test_hole_cells_are_sentinel_and_absent() {
        let lattice = Lattice::with_topology(5, 5, Topology::hole(5, 5), 3, false).unwrap();
        for x in 0..5 {
            for y in 0..5 {
                let inside = (1..4).contains(&x) && (1..4).contains(&y);
                if inside {
                    assert_eq!(lattice.spin(x, y), 0);
                    assert!(lattice.resolve(x as i64, y as i64).is_none());
                } else {
                    assert_ne!(lattice.spin(x, y), 0);
                    assert!(lattice.resolve(x as i64, y as i64).is_some());
                }
            }
        }
    }

    #[test]
    fn test_reset_recarves_hole() {
        let mut lattice = Lattice::with_topology(5, 5, Topology::hole(5, 5), 3, true).unwrap();
        for _ in 0..3 {
            lattice.reset().unwrap();
            for x in 0..5 {
                for y in 0..5 {
                    let inside = (1..4).contains(&x) && (1..4).contains(&y);
                    assert_eq!(lattice.spin(x, y) == 0, inside);
                }
            }
            // reset restarts the history at the new initial frame
            assert_eq!(lattice.history().len(), 1);
        }
    }

    #[test]
    fn test_reset_rejected_on_wrap_topologies() {
        for topology in [Topology::Torus, Topology::Cylinder, Topology::Mobius] {
            let mut lattice = Lattice::with_topology(4, 4, topology, 1, false).unwrap();
            let err = lattice.reset().unwrap_err();
            assert!(matches!(
                err,
                IsingError::UnsupportedTopologyOperation { .. }
            ));
        }
    }

    #[test]
    fn test_torus_resolution_wraps() {
        let lattice = Lattice::with_topology(3, 4, Topology::Torus, 11, false).unwrap();
        let a = lattice.resolve(0, 0).unwrap();
        let b = lattice.resolve(3, 4).unwrap();
        assert_eq!((a.x, a.y), (b.x, b.y));
    }

    #[test]
    fn test_mobius_resolution_mirrors_on_wrap() {
        let lattice = Lattice::with_topology(5, 4, Topology::Mobius, 11, false).unwrap();
        let over = lattice.resolve(1, 4).unwrap();
        let mirrored = lattice.resolve(3, 0).unwrap();
        assert_eq!((over.x, over.y), (mirrored.x, mirrored.y));
    }

    #[test]
    fn test_history_frame_zero_is_initial_state() {
        let lattice = Lattice::new(4, 4, 5).unwrap();
        assert_eq!(lattice.history().len(), 1);
        assert_eq!(lattice.history_frame(0), Some(&lattice.snapshot()));
        assert_eq!(lattice.history_frame(1), None);
    }

    #[test]
    fn test_clone_from_lattice_shares_state_not_stream() {
        let source = Lattice::new(4, 4, 5).unwrap();
        let clone = Lattice::from_lattice(&source, 99);
        assert_eq!(source.snapshot(), clone.snapshot());
        assert_eq!(source.history().len(), clone.history().len());
    }
}
