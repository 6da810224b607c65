//! A single lattice cell: coordinates, a spin, and its energy formulas.

use crate::constants::{HOLE_SPIN, MAGNETIC_MOMENT};

/// One cell of the lattice.
///
/// The spin takes values in `{-1, 0, +1}`, where `0` is the reserved hole
/// sentinel and never a physically real spin. Coordinates identify the
/// position in the lattice's coordinate space and are fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    pub x: usize,
    pub y: usize,
    pub spin: i8,
}

impl Site {
    pub fn new(x: usize, y: usize, spin: i8) -> Self {
        Self { x, y, spin }
    }

    /// Whether this cell is an excluded hole cell.
    pub fn is_hole(&self) -> bool {
        self.spin == HOLE_SPIN
    }

    /// Orientation energy of this spin in an effective field `b_eff`:
    /// `s * (spin magnitude) * g * mu_B * B_eff`.
    pub fn orientation_energy(&self, b_eff: f64) -> f64 {
        self.spin as f64 * MAGNETIC_MOMENT * b_eff
    }

    /// Energy change of flipping this spin in an effective field `b_eff`.
    ///
    /// Flipping negates the orientation term, so the change is twice the
    /// current orientation energy.
    pub fn flip_energy(&self, b_eff: f64) -> f64 {
        2.0 * self.orientation_energy(b_eff)
    }

    /// Reverse the spin. A hole cell stays a hole.
    pub fn flip(&mut self) {
        self.spin = -self.spin;
    }
}
