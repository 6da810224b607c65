//! Physical constants shared by all lattice sites.
//!
//! These are invariant across a simulation, so they live here as plain
//! constants instead of being duplicated into every [`Site`](crate::Site).

/// Spin magnitude of a spin-1/2 fermion.
pub const FERMION_SPIN: f64 = 0.5;

/// Electron g-factor.
pub const G_FACTOR: f64 = 2.0;

/// Bohr magneton in J/T.
pub const BOHR_MAGNETON: f64 = 9.274e-24;

/// Boltzmann constant in J/K.
pub const BOLTZMANN: f64 = 1.380649e-23;

/// Sentinel spin value marking an excluded (hole) cell. Physical sites
/// always carry +1 or -1.
pub const HOLE_SPIN: i8 = 0;

/// Effective magnetic moment of one site: spin magnitude times g-factor
/// times the Bohr magneton.
pub const MAGNETIC_MOMENT: f64 = FERMION_SPIN * G_FACTOR * BOHR_MAGNETON;
