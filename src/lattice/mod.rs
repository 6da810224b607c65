//! Lattice module - sites, boundary topologies, and the spin grid.

mod grid;
mod site;
mod topology;

pub use grid::Lattice;
pub use site::Site;
pub use topology::{HoleMask, Topology};
