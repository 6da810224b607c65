//! Rust Ising - classical and quantum spin lattice simulations in Rust
//!
//! This crate simulates the 2D Metropolis Ising model over several lattice
//! topologies (bounded, torus, cylinder, Möbius, bounded-with-hole), with an
//! equilibration driver that detects convergence of the ensemble-mean
//! magnetization, plus a small transverse-field quantum toy model.

pub mod constants;
pub mod engine;
pub mod equilibration;
pub mod error;
pub mod io;
pub mod lattice;
pub mod quantum;

// Re-export commonly used types at crate root
pub use engine::{AcceptanceRule, IsingEngine};
pub use equilibration::{
    ensure_equilibrated, equilibrate, EquilibrationParams, EquilibrationReport, RetryPolicy,
};
pub use error::IsingError;
pub use io::{read_run_config, EquilibrationConfig, RunConfig};
pub use lattice::{HoleMask, Lattice, Site, Topology};
pub use quantum::TransverseFieldSpin;
