//! Engine module - Metropolis stochastic update dynamics.

mod metropolis;

pub use metropolis::{AcceptanceRule, IsingEngine};
