//! Error types for the Ising simulation crate.

use thiserror::Error;

/// All failure modes surfaced by this crate.
///
/// Resolving an out-of-bounds or in-hole coordinate is deliberately not
/// represented here: topology resolution is total and returns `None` for
/// absent sites.
#[derive(Debug, Error)]
pub enum IsingError {
    /// Reset was requested on a topology that has no independent
    /// randomizable state to preserve (torus, cylinder, Möbius).
    #[error("reset is not supported on a {topology} lattice")]
    UnsupportedTopologyOperation { topology: &'static str },

    /// The bounded retry budget was exhausted without reaching the
    /// convergence threshold (strict mode only).
    #[error("equilibration not ensured after {attempts} attempts; change the tolerance")]
    EquilibrationFailure { attempts: usize },

    /// A scalar parameter was outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A run configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// A run configuration file could not be parsed.
    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}
