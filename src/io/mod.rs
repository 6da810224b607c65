//! IO module - run configuration handling.

mod config;

pub use config::{read_run_config, EquilibrationConfig, RunConfig};
