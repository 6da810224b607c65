//! YAML run configuration, deserialized with serde.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IsingError;
use crate::lattice::Topology;

fn default_topology() -> String {
    "bounded".to_string()
}

fn default_seed() -> u64 {
    1
}

fn default_coupling() -> f64 {
    1.0
}

fn default_tolerance() -> f64 {
    0.9
}

fn default_max_attempts() -> usize {
    10
}

/// Retry settings for the optional equilibration phase of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EquilibrationConfig {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Raise on retry exhaustion instead of returning the failed result.
    #[serde(default)]
    pub strict: bool,
}

/// Full description of one simulation run.
///
/// # Example
///
/// ```yaml
/// n_x: 16
/// n_y: 16
/// topology: torus
/// seed: 42
/// temperature: 1.1
/// coupling: 1.0
/// external_field: 0.0
/// n_steps: 100
/// record_history: true
/// equilibration:
///   tolerance: 0.9
///   max_attempts: 10
///   strict: true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub n_x: usize,
    pub n_y: usize,
    #[serde(default = "default_topology")]
    pub topology: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub temperature: f64,
    #[serde(default = "default_coupling")]
    pub coupling: f64,
    #[serde(default)]
    pub external_field: f64,
    pub n_steps: usize,
    #[serde(default)]
    pub record_history: bool,
    #[serde(default)]
    pub equilibration: Option<EquilibrationConfig>,
}

impl RunConfig {
    /// Resolve the topology tag to a [`Topology`] for these dimensions.
    pub fn build_topology(&self) -> Result<Topology, IsingError> {
        match self.topology.as_str() {
            "bounded" => Ok(Topology::Bounded),
            "torus" => Ok(Topology::Torus),
            "cylinder" => Ok(Topology::Cylinder),
            "mobius" => Ok(Topology::Mobius),
            "hole" => Ok(Topology::hole(self.n_x, self.n_y)),
            other => Err(IsingError::InvalidParameter(format!(
                "unknown topology '{other}', expected bounded, torus, cylinder, mobius, or hole"
            ))),
        }
    }
}

/// Read a [`RunConfig`] from a YAML file.
pub fn read_run_config(path: impl AsRef<Path>) -> Result<RunConfig, IsingError> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let config: RunConfig = serde_yaml::from_reader(reader)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "n_x: 4\nn_y: 4\ntemperature: 1.1\nn_steps: 10\n";
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.topology, "bounded");
        assert_eq!(config.seed, 1);
        assert_eq!(config.coupling, 1.0);
        assert_eq!(config.external_field, 0.0);
        assert!(!config.record_history);
        assert!(config.equilibration.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = "\
n_x: 5
n_y: 5
topology: hole
seed: 9
temperature: 1.05
coupling: 1.0
external_field: 0.1
n_steps: 20
record_history: true
equilibration:
  tolerance: 0.8
  strict: true
";
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.topology, "hole");
        let equil = config.equilibration.unwrap();
        assert_eq!(equil.tolerance, 0.8);
        assert_eq!(equil.max_attempts, 10);
        assert!(equil.strict);
        assert!(matches!(
            config.build_topology().unwrap(),
            Topology::Hole(_)
        ));
    }

    #[test]
    fn test_unknown_topology_rejected() {
        let yaml = "n_x: 4\nn_y: 4\ntopology: klein\ntemperature: 1.1\nn_steps: 1\n";
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.build_topology().is_err());
    }

    #[test]
    fn test_read_from_file() {
        let path = std::env::temp_dir().join("rust_ising_config_test.yml");
        std::fs::write(&path, "n_x: 3\nn_y: 3\ntemperature: 1.2\nn_steps: 5\n").unwrap();
        let config = read_run_config(&path).unwrap();
        assert_eq!(config.n_x, 3);
        assert_eq!(config.n_steps, 5);
        std::fs::remove_file(&path).ok();

        assert!(read_run_config("/nonexistent/rust_ising.yml").is_err());
    }
}
