//! Metropolis update engine for the classical Ising lattice.
//!
//! One logical time step performs `n_x * n_y` flip proposals at uniformly
//! random coordinates (with replacement), a pseudo-parallel random scan
//! rather than a deterministic sweep.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::constants::BOLTZMANN;
use crate::error::IsingError;
use crate::lattice::Lattice;

/// Which energy changes are accepted without a random draw.
///
/// The two conventions only differ at `delta_e == 0`: `NonIncreasing`
/// accepts immediately, while `StrictDecrease` falls through to the
/// stochastic branch and consumes one draw from the random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptanceRule {
    /// Accept unconditionally when `delta_e <= 0`.
    #[default]
    NonIncreasing,
    /// Accept unconditionally only when `delta_e < 0`.
    StrictDecrease,
}

/// Metropolis simulation engine owning exactly one [`Lattice`].
///
/// Temperature is the only parameter mutable after construction; coupling
/// and external field are fixed for the engine's lifetime.
#[derive(Debug)]
pub struct IsingEngine {
    lattice: Lattice,
    temperature: f64,
    coupling: f64,
    external_field: f64,
    rule: AcceptanceRule,
    rng: StdRng,
}

fn validate_temperature(temperature: f64) -> Result<(), IsingError> {
    if temperature.is_finite() && temperature > 0.0 {
        Ok(())
    } else {
        Err(IsingError::InvalidParameter(format!(
            "temperature must be positive and finite, got {temperature}"
        )))
    }
}

impl IsingEngine {
    /// Engine with the default acceptance rule (`NonIncreasing`).
    pub fn new(
        lattice: Lattice,
        temperature: f64,
        coupling: f64,
        external_field: f64,
        seed: u64,
    ) -> Result<Self, IsingError> {
        Self::with_rule(
            lattice,
            temperature,
            coupling,
            external_field,
            AcceptanceRule::default(),
            seed,
        )
    }

    pub fn with_rule(
        lattice: Lattice,
        temperature: f64,
        coupling: f64,
        external_field: f64,
        rule: AcceptanceRule,
        seed: u64,
    ) -> Result<Self, IsingError> {
        validate_temperature(temperature)?;
        Ok(Self {
            lattice,
            temperature,
            coupling,
            external_field,
            rule,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Give the lattice back, e.g. to hand its history to a renderer.
    pub fn into_lattice(self) -> Lattice {
        self.lattice
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Replace the temperature; subsequent steps use the new value.
    pub fn change_temp(&mut self, temperature: f64) -> Result<(), IsingError> {
        validate_temperature(temperature)?;
        self.temperature = temperature;
        Ok(())
    }

    /// Local effective field at a logical coordinate: coupling times the
    /// spin sum of the existing von Neumann neighbors, plus the external
    /// field.
    ///
    /// Absent neighbors (beyond a boundary or inside a hole) are skipped,
    /// not treated as zero-spin sites.
    pub fn effective_field(&self, x: i64, y: i64) -> f64 {
        let neighbor_sum: f64 = [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .iter()
            .filter_map(|&(dx, dy)| self.lattice.resolve(x + dx, y + dy))
            .map(|site| site.spin as f64)
            .sum();
        self.coupling * neighbor_sum + self.external_field
    }

    /// Propose a flip at a logical coordinate and apply the Metropolis
    /// acceptance rule. Returns whether the flip was applied.
    ///
    /// Coordinates resolving to an absent site are silently skipped.
    pub fn propose_update(&mut self, x: i64, y: i64) -> bool {
        let site = match self.lattice.resolve(x, y) {
            Some(site) => *site,
            None => return false,
        };

        let b_eff = self.effective_field(x, y);
        let delta_e = site.flip_energy(b_eff);

        let accept = match self.rule {
            AcceptanceRule::NonIncreasing if delta_e <= 0.0 => true,
            AcceptanceRule::StrictDecrease if delta_e < 0.0 => true,
            _ => {
                let p = (-delta_e / (BOLTZMANN * self.temperature)).exp();
                self.rng.gen::<f64>() < p
            }
        };

        if accept {
            self.lattice.flip(site.x, site.y);
        }
        accept
    }

    /// Advance the system by one logical time step: `n_x * n_y` independent
    /// proposals at random coordinates, then one history snapshot if the
    /// lattice records history.
    pub fn step(&mut self) {
        let dist_x = Uniform::new(0, self.lattice.n_x());
        let dist_y = Uniform::new(0, self.lattice.n_y());
        for _ in 0..self.lattice.len() {
            let x = dist_x.sample(&mut self.rng) as i64;
            let y = dist_y.sample(&mut self.rng) as i64;
            self.propose_update(x, y);
        }
        self.lattice.push_snapshot();
    }

    /// Run `n_steps` steps; zero steps is a no-op, not an error.
    pub fn run(&mut self, n_steps: usize) {
        for _ in 0..n_steps {
            self.step();
        }
    }

    /// Absolute mean spin over all `n_x * n_y` cells, in `[0, 1]`. Hole
    /// cells contribute zero to the sum but still count in the norm.
    pub fn magnetization(&self) -> f64 {
        self.lattice.total_spin().unsigned_abs() as f64 / self.lattice.len() as f64
    }
}
