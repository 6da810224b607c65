//! Quantum module - a transverse-field spin-1/2 toy model.
//!
//! A single two-level system in the Hamiltonian `H = -h_z sigma_z - G sigma_x`,
//! integrated with fixed-step RK4 on the Schrödinger equation (hbar = 1).
//! Shares no state with the lattice core.

use nalgebra::{Complex, Matrix2, Vector2};

use crate::error::IsingError;

type State = Vector2<Complex<f64>>;

/// One spin-1/2 in a longitudinal plus transverse magnetic field.
#[derive(Debug, Clone)]
pub struct TransverseFieldSpin {
    state: State,
    longitudinal_field: f64,
    transverse_field: f64,
    dt: f64,
    time: f64,
}

impl TransverseFieldSpin {
    /// Start in the spin-up eigenstate of `sigma_z`.
    pub fn new(
        longitudinal_field: f64,
        transverse_field: f64,
        dt: f64,
    ) -> Result<Self, IsingError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(IsingError::InvalidParameter(format!(
                "time step must be positive and finite, got {dt}"
            )));
        }
        Ok(Self {
            state: Vector2::new(Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)),
            longitudinal_field,
            transverse_field,
            dt,
            time: 0.0,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// `H = -h_z sigma_z - G sigma_x` as a 2x2 complex matrix.
    pub fn hamiltonian(&self) -> Matrix2<Complex<f64>> {
        let h_z = Complex::new(self.longitudinal_field, 0.0);
        let g = Complex::new(self.transverse_field, 0.0);
        Matrix2::new(-h_z, -g, -g, h_z)
    }

    /// Right-hand side of the Schrödinger equation: `dpsi/dt = -i H psi`.
    fn derivative(&self, state: &State) -> State {
        let minus_i = Complex::new(0.0, -1.0);
        (self.hamiltonian() * state).map(|c| minus_i * c)
    }

    /// Advance the state by one RK4 step.
    pub fn step(&mut self) {
        let dt = Complex::new(self.dt, 0.0);
        let half = Complex::new(0.5, 0.0);
        let sixth = Complex::new(1.0 / 6.0, 0.0);
        let two = Complex::new(2.0, 0.0);

        let k1 = self.derivative(&self.state);
        let k2 = self.derivative(&(self.state + (k1 * dt).map(|c| half * c)));
        let k3 = self.derivative(&(self.state + (k2 * dt).map(|c| half * c)));
        let k4 = self.derivative(&(self.state + k3 * dt));

        self.state += ((k1 + k2 * two + k3 * two + k4) * dt).map(|c| sixth * c);
        self.time += self.dt;
    }

    pub fn evolve(&mut self, n_steps: usize) {
        for _ in 0..n_steps {
            self.step();
        }
    }

    /// Expectation value of `sigma_z`, in `[-1, 1]`.
    pub fn sigma_z_expectation(&self) -> f64 {
        self.state[0].norm_sqr() - self.state[1].norm_sqr()
    }

    /// State norm; conserved up to the integrator's truncation error.
    pub fn norm(&self) -> f64 {
        (self.state[0].norm_sqr() + self.state[1].norm_sqr()).sqrt()
    }
}
