//! Equilibration driver - runs an ensemble of engines over a low
//! temperature band and decides, from the trajectory of the ensemble-mean
//! magnetization, whether the system has reached steady state.

use rayon::prelude::*;

use crate::engine::IsingEngine;
use crate::error::IsingError;
use crate::lattice::Lattice;

/// Number of temperature samples in the ensemble.
pub const ENSEMBLE_SIZE: usize = 15;
/// Lower edge of the temperature band.
pub const TEMP_LOW: f64 = 1.0;
/// Upper edge of the temperature band.
pub const TEMP_HIGH: f64 = 1.2;
/// Default cap on reset-and-retry cycles.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Width of the moving window over ensemble means.
const CONVERGENCE_WINDOW: usize = 5;
/// First iteration index at which the convergence test may fire.
const MIN_SAMPLES: usize = 6;

/// What to do when the retry budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Surface an [`IsingError::EquilibrationFailure`].
    #[default]
    Strict,
    /// Return the last (failed) report instead of an error.
    Lenient,
}

/// Tuning knobs for [`equilibrate`] and [`ensure_equilibrated`].
#[derive(Debug, Clone, Copy)]
pub struct EquilibrationParams {
    /// Threshold the windowed mean magnetization must exceed.
    pub tolerance: f64,
    /// Coupling constant passed to every ensemble engine.
    pub coupling: f64,
    /// External field passed to every ensemble engine.
    pub external_field: f64,
    /// Iteration cap; `None` uses `n_x * n_y * 5`.
    pub max_steps: Option<usize>,
    /// Retry budget for [`ensure_equilibrated`].
    pub max_attempts: usize,
    pub policy: RetryPolicy,
}

impl Default for EquilibrationParams {
    fn default() -> Self {
        Self {
            tolerance: 0.9,
            coupling: 1.0,
            external_field: 0.0,
            max_steps: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            policy: RetryPolicy::default(),
        }
    }
}

/// Outcome of one equilibration run.
#[derive(Debug, Clone)]
pub struct EquilibrationReport {
    pub equilibrated: bool,
    /// Iterations actually executed.
    pub steps_taken: usize,
    /// Ensemble-mean magnetization per iteration (possibly partial on
    /// failure).
    pub mean_history: Vec<f64>,
}

/// Build one engine per temperature sample, each on an independent clone of
/// the initial lattice with a seed derived from `seed`.
fn build_ensemble(
    lattice: &Lattice,
    params: &EquilibrationParams,
    seed: u64,
) -> Result<Vec<IsingEngine>, IsingError> {
    (0..ENSEMBLE_SIZE)
        .map(|k| {
            let fraction = k as f64 / (ENSEMBLE_SIZE - 1) as f64;
            let temperature = TEMP_LOW + (TEMP_HIGH - TEMP_LOW) * fraction;
            // only the magnetization of a member is ever read, so recording
            // snapshots would grow unread history on every attempt
            let mut member = Lattice::from_lattice(lattice, seed.wrapping_add(k as u64));
            member.set_record_history(false);
            IsingEngine::new(
                member,
                temperature,
                params.coupling,
                params.external_field,
                seed.wrapping_add((ENSEMBLE_SIZE + k) as u64),
            )
        })
        .collect()
}

/// Step the ensemble until the mean of the last [`CONVERGENCE_WINDOW`]
/// ensemble-mean magnetizations exceeds `params.tolerance`, or the step cap
/// is reached.
///
/// Ensemble members share no mutable state, so they step in parallel; the
/// mean aggregation acts as a barrier after every iteration. The input
/// lattice is only cloned from, never mutated.
pub fn equilibrate(
    lattice: &Lattice,
    params: &EquilibrationParams,
    seed: u64,
) -> Result<EquilibrationReport, IsingError> {
    let mut engines = build_ensemble(lattice, params, seed)?;
    let max_steps = params
        .max_steps
        .unwrap_or(lattice.n_x() * lattice.n_y() * 5);

    let mut mean_history = Vec::with_capacity(max_steps);
    for step in 0..max_steps {
        let mags: Vec<f64> = engines
            .par_iter_mut()
            .map(|engine| {
                engine.step();
                engine.magnetization()
            })
            .collect();
        let mean = mags.iter().sum::<f64>() / mags.len() as f64;
        mean_history.push(mean);

        if step >= MIN_SAMPLES {
            let window = &mean_history[mean_history.len() - CONVERGENCE_WINDOW..];
            let window_mean = window.iter().sum::<f64>() / CONVERGENCE_WINDOW as f64;
            if window_mean > params.tolerance {
                return Ok(EquilibrationReport {
                    equilibrated: true,
                    steps_taken: step + 1,
                    mean_history,
                });
            }
        }
    }

    Ok(EquilibrationReport {
        equilibrated: false,
        steps_taken: max_steps,
        mean_history,
    })
}

/// Equilibrate with a bounded number of reset-and-retry cycles.
///
/// On non-equilibration the lattice is fully reinitialized (the hole mask is
/// reproduced; wrap topologies reject the reset and that error propagates)
/// and the run repeats with a shifted seed. Exhausting the budget follows
/// `params.policy`: strict mode surfaces the failure, lenient mode returns
/// the last failed report.
pub fn ensure_equilibrated(
    lattice: &mut Lattice,
    params: &EquilibrationParams,
    seed: u64,
) -> Result<EquilibrationReport, IsingError> {
    let mut report = equilibrate(lattice, params, seed)?;
    let mut attempt = 0;
    while !report.equilibrated {
        attempt += 1;
        if attempt >= params.max_attempts {
            return match params.policy {
                RetryPolicy::Strict => Err(IsingError::EquilibrationFailure { attempts: attempt }),
                RetryPolicy::Lenient => Ok(report),
            };
        }
        lattice.reset()?;
        report = equilibrate(lattice, params, seed.wrapping_add(attempt as u64))?;
    }
    Ok(report)
}
