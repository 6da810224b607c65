use clap::Parser;
use nalgebra::DMatrix;

use rust_ising::equilibration::{EquilibrationParams, RetryPolicy};
use rust_ising::{ensure_equilibrated, read_run_config, IsingEngine, IsingError, Lattice};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yml")]
    config: String,
}

fn main() -> Result<(), IsingError> {
    let args = Args::parse();
    let config = read_run_config(&args.config)?;
    let topology = config.build_topology()?;

    let mut lattice = Lattice::with_topology(
        config.n_x,
        config.n_y,
        topology,
        config.seed,
        config.record_history,
    )?;

    if let Some(equil) = config.equilibration {
        let params = EquilibrationParams {
            tolerance: equil.tolerance,
            coupling: config.coupling,
            external_field: config.external_field,
            max_attempts: equil.max_attempts,
            policy: if equil.strict {
                RetryPolicy::Strict
            } else {
                RetryPolicy::Lenient
            },
            ..Default::default()
        };
        let report = ensure_equilibrated(&mut lattice, &params, config.seed)?;
        println!(
            "Equilibration: {} after {} steps (mean |m| = {:.4})",
            if report.equilibrated { "reached" } else { "not reached" },
            report.steps_taken,
            report.mean_history.last().copied().unwrap_or(0.0),
        );
    }

    let mut engine = IsingEngine::new(
        lattice,
        config.temperature,
        config.coupling,
        config.external_field,
        config.seed,
    )?;
    engine.run(config.n_steps);

    println!("Ising Simulation Results");
    println!("----------------------------------------");
    println!("Lattice: {} x {} ({})", config.n_x, config.n_y, config.topology);
    println!("Temperature: {}", config.temperature);
    println!("Steps: {}", config.n_steps);
    println!("Magnetization |m|: {:.6}", engine.magnetization());
    if config.record_history {
        println!("History frames: {}", engine.lattice().history().len());
    }
    println!();
    println!("{}", render_spins(&engine.lattice().snapshot()));

    Ok(())
}

/// Render a spin matrix as one character per cell: '+' up, '-' down,
/// '.' hole.
fn render_spins(matrix: &DMatrix<i8>) -> String {
    let mut out = String::with_capacity(matrix.nrows() * (matrix.ncols() + 1));
    for x in 0..matrix.nrows() {
        for y in 0..matrix.ncols() {
            out.push(match matrix[(x, y)] {
                1 => '+',
                -1 => '-',
                _ => '.',
            });
        }
        out.push('\n');
    }
    out
}
