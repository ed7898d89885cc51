//! Breadboard - schematic circuit analyzer
//!
//! Reads a circuit snapshot (JSON) and prints analysis results as JSON.
//!
//! # Usage
//!
//! ```bash
//! breadboard analyze circuit.json
//! breadboard simulate circuit.json --samples 500 --duration 0.02
//! breadboard simulate circuit.json --probe scope1
//! breadboard probes circuit.json --probe scope1
//! RUST_LOG=debug breadboard analyze circuit.json
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde_json::json;

use breadboard_core::{
    analyze, apply_measurements, list_probe_bindings, probeable_sources, simulate_probe,
    simulate_with, BreadboardError, Circuit, ComponentId, Result, SimulationConfig, SolverConfig,
};

/// Schematic circuit analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve the DC operating point and print nodes, branches and measurements
    Analyze {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Sample every component's signal (or one probe's sub-circuit)
    Simulate {
        #[command(flatten)]
        input: Input,

        /// Simulate only the sub-circuit wired to this oscilloscope
        #[arg(long)]
        probe: Option<String>,

        #[command(flatten)]
        solver: SolverArgs,

        /// Number of samples
        #[arg(long, default_value_t = breadboard_core::signal::DEFAULT_SAMPLES)]
        samples: usize,

        /// Simulated window in seconds
        #[arg(long, default_value_t = breadboard_core::signal::DEFAULT_DURATION)]
        duration: f64,
    },
    /// List probeable sources, or one oscilloscope's bindings
    Probes {
        #[command(flatten)]
        input: Input,

        /// Oscilloscope whose terminal bindings to list
        #[arg(long)]
        probe: Option<String>,
    },
}

#[derive(Args, Debug)]
struct Input {
    /// Path to the circuit snapshot (.json)
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,
}

#[derive(Args, Debug)]
struct SolverArgs {
    /// Maximum relaxation sweeps
    #[arg(long, default_value_t = breadboard_core::solver::DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Relaxation tolerance in volts
    #[arg(long, default_value_t = breadboard_core::solver::DEFAULT_TOLERANCE)]
    tolerance: f64,
}

impl SolverArgs {
    fn config(&self) -> SolverConfig {
        SolverConfig::new()
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance)
    }
}

fn load_circuit(path: &Path) -> Result<Circuit> {
    let json = std::fs::read_to_string(path).map_err(|source| BreadboardError::FileReadError {
        path: path.display().to_string(),
        source,
    })?;
    Circuit::from_json(&json)
}

fn run(command: Command) -> Result<serde_json::Value> {
    match command {
        Command::Analyze { input, solver } => {
            let circuit = load_circuit(&input.circuit_file)?;
            let analysis = analyze(&circuit, &solver.config())?;
            let updated = apply_measurements(&circuit, &analysis.solution.measurements);
            Ok(json!({
                "topology": analysis.topology,
                "solution": analysis.solution,
                "circuit": updated,
            }))
        }
        Command::Simulate {
            input,
            probe,
            solver,
            samples,
            duration,
        } => {
            let circuit = load_circuit(&input.circuit_file)?;
            let config = SimulationConfig::new()
                .with_samples(samples)
                .with_duration(duration);
            let result = match probe {
                Some(id) => simulate_probe(&circuit, &ComponentId::new(id), &solver.config(), &config)?,
                None => Some(simulate_with(&circuit, &solver.config(), &config)?),
            };
            Ok(serde_json::to_value(result)?)
        }
        Command::Probes { input, probe } => {
            let circuit = load_circuit(&input.circuit_file)?;
            match probe {
                Some(id) => Ok(serde_json::to_value(list_probe_bindings(
                    &circuit,
                    &ComponentId::new(id),
                )?)?),
                None => Ok(serde_json::to_value(probeable_sources(&circuit))?),
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let output = run(cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
