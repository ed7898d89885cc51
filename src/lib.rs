//! # Breadboard Core
//!
//! DC operating-point analysis and waveform synthesis for a schematic
//! breadboard editor.
//!
//! This library provides:
//! - A serializable circuit snapshot (components with terminal positions,
//!   wires between terminals)
//! - Topology extraction: wires and terminal proximity to electrical nodes
//! - A bounded Gauss-Seidel relaxation of node voltages with per-kind branch
//!   readings (resistors, meters, diodes, sources)
//! - Meter write-back that reaches a fixed point instead of looping
//! - Time-domain signals for waveform display and oscilloscope probes
//!
//! ## Architecture
//!
//! - [`circuit`] - Circuit snapshot types and validation
//! - [`components`] - Component kinds and their electrical models
//! - [`solver`] - Topology, DC relaxation, series consistency, write-back
//! - [`signal`] - Sampled waveforms over a fixed time grid
//! - [`probe`] - Oscilloscope sub-circuit resolution and bindings
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! breadboard analyze circuit.json
//! breadboard simulate circuit.json --samples 500 --duration 0.02
//! breadboard probes circuit.json --probe scope1
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use breadboard_core::{analyze, Circuit, SolverConfig};
//!
//! let json = std::fs::read_to_string("circuit.json").unwrap();
//! let circuit = Circuit::from_json(&json).unwrap();
//! let analysis = analyze(&circuit, &SolverConfig::default()).unwrap();
//! for (id, m) in &analysis.solution.measurements {
//!     println!("{id}: {:.3} V, {:.3} mA", m.voltage, m.current * 1e3);
//! }
//! ```
//!
//! ## Analysis Method
//!
//! This is deliberately not nodal analysis. Ground is held at 0 V, voltage
//! sources pin their nodes, and every other node is relaxed toward the
//! conductance-weighted mean of its neighbours for a bounded number of
//! sweeps. Branch currents then follow per kind, and two-branch series
//! junctions are forced to carry one current.

pub mod circuit;
pub mod components;
pub mod error;
pub mod probe;
pub mod signal;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{validate_circuit, Circuit, Component, ComponentId, TerminalRef, Wire};
pub use components::ComponentKind;
pub use error::{BreadboardError, Result};
pub use probe::{list_probe_bindings, probeable_sources, resolve_probe_subcircuit, simulate_probe};
pub use signal::{simulate, simulate_with, SimulationConfig, SimulationResult};
pub use solver::{
    analyze, analyze_topology, apply_measurements, solve, AnalysisSession, SolverConfig,
};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmBreadboard;
