//! DC analysis engine.
//!
//! One analysis pass runs, in order:
//!
//! 1. [`analyze_topology`] - terminals and wires to nodes and branches
//! 2. [`solve`] - bounded relaxation of node voltages, branch readings,
//!    series consistency and the connectivity verdict
//! 3. optionally [`apply_measurements`] - write meter readings back into
//!    the circuit, guarded by [`WRITE_BACK_THRESHOLD`]
//!
//! Every pass starts from a circuit snapshot; no state survives between
//! passes except the meter values written back into the circuit.

mod consistency;
mod dc;
mod topology;
mod writeback;

pub use consistency::{enforce_series_consistency, CURRENT_EPSILON};
pub use dc::{solve, solve_with, DcSolution, Measurement};
pub use topology::{
    analyze_topology, analyze_topology_with, AnalyzedCircuit, CircuitBranch, CircuitNode,
};
pub use writeback::{
    apply_measurements, reading_changed, AnalysisSession, CircuitSignature, CycleOutcome,
    WRITE_BACK_THRESHOLD,
};

use crate::circuit::Circuit;
use crate::error::{BreadboardError, Result};

/// Terminals on different components closer than this share a node.
pub const PROXIMITY_THRESHOLD: f64 = 20.0;

/// Default cap on relaxation sweeps.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Default relaxation tolerance (volts).
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Default number of series consistency passes.
pub const DEFAULT_CONSISTENCY_PASSES: usize = 5;

/// Configuration for the DC solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Maximum relaxation sweeps.
    pub max_iterations: usize,
    /// Largest per-node change (volts) at which a sweep counts as settled.
    pub tolerance: f64,
    /// Maximum series consistency passes.
    pub consistency_passes: usize,
    /// Terminal merge distance (canvas units).
    pub proximity_threshold: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            consistency_passes: DEFAULT_CONSISTENCY_PASSES,
            proximity_threshold: PROXIMITY_THRESHOLD,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum relaxation sweeps.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the relaxation tolerance (in volts).
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the number of series consistency passes.
    pub fn with_consistency_passes(mut self, passes: usize) -> Self {
        self.consistency_passes = passes;
        self
    }

    /// Set the terminal proximity threshold.
    pub fn with_proximity_threshold(mut self, threshold: f64) -> Self {
        self.proximity_threshold = threshold;
        self
    }

    /// Reject settings the solver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(BreadboardError::invalid_param("max_iterations must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(BreadboardError::invalid_param(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.proximity_threshold.is_finite() && self.proximity_threshold >= 0.0) {
            return Err(BreadboardError::invalid_param(format!(
                "proximity threshold must be non-negative, got {}",
                self.proximity_threshold
            )));
        }
        Ok(())
    }
}

/// Topology plus DC solution of one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub topology: AnalyzedCircuit,
    pub solution: DcSolution,
}

/// Run topology extraction and the DC solve on a snapshot.
pub fn analyze(circuit: &Circuit, config: &SolverConfig) -> Result<Analysis> {
    config.validate()?;
    let topology = analyze_topology_with(circuit, config.proximity_threshold)?;
    let solution = solve_with(&topology, config);
    Ok(Analysis { topology, solution })
}
