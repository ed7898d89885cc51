//! DC operating point by bounded relaxation.
//!
//! 1. Ground is fixed at 0 V; every voltage source pins the node on its
//!    non-ground side to its value (with no ground side, "from" takes the
//!    value and "to" is held at 0).
//! 2. The remaining nodes are relaxed Gauss-Seidel style: each becomes the
//!    conductance-weighted mean of its neighbours. Sweeps stop once no node
//!    moves by more than the tolerance, or at the iteration cap. Reaching
//!    the cap is not an error; the last sweep's voltages are used.
//! 3. Each branch's current and voltage follow from its two node voltages
//!    and its kind's DC model, then series junctions are made consistent.
//!
//! This is not nodal analysis. Bridges and interacting loops get an
//! approximation, and source currents use a series-equivalent estimate.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::circuit::{ComponentId, NodeId};

use super::consistency::enforce_series_consistency;
use super::topology::{AnalyzedCircuit, CircuitBranch};
use super::SolverConfig;

/// Voltage across and current magnitude through one component.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Measurement {
    pub voltage: f64,
    pub current: f64,
}

/// Result of a DC solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcSolution {
    /// Voltage per node, indexed by node id
    pub node_voltages: Vec<f64>,
    /// Branches with their solved current and voltage
    pub branches: Vec<CircuitBranch>,
    /// One measurement per component of the circuit
    pub measurements: BTreeMap<ComponentId, Measurement>,
    /// A voltage source and a ground node are both present
    pub has_connectivity: bool,
    /// Components whose branch touches anything besides itself, when the
    /// circuit has connectivity
    pub connected_components: BTreeSet<ComponentId>,
    /// Relaxation sweeps performed
    pub iterations: usize,
    /// Whether the last sweep met the tolerance
    pub converged: bool,
}

impl DcSolution {
    /// Solved voltage of a node (0 for an unknown node).
    pub fn node_voltage(&self, node: NodeId) -> f64 {
        self.node_voltages.get(node.0).copied().unwrap_or(0.0)
    }

    /// Measurement for a component (zero if it has none).
    pub fn measurement(&self, component: &ComponentId) -> Measurement {
        self.measurements.get(component).copied().unwrap_or_default()
    }

    pub fn is_connected(&self, component: &ComponentId) -> bool {
        self.connected_components.contains(component)
    }
}

/// Solve with the default configuration.
pub fn solve(analyzed: &AnalyzedCircuit) -> DcSolution {
    solve_with(analyzed, &SolverConfig::default())
}

/// Solve node voltages, branch readings and measurements.
pub fn solve_with(analyzed: &AnalyzedCircuit, config: &SolverConfig) -> DcSolution {
    let node_count = analyzed.nodes.len();
    let adjacency = analyzed.adjacency();
    let ground = analyzed.ground;

    let mut voltages = vec![0.0; node_count];
    let mut pinned = vec![false; node_count];
    if let Some(g) = ground {
        pinned[g.0] = true;
    }

    // Pin voltage source nodes
    let mut source_count = 0usize;
    for branch in analyzed.branches.iter().filter(|b| b.kind.is_voltage_source()) {
        source_count += 1;
        if Some(branch.from) == ground {
            voltages[branch.to.0] = branch.value;
        } else if Some(branch.to) == ground {
            voltages[branch.from.0] = branch.value;
        } else {
            voltages[branch.from.0] = branch.value;
            voltages[branch.to.0] = 0.0;
        }
        pinned[branch.from.0] = true;
        pinned[branch.to.0] = true;
        log::debug!(
            "{} {} pins {} = {} V, {} = {} V",
            branch.kind,
            branch.component,
            branch.from,
            voltages[branch.from.0],
            branch.to,
            voltages[branch.to.0]
        );
    }
    if let Some(g) = ground {
        voltages[g.0] = 0.0;
    }

    // Relax free nodes
    let mut iterations = 0;
    let mut converged = false;
    for _ in 0..config.max_iterations {
        iterations += 1;
        let mut max_change = 0.0f64;

        for node_idx in 0..node_count {
            if pinned[node_idx] {
                continue;
            }
            let node = NodeId(node_idx);
            let mut total_conductance = 0.0;
            let mut weighted_sum = 0.0;
            for &b in &adjacency[node_idx] {
                let branch = &analyzed.branches[b];
                let g = branch.kind.conductance(branch.value);
                if g > 0.0 {
                    total_conductance += g;
                    weighted_sum += g * voltages[branch.opposite(node).0];
                }
            }
            if total_conductance > 0.0 {
                let updated = weighted_sum / total_conductance;
                max_change = max_change.max((updated - voltages[node_idx]).abs());
                voltages[node_idx] = updated;
            }
        }

        if max_change <= config.tolerance {
            converged = true;
            break;
        }
    }
    if !converged && config.max_iterations > 0 {
        log::warn!(
            "relaxation stopped at the {}-sweep cap without settling within {} V",
            config.max_iterations,
            config.tolerance
        );
    }

    // Branch readings
    let network_resistance: f64 = analyzed
        .branches
        .iter()
        .map(|b| b.kind.series_resistance(b.value))
        .sum();
    let mut branches = analyzed.branches.clone();
    for branch in &mut branches {
        let drop = voltages[branch.from.0] - voltages[branch.to.0];
        let others = network_resistance - branch.kind.series_resistance(branch.value);
        let reading = branch.kind.dc_reading(branch.value, drop, others);
        branch.current = reading.current;
        branch.voltage = reading.voltage;
        log::trace!(
            "{} {}: V={:.4} V, I={:.4} mA ({:.2} V -> {:.2} V)",
            branch.kind,
            branch.component,
            branch.voltage,
            branch.current * 1000.0,
            voltages[branch.from.0],
            voltages[branch.to.0]
        );
    }

    enforce_series_consistency(&mut branches, &adjacency, ground, config.consistency_passes);

    let has_connectivity = source_count > 0 && ground.is_some();
    // A branch whose two nodes hold nothing but its own terminals is floating
    let is_lone = |node: NodeId| analyzed.nodes[node.0].terminals.len() == 1;
    let connected_components: BTreeSet<ComponentId> = if has_connectivity {
        branches
            .iter()
            .filter(|b| !(is_lone(b.from) && is_lone(b.to)))
            .map(|b| b.component.clone())
            .collect()
    } else {
        BTreeSet::new()
    };

    let mut measurements: BTreeMap<ComponentId, Measurement> = analyzed
        .components
        .iter()
        .map(|id| (id.clone(), Measurement::default()))
        .collect();
    if has_connectivity {
        for branch in branches.iter().filter(|b| connected_components.contains(&b.component)) {
            measurements.insert(
                branch.component.clone(),
                Measurement {
                    voltage: branch.voltage,
                    current: branch.current.abs(),
                },
            );
        }
    }

    log::debug!(
        "dc solve: {} voltage sources, {} branches, {} nodes, {} sweeps{}",
        source_count,
        branches.len(),
        node_count,
        iterations,
        if converged { "" } else { " (not settled)" }
    );

    DcSolution {
        node_voltages: voltages,
        branches,
        measurements,
        has_connectivity,
        connected_components,
        iterations,
        converged,
    }
}
