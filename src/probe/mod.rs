//! Oscilloscope probe resolution.
//!
//! A probe sees the sub-circuit it is wired into: every component reachable
//! from the probe by following wires, plus the probe itself and the wires
//! among them. Proximity contacts are not followed here; a probe has to be
//! wired in.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use serde::Serialize;

use crate::circuit::{validate_circuit, Circuit, Component, ComponentId};
use crate::components::{ComponentKind, ProbeTerminal};
use crate::error::{BreadboardError, Result};
use crate::signal::{simulate_with, SimulationConfig, SimulationResult};
use crate::solver::SolverConfig;

/// Which probe terminal is wired to which component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeBinding {
    pub component_id: ComponentId,
    pub terminal_index: usize,
    pub label: String,
}

/// A component whose signal is worth offering on a probe channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeableSource {
    pub id: ComponentId,
    pub label: String,
}

/// Look up `probe_id` and check it is an oscilloscope.
fn find_probe<'a>(circuit: &'a Circuit, probe_id: &ComponentId) -> Result<&'a Component> {
    let probe = circuit
        .component(probe_id)
        .ok_or_else(|| BreadboardError::component_not_found(probe_id.as_str()))?;
    if probe.kind != ComponentKind::Oscilloscope {
        return Err(BreadboardError::NotAProbe {
            id: probe_id.to_string(),
            kind: probe.kind.to_string(),
        });
    }
    Ok(probe)
}

/// Components reachable from the probe over wires, excluding the probe.
fn reachable_components<'a>(
    circuit: &'a Circuit,
    probe_id: &ComponentId,
) -> HashSet<&'a ComponentId> {
    let mut graph: UnGraph<&ComponentId, ()> = UnGraph::default();
    let mut lookup: HashMap<&ComponentId, NodeIndex> = HashMap::new();
    for component in &circuit.components {
        lookup.insert(&component.id, graph.add_node(&component.id));
    }
    for wire in &circuit.wires {
        let from = lookup.get(&wire.from.component);
        let to = lookup.get(&wire.to.component);
        if let (Some(&a), Some(&b)) = (from, to) {
            graph.add_edge(a, b, ());
        }
    }

    let mut reachable = HashSet::new();
    let Some(&start) = lookup.get(probe_id) else {
        return reachable;
    };
    let mut bfs = Bfs::new(&graph, start);
    while let Some(idx) = bfs.next(&graph) {
        if idx != start {
            reachable.insert(graph[idx]);
        }
    }
    reachable
}

/// Extract the sub-circuit wired to a probe.
///
/// Returns `None` when nothing but the probe itself would be in it. Errors
/// only when the circuit is invalid or `probe_id` is not an oscilloscope.
pub fn resolve_probe_subcircuit(circuit: &Circuit, probe_id: &ComponentId) -> Result<Option<Circuit>> {
    validate_circuit(circuit)?;
    find_probe(circuit, probe_id)?;

    let reachable = reachable_components(circuit, probe_id);
    if reachable.is_empty() {
        log::debug!("probe {} has nothing wired to it", probe_id);
        return Ok(None);
    }

    let members = |id: &ComponentId| id == probe_id || reachable.contains(id);
    let components: Vec<Component> = circuit
        .components
        .iter()
        .filter(|c| members(&c.id))
        .cloned()
        .collect();
    let wires = circuit
        .wires
        .iter()
        .filter(|w| members(&w.from.component) && members(&w.to.component))
        .cloned()
        .collect();

    log::debug!(
        "probe {} sees {} components",
        probe_id,
        components.len()
    );
    Ok(Some(Circuit { components, wires }))
}

/// Label for a probe terminal bound to `component`.
fn binding_label(terminal_index: usize, component: &Component) -> String {
    let (name, color) = match ProbeTerminal::from_index(terminal_index) {
        Some(role) => (role.name().to_string(), role.color()),
        None => (format!("Terminal {}", terminal_index + 1), "Gray"),
    };
    format!("{} ({}): {} ({})", name, color, component.kind, component.value)
}

/// List every wire from a probe terminal to another component.
pub fn list_probe_bindings(circuit: &Circuit, probe_id: &ComponentId) -> Result<Vec<ProbeBinding>> {
    validate_circuit(circuit)?;
    find_probe(circuit, probe_id)?;

    let mut bindings = Vec::new();
    for wire in circuit.wires.iter().filter(|w| w.touches(probe_id)) {
        let (probe_end, other_end) = if &wire.from.component == probe_id {
            (&wire.from, &wire.to)
        } else {
            (&wire.to, &wire.from)
        };
        if &other_end.component == probe_id {
            continue;
        }
        let Some(other) = circuit.component(&other_end.component) else {
            continue;
        };
        bindings.push(ProbeBinding {
            component_id: other.id.clone(),
            terminal_index: probe_end.terminal,
            label: binding_label(probe_end.terminal, other),
        });
    }
    Ok(bindings)
}

/// Resolve a probe's sub-circuit and simulate it.
///
/// `None` means nothing is wired to the probe.
pub fn simulate_probe(
    circuit: &Circuit,
    probe_id: &ComponentId,
    solver: &SolverConfig,
    config: &SimulationConfig,
) -> Result<Option<SimulationResult>> {
    match resolve_probe_subcircuit(circuit, probe_id)? {
        Some(sub) => simulate_with(&sub, solver, config).map(Some),
        None => Ok(None),
    }
}

/// Signal sources in the circuit, labelled with value and unit.
pub fn probeable_sources(circuit: &Circuit) -> Vec<ProbeableSource> {
    circuit
        .components
        .iter()
        .filter(|c| c.kind.is_signal_source())
        .map(|c| ProbeableSource {
            id: c.id.clone(),
            label: format!("{} ({}{})", c.kind, c.value, c.kind.unit()),
        })
        .collect()
}
