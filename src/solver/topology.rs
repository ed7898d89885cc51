//! Topology extraction: terminals and wires to electrical nodes.
//!
//! Two terminals share a node when a wire joins them or when they lie closer
//! than the proximity threshold on different components. Merging runs on a
//! disjoint-set forest; afterwards nodes are renumbered in order of the first
//! terminal (component order, then terminal index) that belongs to them, so
//! node ids never depend on the order in which merges happened.

use std::collections::{BTreeMap, HashMap};

use petgraph::unionfind::UnionFind;
use serde::Serialize;

use crate::circuit::{validate_circuit, Circuit, ComponentId, NodeId, Point, TerminalRef};
use crate::components::ComponentKind;
use crate::error::Result;

/// A maximal set of terminals at the same potential.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitNode {
    pub id: NodeId,
    pub terminals: Vec<TerminalRef>,
}

/// A two-terminal component spanning two distinct nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitBranch {
    pub component: ComponentId,
    pub kind: ComponentKind,
    pub value: f64,
    /// Node of terminal 0
    pub from: NodeId,
    /// Node of terminal 1
    pub to: NodeId,
    /// Signed current, positive from `from` to `to` (0 until solved)
    pub current: f64,
    /// Magnitude of the voltage drop (0 until solved)
    pub voltage: f64,
}

impl CircuitBranch {
    /// The node at the other end from `node`.
    pub fn opposite(&self, node: NodeId) -> NodeId {
        if self.from == node {
            self.to
        } else {
            self.from
        }
    }
}

/// Nodes, branches and ground reference of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedCircuit {
    pub nodes: Vec<CircuitNode>,
    pub branches: Vec<CircuitBranch>,
    /// Node holding the first ground component's terminal
    pub ground: Option<NodeId>,
    /// Every component of the source circuit, in order
    pub components: Vec<ComponentId>,
    #[serde(skip)]
    terminal_nodes: BTreeMap<TerminalRef, NodeId>,
}

impl AnalyzedCircuit {
    /// Node a terminal belongs to.
    pub fn node_of(&self, terminal: &TerminalRef) -> Option<NodeId> {
        self.terminal_nodes.get(terminal).copied()
    }

    /// Branch created for a component, if it spans two nodes.
    pub fn branch_of(&self, component: &ComponentId) -> Option<&CircuitBranch> {
        self.branches.iter().find(|b| &b.component == component)
    }

    /// Indices of the branches touching each node, indexed by node id.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for (idx, branch) in self.branches.iter().enumerate() {
            adjacency[branch.from.0].push(idx);
            adjacency[branch.to.0].push(idx);
        }
        adjacency
    }

    /// Whether two components have terminals on a common node.
    pub fn are_components_connected(&self, a: &ComponentId, b: &ComponentId) -> bool {
        self.nodes.iter().any(|node| {
            node.terminals.iter().any(|t| &t.component == a)
                && node.terminals.iter().any(|t| &t.component == b)
        })
    }
}

/// Build nodes and branches using the default proximity threshold.
pub fn analyze_topology(circuit: &Circuit) -> Result<AnalyzedCircuit> {
    analyze_topology_with(circuit, super::PROXIMITY_THRESHOLD)
}

/// Build nodes and branches, merging terminals closer than `proximity`.
pub fn analyze_topology_with(circuit: &Circuit, proximity: f64) -> Result<AnalyzedCircuit> {
    validate_circuit(circuit)?;

    // Flatten terminals into slots; `first_slot` maps a component to its first slot
    let mut slots: Vec<(TerminalRef, Point)> = Vec::new();
    let mut owners: Vec<usize> = Vec::new();
    let mut first_slot: HashMap<&ComponentId, usize> = HashMap::new();
    for (comp_idx, component) in circuit.components.iter().enumerate() {
        first_slot.insert(&component.id, slots.len());
        for (t, point) in component.terminals.iter().enumerate() {
            slots.push((component.terminal(t), *point));
            owners.push(comp_idx);
        }
    }
    // Validation guarantees every endpoint resolves
    let slot_of = |r: &TerminalRef| first_slot[&r.component] + r.terminal;

    let mut sets = UnionFind::<usize>::new(slots.len());

    for wire in &circuit.wires {
        if wire.is_self_loop() && wire.from != wire.to {
            log::warn!(
                "wire {} shorts component {} to itself ({} -> {})",
                wire.id,
                wire.from.component,
                wire.from,
                wire.to
            );
        }
        sets.union(slot_of(&wire.from), slot_of(&wire.to));
    }

    let mut proximate = 0usize;
    for i in 0..slots.len() {
        for j in (i + 1)..slots.len() {
            if owners[i] != owners[j] && slots[i].1.distance(&slots[j].1) < proximity {
                if sets.union(i, j) {
                    proximate += 1;
                }
            }
        }
    }

    // Canonical renumbering
    let mut root_to_node: HashMap<usize, NodeId> = HashMap::new();
    let mut nodes: Vec<CircuitNode> = Vec::new();
    let mut terminal_nodes = BTreeMap::new();
    for (slot, (terminal, _)) in slots.iter().enumerate() {
        let root = sets.find_mut(slot);
        let id = *root_to_node.entry(root).or_insert_with(|| {
            let id = NodeId(nodes.len());
            nodes.push(CircuitNode {
                id,
                terminals: Vec::new(),
            });
            id
        });
        nodes[id.0].terminals.push(terminal.clone());
        terminal_nodes.insert(terminal.clone(), id);
    }

    let mut branches = Vec::new();
    for component in &circuit.components {
        if component.terminals.len() < 2 {
            continue;
        }
        let from = terminal_nodes[&component.terminal(0)];
        let to = terminal_nodes[&component.terminal(1)];
        if from == to {
            log::trace!("{} {} has both terminals on {}", component.kind, component.id, from);
            continue;
        }
        branches.push(CircuitBranch {
            component: component.id.clone(),
            kind: component.kind,
            value: component.value,
            from,
            to,
            current: 0.0,
            voltage: 0.0,
        });
    }

    let ground = circuit
        .components
        .iter()
        .find(|c| c.kind == ComponentKind::Ground)
        .and_then(|g| terminal_nodes.get(&g.terminal(0)).copied());

    log::debug!(
        "topology: {} terminals -> {} nodes, {} branches, {} proximity merges, ground {:?}",
        slots.len(),
        nodes.len(),
        branches.len(),
        proximate,
        ground
    );

    Ok(AnalyzedCircuit {
        nodes,
        branches,
        ground,
        components: circuit.components.iter().map(|c| c.id.clone()).collect(),
        terminal_nodes,
    })
}
