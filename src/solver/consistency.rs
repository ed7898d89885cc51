//! Series current consistency.
//!
//! Branch currents are derived independently, so two components in series
//! can disagree (a resistor and the ammeter after it, say). At every
//! non-ground node joining exactly two branches, neither of them a voltage
//! source, both currents are raised to the larger magnitude. The pass is
//! repeated so corrections travel along longer chains.

use crate::circuit::NodeId;

use super::topology::CircuitBranch;

/// Currents closer than this are treated as already consistent (amps).
pub const CURRENT_EPSILON: f64 = 1e-9;

/// Signed current flowing into `node` through `branch`.
fn inflow(branch: &CircuitBranch, node: NodeId) -> f64 {
    if branch.to == node {
        branch.current
    } else {
        -branch.current
    }
}

/// Give `branch` a current of magnitude `magnitude` whose inflow at `node`
/// has sign `inflow_sign`.
fn set_inflow(branch: &mut CircuitBranch, node: NodeId, inflow_sign: f64, magnitude: f64) {
    let inflow = inflow_sign * magnitude;
    branch.current = if branch.to == node { inflow } else { -inflow };
}

/// Equalize currents through series junctions.
///
/// `adjacency` lists branch indices per node (see
/// [`AnalyzedCircuit::adjacency`](super::AnalyzedCircuit::adjacency)).
/// Returns the number of passes that changed something.
pub fn enforce_series_consistency(
    branches: &mut [CircuitBranch],
    adjacency: &[Vec<usize>],
    ground: Option<NodeId>,
    max_passes: usize,
) -> usize {
    let mut changed_passes = 0;

    for _ in 0..max_passes {
        let mut changed = false;

        for (node_idx, touching) in adjacency.iter().enumerate() {
            let node = NodeId(node_idx);
            if Some(node) == ground || touching.len() != 2 {
                continue;
            }
            let (ia, ib) = (touching[0], touching[1]);
            if branches[ia].kind.is_voltage_source() || branches[ib].kind.is_voltage_source() {
                continue;
            }

            let (ca, cb) = (branches[ia].current.abs(), branches[ib].current.abs());
            if (ca - cb).abs() <= CURRENT_EPSILON {
                continue;
            }
            let magnitude = ca.max(cb);

            // Each branch keeps its own direction; a branch that carried no
            // current takes the direction that balances the junction.
            let sign_a = inflow(&branches[ia], node).signum();
            let sign_b = inflow(&branches[ib], node).signum();
            let (sign_a, sign_b) = if ca == 0.0 {
                (-sign_b, sign_b)
            } else if cb == 0.0 {
                (sign_a, -sign_a)
            } else {
                (sign_a, sign_b)
            };

            set_inflow(&mut branches[ia], node, sign_a, magnitude);
            set_inflow(&mut branches[ib], node, sign_b, magnitude);
            changed = true;
        }

        if !changed {
            break;
        }
        changed_passes += 1;
    }

    changed_passes
}
