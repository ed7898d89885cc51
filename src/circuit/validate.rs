//! Circuit validation.

use std::collections::HashMap;

use crate::error::{BreadboardError, Result};

use super::{Circuit, TerminalRef};

/// Validate a circuit snapshot before analysis.
///
/// Checks:
/// - No duplicate component ids
/// - Every wire endpoint names an existing component and terminal
///
/// A circuit without ground, sources or wires is still valid; those cases
/// analyze to zero readings instead of failing.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    let mut terminal_counts = HashMap::with_capacity(circuit.components.len());
    for component in &circuit.components {
        if terminal_counts
            .insert(&component.id, component.terminals.len())
            .is_some()
        {
            return Err(BreadboardError::DuplicateComponent {
                id: component.id.to_string(),
            });
        }
    }

    let check = |endpoint: &TerminalRef| -> Result<()> {
        let count = *terminal_counts
            .get(&endpoint.component)
            .ok_or_else(|| BreadboardError::component_not_found(endpoint.component.as_str()))?;
        if endpoint.terminal >= count {
            return Err(BreadboardError::TerminalOutOfRange {
                component: endpoint.component.to_string(),
                terminal: endpoint.terminal,
                count,
            });
        }
        Ok(())
    };

    for wire in &circuit.wires {
        check(&wire.from)?;
        check(&wire.to)?;
    }

    Ok(())
}
