//! Meter write-back and the analyze/write-back cycle.
//!
//! Meter readings are stored in the meter's own `value`, which makes the
//! circuit an input to the next analysis. Two rules keep that loop at a
//! fixed point:
//!
//! - whether to re-analyze depends only on a [`CircuitSignature`], which
//!   covers topology and every value except meter readings;
//! - a reading is written back only when it moved by more than
//!   [`WRITE_BACK_THRESHOLD`] relative to the stored value.

use std::collections::BTreeMap;

use crate::circuit::{Circuit, ComponentId, Point, TerminalRef};
use crate::components::ComponentKind;
use crate::error::Result;

use super::dc::Measurement;
use super::{analyze, Analysis, SolverConfig};

/// Relative change a meter reading must exceed to be written back.
pub const WRITE_BACK_THRESHOLD: f64 = 0.01;

/// Scale floor for the relative comparison, so a stored 0 still accepts a
/// real reading but not floating-point dust.
const READING_FLOOR: f64 = 1e-12;

/// Whether `new` differs from `old` by more than the write-back threshold.
pub fn reading_changed(old: f64, new: f64) -> bool {
    (new - old).abs() > WRITE_BACK_THRESHOLD * old.abs().max(READING_FLOOR)
}

/// Write ammeter currents and voltmeter voltages into a copy of `circuit`.
///
/// Readings within the threshold of the stored value are left alone; no
/// other component is touched.
pub fn apply_measurements(
    circuit: &Circuit,
    measurements: &BTreeMap<ComponentId, Measurement>,
) -> Circuit {
    write_back(circuit, measurements).unwrap_or_else(|| circuit.clone())
}

/// Like [`apply_measurements`], but `None` when nothing changed.
fn write_back(
    circuit: &Circuit,
    measurements: &BTreeMap<ComponentId, Measurement>,
) -> Option<Circuit> {
    let mut updated: Option<Circuit> = None;

    for (idx, component) in circuit.components.iter().enumerate() {
        let Some(m) = measurements.get(&component.id) else {
            continue;
        };
        let reading = match component.kind {
            ComponentKind::Ammeter => m.current,
            ComponentKind::Voltmeter => m.voltage,
            _ => continue,
        };
        if reading_changed(component.value, reading) {
            log::debug!(
                "{} {}: {} -> {}",
                component.kind,
                component.id,
                component.value,
                reading
            );
            updated.get_or_insert_with(|| circuit.clone()).components[idx].value = reading;
        }
    }

    updated
}

/// The part of a circuit that decides whether it must be re-analyzed:
/// components (with meter values blanked) and wire endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitSignature {
    components: Vec<ComponentSignature>,
    wires: Vec<(TerminalRef, TerminalRef)>,
}

#[derive(Debug, Clone, PartialEq)]
struct ComponentSignature {
    id: ComponentId,
    kind: ComponentKind,
    value: Option<f64>,
    properties: BTreeMap<String, f64>,
    terminals: Vec<Point>,
}

impl CircuitSignature {
    pub fn of(circuit: &Circuit) -> Self {
        Self {
            components: circuit
                .components
                .iter()
                .map(|c| ComponentSignature {
                    id: c.id.clone(),
                    kind: c.kind,
                    value: (!c.kind.is_meter()).then_some(c.value),
                    properties: c.properties.clone(),
                    terminals: c.terminals.clone(),
                })
                .collect(),
            wires: circuit
                .wires
                .iter()
                .map(|w| (w.from.clone(), w.to.clone()))
                .collect(),
        }
    }
}

/// Outcome of one analyze/write-back cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub analysis: Analysis,
    /// The circuit with new meter readings, if any reading moved
    pub circuit: Option<Circuit>,
}

/// Drives the analyze-then-write-back cycle for an editor.
///
/// The session remembers the signature of the last analyzed snapshot, so
/// handing it back a circuit whose only change is a written-back meter
/// reading does not trigger another pass.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    config: SolverConfig,
    last: Option<CircuitSignature>,
}

impl AnalysisSession {
    pub fn new(config: SolverConfig) -> Self {
        Self { config, last: None }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Whether `circuit` differs structurally from the last analyzed one.
    pub fn needs_analysis(&self, circuit: &Circuit) -> bool {
        self.last.as_ref() != Some(&CircuitSignature::of(circuit))
    }

    /// Analyze `circuit` if it changed since the last run.
    ///
    /// Returns `None` when no analysis was needed.
    pub fn run(&mut self, circuit: &Circuit) -> Result<Option<CycleOutcome>> {
        let signature = CircuitSignature::of(circuit);
        if self.last.as_ref() == Some(&signature) {
            return Ok(None);
        }
        let analysis = analyze(circuit, &self.config)?;
        let updated = write_back(circuit, &analysis.solution.measurements);
        self.last = Some(signature);
        Ok(Some(CycleOutcome {
            analysis,
            circuit: updated,
        }))
    }

    /// Forget the last snapshot so the next run always analyzes.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
