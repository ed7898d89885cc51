//! Time-domain signal synthesis for waveform display.
//!
//! Every component gets one sequence over a fixed sample grid. Sources
//! follow their closed-form waveform; passive parts show a DC value derived
//! from the solved node voltages. Components the solver did not mark as
//! connected are flat zero.

mod waveform;

pub use waveform::Waveform;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::circuit::{Circuit, ComponentId};
use crate::error::{BreadboardError, Result};
use crate::solver::{analyze, Analysis, SolverConfig};

/// Default number of samples per simulation.
pub const DEFAULT_SAMPLES: usize = 1000;

/// Default simulated window in seconds (10 ms: ten periods of a 1 kHz clock).
pub const DEFAULT_DURATION: f64 = 0.01;

/// Sample grid for a simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Number of samples.
    pub samples: usize,
    /// Window length in seconds.
    pub duration: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            duration: DEFAULT_DURATION,
        }
    }
}

impl SimulationConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of samples.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Set the window length (in seconds).
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Time between samples.
    pub fn step(&self) -> f64 {
        self.duration / self.samples as f64
    }

    /// Sample times `i * duration / samples` for `i` in `0..samples`.
    pub fn time_axis(&self) -> Vec<f64> {
        let step = self.step();
        (0..self.samples).map(|i| i as f64 * step).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(BreadboardError::invalid_param("sample count must be at least 1"));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(BreadboardError::invalid_param(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        Ok(())
    }
}

/// Sampled signals of every component, plus the DC solution behind them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub time: Vec<f64>,
    pub signals: BTreeMap<ComponentId, Vec<f64>>,
    pub node_voltages: Vec<f64>,
    pub has_connectivity: bool,
    pub connected_components: BTreeSet<ComponentId>,
}

impl SimulationResult {
    /// Samples of one component.
    pub fn signal(&self, component: &ComponentId) -> Option<&[f64]> {
        self.signals.get(component).map(Vec::as_slice)
    }
}

/// Simulate with default solver and sample settings.
pub fn simulate(circuit: &Circuit) -> Result<SimulationResult> {
    simulate_with(circuit, &SolverConfig::default(), &SimulationConfig::default())
}

/// Solve `circuit` and sample every component's signal over the grid.
pub fn simulate_with(
    circuit: &Circuit,
    solver: &SolverConfig,
    config: &SimulationConfig,
) -> Result<SimulationResult> {
    config.validate()?;
    let Analysis { topology, solution } = analyze(circuit, solver)?;
    let time = config.time_axis();

    let signals = circuit
        .components
        .iter()
        .map(|component| {
            let samples = if solution.is_connected(&component.id) {
                let waveform = Waveform::for_component(component, &topology, &solution);
                time.iter().map(|&t| waveform.sample(t)).collect()
            } else {
                vec![0.0; time.len()]
            };
            (component.id.clone(), samples)
        })
        .collect();

    log::debug!(
        "simulated {} components over {} samples ({} connected)",
        circuit.components.len(),
        time.len(),
        solution.connected_components.len()
    );

    Ok(SimulationResult {
        time,
        signals,
        node_voltages: solution.node_voltages,
        has_connectivity: solution.has_connectivity,
        connected_components: solution.connected_components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Component, Point, TerminalRef};
    use crate::components::{ComponentKind, PROP_AMPLITUDE, PROP_DUTY_CYCLE, PROP_FREQUENCY};
    use approx::assert_relative_eq;

    /// Re-lay `component` on its own row so only wires connect it.
    fn place(c: &mut Circuit, mut component: Component) {
        let row = Point::new(0.0, 200.0 * c.components.len() as f64);
        component.terminals = component.kind.default_terminals(row);
        c.add(component);
    }

    /// bat(9V) - r1(1k) - gnd, with an AC source and a clock hanging off ground
    fn driven_circuit() -> Circuit {
        let mut c = Circuit::new();
        let at = Point::default();
        place(&mut c, Component::placed("bat", ComponentKind::Battery, 9.0, at));
        place(&mut c, Component::placed("r1", ComponentKind::Resistor, 1000.0, at));
        place(&mut c, Component::placed("gnd", ComponentKind::Ground, 0.0, at));
        place(
            &mut c,
            Component::placed("ac", ComponentKind::AcVoltageSource, 2.0, at)
                .with_property(PROP_FREQUENCY, 500.0),
        );
        place(
            &mut c,
            Component::placed("clk", ComponentKind::SquareWaveSource, 1000.0, at)
                .with_property(PROP_DUTY_CYCLE, 0.25)
                .with_property(PROP_AMPLITUDE, 3.3),
        );
        place(&mut c, Component::placed("stray", ComponentKind::Resistor, 10.0, at));
        let t = TerminalRef::new;
        c.connect(t("bat", 0), t("r1", 0));
        c.connect(t("r1", 1), t("gnd", 0));
        c.connect(t("bat", 1), t("gnd", 0));
        c.connect(t("ac", 1), t("gnd", 0));
        c.connect(t("clk", 1), t("gnd", 0));
        c
    }

    #[test]
    fn test_time_axis() {
        let config = SimulationConfig::new().with_samples(4).with_duration(0.002);
        let axis = config.time_axis();
        assert_eq!(axis.len(), 4);
        assert_relative_eq!(axis[1], 0.0005);
        assert_relative_eq!(axis[3], 0.0015);
    }

    #[test]
    fn test_config_validation() {
        assert!(SimulationConfig::new().with_samples(0).validate().is_err());
        assert!(SimulationConfig::new().with_duration(0.0).validate().is_err());
        assert!(SimulationConfig::new().with_duration(f64::INFINITY).validate().is_err());
        assert!(simulate_with(
            &Circuit::new(),
            &SolverConfig::default(),
            &SimulationConfig::new().with_samples(0)
        )
        .is_err());
    }

    #[test]
    fn test_signals_follow_kind() {
        let config = SimulationConfig::new().with_samples(1000).with_duration(0.01);
        let result = simulate_with(&driven_circuit(), &SolverConfig::default(), &config).unwrap();
        assert!(result.has_connectivity);
        assert_eq!(result.time.len(), 1000);

        let bat = result.signal(&"bat".into()).unwrap();
        assert!(bat.iter().all(|&v| v == 9.0));

        // |V1 - V0| / R = 9 V / 1 kΩ
        let r1 = result.signal(&"r1".into()).unwrap();
        assert_relative_eq!(r1[0], 0.009, epsilon = 1e-9);

        // 500 Hz sine: quarter period is 0.5 ms = sample 50
        let ac = result.signal(&"ac".into()).unwrap();
        assert_relative_eq!(ac[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(ac[50], 2.0, epsilon = 1e-9);

        // 1 kHz at 10 µs per sample: 100-sample period, high for the first 25
        let clk = result.signal(&"clk".into()).unwrap();
        assert_eq!(clk[1], 3.3);
        assert_eq!(clk[50], 0.0);
        assert_eq!(clk[101], 3.3);

        let gnd = result.signal(&"gnd".into()).unwrap();
        assert!(gnd.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_capacitor_signal_is_signed() {
        // c1 terminal 0 on the 9 V node, terminal 1 on ground: V1 - V0 = -9
        let mut c = driven_circuit();
        place(
            &mut c,
            Component::placed("c1", ComponentKind::Capacitor, 1e-6, Point::default()),
        );
        c.connect(TerminalRef::new("c1", 0), TerminalRef::new("bat", 0));
        c.connect(TerminalRef::new("c1", 1), TerminalRef::new("gnd", 0));
        let config = SimulationConfig::new().with_samples(2);
        let result = simulate_with(&c, &SolverConfig::default(), &config).unwrap();
        assert_eq!(result.signal(&"c1".into()).unwrap(), &[-9.0, -9.0]);
    }

    #[test]
    fn test_ac_source_node_sits_at_peak_value() {
        let c = driven_circuit();
        let Analysis { topology, solution } = analyze(&c, &SolverConfig::default()).unwrap();
        let top = topology.node_of(&TerminalRef::new("ac", 0)).unwrap();
        assert_eq!(solution.node_voltage(top), 2.0);
        assert_eq!(solution.measurement(&"ac".into()).voltage, 2.0);
    }

    #[test]
    fn test_disconnected_components_are_flat() {
        let result = simulate(&driven_circuit()).unwrap();
        let stray = result.signal(&"stray".into()).unwrap();
        assert!(stray.iter().all(|&v| v == 0.0));
        assert!(!result.connected_components.contains(&"stray".into()));
    }

    #[test]
    fn test_no_connectivity_silences_everything() {
        let mut c = Circuit::new();
        place(
            &mut c,
            Component::placed("ac", ComponentKind::AcVoltageSource, 5.0, Point::default()),
        );
        place(
            &mut c,
            Component::placed("r1", ComponentKind::Resistor, 100.0, Point::default()),
        );
        c.connect(TerminalRef::new("ac", 0), TerminalRef::new("r1", 0));
        c.connect(TerminalRef::new("ac", 1), TerminalRef::new("r1", 1));
        let result = simulate(&c).unwrap();
        assert!(!result.has_connectivity);
        for samples in result.signals.values() {
            assert!(samples.iter().all(|&v| v == 0.0));
        }
    }
}
