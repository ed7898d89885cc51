//! Per-component waveform selection.

use crate::circuit::Component;
use crate::components::{
    sine_wave, square_wave, ComponentKind, DEFAULT_AC_FREQUENCY, DEFAULT_DUTY_CYCLE,
    DEFAULT_SQUARE_AMPLITUDE, PROP_AMPLITUDE, PROP_DUTY_CYCLE, PROP_FREQUENCY,
};
use crate::solver::{AnalyzedCircuit, DcSolution};

/// Closed-form signal of one component over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Constant(f64),
    Sine {
        amplitude: f64,
        frequency: f64,
    },
    Square {
        amplitude: f64,
        frequency: f64,
        duty_cycle: f64,
    },
}

impl Waveform {
    /// Pick the waveform for a component from its kind, value, properties
    /// and the solved voltages at its terminals.
    pub fn for_component(
        component: &Component,
        topology: &AnalyzedCircuit,
        solution: &DcSolution,
    ) -> Self {
        let terminal_voltage = |index: usize| -> f64 {
            if index >= component.terminals.len() {
                return 0.0;
            }
            topology
                .node_of(&component.terminal(index))
                .map_or(0.0, |node| solution.node_voltage(node))
        };

        match component.kind {
            ComponentKind::VoltageSource
            | ComponentKind::Battery
            | ComponentKind::DcCurrentSource => Waveform::Constant(component.value),
            ComponentKind::AcVoltageSource | ComponentKind::AcCurrentSource => Waveform::Sine {
                amplitude: component.value,
                frequency: component
                    .positive_property_or(PROP_FREQUENCY, DEFAULT_AC_FREQUENCY),
            },
            ComponentKind::SquareWaveSource => Waveform::Square {
                amplitude: component.property_or(PROP_AMPLITUDE, DEFAULT_SQUARE_AMPLITUDE),
                frequency: component.value,
                duty_cycle: component
                    .positive_property_or(PROP_DUTY_CYCLE, DEFAULT_DUTY_CYCLE),
            },
            ComponentKind::Ground => Waveform::Constant(0.0),
            ComponentKind::Resistor => {
                let current = if component.value > 0.0 {
                    (terminal_voltage(1) - terminal_voltage(0)).abs() / component.value
                } else {
                    0.0
                };
                Waveform::Constant(current)
            }
            ComponentKind::Capacitor => {
                Waveform::Constant(terminal_voltage(1) - terminal_voltage(0))
            }
            ComponentKind::Inductor
            | ComponentKind::Diode
            | ComponentKind::Ammeter
            | ComponentKind::Voltmeter
            | ComponentKind::Oscilloscope
            | ComponentKind::Wire => Waveform::Constant(terminal_voltage(1)),
        }
    }

    /// Value at time `t` (seconds).
    pub fn sample(&self, t: f64) -> f64 {
        match *self {
            Waveform::Constant(v) => v,
            Waveform::Sine {
                amplitude,
                frequency,
            } => sine_wave(amplitude, frequency, t),
            Waveform::Square {
                amplitude,
                frequency,
                duty_cycle,
            } => square_wave(amplitude, frequency, duty_cycle, t),
        }
    }
}
