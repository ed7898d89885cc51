//! Component kinds and their electrical models.
//!
//! The set of kinds is closed: every per-kind decision (terminal layout,
//! relaxation conductance, DC branch reading, time-domain signal) is an
//! exhaustive `match` over [`ComponentKind`].
//!
//! - Linear: Resistor, Capacitor, Inductor (DC short), Ammeter, Voltmeter
//! - Sources: DC/AC voltage source, Battery, DC/AC current source, Square wave
//! - Nonlinear: Diode (piecewise forward-drop model)
//! - Passive markers: Ground, Wire, Oscilloscope probe

mod diode;
mod linear;
mod probe;
mod sources;

pub use diode::{diode_reading, DIODE_FORWARD_VOLTAGE, DIODE_SERIES_RESISTANCE};
pub use linear::{
    capacitor_reading, ohmic_reading, AMMETER_RESISTANCE, INDUCTOR_DC_RESISTANCE,
    VOLTMETER_RESISTANCE,
};
pub use probe::ProbeTerminal;
pub use sources::{
    sine_wave, square_wave, DEFAULT_AC_FREQUENCY, DEFAULT_DUTY_CYCLE, DEFAULT_SQUARE_AMPLITUDE,
    PROP_AMPLITUDE, PROP_DUTY_CYCLE, PROP_FREQUENCY,
};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::Point;

/// The kind of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    Diode,
    VoltageSource,
    AcVoltageSource,
    Battery,
    #[serde(alias = "currentSource")]
    DcCurrentSource,
    AcCurrentSource,
    SquareWaveSource,
    Ground,
    Ammeter,
    Voltmeter,
    Oscilloscope,
    Wire,
}

/// Current through and voltage across a two-terminal component.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BranchReading {
    /// Signed current, positive from the branch's "from" node to its "to" node
    pub current: f64,
    /// Magnitude of the voltage drop
    pub voltage: f64,
}

impl ComponentKind {
    /// All kinds, in declaration order.
    pub const ALL: [ComponentKind; 15] = [
        ComponentKind::Resistor,
        ComponentKind::Capacitor,
        ComponentKind::Inductor,
        ComponentKind::Diode,
        ComponentKind::VoltageSource,
        ComponentKind::AcVoltageSource,
        ComponentKind::Battery,
        ComponentKind::DcCurrentSource,
        ComponentKind::AcCurrentSource,
        ComponentKind::SquareWaveSource,
        ComponentKind::Ground,
        ComponentKind::Ammeter,
        ComponentKind::Voltmeter,
        ComponentKind::Oscilloscope,
        ComponentKind::Wire,
    ];

    /// Name as written by the editor.
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Resistor => "resistor",
            ComponentKind::Capacitor => "capacitor",
            ComponentKind::Inductor => "inductor",
            ComponentKind::Diode => "diode",
            ComponentKind::VoltageSource => "voltageSource",
            ComponentKind::AcVoltageSource => "acVoltageSource",
            ComponentKind::Battery => "battery",
            ComponentKind::DcCurrentSource => "dcCurrentSource",
            ComponentKind::AcCurrentSource => "acCurrentSource",
            ComponentKind::SquareWaveSource => "squareWaveSource",
            ComponentKind::Ground => "ground",
            ComponentKind::Ammeter => "ammeter",
            ComponentKind::Voltmeter => "voltmeter",
            ComponentKind::Oscilloscope => "oscilloscope",
            ComponentKind::Wire => "wire",
        }
    }

    /// Unit of the component's primary value.
    pub fn unit(&self) -> &'static str {
        match self {
            ComponentKind::Resistor => "Ω",
            ComponentKind::Capacitor => "F",
            ComponentKind::Inductor => "H",
            ComponentKind::VoltageSource
            | ComponentKind::AcVoltageSource
            | ComponentKind::Battery
            | ComponentKind::Voltmeter => "V",
            ComponentKind::DcCurrentSource
            | ComponentKind::AcCurrentSource
            | ComponentKind::Ammeter => "A",
            ComponentKind::SquareWaveSource => "Hz",
            ComponentKind::Diode
            | ComponentKind::Ground
            | ComponentKind::Oscilloscope
            | ComponentKind::Wire => "",
        }
    }

    /// Number of terminals a component of this kind carries.
    pub fn terminal_count(&self) -> usize {
        match self {
            ComponentKind::Ground => 1,
            ComponentKind::Oscilloscope => 4,
            _ => 2,
        }
    }

    /// Terminal positions for a component placed at `position`.
    ///
    /// Ground has a single terminal above its symbol; the oscilloscope has
    /// its four probe terminals on the right edge (see [`ProbeTerminal`]).
    pub fn default_terminals(&self, position: Point) -> Vec<Point> {
        match self {
            ComponentKind::Ground => vec![position.offset(0.0, -20.0)],
            ComponentKind::Oscilloscope => ProbeTerminal::ALL
                .iter()
                .map(|t| {
                    let (dx, dy) = t.offset();
                    position.offset(dx, dy)
                })
                .collect(),
            _ => vec![position.offset(-40.0, 0.0), position.offset(40.0, 0.0)],
        }
    }

    /// Ideal voltage sources pin their node voltage during the DC solve.
    pub fn is_voltage_source(&self) -> bool {
        matches!(
            self,
            ComponentKind::VoltageSource | ComponentKind::Battery | ComponentKind::AcVoltageSource
        )
    }

    /// Components whose waveform is defined by their own value.
    pub fn is_signal_source(&self) -> bool {
        matches!(
            self,
            ComponentKind::VoltageSource
                | ComponentKind::AcVoltageSource
                | ComponentKind::Battery
                | ComponentKind::DcCurrentSource
                | ComponentKind::AcCurrentSource
                | ComponentKind::SquareWaveSource
        )
    }

    /// Measuring instruments whose value is written back from the solve.
    pub fn is_meter(&self) -> bool {
        matches!(self, ComponentKind::Ammeter | ComponentKind::Voltmeter)
    }

    /// Effective DC resistance used for both the relaxation weight and
    /// Ohm's-law branch currents. `None` for kinds that do not conduct
    /// resistively, and for a resistor with non-positive resistance.
    pub fn effective_resistance(&self, value: f64) -> Option<f64> {
        match self {
            ComponentKind::Resistor => (value > 0.0).then_some(value),
            ComponentKind::Ammeter => Some(AMMETER_RESISTANCE),
            ComponentKind::Inductor => Some(INDUCTOR_DC_RESISTANCE),
            ComponentKind::Voltmeter => Some(VOLTMETER_RESISTANCE),
            _ => None,
        }
    }

    /// Conductance used as a relaxation weight (0 when non-conducting).
    pub fn conductance(&self, value: f64) -> f64 {
        self.effective_resistance(value).map_or(0.0, |r| 1.0 / r)
    }

    /// Resistance a branch adds to the series-equivalent estimate used for
    /// voltage source currents. Voltmeters sit in parallel and are left out.
    pub fn series_resistance(&self, value: f64) -> f64 {
        match self {
            ComponentKind::Voltmeter => 0.0,
            _ => self.effective_resistance(value).unwrap_or(0.0),
        }
    }

    /// DC reading for a branch of this kind.
    ///
    /// `drop` is `V(from) - V(to)`; `network_resistance` is the summed series
    /// resistance of every other branch and is only used by voltage sources.
    pub fn dc_reading(&self, value: f64, drop: f64, network_resistance: f64) -> BranchReading {
        match self {
            ComponentKind::Resistor | ComponentKind::Ammeter | ComponentKind::Inductor => {
                ohmic_reading(self.effective_resistance(value), drop)
            }
            ComponentKind::Voltmeter => ohmic_reading(Some(VOLTMETER_RESISTANCE), drop),
            ComponentKind::VoltageSource
            | ComponentKind::Battery
            | ComponentKind::AcVoltageSource => BranchReading {
                current: if network_resistance > 0.0 {
                    value / network_resistance
                } else {
                    0.0
                },
                voltage: value,
            },
            ComponentKind::DcCurrentSource | ComponentKind::AcCurrentSource => BranchReading {
                current: value,
                voltage: drop.abs(),
            },
            ComponentKind::Capacitor => capacitor_reading(drop),
            ComponentKind::Diode => diode_reading(drop),
            ComponentKind::Ground => BranchReading::default(),
            ComponentKind::SquareWaveSource
            | ComponentKind::Oscilloscope
            | ComponentKind::Wire => BranchReading {
                current: 0.0,
                voltage: drop.abs(),
            },
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
