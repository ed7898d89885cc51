//! Diode model.
//!
//! A piecewise-linear approximation of a silicon diode at DC: below the
//! forward voltage it blocks, above it the excess drop is taken by a series
//! resistance:
//!
//! ```text
//!   V_d > Vf :  V = Vf,   I = (V_d - Vf) / Rs
//!   V_d <= Vf:  V = |V_d|, I = 0
//! ```

use super::BranchReading;

/// Forward voltage drop of a silicon diode.
pub const DIODE_FORWARD_VOLTAGE: f64 = 0.7;

/// Series resistance seen once the diode is forward biased.
pub const DIODE_SERIES_RESISTANCE: f64 = 100.0;

/// DC reading for a diode with anode at "from" and cathode at "to".
pub fn diode_reading(drop: f64) -> BranchReading {
    if drop > DIODE_FORWARD_VOLTAGE {
        BranchReading {
            current: (drop - DIODE_FORWARD_VOLTAGE) / DIODE_SERIES_RESISTANCE,
            voltage: DIODE_FORWARD_VOLTAGE,
        }
    } else {
        BranchReading {
            current: 0.0,
            voltage: drop.abs(),
        }
    }
}
