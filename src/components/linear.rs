//! Linear two-terminal models: resistor, meters, inductor and capacitor at DC.

use super::BranchReading;

/// Internal resistance of an ammeter (1 mΩ).
pub const AMMETER_RESISTANCE: f64 = 1e-3;

/// DC resistance of an inductor (1 mΩ): at steady state it is a short.
pub const INDUCTOR_DC_RESISTANCE: f64 = 1e-3;

/// Internal resistance of a voltmeter (1 MΩ).
pub const VOLTMETER_RESISTANCE: f64 = 1e6;

/// Ohm's law across a resistive branch.
///
/// A missing or non-positive resistance carries no current rather than
/// dividing by zero.
pub fn ohmic_reading(resistance: Option<f64>, drop: f64) -> BranchReading {
    let current = match resistance {
        Some(r) if r > 0.0 => drop / r,
        _ => 0.0,
    };
    BranchReading {
        current,
        voltage: drop.abs(),
    }
}

/// A capacitor is an open circuit at DC.
pub fn capacitor_reading(drop: f64) -> BranchReading {
    BranchReading {
        current: 0.0,
        voltage: drop.abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ohmic_reading_sign_follows_drop() {
        let forward = ohmic_reading(Some(100.0), 6.0);
        assert_relative_eq!(forward.current, 0.06);
        assert_relative_eq!(forward.voltage, 6.0);

        let reverse = ohmic_reading(Some(100.0), -6.0);
        assert_relative_eq!(reverse.current, -0.06);
        assert_relative_eq!(reverse.voltage, 6.0);
    }

    #[test]
    fn test_zero_resistance_carries_no_current() {
        assert_eq!(ohmic_reading(Some(0.0), 5.0).current, 0.0);
        assert_eq!(ohmic_reading(None, 5.0).current, 0.0);
    }

    #[test]
    fn test_capacitor_blocks_dc() {
        let r = capacitor_reading(-2.5);
        assert_eq!(r.current, 0.0);
        assert_relative_eq!(r.voltage, 2.5);
    }
}
