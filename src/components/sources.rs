//! Closed-form source waveforms.
//!
//! Sources read their secondary parameters from the component's property
//! bag; the names and defaults live here.

use std::f64::consts::PI;

/// Property holding an AC source's frequency in Hz.
pub const PROP_FREQUENCY: &str = "frequency";
/// Property holding a square wave's high fraction of each period.
pub const PROP_DUTY_CYCLE: &str = "dutyCycle";
/// Property holding a square wave's high level.
pub const PROP_AMPLITUDE: &str = "amplitude";

/// Frequency used by AC sources that do not set one (mains, 60 Hz).
pub const DEFAULT_AC_FREQUENCY: f64 = 60.0;
/// Duty cycle used by square waves that do not set one.
pub const DEFAULT_DUTY_CYCLE: f64 = 0.5;
/// High level used by square waves that do not set one.
pub const DEFAULT_SQUARE_AMPLITUDE: f64 = 5.0;

/// `amplitude * sin(2π f t)`
pub fn sine_wave(amplitude: f64, frequency: f64, t: f64) -> f64 {
    amplitude * (2.0 * PI * frequency * t).sin()
}

/// Square wave: `amplitude` for the first `duty_cycle` fraction of each
/// period, 0 for the rest. A non-positive frequency has no period and
/// outputs 0.
pub fn square_wave(amplitude: f64, frequency: f64, duty_cycle: f64, t: f64) -> f64 {
    if frequency <= 0.0 || !frequency.is_finite() {
        return 0.0;
    }
    let period = 1.0 / frequency;
    let phase = t.rem_euclid(period) / period;
    if phase < duty_cycle {
        amplitude
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_square_wave_duty_cycle() {
        let period = 1.0 / 1000.0;
        // 0.0001 ms into the period: high
        assert_eq!(square_wave(5.0, 1000.0, 0.25, 1e-7), 5.0);
        // Half way: low
        assert_eq!(square_wave(5.0, 1000.0, 0.25, 0.5 * period), 0.0);
        // Same phase one period later
        assert_eq!(square_wave(5.0, 1000.0, 0.25, period + 1e-7), 5.0);
        assert_eq!(square_wave(5.0, 1000.0, 0.25, 0.3 * period), 0.0);
    }

    #[test]
    fn test_square_wave_without_frequency_is_flat() {
        assert_eq!(square_wave(5.0, 0.0, 0.5, 0.001), 0.0);
        assert_eq!(square_wave(5.0, -10.0, 0.5, 0.001), 0.0);
    }

    #[test]
    fn test_sine_wave_quarter_period_peak() {
        let f = 60.0;
        assert_abs_diff_eq!(sine_wave(10.0, f, 0.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sine_wave(10.0, f, 0.25 / f), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sine_wave(10.0, f, 0.75 / f), -10.0, epsilon = 1e-9);
    }
}
