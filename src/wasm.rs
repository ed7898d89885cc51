//! WASM bindings for Breadboard Core.
//!
//! Circuits and results cross the boundary as JSON strings in the editor's
//! snapshot format.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmBreadboard } from 'breadboard_core';
//!
//! await init();
//!
//! const board = new WasmBreadboard();
//!
//! // On every circuit edit:
//! const result = board.analyze(JSON.stringify(circuit));
//! if (result) {
//!   const { solution, circuit: updated } = JSON.parse(result);
//!   if (updated) setCircuit(updated); // meters moved
//! }
//!
//! // Oscilloscope panel:
//! const trace = board.simulate_probe(JSON.stringify(circuit), 'scope1');
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::circuit::{Circuit, ComponentId};
use crate::error::BreadboardError;
use crate::probe::{list_probe_bindings, probeable_sources, simulate_probe};
use crate::signal::{simulate_with, SimulationConfig};
use crate::solver::{AnalysisSession, SolverConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: BreadboardError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| to_js(e.into()))
}

fn parse(circuit_json: &str) -> Result<Circuit, JsValue> {
    Circuit::from_json(circuit_json).map_err(to_js)
}

/// Analysis session for one editor canvas.
///
/// Holds the last analyzed circuit signature, so feeding back a circuit that
/// only differs by written-back meter readings is a no-op.
#[wasm_bindgen]
pub struct WasmBreadboard {
    session: AnalysisSession,
    simulation: SimulationConfig,
}

#[wasm_bindgen]
impl WasmBreadboard {
    /// Create a board with default solver and sampling settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmBreadboard {
        WasmBreadboard {
            session: AnalysisSession::default(),
            simulation: SimulationConfig::default(),
        }
    }

    /// Create a board with custom relaxation and sampling settings.
    ///
    /// # Arguments
    /// * `max_iterations` - Relaxation sweep cap (default: 20)
    /// * `tolerance` - Relaxation tolerance in volts (default: 1e-3)
    /// * `samples` - Samples per simulation (default: 1000)
    /// * `duration` - Simulated window in seconds (default: 0.01)
    #[wasm_bindgen]
    pub fn with_config(
        max_iterations: usize,
        tolerance: f64,
        samples: usize,
        duration: f64,
    ) -> Result<WasmBreadboard, JsValue> {
        let solver = SolverConfig::new()
            .with_max_iterations(max_iterations)
            .with_tolerance(tolerance);
        solver.validate().map_err(to_js)?;
        let simulation = SimulationConfig::new()
            .with_samples(samples)
            .with_duration(duration);
        simulation.validate().map_err(to_js)?;
        Ok(WasmBreadboard {
            session: AnalysisSession::new(solver),
            simulation,
        })
    }

    /// Analyze a circuit and write meter readings back.
    ///
    /// Returns `undefined` when the circuit has not changed structurally
    /// since the last call; otherwise JSON with `topology`, `solution` and
    /// `circuit` (the updated snapshot, or `null` if no meter moved).
    #[wasm_bindgen]
    pub fn analyze(&mut self, circuit_json: &str) -> Result<Option<String>, JsValue> {
        let circuit = parse(circuit_json)?;
        let Some(outcome) = self.session.run(&circuit).map_err(to_js)? else {
            return Ok(None);
        };
        to_json(&serde_json::json!({
            "topology": outcome.analysis.topology,
            "solution": outcome.analysis.solution,
            "circuit": outcome.circuit,
        }))
        .map(Some)
    }

    /// Force the next `analyze` call to run.
    #[wasm_bindgen]
    pub fn invalidate(&mut self) {
        self.session.invalidate();
    }

    /// Sample every component's signal.
    #[wasm_bindgen]
    pub fn simulate(&self, circuit_json: &str) -> Result<String, JsValue> {
        let circuit = parse(circuit_json)?;
        let result =
            simulate_with(&circuit, self.session.config(), &self.simulation).map_err(to_js)?;
        to_json(&result)
    }

    /// Simulate the sub-circuit wired to an oscilloscope.
    ///
    /// Returns `undefined` when nothing is wired to it.
    #[wasm_bindgen]
    pub fn simulate_probe(
        &self,
        circuit_json: &str,
        probe_id: &str,
    ) -> Result<Option<String>, JsValue> {
        let circuit = parse(circuit_json)?;
        let result = simulate_probe(
            &circuit,
            &ComponentId::new(probe_id),
            self.session.config(),
            &self.simulation,
        )
        .map_err(to_js)?;
        result.as_ref().map(to_json).transpose()
    }

    /// JSON list of an oscilloscope's terminal bindings.
    #[wasm_bindgen]
    pub fn probe_bindings(&self, circuit_json: &str, probe_id: &str) -> Result<String, JsValue> {
        let circuit = parse(circuit_json)?;
        let bindings = list_probe_bindings(&circuit, &ComponentId::new(probe_id)).map_err(to_js)?;
        to_json(&bindings)
    }

    /// JSON list of components that can be shown as a signal source.
    #[wasm_bindgen]
    pub fn probeable_sources(&self, circuit_json: &str) -> Result<String, JsValue> {
        let circuit = parse(circuit_json)?;
        to_json(&probeable_sources(&circuit))
    }
}

impl Default for WasmBreadboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the proximity threshold (canvas units) below which terminals merge.
#[wasm_bindgen]
pub fn proximity_threshold() -> f64 {
    crate::solver::PROXIMITY_THRESHOLD
}
