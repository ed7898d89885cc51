//! End-to-end scenarios for the breadboard analysis engine.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use breadboard_core::circuit::Point;
use breadboard_core::components::{square_wave, PROP_AMPLITUDE, PROP_DUTY_CYCLE};
use breadboard_core::solver::{reading_changed, solve_with};
use breadboard_core::{
    analyze, analyze_topology, apply_measurements, resolve_probe_subcircuit, simulate,
    simulate_with, AnalysisSession, Circuit, Component, ComponentKind, SimulationConfig,
    SolverConfig, TerminalRef,
};

/// The series example as the editor would save it.
const SERIES_JSON: &str = r#"{
  "components": [
    { "id": "bat", "type": "battery", "value": 12,
      "terminals": [{ "x": 60, "y": 100 }, { "x": 140, "y": 100 }] },
    { "id": "r1", "type": "resistor", "value": 100,
      "terminals": [{ "x": 260, "y": 0 }, { "x": 340, "y": 0 }] },
    { "id": "r2", "type": "resistor", "value": 100,
      "terminals": [{ "x": 460, "y": 0 }, { "x": 540, "y": 0 }] },
    { "id": "gnd", "type": "ground", "value": 0,
      "terminals": [{ "x": 300, "y": 300 }] }
  ],
  "wires": [
    { "id": "w1", "from": "bat:0", "to": "r1:0", "points": [{ "x": 60, "y": 0 }] },
    { "id": "w2", "from": "r1:1", "to": "r2:0" },
    { "id": "w3", "from": "r2:1", "to": "gnd:0" },
    { "id": "w4", "from": "bat:1", "to": "gnd:0" }
  ]
}"#;

/// Helper: parse the editor JSON
fn series() -> Circuit {
    Circuit::from_json(SERIES_JSON).expect("parse failed")
}

/// Helper: a component on its own row, far from everything else
fn row(c: &mut Circuit, id: &str, kind: ComponentKind, value: f64) {
    let y = 200.0 * c.components.len() as f64;
    c.add(Component::placed(id, kind, value, Point::new(0.0, y)));
}

fn t(id: &str, idx: usize) -> TerminalRef {
    TerminalRef::new(id, idx)
}

/// bat(10V) feeding r1 into two parallel legs (r2, r3 + ammeter) back to
/// ground, with a voltmeter across r1 and a probe on the middle node
fn bench() -> Circuit {
    let mut c = Circuit::new();
    row(&mut c, "bat", ComponentKind::Battery, 10.0);
    row(&mut c, "r1", ComponentKind::Resistor, 220.0);
    row(&mut c, "r2", ComponentKind::Resistor, 1000.0);
    row(&mut c, "r3", ComponentKind::Resistor, 470.0);
    row(&mut c, "am", ComponentKind::Ammeter, 0.0);
    row(&mut c, "vm", ComponentKind::Voltmeter, 0.0);
    row(&mut c, "gnd", ComponentKind::Ground, 0.0);
    row(&mut c, "scope", ComponentKind::Oscilloscope, 0.0);
    c.connect(t("bat", 0), t("r1", 0));
    c.connect(t("r1", 1), t("r2", 0));
    c.connect(t("r1", 1), t("r3", 0));
    c.connect(t("r3", 1), t("am", 0));
    c.connect(t("am", 1), t("gnd", 0));
    c.connect(t("r2", 1), t("gnd", 0));
    c.connect(t("bat", 1), t("gnd", 0));
    c.connect(t("vm", 0), t("r1", 0));
    c.connect(t("vm", 1), t("r1", 1));
    c.connect(t("scope", 0), t("gnd", 0));
    c.connect(t("scope", 1), t("r2", 0));
    c
}

// ── Topology ──────────────────────────────────────────────────────

#[test]
fn test_every_terminal_in_exactly_one_node() {
    for circuit in [series(), bench()] {
        let analyzed = analyze_topology(&circuit).unwrap();
        let mut seen = std::collections::BTreeSet::new();
        for node in &analyzed.nodes {
            assert!(!node.terminals.is_empty());
            for terminal in &node.terminals {
                assert!(seen.insert(terminal.clone()), "{terminal} listed twice");
            }
        }
        let total: usize = circuit.components.iter().map(|c| c.terminals.len()).sum();
        assert_eq!(seen.len(), total);
    }
}

#[test]
fn test_proximity_threshold_boundary() {
    let pair = |gap: f64| {
        let mut c = Circuit::new();
        c.add(Component::new(
            "a",
            ComponentKind::Resistor,
            10.0,
            vec![Point::new(0.0, 0.0), Point::new(80.0, 0.0)],
        ));
        c.add(Component::new(
            "b",
            ComponentKind::Resistor,
            10.0,
            vec![Point::new(80.0, gap), Point::new(160.0, gap)],
        ));
        analyze_topology(&c).unwrap()
    };
    let merged = pair(19.9);
    assert_eq!(merged.node_of(&t("a", 1)), merged.node_of(&t("b", 0)));
    assert!(merged.are_components_connected(&"a".into(), &"b".into()));

    let apart = pair(20.1);
    assert_ne!(apart.node_of(&t("a", 1)), apart.node_of(&t("b", 0)));
    assert!(!apart.are_components_connected(&"a".into(), &"b".into()));
}

// ── DC solve ──────────────────────────────────────────────────────

#[test]
fn test_series_example() {
    let circuit = series();
    let analysis = analyze(&circuit, &SolverConfig::default()).unwrap();
    let (topology, solution) = (&analysis.topology, &analysis.solution);
    let v = |id: &str, idx: usize| solution.node_voltage(topology.node_of(&t(id, idx)).unwrap());

    assert_relative_eq!(v("bat", 0), 12.0);
    assert_abs_diff_eq!(v("r1", 1), 6.0, epsilon = 1e-3);
    assert_eq!(v("gnd", 0), 0.0);

    assert_abs_diff_eq!(solution.measurement(&"r1".into()).current, 0.06, epsilon = 1e-4);
    assert_abs_diff_eq!(solution.measurement(&"r2".into()).current, 0.06, epsilon = 1e-4);
    assert!(solution.has_connectivity);
}

#[test]
fn test_ground_is_zero_for_any_iteration_count() {
    let circuit = bench();
    let topology = analyze_topology(&circuit).unwrap();
    let ground = topology.ground.unwrap();
    for max_iterations in [1, 2, 5, 20, 200] {
        let solution = solve_with(
            &topology,
            &SolverConfig::new().with_max_iterations(max_iterations),
        );
        assert_eq!(solution.node_voltage(ground), 0.0);
    }
}

#[test]
fn test_disconnected_resistor() {
    let mut circuit = series();
    circuit.add(Component::placed(
        "loose",
        ComponentKind::Resistor,
        330.0,
        Point::new(2000.0, 2000.0),
    ));
    let analysis = analyze(&circuit, &SolverConfig::default()).unwrap();
    let m = analysis.solution.measurement(&"loose".into());
    assert_eq!(m.current, 0.0);
    assert_eq!(m.voltage, 0.0);
    assert!(!analysis.solution.connected_components.contains(&"loose".into()));

    let result = simulate(&circuit).unwrap();
    assert!(result.signal(&"loose".into()).unwrap().iter().all(|&s| s == 0.0));
}

#[test]
fn test_shuffled_wire_order_gives_identical_values() {
    let circuit = bench();
    let reference = analyze(&circuit, &SolverConfig::default()).unwrap();

    let n = circuit.wires.len();
    let mut orders: Vec<Vec<usize>> = vec![(0..n).rev().collect()];
    for shift in 1..n {
        orders.push((0..n).map(|i| (i + shift) % n).collect());
    }
    // Interleave evens and odds
    orders.push((0..n).step_by(2).chain((1..n).step_by(2)).collect());

    for order in orders {
        let mut shuffled = circuit.clone();
        shuffled.wires = order.iter().map(|&i| circuit.wires[i].clone()).collect();
        let analysis = analyze(&shuffled, &SolverConfig::default()).unwrap();
        assert_eq!(analysis.topology.nodes, reference.topology.nodes);
        assert_eq!(analysis.solution.node_voltages, reference.solution.node_voltages);
        assert_eq!(analysis.solution.measurements, reference.solution.measurements);
        assert_eq!(
            analysis.solution.connected_components,
            reference.solution.connected_components
        );
    }
}

// ── Write-back ────────────────────────────────────────────────────

#[test]
fn test_solve_is_idempotent_under_write_back() {
    let circuit = bench();
    let config = SolverConfig::default();
    let first = analyze(&circuit, &config).unwrap();
    let second = analyze(&circuit, &config).unwrap();
    assert_eq!(first.solution.node_voltages, second.solution.node_voltages);
    assert_eq!(first.solution.measurements, second.solution.measurements);

    let written = apply_measurements(&circuit, &first.solution.measurements);
    assert_ne!(written, circuit);
    let resolved = analyze(&written, &config).unwrap();
    for (id, before) in &first.solution.measurements {
        let after = resolved.solution.measurement(id);
        assert!(!reading_changed(before.current, after.current), "{id} current moved");
        assert!(!reading_changed(before.voltage, after.voltage), "{id} voltage moved");
    }
    // Writing the same readings again is a no-op
    assert_eq!(apply_measurements(&written, &resolved.solution.measurements), written);
}

#[test]
fn test_session_settles_after_one_write_back() {
    let mut session = AnalysisSession::new(SolverConfig::default());
    let mut circuit = bench();
    let mut runs = 0;
    while let Some(outcome) = session.run(&circuit).unwrap() {
        runs += 1;
        match outcome.circuit {
            Some(updated) => circuit = updated,
            None => break,
        }
        assert!(runs < 5, "write-back did not settle");
    }
    assert_eq!(runs, 1);
    let am = circuit.component(&"am".into()).unwrap().value;
    let vm = circuit.component(&"vm".into()).unwrap().value;
    assert!(am > 0.0);
    assert!(vm > 0.0);
}

// ── Signals and probes ────────────────────────────────────────────

#[test]
fn test_square_wave_samples() {
    let period = 1.0 / 1000.0;
    assert_eq!(square_wave(5.0, 1000.0, 0.25, 0.0001e-3), 5.0);
    assert_eq!(square_wave(5.0, 1000.0, 0.25, 0.5 * period), 0.0);

    let mut c = series();
    c.add(
        Component::placed(
            "clk",
            ComponentKind::SquareWaveSource,
            1000.0,
            Point::new(1000.0, 1000.0),
        )
        .with_property(PROP_DUTY_CYCLE, 0.25)
        .with_property(PROP_AMPLITUDE, 5.0),
    );
    c.connect(t("clk", 1), t("gnd", 0));
    let config = SimulationConfig::new().with_samples(200).with_duration(2.0 * period);
    let result = simulate_with(&c, &SolverConfig::default(), &config).unwrap();
    // 10 µs per sample: 100 samples per period
    let clk = result.signal(&"clk".into()).unwrap();
    for i in [0, 10, 20, 105, 110, 120] {
        assert_eq!(clk[i], 5.0, "sample {i}");
    }
    for i in [30, 50, 99, 130, 150, 199] {
        assert_eq!(clk[i], 0.0, "sample {i}");
    }
}

#[test]
fn test_probe_sees_wired_subcircuit_only() {
    let mut circuit = bench();
    row(&mut circuit, "elsewhere", ComponentKind::Resistor, 10.0);
    let sub = resolve_probe_subcircuit(&circuit, &"scope".into())
        .unwrap()
        .expect("probe is wired");
    assert!(sub.component(&"elsewhere".into()).is_none());
    assert_eq!(sub.components.len(), circuit.components.len() - 1);
    assert_eq!(sub.wires.len(), circuit.wires.len());
}
