//! Circuit snapshot: components and wires as supplied by the editor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{ComponentId, Point, TerminalRef};
use crate::components::ComponentKind;

/// A placed component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Primary value: ohms, farads, henries, volts, amps or hertz by kind.
    /// Meters hold their last written-back reading here.
    pub value: f64,
    /// Secondary parameters (frequency, dutyCycle, amplitude).
    #[serde(default)]
    pub properties: BTreeMap<String, f64>,
    /// Terminal positions; index meaning is fixed per kind.
    pub terminals: Vec<Point>,
}

impl Component {
    /// Create a component with explicit terminal positions.
    pub fn new(
        id: impl Into<String>,
        kind: ComponentKind,
        value: f64,
        terminals: Vec<Point>,
    ) -> Self {
        Self {
            id: ComponentId(id.into()),
            kind,
            value,
            properties: BTreeMap::new(),
            terminals,
        }
    }

    /// Create a component at `position` with its kind's default terminal layout.
    pub fn placed(id: impl Into<String>, kind: ComponentKind, value: f64, position: Point) -> Self {
        Self::new(id, kind, value, kind.default_terminals(position))
    }

    /// Set a property (builder style).
    pub fn with_property(mut self, name: &str, value: f64) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// Read a property, falling back to `default` when absent or not finite.
    pub fn property_or(&self, name: &str, default: f64) -> f64 {
        self.properties
            .get(name)
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    /// Like [`property_or`](Self::property_or), but a zero or negative value
    /// also counts as unset.
    pub fn positive_property_or(&self, name: &str, default: f64) -> f64 {
        let value = self.property_or(name, default);
        if value > 0.0 {
            value
        } else {
            default
        }
    }

    /// Reference to one of this component's terminals.
    pub fn terminal(&self, index: usize) -> TerminalRef {
        TerminalRef {
            component: self.id.clone(),
            terminal: index,
        }
    }
}

/// An explicit connection between two terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub id: String,
    pub from: TerminalRef,
    pub to: TerminalRef,
    /// Polyline drawn by the editor; not used by analysis.
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Wire {
    pub fn new(id: impl Into<String>, from: TerminalRef, to: TerminalRef) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            points: Vec::new(),
        }
    }

    /// Whether either endpoint lies on `component`.
    pub fn touches(&self, component: &ComponentId) -> bool {
        &self.from.component == component || &self.to.component == component
    }

    /// Whether both endpoints lie on the same component.
    pub fn is_self_loop(&self) -> bool {
        self.from.component == self.to.component
    }
}

/// A complete circuit snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Circuit {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component, returning its id.
    pub fn add(&mut self, component: Component) -> ComponentId {
        let id = component.id.clone();
        self.components.push(component);
        id
    }

    /// Wire two terminals together, returning the new wire's id.
    pub fn connect(&mut self, from: TerminalRef, to: TerminalRef) -> String {
        let id = format!("w{}", self.wires.len());
        self.wires.push(Wire::new(id.clone(), from, to));
        id
    }

    /// Find a component by id.
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| &c.id == id)
    }

    /// Find a component by id for mutation.
    pub fn component_mut(&mut self, id: &ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| &c.id == id)
    }

    /// Parse a circuit snapshot from the editor's JSON form.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to the editor's JSON form.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
