//! Core types for circuit representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BreadboardError, Result};

/// A unique identifier for an electrical node produced by topology analysis.
///
/// Node ids are dense and numbered in order of first appearance, so they can
/// index directly into a voltage vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A unique identifier for a component, assigned by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A point on the schematic canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Translate by an offset.
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Reference to one terminal of one component.
///
/// Serialized as `"componentId:terminalIndex"`, the form the editor stores
/// in wire endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TerminalRef {
    pub component: ComponentId,
    pub terminal: usize,
}

impl TerminalRef {
    pub fn new(component: impl Into<String>, terminal: usize) -> Self {
        Self {
            component: ComponentId(component.into()),
            terminal,
        }
    }
}

impl fmt::Display for TerminalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.terminal)
    }
}

impl FromStr for TerminalRef {
    type Err = BreadboardError;

    fn from_str(s: &str) -> Result<Self> {
        // Split on the last ':' so component ids may themselves contain colons
        let invalid = || BreadboardError::InvalidTerminalRef {
            reference: s.to_string(),
        };
        let (component, index) = s.rsplit_once(':').ok_or_else(invalid)?;
        if component.is_empty() {
            return Err(invalid());
        }
        let terminal = index.trim().parse::<usize>().map_err(|_| invalid())?;
        Ok(TerminalRef::new(component, terminal))
    }
}

impl TryFrom<String> for TerminalRef {
    type Error = BreadboardError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TerminalRef> for String {
    fn from(value: TerminalRef) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_ref_parse() {
        let r: TerminalRef = "r1:1".parse().unwrap();
        assert_eq!(r, TerminalRef::new("r1", 1));
        assert_eq!(r.to_string(), "r1:1");

        let nested: TerminalRef = "sheet:r1:0".parse().unwrap();
        assert_eq!(nested.component.as_str(), "sheet:r1");
        assert_eq!(nested.terminal, 0);
    }

    #[test]
    fn test_terminal_ref_rejects_garbage() {
        for bad in ["r1", ":0", "r1:x", "r1:-1", ""] {
            assert!(
                matches!(
                    bad.parse::<TerminalRef>(),
                    Err(BreadboardError::InvalidTerminalRef { .. })
                ),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }
}
