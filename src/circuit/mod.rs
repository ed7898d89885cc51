//! Circuit snapshot representation and validation.
//!
//! This module holds the shape exchanged with the editor: components with
//! their terminals, and wires between terminals. The [`Circuit`] is a plain
//! value; every analysis recomputes its results from a snapshot.

mod graph;
mod types;
mod validate;

pub use graph::{Circuit, Component, Wire};
pub use types::*;
pub use validate::validate_circuit;
