//! Error types for the Breadboard analysis engine.
//!
//! This module provides a unified error type [`BreadboardError`]. Only
//! structurally invalid input is reported as an error: a circuit without a
//! ground or a source is valid and simply analyzes to zero readings.

use thiserror::Error;

/// Result type alias using [`BreadboardError`].
pub type Result<T> = std::result::Result<T, BreadboardError>;

/// Unified error type for all Breadboard operations.
#[derive(Error, Debug)]
pub enum BreadboardError {
    // ============ Circuit Structure Errors ============
    /// Terminal reference string is not of the form `componentId:terminalIndex`
    #[error("Invalid terminal reference '{reference}' (expected 'componentId:terminalIndex')")]
    InvalidTerminalRef { reference: String },

    /// Component referenced by a wire or request does not exist
    #[error("Component '{id}' not found in circuit")]
    ComponentNotFound { id: String },

    /// Wire references a terminal index the component does not have
    #[error("Component '{component}' has {count} terminal(s), terminal {terminal} does not exist")]
    TerminalOutOfRange {
        component: String,
        terminal: usize,
        count: usize,
    },

    /// Duplicate component id
    #[error("Duplicate component id '{id}'")]
    DuplicateComponent { id: String },

    /// Probe operation requested on a component that is not an oscilloscope
    #[error("Component '{id}' is a {kind}, not an oscilloscope probe")]
    NotAProbe { id: String, kind: String },

    // ============ Simulation Errors ============
    /// Invalid solver or simulation parameter
    #[error("Invalid simulation parameter: {message}")]
    InvalidSimulationParam { message: String },

    // ============ I/O Errors ============
    /// Error reading circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Circuit snapshot could not be (de)serialized
    #[error("Circuit JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BreadboardError {
    /// Create a component-not-found error
    pub fn component_not_found(id: impl Into<String>) -> Self {
        Self::ComponentNotFound { id: id.into() }
    }

    /// Create an invalid simulation parameter error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidSimulationParam {
            message: message.into(),
        }
    }
}
