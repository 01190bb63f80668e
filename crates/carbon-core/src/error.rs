//! Error types for the core crate.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Structurally invalid input (negative distance or weight, bad coordinates).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Every mode failed and the land fallback was bypassed.
    #[error("no viable route could be computed")]
    NoViableRoute,
}
