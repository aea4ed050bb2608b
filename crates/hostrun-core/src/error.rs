//! Core domain errors.

use thiserror::Error;

/// Core domain errors for Hostrun.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Task body contains no executable statements.
    #[error("task body is empty")]
    EmptyTaskBody,

    /// Selector cannot be sent to the inventory backend.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}
