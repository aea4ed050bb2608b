//! Final classified result of one orchestration run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal result of a dispatch-and-await run.
///
/// Every variant is terminal; a run produces exactly one Outcome and no
/// further transition occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Remote execution reported success.
    Success,
    /// Remote execution failed, or dispatch/polling gave up.
    Failure { reason: String },
    /// The await was aborted; the remote command is left untouched.
    Cancelled,
    /// No terminal status arrived within the polling deadline.
    TimedOut,
    /// No target matched the selector.
    NotFound,
}

impl Outcome {
    /// Build a Failure outcome from any displayable reason.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Returns true only for Success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure { reason } => write!(f, "failure: {}", reason),
            Self::Cancelled => write!(f, "cancelled"),
            Self::TimedOut => write!(f, "timed out"),
            Self::NotFound => write!(f, "target not found"),
        }
    }
}
