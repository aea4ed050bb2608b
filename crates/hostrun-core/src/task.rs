//! Opaque task bodies and dispatch correlation handles.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::CommandId;
use crate::target::Target;

/// Opaque ordered sequence of executable statements.
///
/// The orchestration core transmits the body verbatim and never inspects or
/// interprets its contents; ownership of the payload stays with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBody {
    lines: Vec<String>,
}

impl TaskBody {
    /// Build a body from an ordered sequence of statements.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a body from raw script text, split on line boundaries.
    ///
    /// The split is transport shape only; line contents are kept verbatim.
    pub fn from_script(script: &str) -> Result<Self, CoreError> {
        if script.trim().is_empty() {
            return Err(CoreError::EmptyTaskBody);
        }
        Ok(Self {
            lines: script.lines().map(str::to_owned).collect(),
        })
    }

    /// The statements in dispatch order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns true if there is nothing to execute.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Correlation handle linking a dispatched task to later status queries.
///
/// Created once per dispatch and immutable afterwards; polling uses it only
/// as a lookup key and never creates a second handle for the same attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandHandle {
    /// Backend correlation identifier.
    pub command_id: CommandId,

    /// The target the command was submitted to.
    pub target: Target,
}
