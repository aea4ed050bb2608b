//! Status domain of the remote command backend.

use serde::{Deserialize, Serialize};

/// Status of a dispatched command as reported by the execution backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandStatus {
    /// Command accepted but not yet picked up by the target.
    #[default]
    Pending,
    /// Command actively executing on the target.
    InProgress,
    /// Command finished with a zero exit status.
    Success,
    /// Command finished with an error.
    Failed,
    /// Command was cancelled on the backend side.
    Cancelled,
    /// The backend gave up waiting for the target.
    TimedOut,
}

impl CommandStatus {
    /// Returns true if no further status transition can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Success | Self::Failed | Self::Cancelled | Self::TimedOut
        )
    }

    /// Returns true if another poll cycle is expected.
    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal()
    }
}
