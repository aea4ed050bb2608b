//! Backend collaborator traits for target lookup and remote execution.
//!
//! Implementations live outside the orchestration core (see
//! `hostrun-agent-client`); the core only sees these object-safe traits and
//! receives them by constructor injection.

use async_trait::async_trait;
use thiserror::Error;

use hostrun_core::{CommandId, CommandStatus, InstanceRecord, TargetId, TargetSelector, TaskBody};

/// Errors surfaced by backend collaborators.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend or target could not be reached.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The backend rejected the request.
    #[error("backend rejected request: {0}")]
    Rejected(String),

    /// The backend answered with something that could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl BackendError {
    /// Returns true for failures worth retrying on the next poll cycle.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

/// Read-only inventory of candidate targets.
#[async_trait]
pub trait TargetInventory: Send + Sync {
    /// Return every instance matching the selector, in provider order.
    ///
    /// Provider order is not guaranteed to be stable between calls.
    async fn query(&self, selector: &TargetSelector) -> Result<Vec<InstanceRecord>, BackendError>;
}

/// Status snapshot for one command invocation on one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    /// Backend-reported status.
    pub status: CommandStatus,

    /// Captured standard output so far.
    pub stdout: String,

    /// Captured standard error so far.
    pub stderr: String,
}

/// Remote command execution service.
#[async_trait]
pub trait CommandBackend: Send + Sync {
    /// Submit a task body for asynchronous execution on the target.
    ///
    /// Returns the correlation identifier for later status queries.
    async fn submit(&self, target: &TargetId, body: &TaskBody) -> Result<CommandId, BackendError>;

    /// Fetch the current invocation status for a submitted command.
    async fn status(
        &self,
        command: &CommandId,
        target: &TargetId,
    ) -> Result<StatusReply, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unreachable_is_transient() {
        assert!(BackendError::Unreachable("timeout".into()).is_transient());
        assert!(!BackendError::Rejected("quota".into()).is_transient());
        assert!(!BackendError::Protocol("bad json".into()).is_transient());
    }
}
