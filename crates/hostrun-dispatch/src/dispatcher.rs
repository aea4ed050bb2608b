//! Command submission to the remote execution backend.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use hostrun_core::{CommandHandle, Target, TaskBody};

use crate::backend::{BackendError, CommandBackend};

/// Errors that can occur while submitting a command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The task body has nothing to execute.
    #[error("refusing to dispatch an empty task body")]
    EmptyTaskBody,

    /// The backend could not be reached or rejected the submission.
    #[error("submission failed: {0}")]
    Backend(#[from] BackendError),
}

/// Submits task bodies for asynchronous remote execution.
///
/// Dispatch is fire-and-forget: it returns as soon as the backend accepts
/// the submission; completion is observed separately by the poller.
pub struct CommandDispatcher {
    backend: Arc<dyn CommandBackend>,
}

impl CommandDispatcher {
    /// Create a dispatcher over the given backend.
    pub fn new(backend: Arc<dyn CommandBackend>) -> Self {
        Self { backend }
    }

    /// Submit the body to the target and return the correlation handle.
    ///
    /// The body is transmitted verbatim. Repeated dispatch of the same body
    /// is a new, independent unit of work with a new handle; no idempotence
    /// is assumed.
    pub async fn dispatch(
        &self,
        target: &Target,
        body: &TaskBody,
    ) -> Result<CommandHandle, DispatchError> {
        if body.is_empty() {
            return Err(DispatchError::EmptyTaskBody);
        }

        let command_id = self.backend.submit(&target.id, body).await?;
        info!(
            target_id = %target.id,
            command_id = %command_id,
            statements = body.len(),
            "Command submitted"
        );

        Ok(CommandHandle {
            command_id,
            target: target.clone(),
        })
    }
}
