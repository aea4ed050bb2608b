//! Bounded completion polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use hostrun_core::{CommandHandle, CommandStatus, Diagnostics, Outcome};

use crate::backend::{BackendError, CommandBackend};

/// Polling policy for one await.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed delay between status queries.
    pub interval: Duration,

    /// Client-side deadline for reaching a terminal status.
    pub max_wait: Duration,

    /// Consecutive transient query failures tolerated before giving up.
    pub status_retries: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_wait: Duration::from_secs(600),
            status_retries: 3,
        }
    }
}

/// Result of awaiting one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Classified terminal result.
    pub outcome: Outcome,

    /// Output captured with the terminal status, empty otherwise.
    pub diagnostics: Diagnostics,
}

impl Completion {
    fn bare(outcome: Outcome) -> Self {
        Self {
            outcome,
            diagnostics: Diagnostics::default(),
        }
    }
}

/// Polls the execution backend until a dispatched command reaches a
/// terminal status, the deadline passes, or the caller cancels.
pub struct CompletionPoller {
    backend: Arc<dyn CommandBackend>,
    config: PollConfig,
}

impl CompletionPoller {
    /// Create a poller over the given backend.
    pub fn new(backend: Arc<dyn CommandBackend>, config: PollConfig) -> Self {
        Self { backend, config }
    }

    /// Await a terminal status for the handle.
    ///
    /// Sleeps `interval`, queries status, repeats. The deadline is checked
    /// before each query, so no query is issued after `max_wait`; TimedOut
    /// is a client-side verdict, not a backend status. Non-terminal
    /// statuses simply drive another cycle. Only the status query is ever
    /// retried, and only for transient failures; the dispatch itself is
    /// never repeated. Cancellation stops the polling locally and leaves
    /// the remote command untouched.
    pub async fn await_completion(
        &self,
        handle: &CommandHandle,
        cancel: &CancellationToken,
    ) -> Completion {
        let deadline = Instant::now() + self.config.max_wait;
        let mut transient_failures = 0u32;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(command_id = %handle.command_id, "Await cancelled by caller");
                    return Completion::bare(Outcome::Cancelled);
                }
                _ = time::sleep(self.config.interval) => {}
            }

            if Instant::now() >= deadline {
                warn!(
                    command_id = %handle.command_id,
                    max_wait_secs = self.config.max_wait.as_secs(),
                    "No terminal status before deadline"
                );
                return Completion::bare(Outcome::TimedOut);
            }

            match self
                .backend
                .status(&handle.command_id, &handle.target.id)
                .await
            {
                Ok(reply) => {
                    transient_failures = 0;
                    debug!(
                        command_id = %handle.command_id,
                        status = ?reply.status,
                        "Status query"
                    );

                    if let Some(outcome) = terminal_outcome(reply.status) {
                        info!(
                            command_id = %handle.command_id,
                            status = ?reply.status,
                            "Terminal status reached"
                        );
                        return Completion {
                            outcome,
                            diagnostics: Diagnostics::new(reply.stdout, reply.stderr),
                        };
                    }
                }
                Err(err) if err.is_transient() && transient_failures < self.config.status_retries => {
                    transient_failures += 1;
                    warn!(
                        command_id = %handle.command_id,
                        attempt = transient_failures,
                        error = %err,
                        "Transient status query failure, retrying"
                    );
                }
                Err(err) => {
                    warn!(command_id = %handle.command_id, error = %err, "Giving up on status queries");
                    return Completion::bare(Outcome::failure(format!(
                        "status query failed: {err}"
                    )));
                }
            }
        }
    }
}

/// Map a terminal backend status to its outcome; None while in flight.
fn terminal_outcome(status: CommandStatus) -> Option<Outcome> {
    match status {
        CommandStatus::Success => Some(Outcome::Success),
        CommandStatus::Failed => Some(Outcome::failure("remote execution failed")),
        CommandStatus::Cancelled => Some(Outcome::Cancelled),
        CommandStatus::TimedOut => Some(Outcome::TimedOut),
        CommandStatus::Pending | CommandStatus::InProgress => None,
    }
}
