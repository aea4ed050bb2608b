//! End-to-end dispatch-and-await orchestration.

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use hostrun_core::{DeploymentReport, Diagnostics, Outcome, TargetSelector, TaskBody};

use crate::dispatcher::CommandDispatcher;
use crate::poller::CompletionPoller;
use crate::resolver::TargetResolver;

/// Composes resolve, dispatch and await into one sequential run.
///
/// A run always produces a report: every failure path is captured as an
/// Outcome value and nothing escapes this boundary as an error. Runs are
/// independent and reentrant; concurrent runs against the same target are
/// a caller concern.
pub struct DeploymentOrchestrator {
    resolver: TargetResolver,
    dispatcher: CommandDispatcher,
    poller: CompletionPoller,
}

impl DeploymentOrchestrator {
    /// Create an orchestrator from its three components.
    pub fn new(
        resolver: TargetResolver,
        dispatcher: CommandDispatcher,
        poller: CompletionPoller,
    ) -> Self {
        Self {
            resolver,
            dispatcher,
            poller,
        }
    }

    /// Run one dispatch-and-await flow and assemble the report.
    pub async fn run(
        &self,
        selector: &TargetSelector,
        body: &TaskBody,
        cancel: &CancellationToken,
    ) -> DeploymentReport {
        let target = match self.resolver.resolve(selector).await {
            Ok(Some(target)) => target,
            Ok(None) => {
                info!("No target matched the selector, nothing to dispatch");
                return DeploymentReport::new(None, Outcome::NotFound, Diagnostics::default());
            }
            Err(err) => {
                error!(error = %err, "Target resolution failed");
                let reason = format!("target resolution failed: {err}");
                return DeploymentReport::new(
                    None,
                    Outcome::failure(reason.clone()),
                    Diagnostics::new(String::new(), reason),
                );
            }
        };

        let handle = match self.dispatcher.dispatch(&target, body).await {
            Ok(handle) => handle,
            Err(err) => {
                error!(target_id = %target.id, error = %err, "Dispatch rejected");
                let reason = format!("dispatch rejected: {err}");
                return DeploymentReport::new(
                    Some(&target),
                    Outcome::failure(reason.clone()),
                    Diagnostics::new(String::new(), reason),
                );
            }
        };

        let completion = self.poller.await_completion(&handle, cancel).await;
        info!(
            target_id = %target.id,
            command_id = %handle.command_id,
            outcome = %completion.outcome,
            "Run finished"
        );

        DeploymentReport::new(Some(&target), completion.outcome, completion.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::backend::BackendError;
    use crate::poller::PollConfig;
    use crate::testing::{one_instance, pending, terminal, ScriptedBackend, ScriptedInventory};
    use hostrun_core::{CommandId, CommandStatus};

    fn selector() -> TargetSelector {
        TargetSelector::new()
            .name_tag("alpha")
            .lifecycle_state("running")
    }

    fn body() -> TaskBody {
        TaskBody::from_lines(["#!/bin/bash", "echo deploying"])
    }

    fn poll_config() -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(10),
            max_wait: Duration::from_secs(600),
            status_retries: 3,
        }
    }

    fn orchestrator(
        inventory: Arc<ScriptedInventory>,
        backend: Arc<ScriptedBackend>,
    ) -> DeploymentOrchestrator {
        DeploymentOrchestrator::new(
            TargetResolver::new(inventory),
            CommandDispatcher::new(backend.clone()),
            CompletionPoller::new(backend, poll_config()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_two_pending_polls() {
        let inventory = Arc::new(ScriptedInventory::new([one_instance("i-1", "10.0.0.5")]));
        let backend = Arc::new(ScriptedBackend::new(
            [Ok(CommandId::new("h1"))],
            [
                pending(),
                pending(),
                terminal(CommandStatus::Success, "deployment complete", ""),
            ],
        ));
        let orchestrator = orchestrator(inventory, backend.clone());

        let started = chrono::Utc::now();
        let report = orchestrator
            .run(&selector(), &body(), &CancellationToken::new())
            .await;

        assert_eq!(report.outcome, Outcome::Success);
        assert_eq!(report.target_id.as_ref().unwrap().as_str(), "i-1");
        assert_eq!(report.diagnostics.stdout, "deployment complete");
        assert!(report.timestamp >= started);
        assert_eq!(backend.status_query_count(), 3);
    }

    #[tokio::test]
    async fn test_not_found_short_circuits_before_dispatch() {
        let inventory = Arc::new(ScriptedInventory::new([Ok(Vec::new())]));
        let backend = Arc::new(ScriptedBackend::new([], []));
        let orchestrator = orchestrator(inventory, backend.clone());

        let report = orchestrator
            .run(&selector(), &body(), &CancellationToken::new())
            .await;

        assert_eq!(report.outcome, Outcome::NotFound);
        assert!(report.target_id.is_none());
        assert_eq!(backend.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_rejection_reports_failure_without_polling() {
        let inventory = Arc::new(ScriptedInventory::new([one_instance("i-1", "10.0.0.5")]));
        let backend = Arc::new(ScriptedBackend::new(
            [Err(BackendError::Rejected("malformed payload".to_string()))],
            [],
        ));
        let orchestrator = orchestrator(inventory, backend.clone());

        let report = orchestrator
            .run(&selector(), &body(), &CancellationToken::new())
            .await;

        match &report.outcome {
            Outcome::Failure { reason } => assert!(reason.contains("dispatch rejected")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(report.diagnostics.stderr.contains("dispatch rejected"));
        assert_eq!(backend.status_query_count(), 0);
    }

    #[tokio::test]
    async fn test_resolution_error_reports_failure() {
        let inventory = Arc::new(ScriptedInventory::new([Err(BackendError::Unreachable(
            "connection refused".to_string(),
        ))]));
        let backend = Arc::new(ScriptedBackend::new([], []));
        let orchestrator = orchestrator(inventory, backend.clone());

        let report = orchestrator
            .run(&selector(), &body(), &CancellationToken::new())
            .await;

        assert!(matches!(report.outcome, Outcome::Failure { .. }));
        assert!(report.target_id.is_none());
        assert_eq!(backend.submit_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_run_reports_cancelled() {
        let inventory = Arc::new(ScriptedInventory::new([one_instance("i-1", "10.0.0.5")]));
        let backend = Arc::new(ScriptedBackend::new([Ok(CommandId::new("h1"))], [pending()]));
        let orchestrator = orchestrator(inventory, backend);

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        let selector = selector();
        let body = body();
        let (report, _) = tokio::join!(orchestrator.run(&selector, &body, &cancel), async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            canceller.cancel();
        });

        assert_eq!(report.outcome, Outcome::Cancelled);
        assert_eq!(report.target_id.as_ref().unwrap().as_str(), "i-1");
    }
}
