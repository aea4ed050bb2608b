//! Deployment reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::TargetId;
use crate::outcome::Outcome;
use crate::target::Target;

/// Captured output streams from the remote execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Remote standard output, if the backend captured it.
    pub stdout: String,

    /// Remote standard error, if the backend captured it.
    pub stderr: String,
}

impl Diagnostics {
    /// Create diagnostics from captured streams.
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Returns true if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }
}

/// Write-once record of one orchestration run.
///
/// Created once per run by the orchestrator, on every path including
/// failures, and handed to a report sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentReport {
    /// When the report was assembled.
    pub timestamp: DateTime<Utc>,

    /// Identity of the resolved target, absent when resolution found none.
    pub target_id: Option<TargetId>,

    /// Address of the resolved target, absent when resolution found none.
    pub target_address: Option<String>,

    /// Classified result of the run.
    pub outcome: Outcome,

    /// Captured remote output.
    pub diagnostics: Diagnostics,
}

impl DeploymentReport {
    /// Assemble a report for a finished run.
    pub fn new(target: Option<&Target>, outcome: Outcome, diagnostics: Diagnostics) -> Self {
        Self {
            timestamp: Utc::now(),
            target_id: target.map(|t| t.id.clone()),
            target_address: target.map(|t| t.address.clone()),
            outcome,
            diagnostics,
        }
    }

    /// Returns true if the run succeeded end to end.
    pub fn succeeded(&self) -> bool {
        self.outcome.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_without_target() {
        let report = DeploymentReport::new(None, Outcome::NotFound, Diagnostics::default());
        assert!(report.target_id.is_none());
        assert!(report.target_address.is_none());
        assert!(!report.succeeded());
    }

    #[test]
    fn test_report_serializes_outcome_tag() {
        let target = Target::new(TargetId::new("i-1"), "10.0.0.5");
        let report = DeploymentReport::new(
            Some(&target),
            Outcome::Success,
            Diagnostics::new("done", ""),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["kind"], "SUCCESS");
        assert_eq!(json["target_id"], "i-1");
        assert_eq!(json["diagnostics"]["stdout"], "done");
    }
}
