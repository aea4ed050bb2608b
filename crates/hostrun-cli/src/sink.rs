//! Report persistence.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use hostrun_core::DeploymentReport;

/// Errors that can occur while persisting a report.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the report file failed.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    /// Encoding the report failed.
    #[error("failed to encode report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Destination for finished deployment reports.
pub trait ReportSink {
    /// Persist one report.
    fn write(&self, report: &DeploymentReport) -> Result<(), SinkError>;
}

/// Writes the report as pretty-printed JSON to a file.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Create a sink writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for JsonFileSink {
    fn write(&self, report: &DeploymentReport) -> Result<(), SinkError> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostrun_core::{Diagnostics, Outcome};

    #[test]
    fn test_json_file_sink_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy-output.json");
        let sink = JsonFileSink::new(&path);

        let report = DeploymentReport::new(None, Outcome::NotFound, Diagnostics::default());
        sink.write(&report).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["outcome"]["kind"], "NOT_FOUND");
    }
}
