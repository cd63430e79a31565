//! Reporting sink: the contract used to persist one outcome record per task.

use crate::core::TaskResult;
use crate::errors::SinkError;
use async_trait::async_trait;
use tracing::info;

/// Persists task outcome records centrally.
///
/// Fire-and-forget from the runner's perspective: a failed write is logged
/// and never fails the task it belongs to. Records are append-only; the core
/// never mutates or deletes them. The storage technology is the
/// integration's choice.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Records one task outcome for the given host.
    ///
    /// # Errors
    ///
    /// `SinkError` when the write fails; callers log and continue.
    async fn record(&self, host: &str, result: &TaskResult) -> Result<(), SinkError>;
}

/// A sink that discards all records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReportSink;

#[async_trait]
impl ReportSink for NoOpReportSink {
    async fn record(&self, _host: &str, _result: &TaskResult) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink that logs records through the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingReportSink;

#[async_trait]
impl ReportSink for LoggingReportSink {
    async fn record(&self, host: &str, result: &TaskResult) -> Result<(), SinkError> {
        info!(
            host,
            stage = %result.stage_kind,
            task = %result.task_name,
            state = %result.state,
            timestamp = %result.timestamp,
            "task result recorded"
        );
        Ok(())
    }
}

/// A collecting sink for tests.
#[derive(Debug, Default)]
pub struct CollectingReportSink {
    records: parking_lot::Mutex<Vec<(String, TaskResult)>>,
}

impl CollectingReportSink {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All records seen, in order.
    #[must_use]
    pub fn records(&self) -> Vec<(String, TaskResult)> {
        self.records.lock().clone()
    }

    /// Number of records seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl ReportSink for CollectingReportSink {
    async fn record(&self, host: &str, result: &TaskResult) -> Result<(), SinkError> {
        self.records.lock().push((host.to_string(), result.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StageKind, TaskState};

    #[tokio::test]
    async fn test_collecting_sink_appends() {
        let sink = CollectingReportSink::new();
        assert!(sink.is_empty());

        let result = TaskResult::new("A", StageKind::ProgramInstall, TaskState::Success);
        sink.record("WS-042", &result).await.unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, "WS-042");
        assert!(records[0].1.is_success());
    }

    #[tokio::test]
    async fn test_logging_sink_never_fails() {
        let sink = LoggingReportSink;
        let result = TaskResult::new("A", StageKind::GroupPolicy, TaskState::Failure);
        assert!(sink.record("host", &result).await.is_ok());
    }
}
