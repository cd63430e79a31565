//! Task runner: sequential execution of one stage's ordered task list.
//!
//! Tasks execute strictly in catalog order, one at a time; shared host
//! resources (registry, package manager) are not safely concurrent. The
//! runner is expected to run on a dedicated worker task, never on the
//! presentation thread; its only suspension points are the external
//! command invocations.

use crate::catalog::Task;
use crate::context::PlaceholderContext;
use crate::core::{StageKind, StatusUpdate, TaskResult, TaskState};
use crate::errors::TaskError;
use crate::exec::CommandExecutor;
use crate::observe::StatusObserver;
use crate::report::ReportSink;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Executes an ordered task list for one stage, emitting status transitions
/// and recording each outcome.
pub struct TaskRunner {
    executor: Arc<CommandExecutor>,
    observer: Arc<dyn StatusObserver>,
    sink: Arc<dyn ReportSink>,
    host: String,
}

impl TaskRunner {
    /// Creates a runner bound to its collaborators and the host identifier
    /// used in outcome records.
    #[must_use]
    pub fn new(
        executor: Arc<CommandExecutor>,
        observer: Arc<dyn StatusObserver>,
        sink: Arc<dyn ReportSink>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            observer,
            sink,
            host: host.into(),
        }
    }

    /// Runs every task of one stage, in order.
    ///
    /// Each task's failure is contained at its own boundary; the loop always
    /// reaches the last task. Policy-flavored stages finish with one policy
    /// refresh whose failure flips no task status.
    pub async fn run(&self, stage: StageKind, tasks: &[Task], placeholders: &PlaceholderContext) {
        info!(stage = %stage, tasks = tasks.len(), "stage run started");

        for (index, task) in tasks.iter().enumerate() {
            self.observer
                .set_status(StatusUpdate::new(&task.name, index, TaskState::Pending));

            let started = Instant::now();
            let outcome = self.execute_one(task, placeholders).await;
            let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

            let state = match &outcome {
                Ok(()) => {
                    info!(stage = %stage, task = %task.name, index, duration_ms, "task succeeded");
                    TaskState::Success
                }
                Err(err) => {
                    error!(stage = %stage, task = %task.name, index, duration_ms, error = %err, "task failed");
                    TaskState::Failure
                }
            };

            // Status goes out first; the sink write must not delay it.
            self.observer
                .set_status(StatusUpdate::new(&task.name, index, state));

            let result = TaskResult::new(&task.name, stage, state);
            if let Err(err) = self.sink.record(&self.host, &result).await {
                warn!(stage = %stage, task = %task.name, error = %err, "report sink write failed");
            }
        }

        if stage.is_policy_flavored() {
            match self.executor.refresh_policy().await {
                Ok(()) => info!(stage = %stage, "policy refresh completed"),
                Err(err) => warn!(stage = %stage, error = %err, "policy refresh failed"),
            }
        }

        info!(stage = %stage, "stage run finished");
    }

    async fn execute_one(
        &self,
        task: &Task,
        placeholders: &PlaceholderContext,
    ) -> Result<(), TaskError> {
        // The loader filters disabled tasks; a directly constructed list may
        // still carry one.
        if !task.enabled {
            return Err(TaskError::malformed("task is disabled"));
        }
        self.executor.execute(task, placeholders).await
    }
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner").field("host", &self.host).finish()
    }
}
