//! Immutable per-task outcome records.

use super::{StageKind, TaskState};
use crate::utils::{now_utc, Timestamp};
use serde::{Deserialize, Serialize};

/// The outcome of one task execution.
///
/// Created by the runner and handed straight to the reporting sink; never
/// mutated or deleted afterwards. The core holds no result history beyond
/// the current stage run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Display label of the task.
    pub task_name: String,
    /// The stage the task belongs to.
    pub stage_kind: StageKind,
    /// Terminal state: success or failure.
    pub state: TaskState,
    /// When the outcome was recorded.
    pub timestamp: Timestamp,
}

impl TaskResult {
    /// Creates a result stamped with the current time.
    #[must_use]
    pub fn new(task_name: impl Into<String>, stage_kind: StageKind, state: TaskState) -> Self {
        Self {
            task_name: task_name.into(),
            stage_kind,
            state,
            timestamp: now_utc(),
        }
    }

    /// Returns true if the task succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == TaskState::Success
    }
}
