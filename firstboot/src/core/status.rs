//! Stage kind, task state, and observer status messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The provisioning category a stage belongs to.
///
/// Each kind has its own ordered task list in the catalog and maps to one
/// declarative source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Registry-backed OS settings.
    WindowsSettings,
    /// Group-policy registry edits, finalized by a policy refresh.
    GroupPolicy,
    /// Package-manager uninstalls of preloaded programs.
    ProgramUninstall,
    /// Package-manager installs of runtime dependencies.
    DependencyInstall,
    /// Language-runtime (pip) dependency installs.
    PythonDependencyInstall,
    /// Package-manager installs of end-user programs.
    ProgramInstall,
}

impl StageKind {
    /// The declarative source file holding this stage's task records.
    #[must_use]
    pub fn catalog_file(&self) -> &'static str {
        match self {
            Self::WindowsSettings => "WindowsSetting.json",
            Self::GroupPolicy => "GroupPolicy.json",
            Self::ProgramUninstall => "UninstallPrograms.json",
            Self::DependencyInstall => "DependenciesWinget.json",
            Self::PythonDependencyInstall => "PythonDependencies.json",
            Self::ProgramInstall => "ProgramsWinget.json",
        }
    }

    /// Whether this stage runs the policy refresh finalize step after its
    /// last task.
    #[must_use]
    pub fn is_policy_flavored(&self) -> bool {
        matches!(self, Self::WindowsSettings | Self::GroupPolicy)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowsSettings => write!(f, "windows_settings"),
            Self::GroupPolicy => write!(f, "group_policy"),
            Self::ProgramUninstall => write!(f, "program_uninstall"),
            Self::DependencyInstall => write!(f, "dependency_install"),
            Self::PythonDependencyInstall => write!(f, "python_dependency_install"),
            Self::ProgramInstall => write!(f, "program_install"),
        }
    }
}

/// The user-visible state of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// The task is queued or currently executing.
    Pending,
    /// The task completed and classified as success.
    Success,
    /// The task failed, timed out, or was malformed.
    Failure,
}

impl Default for TaskState {
    fn default() -> Self {
        Self::Pending
    }
}

impl TaskState {
    /// Returns true if the state is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// A status message pushed from the runner to an observer.
///
/// Correlation is by `index` into the displayed list; `task_name` is a
/// display label only, so duplicate names never misroute status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Display label of the task.
    pub task_name: String,
    /// Position of the task in the displayed list.
    pub index: usize,
    /// The new state.
    pub state: TaskState,
}

impl StatusUpdate {
    /// Creates a new status update.
    #[must_use]
    pub fn new(task_name: impl Into<String>, index: usize, state: TaskState) -> Self {
        Self {
            task_name: task_name.into(),
            index,
            state,
        }
    }
}
