//! Typed task records.
//!
//! Payloads are a tagged variant per task kind so required fields are
//! checked when the catalog is parsed. Externally supplied templates still
//! get runtime validation at execution time; a malformed payload fails
//! that task only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Timeout bound for settings, policy, and uninstall invocations.
pub const SETTINGS_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout bound for package and dependency install invocations.
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Stable task identifier, unique within its catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    /// Numeric identifier.
    Int(i64),
    /// String identifier.
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The kind of work a task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Create/set a registry value.
    RegistryEdit,
    /// Install one or more packages via the package manager.
    PackageInstall,
    /// Uninstall one or more packages via the package manager.
    PackageUninstall,
    /// Install a language-runtime dependency.
    PythonPackageInstall,
    /// Run a pre-formatted shell command template.
    ShellCommand,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistryEdit => write!(f, "registry_edit"),
            Self::PackageInstall => write!(f, "package_install"),
            Self::PackageUninstall => write!(f, "package_uninstall"),
            Self::PythonPackageInstall => write!(f, "python_package_install"),
            Self::ShellCommand => write!(f, "shell_command"),
        }
    }
}

/// Which uninstall backend a `PackageUninstall` task targets.
///
/// Appx removal goes through `Get-AppxPackage | Remove-AppxPackage` and has
/// its own already-absent classification; winget removal shares the package
/// manager's success-code table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UninstallSource {
    /// The package manager (`winget uninstall --id`).
    Winget,
    /// A provisioned app package, removed by wildcard name match.
    #[default]
    Appx,
}

/// Kind-specific task parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskPayload {
    /// Registry value edit: probe the path, create it if absent, then set
    /// the value with the declared type.
    RegistryEdit {
        /// Registry path of the target key.
        path: String,
        /// Name of the value under the key.
        value_name: String,
        /// Declared value type (e.g. `REG_DWORD`).
        value_type: String,
        /// Value data to set.
        value_data: String,
    },
    /// Package installs; `ids` is a comma-separated identifier list.
    PackageInstall {
        /// Comma-separated package identifiers.
        ids: String,
    },
    /// Package uninstalls; `ids` is a comma-separated identifier list.
    PackageUninstall {
        /// Comma-separated package identifiers.
        ids: String,
        /// Uninstall backend; app packages when unspecified.
        #[serde(default)]
        source: UninstallSource,
    },
    /// A single language-runtime dependency.
    PythonPackageInstall {
        /// The dependency requirement (name or name==version).
        requirement: String,
    },
    /// A raw command template with `{placeholder}` markers.
    ShellCommand {
        /// The command template.
        template: String,
    },
}

impl TaskPayload {
    /// Returns the kind tag for this payload.
    #[must_use]
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::RegistryEdit { .. } => TaskKind::RegistryEdit,
            Self::PackageInstall { .. } => TaskKind::PackageInstall,
            Self::PackageUninstall { .. } => TaskKind::PackageUninstall,
            Self::PythonPackageInstall { .. } => TaskKind::PythonPackageInstall,
            Self::ShellCommand { .. } => TaskKind::ShellCommand,
        }
    }

    /// The per-invocation timeout bound for this payload kind.
    ///
    /// Installs get the longer bound; settings, policy, uninstall, and shell
    /// commands the shorter one.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        match self {
            Self::PackageInstall { .. } | Self::PythonPackageInstall { .. } => INSTALL_TIMEOUT,
            Self::RegistryEdit { .. } | Self::PackageUninstall { .. } | Self::ShellCommand { .. } => {
                SETTINGS_TIMEOUT
            }
        }
    }
}

/// Splits a comma-separated identifier list, trimming whitespace and
/// dropping empty entries.
#[must_use]
pub fn split_identifiers(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// One unit of provisioning work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier, unique within the catalog.
    pub id: TaskId,
    /// Display label, used for status reporting.
    pub name: String,
    /// Disabled tasks are filtered out of the catalog, never scheduled.
    #[serde(default = "default_enabled", rename = "enable")]
    pub enabled: bool,
    /// Kind-specific parameters.
    #[serde(flatten)]
    pub payload: TaskPayload,
}

fn default_enabled() -> bool {
    true
}

impl Task {
    /// Creates an enabled task.
    #[must_use]
    pub fn new(id: TaskId, name: impl Into<String>, payload: TaskPayload) -> Self {
        Self {
            id,
            name: name.into(),
            enabled: true,
            payload,
        }
    }

    /// Marks the task disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Returns the kind of this task.
    #[must_use]
    pub fn kind(&self) -> TaskKind {
        self.payload.kind()
    }
}
