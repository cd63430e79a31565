//! Per-task command execution and outcome classification.

use super::{CommandInvoker, CommandLine, Invocation, PlatformCommands, SuccessCodes};
use crate::catalog::{split_identifiers, Task, TaskPayload, UninstallSource, SETTINGS_TIMEOUT};
use crate::context::PlaceholderContext;
use crate::errors::TaskError;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Executes one task by dispatching on its payload kind.
///
/// Side effects mutate host OS state and are not idempotent-safe to retry
/// blindly, hence the registry existence probe before creation. Package
/// tasks with multiple identifiers fail fast: the first failing identifier
/// aborts the rest of that task.
pub struct CommandExecutor {
    invoker: Arc<dyn CommandInvoker>,
    commands: PlatformCommands,
    package_success: SuccessCodes,
}

impl CommandExecutor {
    /// Creates an executor with the winget classification table.
    #[must_use]
    pub fn new(invoker: Arc<dyn CommandInvoker>) -> Self {
        Self {
            invoker,
            commands: PlatformCommands,
            package_success: SuccessCodes::default(),
        }
    }

    /// Overrides the package-manager success-code table.
    #[must_use]
    pub fn with_package_success(mut self, codes: SuccessCodes) -> Self {
        self.package_success = codes;
        self
    }

    /// Executes one task to completion.
    ///
    /// # Errors
    ///
    /// Any `TaskError` marks this task as failed; the caller contains it at
    /// the task boundary and continues with the rest of the stage.
    pub async fn execute(
        &self,
        task: &Task,
        placeholders: &PlaceholderContext,
    ) -> Result<(), TaskError> {
        let timeout = task.payload.timeout();
        match &task.payload {
            TaskPayload::RegistryEdit {
                path,
                value_name,
                value_type,
                value_data,
            } => {
                self.registry_edit(path, value_name, value_type, value_data, timeout)
                    .await
            }
            TaskPayload::PackageInstall { ids } => {
                self.each_package(ids, timeout, |id| self.commands.package_install(id))
                    .await
            }
            TaskPayload::PackageUninstall { ids, source } => match source {
                UninstallSource::Winget => {
                    self.each_package(ids, timeout, |id| self.commands.package_uninstall(id))
                        .await
                }
                UninstallSource::Appx => self.each_appx(ids, timeout).await,
            },
            TaskPayload::PythonPackageInstall { requirement } => {
                let requirement = requirement.trim();
                if requirement.is_empty() {
                    return Err(TaskError::malformed("empty dependency requirement"));
                }
                let line = self.commands.python_install(requirement);
                let inv = self.invoke(&line, timeout).await?;
                classify(&line, inv, &SuccessCodes::zero_only())
            }
            TaskPayload::ShellCommand { template } => {
                let resolved = placeholders.substitute(template)?;
                let line = self.commands.shell(&resolved);
                let inv = self.invoke(&line, timeout).await?;
                classify(&line, inv, &SuccessCodes::zero_only())
            }
        }
    }

    /// Runs the policy refresh finalize step. Timeout-bounded and logged by
    /// the caller; its failure flips no task status.
    ///
    /// # Errors
    ///
    /// Same containment as task errors.
    pub async fn refresh_policy(&self) -> Result<(), TaskError> {
        let line = self.commands.policy_refresh();
        let inv = self.invoke(&line, SETTINGS_TIMEOUT).await?;
        classify(&line, inv, &SuccessCodes::zero_only())
    }

    /// Probe the target path; create it only when absent; then set the
    /// value. Creation failure aborts the value-set.
    async fn registry_edit(
        &self,
        path: &str,
        value_name: &str,
        value_type: &str,
        value_data: &str,
        timeout: Duration,
    ) -> Result<(), TaskError> {
        let probe = self.commands.registry_query(path);
        let exists = self.invoke(&probe, timeout).await?.exit_code == 0;

        if !exists {
            let create = self.commands.registry_create(path);
            let inv = self.invoke(&create, timeout).await?;
            classify(&create, inv, &SuccessCodes::zero_only())?;
        } else {
            debug!(path, "registry path exists, skipping creation");
        }

        let set = self
            .commands
            .registry_set(path, value_name, value_type, value_data);
        let inv = self.invoke(&set, timeout).await?;
        classify(&set, inv, &SuccessCodes::zero_only())
    }

    /// One invocation per identifier; every identifier must classify as
    /// success, first failure aborts the rest.
    async fn each_package(
        &self,
        ids: &str,
        timeout: Duration,
        build: impl Fn(&str) -> CommandLine,
    ) -> Result<(), TaskError> {
        let identifiers = split_identifiers(ids);
        if identifiers.is_empty() {
            return Err(TaskError::malformed("empty package identifier list"));
        }

        for id in identifiers {
            let line = build(id);
            let inv = self.invoke(&line, timeout).await?;
            classify(&line, inv, &self.package_success)?;
            debug!(package = id, "package identifier classified as success");
        }
        Ok(())
    }

    /// App-package removal per identifier. Removal exits non-zero when the
    /// package is already absent; those stderr shapes classify as success.
    async fn each_appx(&self, ids: &str, timeout: Duration) -> Result<(), TaskError> {
        let identifiers = split_identifiers(ids);
        if identifiers.is_empty() {
            return Err(TaskError::malformed("empty package identifier list"));
        }

        for name in identifiers {
            let line = self.commands.appx_uninstall(name);
            let inv = self.invoke(&line, timeout).await?;
            if inv.exit_code != 0
                && !APPX_ABSENT_MARKERS.iter().any(|m| inv.stderr.contains(m))
            {
                return Err(TaskError::command_failed(
                    &line.program,
                    inv.exit_code,
                    inv.stderr,
                ));
            }
            debug!(package = name, "app package removed or already absent");
        }
        Ok(())
    }

    async fn invoke(&self, line: &CommandLine, timeout: Duration) -> Result<Invocation, TaskError> {
        self.invoker.invoke(&line.program, &line.args, timeout).await
    }
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("package_success", &self.package_success)
            .finish()
    }
}

/// Stderr shapes an app-package removal emits when the target was never
/// installed.
const APPX_ABSENT_MARKERS: [&str; 3] =
    ["is not recognized", "Cannot find path", "No object found"];

fn classify(line: &CommandLine, inv: Invocation, codes: &SuccessCodes) -> Result<(), TaskError> {
    if codes.is_success(inv.exit_code) {
        Ok(())
    } else {
        Err(TaskError::command_failed(
            &line.program,
            inv.exit_code,
            inv.stderr,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TaskId;
    use crate::testing::{ScriptedInvoker, ScriptedOutcome};
    use pretty_assertions::assert_eq;

    fn executor(invoker: &Arc<ScriptedInvoker>) -> CommandExecutor {
        CommandExecutor::new(Arc::clone(invoker) as Arc<dyn CommandInvoker>)
    }

    fn package_task(ids: &str) -> Task {
        Task::new(
            TaskId::Int(1),
            "Install packages",
            TaskPayload::PackageInstall { ids: ids.into() },
        )
    }

    fn uninstall_task(ids: &str, source: UninstallSource) -> Task {
        Task::new(
            TaskId::Int(4),
            "Remove packages",
            TaskPayload::PackageUninstall {
                ids: ids.into(),
                source,
            },
        )
    }

    fn registry_task() -> Task {
        Task::new(
            TaskId::Int(2),
            "Set value",
            TaskPayload::RegistryEdit {
                path: "HKLM\\SOFTWARE\\Test".into(),
                value_name: "V".into(),
                value_type: "REG_DWORD".into(),
                value_data: "1".into(),
            },
        )
    }

    #[tokio::test]
    async fn test_multi_identifier_fail_fast() {
        // Second of three fails: the third must not be attempted.
        let invoker = Arc::new(ScriptedInvoker::with_outcomes([
            ScriptedOutcome::Exit(0),
            ScriptedOutcome::Exit(1),
            ScriptedOutcome::Exit(0),
        ]));
        let exec = executor(&invoker);

        let err = exec
            .execute(&package_task("pkg1,pkg2,pkg3"), &PlaceholderContext::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::CommandFailed { exit_code: 1, .. }));
        assert_eq!(invoker.call_count(), 2);
    }

    #[tokio::test]
    async fn test_already_installed_code_is_success() {
        let invoker = Arc::new(ScriptedInvoker::with_outcomes([
            ScriptedOutcome::Exit(0),
            ScriptedOutcome::Exit(-1_978_335_189),
        ]));
        let exec = executor(&invoker);

        exec.execute(&package_task("pkg1,pkg2"), &PlaceholderContext::new())
            .await
            .unwrap();
        assert_eq!(invoker.call_count(), 2);
    }

    #[tokio::test]
    async fn test_uninstall_source_selects_backend() {
        let invoker = Arc::new(ScriptedInvoker::new());
        let exec = executor(&invoker);

        exec.execute(
            &uninstall_task("VideoLAN.VLC", UninstallSource::Winget),
            &PlaceholderContext::new(),
        )
        .await
        .unwrap();
        exec.execute(
            &uninstall_task("Xbox", UninstallSource::Appx),
            &PlaceholderContext::new(),
        )
        .await
        .unwrap();

        let calls = invoker.calls();
        assert_eq!(calls[0].0, "winget");
        assert_eq!(calls[0].1[0], "uninstall");
        assert_eq!(calls[1].0, "powershell");
        assert!(calls[1].1.last().unwrap().contains("*Xbox*"));
    }

    #[tokio::test]
    async fn test_appx_already_absent_is_success() {
        // Removing a package that was never installed exits non-zero with a
        // recognizable stderr shape.
        let invoker = Arc::new(ScriptedInvoker::with_outcomes([ScriptedOutcome::Output {
            code: 1,
            stderr: "Remove-AppxPackage : No object found matching *Xbox*",
        }]));
        let exec = executor(&invoker);

        exec.execute(
            &uninstall_task("Xbox", UninstallSource::Appx),
            &PlaceholderContext::new(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_appx_genuine_failure_fails_task() {
        let invoker = Arc::new(ScriptedInvoker::with_outcomes([ScriptedOutcome::Output {
            code: 1,
            stderr: "Remove-AppxPackage : Access is denied",
        }]));
        let exec = executor(&invoker);

        let err = exec
            .execute(
                &uninstall_task("Xbox", UninstallSource::Appx),
                &PlaceholderContext::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::CommandFailed { exit_code: 1, .. }));
    }

    #[tokio::test]
    async fn test_empty_identifier_list_is_malformed() {
        let invoker = Arc::new(ScriptedInvoker::new());
        let exec = executor(&invoker);

        let err = exec
            .execute(&package_task(" , "), &PlaceholderContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Malformed { .. }));
        assert_eq!(invoker.call_count(), 0);
    }

    #[tokio::test]
    async fn test_registry_existing_path_skips_creation() {
        // Probe succeeds, so only the value-set follows.
        let invoker = Arc::new(ScriptedInvoker::with_outcomes([
            ScriptedOutcome::Exit(0),
            ScriptedOutcome::Exit(0),
        ]));
        let exec = executor(&invoker);

        exec.execute(&registry_task(), &PlaceholderContext::new())
            .await
            .unwrap();

        let calls = invoker.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1[0], "query");
        assert_eq!(calls[1].1[0], "add");
    }

    #[tokio::test]
    async fn test_registry_absent_path_creates_then_sets() {
        let invoker = Arc::new(ScriptedInvoker::with_outcomes([
            ScriptedOutcome::Exit(1), // probe: absent
            ScriptedOutcome::Exit(0), // create
            ScriptedOutcome::Exit(0), // set
        ]));
        let exec = executor(&invoker);

        exec.execute(&registry_task(), &PlaceholderContext::new())
            .await
            .unwrap();
        assert_eq!(invoker.call_count(), 3);
    }

    #[tokio::test]
    async fn test_registry_creation_failure_skips_value_set() {
        let invoker = Arc::new(ScriptedInvoker::with_outcomes([
            ScriptedOutcome::Exit(1), // probe: absent
            ScriptedOutcome::Exit(5), // create fails
        ]));
        let exec = executor(&invoker);

        let err = exec
            .execute(&registry_task(), &PlaceholderContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::CommandFailed { exit_code: 5, .. }));
        assert_eq!(invoker.call_count(), 2);
    }

    #[tokio::test]
    async fn test_shell_command_substitutes_placeholders() {
        let invoker = Arc::new(ScriptedInvoker::new());
        let exec = executor(&invoker);
        let task = Task::new(
            TaskId::Int(3),
            "Activate",
            TaskPayload::ShellCommand {
                template: "slmgr /ipk {product_key}".into(),
            },
        );
        let ctx = PlaceholderContext::new().with_value("product_key", "ABCDE");

        exec.execute(&task, &ctx).await.unwrap();

        let calls = invoker.calls();
        assert!(calls[0].1.last().unwrap().contains("ABCDE"));
    }

    #[tokio::test]
    async fn test_timeout_propagates_as_task_failure() {
        let invoker = Arc::new(ScriptedInvoker::with_outcomes([ScriptedOutcome::Timeout]));
        let exec = executor(&invoker);

        let err = exec
            .execute(&package_task("pkg1"), &PlaceholderContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_refresh_policy_failure_is_contained_error() {
        let invoker = Arc::new(ScriptedInvoker::with_outcomes([ScriptedOutcome::Exit(1)]));
        let exec = executor(&invoker);
        assert!(exec.refresh_policy().await.is_err());
    }
}
