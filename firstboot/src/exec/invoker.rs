//! The external command invocation boundary.

use crate::errors::TaskError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Captured outcome of one external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The process exit code (-1 if terminated by signal).
    pub exit_code: i32,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
}

impl Invocation {
    /// Creates an invocation outcome with empty output.
    #[must_use]
    pub fn exit(exit_code: i32) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// Runs one external command with a bounded timeout and captures its
/// stdout, stderr, and exit code.
///
/// The core never assumes a specific shell or package manager; integrations
/// implement this trait.
#[async_trait]
pub trait CommandInvoker: Send + Sync {
    /// Invokes `program` with `args`, bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// `TaskError::Timeout` when the bound expires (the process is killed),
    /// `TaskError::Spawn` when the process cannot start. A non-zero exit
    /// code is not an error at this boundary; classification happens above.
    async fn invoke(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<Invocation, TaskError>;
}

/// Invoker backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInvoker;

impl SystemInvoker {
    /// Creates a system invoker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandInvoker for SystemInvoker {
    async fn invoke(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<Invocation, TaskError> {
        debug!(program, ?args, timeout_secs = timeout.as_secs(), "invoking command");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| TaskError::spawn(program, err))?;

        // kill_on_drop reaps the child when the timeout branch drops it.
        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| TaskError::timeout(program, timeout.as_secs()))?
            .map_err(|err| TaskError::spawn(program, err))?;

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(program, exit_code, "command exited");

        Ok(Invocation {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_failure_is_spawn_error() {
        let invoker = SystemInvoker::new();
        let err = invoker
            .invoke("definitely-not-a-real-program-7f3a", &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_captured() {
        let invoker = SystemInvoker::new();
        let inv = invoker
            .invoke(
                "sh",
                &["-c".to_string(), "exit 3".to_string()],
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert_eq!(inv.exit_code, 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_stuck_command() {
        let invoker = SystemInvoker::new();
        let err = invoker
            .invoke(
                "sh",
                &["-c".to_string(), "sleep 30".to_string()],
                Duration::from_millis(50),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Timeout { .. }));
    }
}
