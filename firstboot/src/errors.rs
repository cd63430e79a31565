//! Error taxonomy for the provisioning core.
//!
//! Task-level errors are contained at the task boundary: one task's failure
//! never aborts the remaining tasks in its stage. Catalog errors degrade the
//! displayed list, sink errors are logged and dropped. Nothing here escalates
//! to crash the process.

use thiserror::Error;

/// Errors raised while loading a stage's task catalog.
///
/// Fatal to displaying that stage's list, never fatal to the pipeline: the
/// caller treats this as "zero tasks" and shows a degraded placeholder row.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing source could not be read.
    #[error("catalog source unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// The backing source could not be parsed.
    #[error("catalog source malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors local to one task execution.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task payload is missing required data or contains an unresolvable
    /// template. Marks the task as failed without invoking any command.
    #[error("task payload malformed: {reason}")]
    Malformed {
        /// Why the payload was rejected.
        reason: String,
    },

    /// An external command exceeded its timeout bound.
    #[error("command '{program}' timed out after {timeout_secs}s")]
    Timeout {
        /// The program that was invoked.
        program: String,
        /// The timeout bound in seconds.
        timeout_secs: u64,
    },

    /// An external command exited with a code outside the known-success set.
    #[error("command '{program}' failed with exit code {exit_code}")]
    CommandFailed {
        /// The program that was invoked.
        program: String,
        /// The non-success exit code.
        exit_code: i32,
        /// Captured stderr, for diagnostics.
        stderr: String,
    },

    /// An external command could not be spawned at all.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl TaskError {
    /// Creates a malformed-payload error.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(program: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            program: program.into(),
            timeout_secs,
        }
    }

    /// Creates a command-failed error.
    #[must_use]
    pub fn command_failed(
        program: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            program: program.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a spawn error.
    #[must_use]
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}

/// Error raised when the reporting sink rejects a record.
///
/// Logged by the runner and never propagated; a sink failure must not fail
/// the task it belongs to.
#[derive(Debug, Clone, Error)]
#[error("report sink write failed: {reason}")]
pub struct SinkError {
    /// Why the write failed.
    pub reason: String,
}

impl SinkError {
    /// Creates a new sink error.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The top-level error type for composition-root operations.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A catalog could not be loaded.
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// A task failed.
    #[error("{0}")]
    Task(#[from] TaskError),

    /// A sink write failed.
    #[error("{0}")]
    Sink(#[from] SinkError),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_display() {
        let err = TaskError::timeout("winget", 600);
        assert_eq!(err.to_string(), "command 'winget' timed out after 600s");

        let err = TaskError::command_failed("reg", 1, "access denied");
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_malformed_error() {
        let err = TaskError::malformed("empty package identifier list");
        assert!(matches!(err, TaskError::Malformed { .. }));
    }

    #[test]
    fn test_sink_error_never_wraps_task_state() {
        let err = SinkError::new("connection lost");
        assert_eq!(err.to_string(), "report sink write failed: connection lost");
    }

    #[test]
    fn test_catalog_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CatalogError::from(io);
        assert!(err.to_string().starts_with("catalog source unavailable"));
    }
}
