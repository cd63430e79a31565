//! Mock collaborators: a scripted invoker, an in-memory catalog, and a
//! failing sink.

use crate::catalog::{CatalogLoader, Task, TaskId, TaskPayload};
use crate::core::{StageKind, TaskResult};
use crate::errors::{CatalogError, SinkError, TaskError};
use crate::exec::{CommandInvoker, Invocation};
use crate::report::ReportSink;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// One scripted invocation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedOutcome {
    /// The command exits with this code.
    Exit(i32),
    /// The command exits with this code and stderr text.
    Output {
        /// Exit code.
        code: i32,
        /// Captured stderr.
        stderr: &'static str,
    },
    /// The command exceeds its timeout.
    Timeout,
}

/// An invoker that replays a queued script of outcomes and records every
/// call. Once the script is exhausted it answers with exit code zero.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedInvoker {
    /// Creates an invoker that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an invoker with a queued script.
    #[must_use]
    pub fn with_outcomes(outcomes: impl IntoIterator<Item = ScriptedOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues one more outcome.
    pub fn push(&self, outcome: ScriptedOutcome) {
        self.script.lock().push_back(outcome);
    }

    /// Every `(program, args)` pair invoked so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().clone()
    }

    /// Number of invocations so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl CommandInvoker for ScriptedInvoker {
    async fn invoke(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<Invocation, TaskError> {
        self.calls
            .lock()
            .push((program.to_string(), args.to_vec()));

        let outcome = self
            .script
            .lock()
            .pop_front()
            .unwrap_or(ScriptedOutcome::Exit(0));

        match outcome {
            ScriptedOutcome::Exit(code) => Ok(Invocation::exit(code)),
            ScriptedOutcome::Output { code, stderr } => Ok(Invocation {
                exit_code: code,
                stdout: String::new(),
                stderr: stderr.to_string(),
            }),
            ScriptedOutcome::Timeout => Err(TaskError::timeout(program, timeout.as_secs())),
        }
    }
}

/// A catalog held in memory. Stages without an entry report
/// `CatalogError::Unavailable`, mirroring a missing source file.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    stages: Mutex<HashMap<StageKind, Vec<Task>>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces one stage's task list.
    pub fn put(&self, stage: StageKind, tasks: Vec<Task>) {
        self.stages.lock().insert(stage, tasks);
    }

    /// Replaces one stage's task list with named `echo ok` shell tasks.
    pub fn put_shell_tasks(&self, stage: StageKind, names: &[&str]) {
        let tasks = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Task::new(
                    TaskId::Int(i as i64),
                    *name,
                    TaskPayload::ShellCommand {
                        template: "echo ok".into(),
                    },
                )
            })
            .collect();
        self.put(stage, tasks);
    }
}

#[async_trait]
impl CatalogLoader for InMemoryCatalog {
    async fn load(&self, stage: StageKind) -> Result<Vec<Task>, CatalogError> {
        let stages = self.stages.lock();
        match stages.get(&stage) {
            Some(tasks) => Ok(tasks.iter().filter(|t| t.enabled).cloned().collect()),
            None => Err(CatalogError::Unavailable(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no catalog for stage '{stage}'"),
            ))),
        }
    }
}

/// A sink that rejects every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingReportSink;

#[async_trait]
impl ReportSink for FailingReportSink {
    async fn record(&self, _host: &str, _result: &TaskResult) -> Result<(), SinkError> {
        Err(SinkError::new("scripted sink failure"))
    }
}
