//! The stage pipeline controller: an explicit state machine over stage
//! indices, with a single source of truth for "has this stage
//! auto-triggered".

use super::TourPlan;
use crate::catalog::{CatalogLoader, Task};
use crate::context::PlaceholderContext;
use crate::observe::{degraded_list, StatusObserver};
use crate::runner::TaskRunner;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

/// The controller's coarse execution phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Between stage entries.
    Idle,
    /// Loading a stage's catalog.
    Loading,
    /// A stage's runner is active.
    Running,
    /// The completion callback has fired.
    Done,
}

/// How a stage entry was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Guided-tour entry at process start: runs inline on the tour worker
    /// and chains to the next stage.
    Tour,
    /// Manual revisit: refreshes the list, may trigger a runner on a
    /// detached worker, never advances the tour.
    Manual,
}

type CompletionCallback = Box<dyn FnOnce() + Send>;

struct ControllerState {
    phase: PipelineState,
    current: usize,
    triggered: Vec<bool>,
    completed: bool,
    on_complete: Option<CompletionCallback>,
}

/// Sequences stages, triggers each stage's runner at most once per process
/// run, and signals pipeline completion exactly once.
///
/// Individual task failures are recorded but never halt stage progression;
/// there is no failure terminal state.
///
/// Runners mutate shared host state (registry, package manager), so at
/// most one runner is ever active: the tour path and detached manual
/// workers both serialize through `runner_gate`.
pub struct PipelineController {
    plan: TourPlan,
    loader: Arc<dyn CatalogLoader>,
    runner: Arc<TaskRunner>,
    observer: Arc<dyn StatusObserver>,
    placeholders: PlaceholderContext,
    run_id: Uuid,
    state: Arc<Mutex<ControllerState>>,
    runner_gate: Arc<tokio::sync::Mutex<()>>,
}

impl PipelineController {
    /// Creates a controller over the given plan and collaborators.
    #[must_use]
    pub fn new(
        plan: TourPlan,
        loader: Arc<dyn CatalogLoader>,
        runner: Arc<TaskRunner>,
        observer: Arc<dyn StatusObserver>,
        placeholders: PlaceholderContext,
    ) -> Self {
        let stage_count = plan.len();
        Self {
            plan,
            loader,
            runner,
            observer,
            placeholders,
            run_id: Uuid::new_v4(),
            state: Arc::new(Mutex::new(ControllerState {
                phase: PipelineState::Idle,
                current: 0,
                triggered: vec![false; stage_count],
                completed: false,
                on_complete: None,
            })),
            runner_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Sets the pipeline-completion callback. Fires exactly once, even if
    /// the final stage is revisited.
    #[must_use]
    pub fn with_completion(self, callback: CompletionCallback) -> Self {
        self.state.lock().on_complete = Some(callback);
        self
    }

    /// Runs the guided tour: every stage in plan order, one runner at a
    /// time, chaining to the next index after the settle delay. Call from a
    /// worker task, never from the presentation thread.
    pub async fn run_tour(&self) {
        info!(run_id = %self.run_id, stages = self.plan.len(), "guided tour started");

        for index in 0..self.plan.len() {
            self.enter_stage(index, EntryKind::Tour).await;
            if !self.plan.is_final(index) {
                sleep(self.plan.settle_delay()).await;
            }
        }

        self.fire_completion();
    }

    /// Enters one stage: reloads its catalog (always, even on revisits),
    /// refreshes the displayed list, and fires the runner iff the stage is
    /// auto-install-eligible and has not already triggered this process run.
    pub async fn enter_stage(&self, index: usize, entry: EntryKind) {
        let Some(stage) = self.plan.stage_at(index) else {
            warn!(index, "stage index out of range");
            return;
        };

        {
            let mut st = self.state.lock();
            if st.phase != PipelineState::Done {
                st.phase = PipelineState::Loading;
            }
            st.current = index;
        }

        let tasks = match self.loader.load(stage).await {
            Ok(tasks) => {
                let names: Vec<String> = tasks.iter().map(|t| t.name.clone()).collect();
                self.observer.update_list(&names);
                tasks
            }
            Err(err) => {
                warn!(stage = %stage, error = %err, "catalog unavailable, degrading list");
                self.observer.update_list(&degraded_list(&err));
                Vec::new()
            }
        };

        // The triggered flag is set under the lock before any dispatch, so
        // a rapid double navigation cannot fire the stage twice.
        let fire = {
            let mut st = self.state.lock();
            let fire = self.plan.is_auto_install(stage) && !st.triggered[index];
            if fire {
                st.triggered[index] = true;
                st.phase = PipelineState::Running;
            }
            fire
        };

        if fire {
            match entry {
                EntryKind::Tour => {
                    let _active = self.runner_gate.lock().await;
                    self.runner.run(stage, &tasks, &self.placeholders).await;
                    drop(_active);
                    settle_phase(&self.state);
                }
                EntryKind::Manual => {
                    self.spawn_runner(stage, tasks);
                }
            }
        } else {
            settle_phase(&self.state);
        }
    }

    /// Dispatches a detached runner worker for a manual entry. The worker
    /// queues behind any active runner and restores the phase when done.
    fn spawn_runner(&self, stage: crate::core::StageKind, tasks: Vec<Task>) {
        let runner = Arc::clone(&self.runner);
        let placeholders = self.placeholders.clone();
        let gate = Arc::clone(&self.runner_gate);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let _active = gate.lock().await;
            runner.run(stage, &tasks, &placeholders).await;
            drop(_active);
            settle_phase(&state);
        });
    }

    fn fire_completion(&self) {
        let callback = {
            let mut st = self.state.lock();
            if st.completed {
                None
            } else {
                st.completed = true;
                st.phase = PipelineState::Done;
                st.on_complete.take()
            }
        };

        if let Some(callback) = callback {
            info!(run_id = %self.run_id, "guided tour complete");
            callback();
        }
    }

    /// The controller's current phase.
    #[must_use]
    pub fn phase(&self) -> PipelineState {
        self.state.lock().phase
    }

    /// The most recently entered stage index.
    #[must_use]
    pub fn current_stage(&self) -> usize {
        self.state.lock().current
    }

    /// Whether a stage index has already auto-triggered this process run.
    #[must_use]
    pub fn has_triggered(&self, index: usize) -> bool {
        self.state.lock().triggered.get(index).copied().unwrap_or(false)
    }

    /// Whether the completion callback has fired.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.lock().completed
    }

    /// The identifier of this process run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }
}

fn settle_phase(state: &Mutex<ControllerState>) {
    let mut st = state.lock();
    if st.phase != PipelineState::Done {
        st.phase = PipelineState::Idle;
    }
}

impl std::fmt::Debug for PipelineController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineController")
            .field("run_id", &self.run_id)
            .field("stages", &self.plan.len())
            .finish()
    }
}
