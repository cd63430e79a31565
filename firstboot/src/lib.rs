//! # Firstboot
//!
//! The task orchestration core for first-boot workstation provisioning.
//!
//! Firstboot takes a declarative list of provisioning tasks per stage and
//! executes them in a controlled order with:
//!
//! - **Per-task isolation**: one task's failure never aborts its stage
//! - **Bounded execution**: every external command carries a timeout
//! - **Live status**: observers receive list and per-task state messages
//! - **Central recording**: one immutable outcome record per task
//! - **Guided tour**: a stage pipeline that auto-advances once per run
//!
//! The presentation layer, configuration store, reporting backend, and raw
//! OS command invocation are pluggable interfaces, not dependencies.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use firstboot::prelude::*;
//! use std::sync::Arc;
//!
//! let invoker = Arc::new(SystemInvoker::new());
//! let executor = Arc::new(CommandExecutor::new(invoker));
//! let observer: Arc<dyn StatusObserver> = Arc::new(LoggingObserver);
//! let sink: Arc<dyn ReportSink> = Arc::new(LoggingReportSink);
//! let runner = Arc::new(TaskRunner::new(executor, Arc::clone(&observer), sink, "WS-042"));
//! let loader = Arc::new(JsonCatalogLoader::new("Functions"));
//!
//! let controller = PipelineController::new(
//!     TourPlan::standard(), loader, runner, observer, PlaceholderContext::new(),
//! );
//! controller.run_tour().await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod catalog;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod exec;
pub mod observability;
pub mod observe;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catalog::{
        CatalogLoader, JsonCatalogLoader, Task, TaskId, TaskKind, TaskPayload, UninstallSource,
    };
    pub use crate::config::ProvisionConfig;
    pub use crate::context::PlaceholderContext;
    pub use crate::core::{StageKind, StatusUpdate, TaskResult, TaskState};
    pub use crate::errors::{CatalogError, ProvisionError, SinkError, TaskError};
    pub use crate::exec::{
        CommandExecutor, CommandInvoker, Invocation, SuccessCodes, SystemInvoker,
    };
    pub use crate::observe::{
        ChannelObserver, CollectingObserver, LoggingObserver, NoOpObserver, ObserverMessage,
        StatusObserver,
    };
    pub use crate::pipeline::{EntryKind, PipelineController, PipelineState, TourPlan};
    pub use crate::report::{
        CollectingReportSink, LoggingReportSink, NoOpReportSink, ReportSink,
    };
    pub use crate::runner::TaskRunner;
    pub use crate::utils::{iso_timestamp, Timestamp};
}
