//! Reusable mocks and fixtures for exercising the orchestration core
//! without touching the host OS.

mod mocks;

pub use mocks::{FailingReportSink, InMemoryCatalog, ScriptedInvoker, ScriptedOutcome};
