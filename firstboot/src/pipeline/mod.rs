//! Stage pipeline: the guided-tour plan and the controller state machine
//! that sequences stages and gates auto-install.

mod controller;
mod plan;

pub use controller::{EntryKind, PipelineController, PipelineState};
pub use plan::{TourPlan, SETTLE_DELAY};
