//! Shared vocabulary types: stage kinds, task states, results, and the
//! status messages pushed to observers.

mod result;
mod status;

pub use result::TaskResult;
pub use status::{StageKind, StatusUpdate, TaskState};
