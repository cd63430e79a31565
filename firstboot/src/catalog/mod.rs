//! Task catalog: typed task records and the loader that reads them from
//! the declarative per-stage sources.

mod loader;
mod task;

pub use loader::{CatalogLoader, JsonCatalogLoader};
pub use task::{
    split_identifiers, Task, TaskId, TaskKind, TaskPayload, UninstallSource, INSTALL_TIMEOUT,
    SETTINGS_TIMEOUT,
};
