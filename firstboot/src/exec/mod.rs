//! Command execution: the invoker boundary, success-code classification,
//! platform command shapes, and the per-task executor.

mod commands;
mod executor;
mod invoker;
mod success_codes;

pub use commands::{CommandLine, PlatformCommands};
pub use executor::CommandExecutor;
pub use invoker::{CommandInvoker, Invocation, SystemInvoker};
pub use success_codes::SuccessCodes;
