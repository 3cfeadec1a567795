//! Command-line interface layer.

mod args;
mod commands;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, Command, SyncArgs};
pub use exit_status::ExitStatus;
pub use run::run as run_cli;
