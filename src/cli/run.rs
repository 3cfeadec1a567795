use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{init::init, sync::sync},
    exit_status::ExitStatus,
};

/// Dispatch to the command handler. Running without a subcommand syncs.
pub fn run(args: Arguments) -> Result<ExitStatus> {
    match args.into_command() {
        Command::Sync(sync_args) => sync(sync_args),
        Command::Init => init(),
    }
}
