use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::super::{args::SyncArgs, exit_status::ExitStatus, report};
use crate::{
    config::load_config,
    sync::{self, SyncOptions},
};

pub fn sync(mut args: SyncArgs) -> Result<ExitStatus> {
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let loaded = load_config(&cwd)?;

    // Paths in a config file found in a parent directory are relative to
    // that directory.
    let base_dir = match loaded.path.as_deref().and_then(Path::parent) {
        Some(dir) if dir != cwd => dir.to_path_buf(),
        _ => PathBuf::new(),
    };

    // Command-line paths stay relative to the current directory.
    if !base_dir.as_os_str().is_empty() {
        args.resolve_paths(&cwd);
    }

    let mut config = loaded.config;
    args.apply_to(&mut config);
    config.validate()?;

    if args.verbose
        && let Some(path) = &loaded.path
    {
        report::print_config_path(path);
    }

    let summary = sync::run(
        &config,
        &base_dir,
        &SyncOptions {
            dry_run: args.check,
        },
    )?;
    report::print_sync(&summary, args.verbose);

    if summary.dry_run && summary.changed_count() > 0 {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}
