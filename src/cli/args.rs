//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - (none) / `sync`: Extract keys and reconcile every language file
//! - `init`: Write a default `.langdictrc.json`

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub sync: SyncArgs,
}

impl Arguments {
    /// Resolve the command to run, falling back to `sync`.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Sync(self.sync))
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct SyncArgs {
    /// Directory to scan for source files (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Directory holding the language files (overrides config file)
    #[arg(long)]
    pub target_dir: Option<PathBuf>,

    /// Comma-separated language codes (overrides config file)
    #[arg(long, value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Source file extension to scan, e.g. "go" (overrides config file)
    #[arg(long)]
    pub extension: Option<String>,

    /// Translation function whose calls are scanned (overrides config file)
    #[arg(long)]
    pub function: Option<String>,

    /// Do not write the template file
    #[arg(long)]
    pub no_template: bool,

    /// Report files that are out of date without writing them
    #[arg(long)]
    pub check: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl SyncArgs {
    /// Anchor relative `--source-root` and `--target-dir` values at `dir`.
    pub fn resolve_paths(&mut self, dir: &Path) {
        for path in [&mut self.source_root, &mut self.target_dir]
            .into_iter()
            .flatten()
        {
            *path = dir.join(&*path);
        }
    }

    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(source_root) = &self.source_root {
            config.source_root = source_root.to_string_lossy().into_owned();
        }
        if let Some(target_dir) = &self.target_dir {
            config.target_dir = target_dir.to_string_lossy().into_owned();
        }
        if !self.languages.is_empty() {
            config.languages = self.languages.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }
        if let Some(function) = &self.function {
            config.function = function.clone();
        }
        if self.no_template {
            config.template = None;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translation keys and synchronize every language file (default)
    Sync(SyncArgs),
    /// Initialize a new .langdictrc.json configuration file
    Init,
}
