//! Human-readable output for the sync command.
//!
//! Status lines go to stdout, warnings to stderr. Every printer has a `_to`
//! variant taking a writer so the formatting can be tested.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::{ColoredString, Colorize};

use crate::{
    dictionary::{DictionaryOrigin, FileOutcome, ReconcileStats},
    extract::FileMatches,
    sync::SyncSummary,
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print_sync(summary: &SyncSummary, verbose: bool) {
    print_sync_to(summary, verbose, &mut io::stdout().lock());
    print_warnings_to(summary, &mut io::stderr().lock());
}

pub fn print_sync_to<W: Write>(summary: &SyncSummary, verbose: bool, writer: &mut W) {
    if verbose {
        print_source_files(&summary.files, writer);
    }

    if let Some(template) = &summary.template {
        print_file_line(&template.path, template.outcome, None, writer);
    }
    for language in &summary.languages {
        print_file_line(
            &language.path,
            language.outcome,
            Some(language.stats),
            writer,
        );
    }

    print_summary_line(summary, writer);
}

/// Warn about language files that were discarded as malformed.
pub fn print_warnings_to<W: Write>(summary: &SyncSummary, writer: &mut W) {
    for language in &summary.languages {
        if language.origin != DictionaryOrigin::Reset {
            continue;
        }
        let _ = writeln!(
            writer,
            "{} {} was malformed and has been reset: {}",
            "warning:".bold().yellow(),
            language.path.display(),
            language.reset_reason.as_deref().unwrap_or("unknown error")
        );
    }
}

pub fn print_config_path(path: &Path) {
    println!("{} {}", "config:".dimmed(), path.display());
}

fn print_source_files<W: Write>(files: &[FileMatches], writer: &mut W) {
    for file in files {
        let _ = writeln!(
            writer,
            "{} {} {}",
            "scan".dimmed(),
            file.path.display(),
            format!("({} {})", file.count, plural(file.count, "key", "keys")).dimmed()
        );
    }
    let _ = writeln!(
        writer,
        "{}",
        format!(
            "Scanned {} source {}",
            files.len(),
            plural(files.len(), "file", "files")
        )
        .dimmed()
    );
}

fn print_file_line<W: Write>(
    path: &Path,
    outcome: FileOutcome,
    stats: Option<ReconcileStats>,
    writer: &mut W,
) {
    let counts = match stats {
        Some(stats) if stats.added > 0 || stats.removed > 0 => {
            format!(" (+{} -{})", stats.added, stats.removed)
        }
        _ => String::new(),
    };
    let _ = writeln!(
        writer,
        "{:>9} {}{}",
        outcome_label(outcome),
        path.display(),
        counts.dimmed()
    );
}

fn outcome_label(outcome: FileOutcome) -> ColoredString {
    match outcome {
        FileOutcome::Created => outcome.as_str().green(),
        FileOutcome::Updated => outcome.as_str().cyan(),
        FileOutcome::Unchanged => outcome.as_str().dimmed(),
    }
}

fn print_summary_line<W: Write>(summary: &SyncSummary, writer: &mut W) {
    let key_count = summary.keys.len();
    let source_count = summary.files.len();
    let changed = summary.changed_count();

    let msg = if summary.dry_run && changed > 0 {
        format!(
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} {} out of date (run without --check to update)",
                changed,
                plural(changed, "file", "files")
            )
            .red()
        )
    } else if summary.dry_run {
        format!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "All files up to date ({} {})",
                key_count,
                plural(key_count, "key", "keys")
            )
            .green()
        )
    } else {
        format!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Synced {} {} from {} source {} into {} {} ({} {} changed)",
                key_count,
                plural(key_count, "key", "keys"),
                source_count,
                plural(source_count, "file", "files"),
                summary.languages.len(),
                plural(summary.languages.len(), "language", "languages"),
                changed,
                plural(changed, "file", "files"),
            )
            .green()
        )
    };
    let _ = writeln!(writer, "{}", msg);
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
