//! One full pass: extract keys from the source tree, write the template and
//! reconcile every configured language file.
//!
//! All language files are loaded and reconciled before anything is written,
//! so a malformed file aborts the run without leaving the others half
//! updated.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{
    config::Config,
    dictionary::{
        DictionaryOrigin, FileOutcome, LanguageDictionary, ReconcileStats, pending_write,
        read_existing, render_map, write_if_changed,
    },
    extract::{ExtractedKeys, FileMatches, extract_tree},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Compute outcomes without writing any file.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct TemplateReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone)]
pub struct LanguageReport {
    pub code: String,
    pub path: PathBuf,
    pub origin: DictionaryOrigin,
    pub stats: ReconcileStats,
    pub outcome: FileOutcome,
    pub reset_reason: Option<String>,
}

#[derive(Debug)]
pub struct SyncSummary {
    pub keys: ExtractedKeys,
    pub files: Vec<FileMatches>,
    pub template: Option<TemplateReport>,
    pub languages: Vec<LanguageReport>,
    pub dry_run: bool,
}

impl SyncSummary {
    /// Number of files that were (or, in a dry run, would be) written.
    pub fn changed_count(&self) -> usize {
        let template = self
            .template
            .iter()
            .filter(|t| t.outcome.is_change())
            .count();
        let languages = self
            .languages
            .iter()
            .filter(|l| l.outcome.is_change())
            .count();
        template + languages
    }
}

/// Run the pass with paths in `config` resolved against `base_dir`.
pub fn run(config: &Config, base_dir: &Path, options: &SyncOptions) -> Result<SyncSummary> {
    let source_root = base_dir.join(&config.source_root);
    let extraction = extract_tree(&source_root, config.extension(), &config.function)?;
    let keys = extraction.keys;

    let mut dictionaries = Vec::with_capacity(config.languages.len());
    for code in &config.languages {
        let path = base_dir.join(config.language_path(code));
        let mut dict = LanguageDictionary::open(&path, &keys, config.on_malformed)?;
        let stats = dict.reconcile(&keys);
        dictionaries.push((code, dict, stats));
    }

    let template = match config.template_path() {
        Some(path) => {
            let path = base_dir.join(path);
            let content = render_map(&keys.to_placeholder_map())?;
            let existing = read_existing(&path)?;
            let outcome = if options.dry_run {
                pending_write(existing.as_deref(), &content)
            } else {
                write_if_changed(&path, existing.as_deref(), &content)?
            };
            Some(TemplateReport { path, outcome })
        }
        None => None,
    };

    let mut languages = Vec::with_capacity(dictionaries.len());
    for (code, dict, stats) in dictionaries {
        let outcome = if options.dry_run {
            dict.pending_outcome()?
        } else {
            dict.save()?
        };
        languages.push(LanguageReport {
            code: code.clone(),
            path: dict.path().to_path_buf(),
            origin: dict.origin(),
            stats,
            outcome,
            reset_reason: dict.reset_reason().map(String::from),
        });
    }

    Ok(SyncSummary {
        keys,
        files: extraction.files,
        template,
        languages,
        dry_run: options.dry_run,
    })
}
