//! Per-language dictionary files: flat JSON objects mapping each key to its
//! translated text.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::{config::MalformedPolicy, extract::ExtractedKeys};

/// What happened to a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Created,
    Updated,
    Unchanged,
}

impl FileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileOutcome::Created => "created",
            FileOutcome::Updated => "updated",
            FileOutcome::Unchanged => "unchanged",
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FileOutcome::Unchanged)
    }
}

/// How the dictionary's starting content was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryOrigin {
    /// Parsed from an existing file.
    Loaded,
    /// No file yet; seeded from the extracted keys.
    Bootstrapped,
    /// The file was malformed and discarded under [`MalformedPolicy::Reset`].
    Reset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub added: usize,
    pub removed: usize,
}

/// A language dictionary loaded in memory.
///
/// Key order follows the file; new keys are appended.
#[derive(Debug)]
pub struct LanguageDictionary {
    file_path: PathBuf,
    data: Map<String, Value>,
    /// Bytes on disk when opened, used to skip no-op writes.
    original: Option<String>,
    origin: DictionaryOrigin,
    /// Parse error of a discarded malformed file.
    reset_reason: Option<String>,
}

impl LanguageDictionary {
    /// Open the dictionary at `path`.
    ///
    /// A missing file starts out equal to `extracted` with empty values. A
    /// file that is present but not a flat string map is an error, unless
    /// `on_malformed` is [`MalformedPolicy::Reset`].
    pub fn open(
        path: &Path,
        extracted: &ExtractedKeys,
        on_malformed: MalformedPolicy,
    ) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Self {
                    file_path: path.to_path_buf(),
                    data: extracted.to_placeholder_map(),
                    original: None,
                    origin: DictionaryOrigin::Bootstrapped,
                    reset_reason: None,
                });
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read file: {}", path.display()));
            }
        };

        match parse_flat_map(&content) {
            Ok(data) => Ok(Self {
                file_path: path.to_path_buf(),
                data,
                original: Some(content),
                origin: DictionaryOrigin::Loaded,
                reset_reason: None,
            }),
            Err(e) => match on_malformed {
                MalformedPolicy::Error => Err(e.context(format!(
                    "Refusing to overwrite malformed file: {}",
                    path.display()
                ))),
                MalformedPolicy::Reset => Ok(Self {
                    file_path: path.to_path_buf(),
                    data: extracted.to_placeholder_map(),
                    original: Some(content),
                    origin: DictionaryOrigin::Reset,
                    reset_reason: Some(format!("{:#}", e)),
                }),
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn origin(&self) -> DictionaryOrigin {
        self.origin
    }

    pub fn reset_reason(&self) -> Option<&str> {
        self.reset_reason.as_deref()
    }

    pub fn entries(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Bring the key set in line with `extracted`.
    ///
    /// Keys no longer referenced are removed, new keys are appended with an
    /// empty value, and values of retained keys are left as they are.
    pub fn reconcile(&mut self, extracted: &ExtractedKeys) -> ReconcileStats {
        let before = self.data.len();
        self.data.retain(|key, _| extracted.contains(key));
        let removed = before - self.data.len();

        let mut added = 0;
        for key in extracted.iter() {
            if !self.data.contains_key(key) {
                self.data
                    .insert(key.to_string(), Value::String(String::new()));
                added += 1;
            }
        }

        ReconcileStats { added, removed }
    }

    /// File content: 2-space pretty JSON with a trailing newline.
    pub fn render(&self) -> Result<String> {
        render_map(&self.data)
    }

    /// Outcome [`save`](Self::save) would have, without touching the disk.
    pub fn pending_outcome(&self) -> Result<FileOutcome> {
        Ok(pending_write(self.original.as_deref(), &self.render()?))
    }

    /// Write the dictionary back if its content changed.
    pub fn save(&self) -> Result<FileOutcome> {
        write_if_changed(&self.file_path, self.original.as_deref(), &self.render()?)
    }
}

/// Parse `content` as a JSON object whose values are all strings.
fn parse_flat_map(content: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(content).context("Failed to parse JSON")?;
    let map = match value {
        Value::Object(map) => map,
        _ => bail!("Root of JSON file must be an object"),
    };

    if let Some((key, _)) = map.iter().find(|(_, v)| !v.is_string()) {
        bail!("Value of key \"{}\" must be a string", key);
    }

    Ok(map)
}

pub fn render_map(map: &Map<String, Value>) -> Result<String> {
    let content = serde_json::to_string_pretty(map).context("Failed to serialize JSON")?;
    Ok(format!("{}\n", content))
}

/// Read the current content of `path`, `None` if it does not exist.
pub fn read_existing(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file: {}", path.display())),
    }
}

/// Outcome of writing `content` to a file whose current content is `original`.
pub fn pending_write(original: Option<&str>, content: &str) -> FileOutcome {
    match original {
        None => FileOutcome::Created,
        Some(original) if original == content => FileOutcome::Unchanged,
        Some(_) => FileOutcome::Updated,
    }
}

/// Write `content` to `path` unless it already holds exactly that content.
///
/// Parent directories are created as needed.
pub fn write_if_changed(
    path: &Path,
    original: Option<&str>,
    content: &str,
) -> Result<FileOutcome> {
    let outcome = pending_write(original, content);
    if !outcome.is_change() {
        return Ok(outcome);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(outcome)
}
