//! Key extraction: find `function("literal")` calls in source files and
//! collect the decoded literals into a sorted, deduplicated key set.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::{Map, Value};

mod literal;
mod scanner;

pub use literal::{UnescapeError, unescape};
pub use scanner::scan_files;

/// Textual matcher for translation calls with a single string literal
/// argument.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    regex: Regex,
}

impl KeyPattern {
    /// Build the matcher for calls to `function`, e.g. `lang.Translate`.
    ///
    /// The literal body is `([^"\\]|\\.)*`, so escaped quotes do not end the
    /// match early.
    pub fn new(function: &str) -> Result<Self> {
        let boundary = match function.chars().next() {
            Some(c) if c.is_alphanumeric() || c == '_' => r"\b",
            _ => "",
        };
        let pattern = format!(
            r#"{}{}\(\s*"((?:[^"\\]|\\.)*?)"\s*\)"#,
            boundary,
            regex::escape(function)
        );
        let regex = Regex::new(&pattern)
            .with_context(|| format!("Invalid call pattern for function \"{}\"", function))?;
        Ok(Self { regex })
    }

    /// Raw (still escaped) literal bodies in match order.
    pub fn raw_matches<'a>(&self, content: &'a str) -> impl Iterator<Item = &'a str> {
        self.regex
            .captures_iter(content)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
    }
}

/// The set of keys referenced by the source, ordered by code point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedKeys(BTreeSet<String>);

impl ExtractedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String) -> bool {
        self.0.insert(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Every key mapped to an empty placeholder, in sorted order.
    pub fn to_placeholder_map(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|key| (key.clone(), Value::String(String::new())))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExtractedKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Number of matches found in one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatches {
    pub path: PathBuf,
    pub count: usize,
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub keys: ExtractedKeys,
    pub files: Vec<FileMatches>,
}

/// Collect the keys from a single file's content into `keys`.
///
/// Returns the number of matches, duplicates included.
pub fn extract_from_source(
    content: &str,
    pattern: &KeyPattern,
    keys: &mut ExtractedKeys,
) -> Result<usize> {
    let mut count = 0;
    for raw in pattern.raw_matches(content) {
        let key = unescape(raw).with_context(|| format!("Invalid string literal \"{}\"", raw))?;
        keys.insert(key);
        count += 1;
    }
    Ok(count)
}

/// Read every file and collect its keys.
///
/// Unreadable or non-UTF-8 files abort the extraction.
pub fn extract_keys(files: &[PathBuf], pattern: &KeyPattern) -> Result<Extraction> {
    let mut extraction = Extraction::default();

    for path in files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read source file: {}", path.display()))?;
        let count = extract_from_source(&content, pattern, &mut extraction.keys)
            .with_context(|| format!("Failed to extract keys from: {}", path.display()))?;
        extraction.files.push(FileMatches {
            path: path.clone(),
            count,
        });
    }

    Ok(extraction)
}

/// Scan `root` for files with `extension` and extract their keys.
pub fn extract_tree(root: &Path, extension: &str, function: &str) -> Result<Extraction> {
    let pattern = KeyPattern::new(function)?;
    let files = scan_files(root, extension)?;
    extract_keys(&files, &pattern)
}
