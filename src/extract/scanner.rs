use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Recursively collect every regular file under `root` whose extension equals
/// `extension` (given without the leading dot).
///
/// Any traversal error aborts the scan: a directory we cannot read may hold
/// keys, and a partial key set would delete live translations.
pub fn scan_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry =
            entry.with_context(|| format!("Cannot access path under {}", root.display()))?;
        let path = entry.path();

        if entry.file_type().is_file() && is_scannable_file(path, extension) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn is_scannable_file(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}
