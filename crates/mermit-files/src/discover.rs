//! Markdown source discovery.
//!
//! Walks a directory tree collecting `.md`/`.markdown` files. Hidden
//! entries are skipped, exclude patterns are matched against paths
//! relative to the search root, and results come back sorted so batch
//! extraction is deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::FilesError;

/// Extensions treated as markdown, lowercase.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MARKDOWN_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Find markdown files under `directory`.
///
/// `exclude` patterns are glob expressions (e.g. `"**/node_modules/**"`)
/// matched against the path relative to `directory`.
pub fn find_markdown_files(
    directory: &Path,
    recursive: bool,
    exclude: &[String],
) -> Result<Vec<PathBuf>, FilesError> {
    if !directory.is_dir() {
        return Err(FilesError::SourceNotFound {
            path: directory.to_path_buf(),
        });
    }

    let patterns = exclude
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| FilesError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut found = Vec::new();
    walk(directory, directory, recursive, &patterns, &mut found);
    found.sort();
    found.dedup();
    Ok(found)
}

fn walk(root: &Path, dir: &Path, recursive: bool, exclude: &[Pattern], found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "unreadable directory skipped");
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if exclude.iter().any(|p| p.matches_path(relative)) {
            continue;
        }

        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        if is_dir {
            if recursive {
                walk(root, &path, recursive, exclude, found);
            }
        } else if is_markdown(&path) {
            found.push(path);
        }
    }
}

/// Resolve a file-or-directory path to a list of markdown files.
///
/// A markdown file yields itself; a directory is searched; anything else
/// is an error.
pub fn markdown_files_from_path(
    path: &Path,
    recursive: bool,
    exclude: &[String],
) -> Result<Vec<PathBuf>, FilesError> {
    if !path.exists() {
        return Err(FilesError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    if path.is_file() {
        if is_markdown(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        return Err(FilesError::NotMarkdown {
            path: path.to_path_buf(),
        });
    }
    find_markdown_files(path, recursive, exclude)
}
