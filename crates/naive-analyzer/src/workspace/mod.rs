//! Workspace file identity and enumeration.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use tower_lsp::lsp_types::Url;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Stable identity for a file, normalized so that the same file reached
/// through different spellings of its path compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(String);

impl FileId {
    pub fn from_path(path: &Path) -> Self {
        Self(normalized_path(path).display().to_string())
    }

    pub fn from_url(url: &Url) -> Self {
        if let Ok(path) = url.to_file_path() {
            return Self::from_path(&path);
        }
        Self(url.as_str().to_owned())
    }

    pub fn to_url(&self) -> Option<Url> {
        Url::from_file_path(&self.0).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn normalized_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

static MATCH_ALL: Lazy<GlobSet> = Lazy::new(|| {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new("**/*").expect("static glob"));
    builder.build().expect("static glob set")
});

/// Compile the configured file-type filter into a glob set.
///
/// An empty or unparseable filter falls back to matching every file, with
/// a warning for the unparseable case so a typo does not silently make
/// the whole workspace invisible.
pub fn compile_file_filter(file_types: &str) -> GlobSet {
    let pattern = file_types.trim();
    if pattern.is_empty() {
        return MATCH_ALL.clone();
    }

    let mut builder = GlobSetBuilder::new();
    match Glob::new(pattern) {
        Ok(glob) => {
            builder.add(glob);
        },
        Err(error) => {
            warn!("invalid fileTypes glob {pattern:?}: {error}; matching all files");
            return MATCH_ALL.clone();
        },
    }
    builder.build().unwrap_or_else(|_| MATCH_ALL.clone())
}

/// Whether a saved file falls inside the configured file-type filter.
pub fn file_matches_filter(
    filter: &GlobSet,
    roots: &[PathBuf],
    path: &Path,
) -> bool {
    let normalized = normalized_path(path);
    for root in roots {
        let root = normalized_path(root);
        if let Ok(relative) = normalized.strip_prefix(&root) {
            return filter.is_match(relative);
        }
    }
    filter.is_match(&normalized)
}

/// Enumerate all workspace files matching the file-type filter.
///
/// Hidden directories and configured exclude prefixes are not descended
/// into; files above the size cap are skipped. The result is sorted so
/// enumeration order is stable across cycles.
pub fn enumerate_files(
    roots: &[PathBuf],
    filter: &GlobSet,
    exclude_paths: &[String],
    max_file_size_bytes: u64,
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for root in roots {
        let root = normalized_path(root);
        let excluded: Vec<PathBuf> = exclude_paths.iter().map(|p| root.join(p)).collect();

        for entry in WalkDir::new(&root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| should_descend(entry, &root, &excluded))
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&root) else {
                continue;
            };
            if !filter.is_match(relative) {
                continue;
            }

            if let Ok(metadata) = entry.metadata()
                && metadata.len() > max_file_size_bytes
            {
                debug!("skipping large workspace file ({} bytes): {}", metadata.len(), path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    files
}

fn should_descend(
    entry: &DirEntry,
    root: &Path,
    excluded: &[PathBuf],
) -> bool {
    if excluded.iter().any(|prefix| entry.path().starts_with(prefix)) {
        return false;
    }

    if !entry.file_type().is_dir() || entry.path() == root {
        return true;
    }

    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    !name.starts_with('.')
}

#[cfg(test)]
#[path = "../../tests/src/workspace/enumerate_tests.rs"]
mod tests;
