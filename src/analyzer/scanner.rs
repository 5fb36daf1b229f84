//! Definition File Scanner
//!
//! Enumerates the candidate definition files of one directory. Files
//! without the definition extension are silently skipped, never an error.
//! Enumeration is non-recursive, finite, and sorted by file name so that
//! repeated scans (and the schemas derived from them) are deterministic.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::constants::discovery::DEFINITION_EXTENSION;
use crate::types::Result;

pub struct DefinitionScanner {
    root: PathBuf,
}

impl DefinitionScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Enumerate definition files in name order.
    ///
    /// Fails only when the directory itself cannot be read; unreadable or
    /// non-matching entries inside it are skipped.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        // surface a missing or unreadable directory as an IO error up front
        std::fs::read_dir(&self.root)?;

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .follow_links(false)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let files = walker
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && has_definition_extension(path))
            .collect();

        Ok(files)
    }
}

fn has_definition_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == DEFINITION_EXTENSION)
        .unwrap_or(false)
}
