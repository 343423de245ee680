//! Ordered record of the absolute paths visited while archiving.
//! Owned by a single run and handed from the archiver to cleanup.

use std::path::{Path, PathBuf};

/// Absolute paths in traversal order (parents before children).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedPaths {
    paths: Vec<PathBuf>,
}

impl TrackedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl From<Vec<PathBuf>> for TrackedPaths {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl<'a> IntoIterator for &'a TrackedPaths {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
