//! Fetching CSV resources by relative path.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A place CSV resources are fetched from.
///
/// Fetches are one-shot: there is no retry or timeout, and a failure is
/// returned to the caller to decide whether the dependent view is skipped.
pub trait DataSource: Send + Sync {
    /// Fetch the text content of a resource by relative path.
    fn fetch(&self, relative: &Path) -> Result<String>;
}

/// Resources resolved against a root directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Create a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataSource for DirSource {
    fn fetch(&self, relative: &Path) -> Result<String> {
        let path = self.root.join(relative);
        std::fs::read_to_string(&path).map_err(|e| Error::Load {
            path,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_source_reads_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/x.csv"), "a,b\n1,2\n").unwrap();

        let source = DirSource::new(dir.path());
        let text = source.fetch(Path::new("data/x.csv")).unwrap();
        assert_eq!(text, "a,b\n1,2\n");
    }

    #[test]
    fn test_dir_source_missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path());

        let err = source.fetch(Path::new("missing.csv")).unwrap_err();
        match err {
            Error::Load { path, .. } => assert!(path.ends_with("missing.csv")),
            other => panic!("expected load error, got {other:?}"),
        }
    }
}
