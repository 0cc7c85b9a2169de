//! File access capability used by the transformer to check and read referenced assets.

use std::fs;
use std::path::Path;

use crate::error::{BuildResult, BundleError};

/// Read-only access to the files a document may reference.
///
/// Resolution itself is pure; the existence check and the read are the only points where
/// the transformer touches storage, which keeps it testable against an in-memory tree.
pub trait AssetSource {
  /// Returns `true` when `path` names a readable regular file.
  fn exists(&self, path: &Path) -> bool;

  /// Read the file at `path` as UTF-8 text.
  fn read_to_string(&self, path: &Path) -> BuildResult<String>;
}

/// [`AssetSource`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl AssetSource for LocalFiles {
  fn exists(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn read_to_string(&self, path: &Path) -> BuildResult<String> {
    fs::read_to_string(path).map_err(|err| BundleError::io(path, err))
  }
}

#[cfg(test)]
pub(crate) mod memory {
  use std::collections::BTreeMap;
  use std::path::{Path, PathBuf};

  use super::AssetSource;
  use crate::error::{BuildResult, BundleError};

  /// In-memory tree used by transformer tests.
  #[derive(Debug, Default)]
  pub struct MemoryFiles {
    files: BTreeMap<PathBuf, String>,
  }

  impl MemoryFiles {
    pub fn with(mut self, path: &str, contents: &str) -> Self {
      self.files.insert(PathBuf::from(path), contents.to_string());
      self
    }
  }

  impl AssetSource for MemoryFiles {
    fn exists(&self, path: &Path) -> bool {
      self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> BuildResult<String> {
      self.files.get(path).cloned().ok_or_else(|| {
        BundleError::io(
          path,
          std::io::Error::new(std::io::ErrorKind::NotFound, "not in memory tree"),
        )
      })
    }
  }
}
