//! Error type shared by the bundling pipeline.

use std::path::{Path, PathBuf};

/// Result alias used across the crate.
pub type BuildResult<T> = Result<T, BundleError>;

/// Fatal failures that abort a build.
///
/// Resolution misses (external or missing references) are never reported through this
/// type; they are skipped where they are found.
#[derive(Debug)]
pub enum BundleError {
  /// Reading, writing or creating a path failed.
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The subject list file could not be parsed.
  Selection {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// The configuration file could not be parsed.
  Config {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// A preserve pattern is not a valid regular expression.
  Pattern {
    /// The offending pattern.
    pattern: String,
    /// Source regex error.
    source: regex::Error,
  },
}

impl BundleError {
  /// Wrap an I/O error together with the path it concerns.
  pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.as_ref().to_path_buf(),
      source,
    }
  }

  /// Path the error is attached to, when there is one.
  pub fn path(&self) -> Option<&Path> {
    match self {
      Self::Io { path, .. } | Self::Selection { path, .. } | Self::Config { path, .. } => {
        Some(path)
      }
      Self::Pattern { .. } => None,
    }
  }
}

impl std::fmt::Display for BundleError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Io { path, source } => write!(f, "I/O failure at {}: {}", path.display(), source),
      Self::Selection { path, source } => {
        write!(f, "failed to parse subject list {}: {}", path.display(), source)
      }
      Self::Config { path, source } => {
        write!(f, "failed to parse configuration {}: {}", path.display(), source)
      }
      Self::Pattern { pattern, source } => {
        write!(f, "invalid preserve pattern {pattern:?}: {source}")
      }
    }
  }
}

impl std::error::Error for BundleError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io { source, .. } => Some(source),
      Self::Selection { source, .. } | Self::Config { source, .. } => Some(source),
      Self::Pattern { source, .. } => Some(source),
    }
  }
}
