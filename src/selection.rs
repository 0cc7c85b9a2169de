//! Helpers deciding which documents of the tree are bundled.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::BundleError;

/// Trait describing which documents are eligible for transformation.
pub trait DocumentInclusion {
  /// Returns `true` when the document at `relative_path` should be transformed.
  fn is_included(&self, relative_path: &str) -> bool;
}

/// Subject list file layout.
#[derive(Debug, Default, Deserialize)]
struct SubjectFile {
  #[serde(default)]
  include: Vec<String>,
  #[serde(default)]
  exclude: Vec<String>,
}

/// Set of document paths, relative to the tree root, eligible for bundling.
///
/// An entry naming a directory covers every document below it. An empty set includes
/// nothing, so documents are only transformed when explicitly listed.
#[derive(Debug, Clone, Default)]
pub struct SubjectSet {
  include: BTreeSet<String>,
  exclude: BTreeSet<String>,
}

impl SubjectSet {
  /// Build a set from document paths.
  pub fn from_paths<I, S>(paths: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      include: normalise_list(paths.into_iter().map(Into::into)),
      exclude: BTreeSet::new(),
    }
  }

  /// Load a subject list file if present.
  ///
  /// A missing file yields an empty set.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, BundleError> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        tracing::warn!(path = %path.display(), "Subject list not found; no documents selected");
        return Ok(Self::default());
      }
      Err(err) => return Err(BundleError::io(path, err)),
    };

    let file: SubjectFile =
      serde_json::from_str(&contents).map_err(|err| BundleError::Selection {
        path: path.to_path_buf(),
        source: err,
      })?;
    Ok(Self::from(file))
  }

  /// Add more documents to the set.
  pub fn extend<I, S>(&mut self, paths: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self
      .include
      .extend(normalise_list(paths.into_iter().map(Into::into)));
  }

  /// Determine whether a document should be transformed.
  pub fn is_included(&self, relative_path: &str) -> bool {
    let candidate = normalise_path(relative_path);
    if self
      .exclude
      .iter()
      .any(|value| scope_matches(value, &candidate))
    {
      return false;
    }

    self
      .include
      .iter()
      .any(|value| scope_matches(value, &candidate))
  }

  /// Returns true when no document is selected.
  pub fn is_empty(&self) -> bool {
    self.include.is_empty()
  }
}

impl DocumentInclusion for SubjectSet {
  fn is_included(&self, relative_path: &str) -> bool {
    SubjectSet::is_included(self, relative_path)
  }
}

impl From<SubjectFile> for SubjectSet {
  fn from(file: SubjectFile) -> Self {
    Self {
      include: normalise_list(file.include),
      exclude: normalise_list(file.exclude),
    }
  }
}

/// Convert a list of raw paths into a sorted, de-duplicated set.
///
/// Values are trimmed and empty entries are discarded to simplify downstream filtering logic.
fn normalise_list(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  values
    .into_iter()
    .map(|value| normalise_path(&value))
    .filter(|value| !value.is_empty())
    .collect()
}

fn normalise_path(value: &str) -> String {
  let mut value = value.trim().replace('\\', "/");
  while let Some(stripped) = value.strip_prefix("./") {
    value = stripped.to_string();
  }
  value.trim_matches('/').to_string()
}

fn scope_matches(rule: &str, candidate: &str) -> bool {
  if candidate == rule {
    return true;
  }

  candidate
    .strip_prefix(rule)
    .is_some_and(|suffix| suffix.starts_with('/'))
}
