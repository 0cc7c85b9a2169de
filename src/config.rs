//! Build configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::bundle::{DEFAULT_SCRIPT_TYPE, DEFAULT_STYLE_TYPE, Transformer};
use crate::error::{BuildResult, BundleError};
use crate::selection::SubjectSet;

/// File name searched for by [`BundleConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "inline-bundle.config.json";

/// How files that are not transformed reach the output tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkMode {
  /// Copy file contents.
  #[default]
  Copy,
  /// Hard link to the input file, falling back to a copy across devices.
  HardLink,
}

/// Discoverable configuration describing which documents to bundle and how.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
  /// Document paths, relative to the input root, eligible for bundling.
  pub subjects: Vec<String>,
  /// Optional JSON file with `include`/`exclude` subject lists.
  pub subjects_file: Option<PathBuf>,
  /// How pass-through files are written.
  pub link_mode: LinkMode,
  /// Leave `.js` and `.css` files out of the output.
  pub discard_sources: bool,
  /// Patterns of script and stylesheet paths kept even when sources are discarded.
  pub preserve: Vec<String>,
  /// `type` attribute of inserted script blocks.
  pub script_type: String,
  /// `type` attribute of inserted style blocks.
  pub style_type: String,
}

impl Default for BundleConfig {
  fn default() -> Self {
    Self {
      subjects: Vec::new(),
      subjects_file: None,
      link_mode: LinkMode::Copy,
      discard_sources: false,
      preserve: Vec::new(),
      script_type: DEFAULT_SCRIPT_TYPE.into(),
      style_type: DEFAULT_STYLE_TYPE.into(),
    }
  }
}

impl BundleConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fallback to default
  /// values so callers can continue operating with sensible assumptions.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    match Self::from_path(&candidate) {
      Ok(config) => config,
      Err(err) => {
        if candidate.exists() {
          tracing::warn!(error = %err, "Ignoring unreadable configuration");
        }
        Self::default()
      }
    }
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> BuildResult<Self> {
    let content = fs::read_to_string(path).map_err(|err| BundleError::io(path, err))?;
    serde_json::from_str(&content).map_err(|err| BundleError::Config {
      path: path.to_path_buf(),
      source: err,
    })
  }

  /// Subject set combining the inline list and the optional subject file.
  ///
  /// A relative `subjects_file` is resolved against `base_dir`.
  pub fn subject_set(&self, base_dir: &Path) -> BuildResult<SubjectSet> {
    let mut subjects = match &self.subjects_file {
      Some(file) => SubjectSet::load_from_path(base_dir.join(file))?,
      None => SubjectSet::default(),
    };
    subjects.extend(self.subjects.iter().cloned());
    Ok(subjects)
  }

  /// Compile the preserve patterns.
  pub fn preserve_patterns(&self) -> BuildResult<Vec<Regex>> {
    self
      .preserve
      .iter()
      .map(|pattern| {
        Regex::new(pattern).map_err(|err| BundleError::Pattern {
          pattern: pattern.clone(),
          source: err,
        })
      })
      .collect()
  }

  /// Transformer emitting the configured block types.
  pub fn transformer(&self) -> Transformer {
    Transformer::new(self.script_type.clone(), self.style_type.clone())
  }
}
