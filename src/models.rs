//! Data structures produced while bundling a tree.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// The two kinds of asset a document can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
  /// `<script src>` references.
  Script,
  /// `<link rel="stylesheet" href>` references.
  Stylesheet,
}

impl AssetKind {
  /// CSS selector matching the reference tags of this kind.
  pub fn selector(self) -> &'static str {
    match self {
      Self::Script => "script[src]",
      Self::Stylesheet => r#"link[rel="stylesheet"][href]"#,
    }
  }

  /// Attribute carrying the reference.
  pub fn attribute(self) -> &'static str {
    match self {
      Self::Script => "src",
      Self::Stylesheet => "href",
    }
  }

  /// Tag name of the inline block replacing the references.
  pub fn inline_tag(self) -> &'static str {
    match self {
      Self::Script => "script",
      Self::Stylesheet => "style",
    }
  }

  /// File extension of the bundle named after the document.
  pub fn extension(self) -> &'static str {
    match self {
      Self::Script => "js",
      Self::Stylesheet => "css",
    }
  }
}

/// How a reference was classified during collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
  /// Absolute, protocol-relative or data URL.
  External,
  /// Leading `/`, resolved against the tree root.
  RootRelative,
  /// Resolved against the directory of the document.
  DocRelative,
  /// Local reference whose resolved path is not an existing file.
  Missing,
}

/// A script source or stylesheet href extracted from a document.
#[derive(Debug, Clone, Serialize)]
pub struct Reference {
  /// Which tag the reference came from.
  pub kind: AssetKind,
  /// Attribute value as written in the markup.
  pub literal: String,
  /// Resolved file path, absent for external references.
  pub resolved: Option<PathBuf>,
  /// Classification assigned during collection.
  pub classification: Classification,
}

impl Reference {
  /// A qualifying reference is local and resolves to an existing file.
  pub fn qualifies(&self) -> bool {
    matches!(
      self.classification,
      Classification::RootRelative | Classification::DocRelative
    )
  }
}

/// One HTML document of the tree.
#[derive(Debug, Clone)]
pub struct Document {
  /// Path relative to the tree root, with `/` separators.
  pub relative_path: String,
  /// Location of the document on disk.
  pub location: PathBuf,
  /// Raw markup.
  pub markup: String,
}

impl Document {
  /// Create a document located at `tree_root/relative_path`.
  pub fn new(tree_root: &Path, relative_path: &str, markup: String) -> Self {
    Self {
      relative_path: relative_path.to_string(),
      location: tree_root.join(relative_path),
      markup,
    }
  }

  /// Directory relative references are resolved against.
  pub fn directory(&self) -> &Path {
    self.location.parent().unwrap_or_else(|| Path::new(""))
  }

  /// File name without its `.html` suffix.
  pub fn basename(&self) -> &str {
    let name = self
      .location
      .file_name()
      .and_then(|name| name.to_str())
      .unwrap_or_default();
    name.strip_suffix(".html").unwrap_or(name)
  }

  /// Conceptual name of the bundle of `kind`, e.g. `index.js`.
  ///
  /// Bundles are inlined rather than written out; the label identifies them in logs and
  /// reports.
  pub fn bundle_label(&self, kind: AssetKind) -> String {
    format!("{}.{}", self.basename(), kind.extension())
  }
}

/// File contributing to a bundle.
#[derive(Debug, Clone)]
pub struct BundlePart {
  /// Resolved path of the source file.
  pub path: PathBuf,
  /// File contents, already rewritten where required.
  pub contents: String,
}

/// Ordered contents of all qualifying references of one kind within a document.
#[derive(Debug, Clone)]
pub struct Bundle {
  /// Kind of asset in the bundle.
  pub kind: AssetKind,
  /// Parts in original tag order.
  pub parts: Vec<BundlePart>,
}

impl Bundle {
  /// Whether no reference qualified.
  pub fn is_empty(&self) -> bool {
    self.parts.is_empty()
  }

  /// Parts joined with a single newline.
  pub fn concatenate(&self) -> String {
    self
      .parts
      .iter()
      .map(|part| part.contents.as_str())
      .collect::<Vec<_>>()
      .join("\n")
  }
}

/// Outcome of transforming one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
  /// Document path relative to the tree root.
  pub path: String,
  /// Number of script references inlined.
  pub scripts: usize,
  /// Number of stylesheet references inlined.
  pub stylesheets: usize,
  /// References left in place.
  pub skipped: Vec<Reference>,
}

/// Serializable summary of a build written by the command line tool.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildSummary {
  /// Directories recreated in the output.
  pub directories: usize,
  /// Files copied or linked unchanged.
  pub copied: usize,
  /// Script and stylesheet sources left out of the output.
  pub discarded: usize,
  /// Per-document results, in tree order.
  pub documents: Vec<DocumentReport>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn derives_basename_and_bundle_labels() {
    let document = Document::new(Path::new("/site"), "docs/guide.html", String::new());

    assert_eq!(document.basename(), "guide");
    assert_eq!(document.directory(), Path::new("/site/docs"));
    assert_eq!(document.bundle_label(AssetKind::Script), "guide.js");
    assert_eq!(document.bundle_label(AssetKind::Stylesheet), "guide.css");
  }

  #[test]
  fn concatenates_parts_with_newlines() {
    let bundle = Bundle {
      kind: AssetKind::Script,
      parts: vec![
        BundlePart {
          path: PathBuf::from("a.js"),
          contents: "a();".into(),
        },
        BundlePart {
          path: PathBuf::from("b.js"),
          contents: "b();".into(),
        },
      ],
    };

    assert!(!bundle.is_empty());
    assert_eq!(bundle.concatenate(), "a();\nb();");
  }

  #[test]
  fn only_existing_local_references_qualify() {
    let reference = |classification| Reference {
      kind: AssetKind::Script,
      literal: "app.js".into(),
      resolved: None,
      classification,
    };

    assert!(reference(Classification::DocRelative).qualifies());
    assert!(reference(Classification::RootRelative).qualifies());
    assert!(!reference(Classification::Missing).qualifies());
    assert!(!reference(Classification::External).qualifies());
  }
}
