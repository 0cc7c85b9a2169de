//! Reference discovery: find the tags of one kind and decide which of them qualify.

use std::path::Path;

use scraper::Selector;

use crate::asset_paths::{Resolution, resolve_reference};
use crate::error::BuildResult;
use crate::markup::{ElementHandle, Markup};
use crate::models::{AssetKind, Bundle, BundlePart, Classification, Document, Reference};
use crate::source::AssetSource;

/// Qualifying tags of one kind together with their file contents.
#[derive(Debug)]
pub struct CollectedReferences {
  /// Tags to remove once the bundle is inserted.
  pub handles: Vec<ElementHandle>,
  /// File contents in tag order.
  pub bundle: Bundle,
  /// References left untouched in the document.
  pub skipped: Vec<Reference>,
}

/// Classify a reference, consulting `source` only for local references.
pub fn classify_reference<S: AssetSource + ?Sized>(
  kind: AssetKind,
  literal: &str,
  document_dir: &Path,
  tree_root: &Path,
  source: &S,
) -> Reference {
  let resolution = resolve_reference(literal, document_dir, tree_root);
  let classification = match &resolution {
    Resolution::External => Classification::External,
    Resolution::RootRelative(path) | Resolution::DocRelative(path) if !source.exists(path) => {
      Classification::Missing
    }
    Resolution::RootRelative(_) => Classification::RootRelative,
    Resolution::DocRelative(_) => Classification::DocRelative,
  };

  Reference {
    kind,
    literal: literal.to_string(),
    resolved: resolution.path().map(Path::to_path_buf),
    classification,
  }
}

/// Walk elements matching the selector of `kind`, resolve the reference in each and read
/// the files of those that qualify.
///
/// Reading a file that passed the existence check is the only fallible step.
pub fn collect_references<S: AssetSource + ?Sized>(
  markup: &Markup,
  kind: AssetKind,
  document: &Document,
  tree_root: &Path,
  source: &S,
) -> BuildResult<CollectedReferences> {
  let selector = selector_for(kind);
  let mut handles = Vec::new();
  let mut parts = Vec::new();
  let mut skipped = Vec::new();

  for handle in markup.select(selector) {
    let Some(literal) = markup.attr(handle, kind.attribute()) else {
      continue;
    };
    if literal.is_empty() {
      continue;
    }

    let reference = classify_reference(kind, literal, document.directory(), tree_root, source);
    let resolved = match (&reference.resolved, reference.qualifies()) {
      (Some(path), true) => path.clone(),
      _ => {
        tracing::debug!(
          document = %document.relative_path,
          reference = %reference.literal,
          classification = ?reference.classification,
          "Leaving reference in place"
        );
        skipped.push(reference);
        continue;
      }
    };

    let contents = source.read_to_string(&resolved)?;
    handles.push(handle);
    parts.push(BundlePart {
      path: resolved,
      contents,
    });
  }

  Ok(CollectedReferences {
    handles,
    bundle: Bundle { kind, parts },
    skipped,
  })
}

fn selector_for(kind: AssetKind) -> &'static Selector {
  use std::sync::LazyLock;

  static SCRIPT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(AssetKind::Script.selector()).expect("invalid script selector")
  });
  static STYLESHEET: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(AssetKind::Stylesheet.selector()).expect("invalid stylesheet selector")
  });

  match kind {
    AssetKind::Script => &SCRIPT,
    AssetKind::Stylesheet => &STYLESHEET,
  }
}
