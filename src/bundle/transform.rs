//! Inline every local script and stylesheet of a document into one block per kind.

use std::path::Path;

use crate::bundle::collect::{CollectedReferences, collect_references};
use crate::bundle::styles::rewrite_stylesheet_urls;
use crate::error::BuildResult;
use crate::markup::Markup;
use crate::models::{AssetKind, Document, DocumentReport, Reference};
use crate::source::AssetSource;

/// Default `type` attribute of the inline script block.
pub const DEFAULT_SCRIPT_TYPE: &str = "text/javascript";
/// Default `type` attribute of the inline style block.
pub const DEFAULT_STYLE_TYPE: &str = "text/css";

/// Result of transforming one document.
#[derive(Debug)]
pub struct TransformOutcome {
  /// Serialized markup with bundles inlined.
  pub content: String,
  /// What was inlined and what was left in place.
  pub report: DocumentReport,
}

/// Rewrites documents so their local assets are inlined.
#[derive(Debug, Clone)]
pub struct Transformer {
  script_type: String,
  style_type: String,
}

impl Default for Transformer {
  fn default() -> Self {
    Self::new(DEFAULT_SCRIPT_TYPE, DEFAULT_STYLE_TYPE)
  }
}

impl Transformer {
  /// Create a transformer emitting the given `type` attributes on inserted blocks.
  pub fn new(script_type: impl Into<String>, style_type: impl Into<String>) -> Self {
    Self {
      script_type: script_type.into(),
      style_type: style_type.into(),
    }
  }

  /// Transform `document`, resolving root-relative references against `tree_root`.
  ///
  /// Scripts are bundled first, then stylesheets, so a document gaining both ends with
  /// the inline script followed by the inline style as the last children of `<head>`.
  pub fn transform<S: AssetSource + ?Sized>(
    &self,
    document: &Document,
    tree_root: &Path,
    source: &S,
  ) -> BuildResult<TransformOutcome> {
    let mut markup = Markup::parse(&document.markup);
    let mut skipped = Vec::new();

    let scripts = collect_references(&markup, AssetKind::Script, document, tree_root, source)?;
    let script_count = self.inline(&mut markup, document, scripts, &mut skipped);

    let mut styles =
      collect_references(&markup, AssetKind::Stylesheet, document, tree_root, source)?;
    for part in &mut styles.bundle.parts {
      let stylesheet_dir = part.path.parent().unwrap_or_else(|| Path::new(""));
      part.contents = rewrite_stylesheet_urls(&part.contents, stylesheet_dir, document.directory());
    }
    let style_count = self.inline(&mut markup, document, styles, &mut skipped);

    Ok(TransformOutcome {
      content: markup.serialize(),
      report: DocumentReport {
        path: document.relative_path.clone(),
        scripts: script_count,
        stylesheets: style_count,
        skipped,
      },
    })
  }

  fn inline(
    &self,
    markup: &mut Markup,
    document: &Document,
    collected: CollectedReferences,
    skipped: &mut Vec<Reference>,
  ) -> usize {
    let CollectedReferences {
      handles,
      bundle,
      skipped: left_in_place,
    } = collected;
    skipped.extend(left_in_place);

    if bundle.is_empty() {
      return 0;
    }

    for handle in &handles {
      markup.remove(*handle);
    }

    let type_attr = match bundle.kind {
      AssetKind::Script => &self.script_type,
      AssetKind::Stylesheet => &self.style_type,
    };
    if markup
      .append_to_head(bundle.kind.inline_tag(), type_attr, &bundle.concatenate())
      .is_none()
    {
      tracing::warn!(
        document = %document.relative_path,
        bundle = %document.bundle_label(bundle.kind),
        "Document has no head element; bundle dropped"
      );
    } else {
      tracing::debug!(
        document = %document.relative_path,
        bundle = %document.bundle_label(bundle.kind),
        files = bundle.parts.len(),
        "Inlined bundle"
      );
    }

    bundle.parts.len()
  }
}
