//! Stylesheet helpers keeping `url()` references valid once content moves into a document.

use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::asset_paths::{keeps_stylesheet_url, relative_to};

fn stylesheet_url_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"url\(\s*['"]?(.+?)['"]?\s*\)"#).expect("invalid stylesheet url regex")
  })
}

/// Re-base every relative `url()` in `css` from `stylesheet_dir` onto `document_dir`.
///
/// Root-relative, absolute, data and fragment references are left as written. Rewritten
/// references are emitted double-quoted, e.g. `url("css/asset.png")`.
pub fn rewrite_stylesheet_urls(css: &str, stylesheet_dir: &Path, document_dir: &Path) -> String {
  stylesheet_url_pattern()
    .replace_all(css, |caps: &Captures| {
      let original = caps.get(0).map_or("", |m| m.as_str());
      let Some(reference) = caps.get(1).map(|m| m.as_str()) else {
        return original.to_string();
      };

      if keeps_stylesheet_url(reference) {
        return original.to_string();
      }

      let rebased = relative_to(document_dir, &stylesheet_dir.join(reference));
      match serde_json::to_string(&rebased) {
        Ok(quoted) => format!("url({quoted})"),
        Err(_) => original.to_string(),
      }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rebases_relative_urls_onto_the_document() {
    let css = "body { background: url(asset.png); }";
    let rewritten = rewrite_stylesheet_urls(css, Path::new("/site/css"), Path::new("/site"));
    assert_eq!(rewritten, r#"body { background: url("css/asset.png"); }"#);
  }

  #[test]
  fn handles_quoted_and_padded_urls() {
    let css = r#"a { b: url( '../img/a.png' ); c: url("fonts/x.woff"); }"#;
    let rewritten =
      rewrite_stylesheet_urls(css, Path::new("/site/css"), Path::new("/site/docs"));
    assert_eq!(
      rewritten,
      r#"a { b: url("../img/a.png"); c: url("../css/fonts/x.woff"); }"#
    );
  }

  #[test]
  fn leaves_root_relative_and_absolute_urls() {
    let css = "a { b: url(/img/a.png); c: url(https://example.com/b.png); d: url('http://x/y.png'); }";
    let rewritten = rewrite_stylesheet_urls(css, Path::new("/site/css"), Path::new("/site"));
    assert_eq!(rewritten, css);
  }

  #[test]
  fn leaves_data_uris_and_fragments() {
    let css = "a { b: url(data:image/png;base64,AAAA); filter: url(#blur); }";
    let rewritten = rewrite_stylesheet_urls(css, Path::new("/site/css"), Path::new("/site"));
    assert_eq!(rewritten, css);
  }

  #[test]
  fn rewritten_reference_points_at_the_same_file() {
    let stylesheet_dir = Path::new("/site/themes/dark");
    let document_dir = Path::new("/site/blog/2024");
    let rewritten =
      rewrite_stylesheet_urls("x{y:url(../img/bg.png)}", stylesheet_dir, document_dir);

    assert_eq!(rewritten, r#"x{y:url("../../themes/img/bg.png")}"#);
    let resolved = crate::asset_paths::normalize_lexically(
      &document_dir.join("../../themes/img/bg.png"),
    );
    assert_eq!(resolved, Path::new("/site/themes/img/bg.png"));
  }
}
