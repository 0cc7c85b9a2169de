//! Tree mirror: reproduce the input tree under the output root, transforming selected
//! documents on the way.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use regex::Regex;
use same_file::is_same_file;
use walkdir::WalkDir;

use crate::asset_paths::{is_discardable_source, is_html_document, to_slash_path};
use crate::bundle::Transformer;
use crate::config::LinkMode;
use crate::error::{BuildResult, BundleError};
use crate::models::{BuildSummary, Document};
use crate::selection::DocumentInclusion;
use crate::source::{AssetSource, LocalFiles};

/// Options controlling how the tree is mirrored.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
  /// How pass-through files are written.
  pub link_mode: LinkMode,
  /// Leave `.js` and `.css` files out of the output.
  pub discard_sources: bool,
  /// Script and stylesheet paths kept even when sources are discarded.
  pub preserve: Vec<Regex>,
}

/// What the mirror does with one entry of the input tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryAction {
  CreateDirectory,
  Transform,
  Discard,
  PassThrough,
}

/// High-level helper for mirroring a tree and bundling its selected documents.
pub struct InlineBuilder<'a, S: DocumentInclusion + ?Sized> {
  input_root: PathBuf,
  output_root: PathBuf,
  subjects: &'a S,
  transformer: Transformer,
  options: BuildOptions,
}

impl<'a, S: DocumentInclusion + ?Sized> InlineBuilder<'a, S> {
  /// Create a builder mirroring `input_root` into `output_root`.
  pub fn new(input_root: impl AsRef<Path>, output_root: impl AsRef<Path>, subjects: &'a S) -> Self {
    Self {
      input_root: absolute_or_given(input_root.as_ref()),
      output_root: absolute_or_given(output_root.as_ref()),
      subjects,
      transformer: Transformer::default(),
      options: BuildOptions::default(),
    }
  }

  /// Use a specific transformer for selected documents.
  pub fn with_transformer(mut self, transformer: Transformer) -> Self {
    self.transformer = transformer;
    self
  }

  /// Override the mirroring options.
  pub fn with_options(mut self, options: BuildOptions) -> Self {
    self.options = options;
    self
  }

  /// Walk the input tree in path order and write every entry to the output.
  ///
  /// Entries are handled one at a time; the first I/O failure aborts the build.
  pub fn build(&self) -> BuildResult<BuildSummary> {
    self.build_with(&LocalFiles)
  }

  /// Same as [`InlineBuilder::build`], reading referenced assets through `source`.
  pub fn build_with<A: AssetSource + ?Sized>(&self, source: &A) -> BuildResult<BuildSummary> {
    let mut summary = BuildSummary::default();

    create_dir(&self.output_root)?;

    let output_root = self.output_root.clone();
    let walker = WalkDir::new(&self.input_root)
      .min_depth(1)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(move |entry| entry.path() != output_root.as_path());

    for entry in walker {
      let entry = entry.map_err(|err| {
        let path = err
          .path()
          .map_or_else(|| self.input_root.clone(), Path::to_path_buf);
        BundleError::io(path, err.into())
      })?;

      let input = entry.path();
      let relative = match input.strip_prefix(&self.input_root) {
        Ok(relative) => relative,
        Err(_) => continue,
      };
      let relative_str = to_slash_path(relative);
      let output = self.output_root.join(relative);

      match self.action_for(&relative_str, entry.file_type().is_dir()) {
        EntryAction::CreateDirectory => {
          create_dir(&output)?;
          summary.directories += 1;
        }
        EntryAction::Transform => {
          let markup = fs::read_to_string(input).map_err(|err| BundleError::io(input, err))?;
          let document = Document::new(&self.input_root, &relative_str, markup);
          let outcome = self
            .transformer
            .transform(&document, &self.input_root, source)?;

          ensure_parent(&output)?;
          fs::write(&output, &outcome.content).map_err(|err| BundleError::io(&output, err))?;
          tracing::info!(
            document = %relative_str,
            scripts = outcome.report.scripts,
            stylesheets = outcome.report.stylesheets,
            skipped = outcome.report.skipped.len(),
            "Bundled document"
          );
          summary.documents.push(outcome.report);
        }
        EntryAction::Discard => {
          tracing::debug!(path = %relative_str, "Discarding bundled source");
          summary.discarded += 1;
        }
        EntryAction::PassThrough => {
          ensure_parent(&output)?;
          install_passthrough(input, &output, self.options.link_mode)?;
          tracing::debug!(path = %relative_str, "Copied file");
          summary.copied += 1;
        }
      }
    }

    Ok(summary)
  }

  fn action_for(&self, relative: &str, is_dir: bool) -> EntryAction {
    if is_dir {
      EntryAction::CreateDirectory
    } else if is_html_document(relative) && self.subjects.is_included(relative) {
      EntryAction::Transform
    } else if self.options.discard_sources
      && is_discardable_source(relative)
      && !self
        .options
        .preserve
        .iter()
        .any(|pattern| pattern.is_match(relative))
    {
      EntryAction::Discard
    } else {
      EntryAction::PassThrough
    }
  }
}

fn absolute_or_given(path: &Path) -> PathBuf {
  std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn create_dir(path: &Path) -> BuildResult<()> {
  fs::create_dir_all(path).map_err(|err| BundleError::io(path, err))
}

fn ensure_parent(path: &Path) -> BuildResult<()> {
  match path.parent() {
    Some(parent) => create_dir(parent),
    None => Ok(()),
  }
}

fn install_passthrough(source: &Path, destination: &Path, mode: LinkMode) -> BuildResult<()> {
  let copy = || {
    fs::copy(source, destination)
      .map(|_| ())
      .map_err(|err| BundleError::io(destination, err))
  };

  match mode {
    LinkMode::Copy => copy(),
    LinkMode::HardLink => {
      if destination.exists() {
        if is_same_file(source, destination).map_err(|err| BundleError::io(destination, err))? {
          return Ok(());
        }
        fs::remove_file(destination).map_err(|err| BundleError::io(destination, err))?;
      }

      match fs::hard_link(source, destination) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(_) => copy(),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::selection::SubjectSet;
  use tempfile::tempdir;

  fn write(root: &Path, relative: &str, contents: &[u8]) -> std::io::Result<()> {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, contents)
  }

  fn site(root: &Path) -> std::io::Result<()> {
    write(
      root,
      "index.html",
      br#"<html><head><link rel="stylesheet" href="css/style.css"><script src="js/app.js"></script><script src="http://example.com/lib.js"></script><script src="missing.js"></script></head><body></body></html>"#,
    )?;
    write(
      root,
      "about.html",
      br#"<html><head><script src="js/app.js"></script></head></html>"#,
    )?;
    write(root, "js/app.js", b"app();")?;
    write(root, "css/style.css", b"body { background: url(asset.png); }")?;
    write(root, "css/asset.png", &[0x89, b'P', b'N', b'G', 0x00, 0xff])?;
    fs::create_dir_all(root.join("empty"))?;
    Ok(())
  }

  #[test]
  fn mirrors_tree_and_bundles_selected_documents() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let input = temp.path().join("input");
    let output = temp.path().join("output");
    site(&input)?;

    let subjects = SubjectSet::from_paths(["index.html"]);
    let summary = InlineBuilder::new(&input, &output, &subjects).build()?;

    let index = fs::read_to_string(output.join("index.html"))?;
    assert!(index.contains(r#"<script type="text/javascript">app();</script>"#));
    assert!(index.contains(r#"<style type="text/css">body { background: url("css/asset.png"); }</style>"#));
    assert!(index.contains(r#"<script src="http://example.com/lib.js"></script>"#));
    assert!(index.contains(r#"<script src="missing.js"></script>"#));
    assert!(!index.contains(r#"src="js/app.js""#));

    assert_eq!(
      fs::read(output.join("about.html"))?,
      fs::read(input.join("about.html"))?
    );
    assert_eq!(
      fs::read(output.join("css/asset.png"))?,
      fs::read(input.join("css/asset.png"))?
    );
    assert_eq!(fs::read(output.join("js/app.js"))?, b"app();");
    assert!(output.join("empty").is_dir());

    assert_eq!(summary.documents.len(), 1);
    assert_eq!(summary.documents[0].scripts, 1);
    assert_eq!(summary.documents[0].stylesheets, 1);
    assert_eq!(summary.documents[0].skipped.len(), 2);
    assert_eq!(summary.copied, 4);
    assert_eq!(summary.directories, 3);
    Ok(())
  }

  #[test]
  fn skipped_tags_survive_byte_for_byte() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let input = temp.path().join("input");
    let output = temp.path().join("output");
    write(
      &input,
      "index.html",
      br#"<html><head><link rel="stylesheet" href="http://cdn.example.com/site.css" media="screen"><script src="missing.js" type="module"></script><script src="js/app.js" type="text/javascript"></script></head><body></body></html>"#,
    )?;
    write(&input, "js/app.js", b"app();")?;

    let subjects = SubjectSet::from_paths(["index.html"]);
    let summary = InlineBuilder::new(&input, &output, &subjects).build()?;

    let index = fs::read_to_string(output.join("index.html"))?;
    assert!(index.contains(
      r#"<link rel="stylesheet" href="http://cdn.example.com/site.css" media="screen">"#
    ));
    assert!(index.contains(r#"<script src="missing.js" type="module"></script>"#));
    assert!(index.contains(r#"<script type="text/javascript">app();</script>"#));
    assert_eq!(summary.documents[0].skipped.len(), 2);
    Ok(())
  }

  #[test]
  fn unlisted_documents_are_copied_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let input = temp.path().join("input");
    let output = temp.path().join("output");
    site(&input)?;

    let summary = InlineBuilder::new(&input, &output, &SubjectSet::default()).build()?;

    assert!(summary.documents.is_empty());
    assert_eq!(
      fs::read(output.join("index.html"))?,
      fs::read(input.join("index.html"))?
    );
    Ok(())
  }

  #[test]
  fn discards_sources_unless_preserved() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let input = temp.path().join("input");
    let output = temp.path().join("output");
    site(&input)?;

    let subjects = SubjectSet::from_paths(["index.html"]);
    let options = BuildOptions {
      discard_sources: true,
      preserve: vec![Regex::new(r"^js/")?],
      ..BuildOptions::default()
    };
    let summary = InlineBuilder::new(&input, &output, &subjects)
      .with_options(options)
      .build()?;

    assert!(output.join("js/app.js").exists());
    assert!(!output.join("css/style.css").exists());
    assert!(output.join("css/asset.png").exists());
    assert_eq!(summary.discarded, 1);
    Ok(())
  }

  #[test]
  fn output_nested_in_input_is_not_walked() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let input = temp.path().to_path_buf();
    let output = input.join("dist");
    site(&input)?;

    let subjects = SubjectSet::from_paths(["index.html"]);
    InlineBuilder::new(&input, &output, &subjects).build()?;

    assert!(output.join("index.html").exists());
    assert!(!output.join("dist").exists());
    Ok(())
  }

  #[test]
  fn unreadable_documents_abort_with_their_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let input = temp.path().join("input");
    let output = temp.path().join("output");
    write(&input, "index.html", &[0xff, 0xfe, 0x00])?;

    let subjects = SubjectSet::from_paths(["index.html"]);
    let err = InlineBuilder::new(&input, &output, &subjects)
      .build()
      .unwrap_err();

    assert_eq!(err.path(), Some(input.join("index.html").as_path()));
    Ok(())
  }

  #[test]
  fn install_passthrough_reuses_existing_links() -> std::io::Result<()> {
    let temp = tempdir()?;
    let root = temp.path();

    let source = root.join("file.txt");
    fs::write(&source, b"content")?;
    let destination = root.join("linked.txt");

    install_passthrough(&source, &destination, LinkMode::HardLink).unwrap();
    assert!(is_same_file(&source, &destination)?);

    install_passthrough(&source, &destination, LinkMode::HardLink).unwrap();
    assert!(is_same_file(&source, &destination)?);
    Ok(())
  }

  #[test]
  fn install_passthrough_copies_bytes() -> std::io::Result<()> {
    let temp = tempdir()?;
    let root = temp.path();

    let source = root.join("image.bin");
    fs::write(&source, [0u8, 159, 146, 150])?;
    let destination = root.join("copy.bin");

    install_passthrough(&source, &destination, LinkMode::Copy).unwrap();
    assert!(!is_same_file(&source, &destination)?);
    assert_eq!(fs::read(&destination)?, vec![0u8, 159, 146, 150]);
    Ok(())
  }
}
