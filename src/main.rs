use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use html_inline_bundler::{BuildOptions, BundleConfig, InlineBuilder, LinkMode};

/// Inline the local scripts and stylesheets of selected HTML documents.
#[derive(Debug, Parser)]
#[command(name = "html-inline-bundler", version, about)]
struct Cli {
  /// Input directory tree.
  input: PathBuf,
  /// Output directory; created when missing.
  output: PathBuf,
  /// Document to bundle, relative to the input directory. Repeatable.
  #[arg(short, long = "subject", value_name = "PATH")]
  subjects: Vec<String>,
  /// Configuration file. Defaults to `inline-bundle.config.json` in the input directory.
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,
  /// Hard link unchanged files instead of copying them.
  #[arg(long)]
  hard_link: bool,
  /// Leave `.js` and `.css` files out of the output.
  #[arg(long)]
  discard_sources: bool,
  /// Regex of script or stylesheet paths to keep when discarding sources. Repeatable.
  #[arg(long, value_name = "REGEX")]
  preserve: Vec<String>,
  /// Print a JSON build summary to stdout.
  #[arg(long)]
  report: bool,
  /// Increase log verbosity.
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let level = match cli.verbose {
    0 => tracing::Level::INFO,
    1 => tracing::Level::DEBUG,
    _ => tracing::Level::TRACE,
  };
  tracing_subscriber::fmt()
    .with_max_level(level)
    .with_target(false)
    .without_time()
    .with_writer(std::io::stderr)
    .init();

  let (mut config, config_dir) = match &cli.config {
    Some(path) => {
      let config = BundleConfig::from_path(path)
        .with_context(|| format!("failed to load configuration {}", path.display()))?;
      let dir = path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
      (config, dir)
    }
    None => (BundleConfig::discover(&cli.input), cli.input.clone()),
  };

  config.subjects.extend(cli.subjects.iter().cloned());
  config.preserve.extend(cli.preserve.iter().cloned());
  if cli.hard_link {
    config.link_mode = LinkMode::HardLink;
  }
  if cli.discard_sources {
    config.discard_sources = true;
  }

  let subjects = config
    .subject_set(&config_dir)
    .context("failed to load subject list")?;
  if subjects.is_empty() {
    tracing::warn!("No documents selected; the tree will be copied unchanged");
  }

  let options = BuildOptions {
    link_mode: config.link_mode,
    discard_sources: config.discard_sources,
    preserve: config.preserve_patterns()?,
  };

  tracing::info!(
    "html-inline-bundler v{} bundling {} into {}",
    env!("CARGO_PKG_VERSION"),
    cli.input.display(),
    cli.output.display()
  );

  let summary = InlineBuilder::new(&cli.input, &cli.output, &subjects)
    .with_transformer(config.transformer())
    .with_options(options)
    .build()
    .with_context(|| format!("build of {} failed", cli.input.display()))?;

  tracing::info!(
    documents = summary.documents.len(),
    copied = summary.copied,
    discarded = summary.discarded,
    "Build finished"
  );

  if cli.report {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  }

  Ok(())
}
