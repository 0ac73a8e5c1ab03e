use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use css_embed_assets::{EmbedConfig, StylesheetProcessor};

/// Inline small images and fonts into compiled stylesheets as data URIs.
#[derive(Debug, Parser)]
#[command(name = "css-embed-assets", version, about)]
struct Cli {
  /// Stylesheets to process.
  #[arg(required = true)]
  stylesheets: Vec<PathBuf>,

  /// Project directory holding `embed_assets.config.json`.
  #[arg(long, default_value = ".")]
  project_dir: PathBuf,

  /// Public directory that `url(...)` references resolve against.
  #[arg(long)]
  public_root: Option<String>,

  /// Directory that logical stylesheet ids are derived from.
  #[arg(long)]
  source_root: Option<String>,

  /// Directory receiving the processed stylesheets.
  #[arg(long)]
  out_dir: Option<String>,

  /// Print processed CSS to stdout instead of writing files.
  #[arg(long)]
  stdout: bool,

  /// Copy stylesheets through without embedding anything.
  #[arg(long)]
  no_embed: bool,

  /// Log every skipped reference.
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn config(&self) -> EmbedConfig {
    let mut config = EmbedConfig::discover(&self.project_dir);
    if let Some(public_root) = &self.public_root {
      config.public_root = public_root.clone();
    }
    if let Some(source_root) = &self.source_root {
      config.source_root = source_root.clone();
    }
    if let Some(out_dir) = &self.out_dir {
      config.output_dir = out_dir.clone();
    }
    if self.no_embed {
      config.embed_assets = false;
    }
    config
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_filter = if cli.verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
    .init();

  let config = cli.config();
  let output_dir = config.output_dir_path(&cli.project_dir);
  let processor = StylesheetProcessor::new(&cli.project_dir, config);

  let mut stdout = io::stdout().lock();
  for stylesheet in &cli.stylesheets {
    let processed = processor.process_file(stylesheet)?;
    for line in processed.summary_lines() {
      log::debug!("{line}");
    }

    if cli.stdout {
      stdout
        .write_all(processed.report.css.as_bytes())
        .context("failed to write to stdout")?;
      continue;
    }

    let target = processor.write_processed(&processed, &output_dir)?;
    log::debug!("{} -> {}", stylesheet.display(), target.display());
  }

  Ok(())
}
