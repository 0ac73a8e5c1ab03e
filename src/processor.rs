//! Stylesheet processor tying configuration, logical ids and the rewriter together.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::asset_paths::logical_id_for;
use crate::config::EmbedConfig;
use crate::encoder::{AssetEncoder, AssetReader, FsAssetReader};
use crate::models::RewriteReport;
use crate::rewriter::CssRewriter;

/// Result of processing a single stylesheet file.
#[derive(Debug, Clone)]
pub struct ProcessedStylesheet {
  /// Logical id the stylesheet was processed under.
  pub logical_id: String,
  /// Rewritten CSS together with the embedded and skipped references.
  pub report: RewriteReport,
}

impl ProcessedStylesheet {
  /// Human readable summary: one headline plus one line per skipped reference.
  pub fn summary_lines(&self) -> Vec<String> {
    let mut lines = vec![format!(
      "{}: embedded {} asset(s), skipped {}",
      self.logical_id,
      self.report.embedded.len(),
      self.report.skipped.len()
    )];
    lines.extend(
      self
        .report
        .skipped
        .iter()
        .map(|skipped| format!("  url({}): {}", skipped.url, skipped.reason)),
    );
    lines
  }
}

/// High-level helper for processing stylesheets of one project.
#[derive(Debug, Clone)]
pub struct StylesheetProcessor<R = FsAssetReader> {
  config: EmbedConfig,
  source_root: PathBuf,
  rewriter: CssRewriter<R>,
}

impl StylesheetProcessor {
  /// Create a processor for `project_dir` reading assets from the local filesystem.
  pub fn new(project_dir: &Path, config: EmbedConfig) -> Self {
    Self::with_encoder(project_dir, config, AssetEncoder::new())
  }

  /// Create a processor using the configuration discovered in `project_dir`.
  pub fn discover(project_dir: &Path) -> Self {
    Self::new(project_dir, EmbedConfig::discover(project_dir))
  }
}

impl<R: AssetReader> StylesheetProcessor<R> {
  /// Create a processor with a custom encoder.
  pub fn with_encoder(project_dir: &Path, config: EmbedConfig, encoder: AssetEncoder<R>) -> Self {
    let rewriter = CssRewriter::with_encoder(config.public_root_path(project_dir), encoder);
    Self {
      source_root: config.source_root_path(project_dir),
      config,
      rewriter,
    }
  }

  /// Active configuration.
  pub fn config(&self) -> &EmbedConfig {
    &self.config
  }

  /// Logical id of `stylesheet`, relative to the configured source root.
  pub fn logical_id(&self, stylesheet: &Path) -> String {
    logical_id_for(&self.source_root, stylesheet)
  }

  /// Process stylesheet text known under `logical_id`.
  pub fn process(&self, css: &str, logical_id: &str) -> Result<String> {
    self
      .rewriter
      .rewrite(css, logical_id, self.config.embed_assets)
  }

  /// Read and process the stylesheet at `stylesheet`.
  pub fn process_file(&self, stylesheet: &Path) -> Result<ProcessedStylesheet> {
    let css = fs::read_to_string(stylesheet)
      .with_context(|| format!("failed to read stylesheet at {}", stylesheet.display()))?;
    let logical_id = self.logical_id(stylesheet);

    let report = if self.config.embed_assets {
      self
        .rewriter
        .rewrite_with_report(&css, &logical_id)
        .with_context(|| format!("failed to embed assets into {logical_id}"))?
    } else {
      RewriteReport {
        css,
        ..RewriteReport::default()
      }
    };

    Ok(ProcessedStylesheet { logical_id, report })
  }

  /// Process `stylesheet` and write the result below `output_dir`, keeping its logical path.
  ///
  /// Root, prefix and `..` components of the logical id are dropped so the output never lands
  /// outside `output_dir`.
  pub fn process_to(&self, stylesheet: &Path, output_dir: &Path) -> Result<PathBuf> {
    let processed = self.process_file(stylesheet)?;
    self.write_processed(&processed, output_dir)
  }

  /// Write an already processed stylesheet below `output_dir`, keeping its logical path.
  pub fn write_processed(
    &self,
    processed: &ProcessedStylesheet,
    output_dir: &Path,
  ) -> Result<PathBuf> {
    let relative: PathBuf = Path::new(&processed.logical_id)
      .components()
      .filter(|component| matches!(component, Component::Normal(_)))
      .collect();
    let target = output_dir.join(relative);
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    fs::write(&target, &processed.report.css)
      .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(target)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use base64::{Engine as _, engine::general_purpose};
  use tempfile::tempdir;

  fn project() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("public/embed")).unwrap();
    fs::write(root.join("public/embed/dot.gif"), b"GIF89a").unwrap();
    fs::create_dir_all(root.join("app/assets/stylesheets/ie")).unwrap();
    fs::write(
      root.join("app/assets/stylesheets/app.css"),
      "a{background:url(/embed/dot.gif)}",
    )
    .unwrap();
    fs::write(
      root.join("app/assets/stylesheets/ie/app.css"),
      "a{background:url(/embed/dot.gif)}",
    )
    .unwrap();
    dir
  }

  #[test]
  fn processes_files_relative_to_source_root() {
    let dir = project();
    let processor = StylesheetProcessor::discover(dir.path());
    let stylesheet = dir.path().join("app/assets/stylesheets/app.css");

    let processed = processor.process_file(&stylesheet).unwrap();
    assert_eq!(processed.logical_id, "app.css");
    assert_eq!(
      processed.report.css,
      format!(
        "a{{background:url(\"data:image/gif;charset=utf-8;base64,{}\")}}",
        general_purpose::STANDARD.encode(b"GIF89a")
      )
    );
    assert_eq!(processed.report.embedded.len(), 1);
  }

  #[test]
  fn ie_directory_stylesheets_keep_references() {
    let dir = project();
    let processor = StylesheetProcessor::discover(dir.path());
    let stylesheet = dir.path().join("app/assets/stylesheets/ie/app.css");

    let processed = processor.process_file(&stylesheet).unwrap();
    assert_eq!(processed.logical_id, "ie/app.css");
    assert_eq!(processed.report.css, "a{background:url(/embed/dot.gif)}");
  }

  #[test]
  fn disabled_config_passes_css_through() {
    let dir = project();
    let config = EmbedConfig {
      embed_assets: false,
      ..EmbedConfig::default()
    };
    let processor = StylesheetProcessor::new(dir.path(), config);

    let css = "a{background:url('/embed/dot.gif')}";
    assert_eq!(processor.process(css, "app.css").unwrap(), css);

    let stylesheet = dir.path().join("app/assets/stylesheets/app.css");
    let processed = processor.process_file(&stylesheet).unwrap();
    assert_eq!(processed.report.css, "a{background:url(/embed/dot.gif)}");
    assert!(processed.report.embedded.is_empty());
  }

  #[test]
  fn writes_output_mirroring_logical_path() {
    let dir = project();
    let processor = StylesheetProcessor::discover(dir.path());
    let out = dir.path().join("out");
    let stylesheet = dir.path().join("app/assets/stylesheets/ie/app.css");

    let target = processor.process_to(&stylesheet, &out).unwrap();
    assert_eq!(target, out.join("ie/app.css"));
    assert_eq!(
      fs::read_to_string(target).unwrap(),
      "a{background:url(/embed/dot.gif)}"
    );
  }

  #[test]
  fn summarises_embedded_and_skipped_references() {
    let dir = project();
    let stylesheet = dir.path().join("app/assets/stylesheets/mixed.css");
    fs::write(
      &stylesheet,
      "a{b:url(/embed/dot.gif)} c{d:url(/embed/gone.png)} e{f:url(http://x.io/y.png)}",
    )
    .unwrap();
    let processor = StylesheetProcessor::discover(dir.path());

    let processed = processor.process_file(&stylesheet).unwrap();
    assert_eq!(processed.summary_lines(), vec![
      "mixed.css: embedded 1 asset(s), skipped 2".to_string(),
      "  url(/embed/gone.png): file does not exist".to_string(),
      "  url(http://x.io/y.png): external reference".to_string(),
    ]);

    let out = dir.path().join("out");
    let target = processor.write_processed(&processed, &out).unwrap();
    assert_eq!(target, out.join("mixed.css"));
    assert_eq!(fs::read_to_string(target).unwrap(), processed.report.css);
  }

  #[test]
  fn outside_stylesheets_stay_inside_output_dir() {
    let dir = project();
    let processor = StylesheetProcessor::discover(dir.path());
    let out = dir.path().join("out");
    let stylesheet = dir.path().join("vendor.css");
    fs::write(&stylesheet, "b{}").unwrap();

    let target = processor.process_to(&stylesheet, &out).unwrap();
    assert!(target.starts_with(&out));
    assert_eq!(fs::read_to_string(&stylesheet).unwrap(), "b{}");
  }

  #[test]
  fn missing_stylesheet_is_an_error() {
    let dir = project();
    let processor = StylesheetProcessor::discover(dir.path());

    let err = processor
      .process_file(&dir.path().join("app/assets/stylesheets/nope.css"))
      .unwrap_err();
    assert!(err.to_string().contains("nope.css"));
  }
}
