//! Project configuration for asset embedding.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name searched for in the project directory.
pub const DEFAULT_CONFIG_FILE: &str = "embed_assets.config.json";

/// Discoverable settings describing where stylesheets and assets live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
  /// Whether eligible assets are inlined at all.
  pub embed_assets: bool,
  /// Public directory that stylesheet references are resolved against.
  pub public_root: String,
  /// Directory holding source stylesheets, used to derive logical ids.
  pub source_root: String,
  /// Directory receiving processed stylesheets.
  pub output_dir: String,
}

impl Default for EmbedConfig {
  fn default() -> Self {
    Self {
      embed_assets: true,
      public_root: "public".into(),
      source_root: "app/assets/stylesheets".into(),
      output_dir: "public/assets".into(),
    }
  }
}

impl EmbedConfig {
  /// Attempt to load configuration from the provided project directory.
  ///
  /// A missing or malformed file falls back to the defaults so builds keep working.
  pub fn discover(project_dir: &Path) -> Self {
    let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.exists() {
      return Self::default();
    }

    Self::from_path(&candidate).unwrap_or_else(|| {
      log::warn!(
        "ignoring unreadable config at {}, using defaults",
        candidate.display()
      );
      Self::default()
    })
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Public root resolved against the project directory.
  pub fn public_root_path(&self, project_dir: &Path) -> PathBuf {
    project_dir.join(&self.public_root)
  }

  /// Stylesheet source root resolved against the project directory.
  pub fn source_root_path(&self, project_dir: &Path) -> PathBuf {
    project_dir.join(&self.source_root)
  }

  /// Output directory resolved against the project directory.
  pub fn output_dir_path(&self, project_dir: &Path) -> PathBuf {
    project_dir.join(&self.output_dir)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn defaults_when_file_is_absent() {
    let dir = tempdir().unwrap();
    assert_eq!(EmbedConfig::discover(dir.path()), EmbedConfig::default());
  }

  #[test]
  fn reads_partial_config_with_defaults() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join(DEFAULT_CONFIG_FILE),
      r#"{ "embed_assets": false, "public_root": "static" }"#,
    )
    .unwrap();

    let config = EmbedConfig::discover(dir.path());
    assert!(!config.embed_assets);
    assert_eq!(config.public_root_path(dir.path()), dir.path().join("static"));
    assert_eq!(config.source_root, "app/assets/stylesheets");
  }

  #[test]
  fn falls_back_on_malformed_json() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();

    assert_eq!(EmbedConfig::discover(dir.path()), EmbedConfig::default());
  }
}
