//! Eligibility rules and base64 encoding for embeddable assets.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose};

use crate::asset_paths::{is_embed_path, is_excluded_logical_id};
use crate::mime::{self, MAX_IMAGE_SIZE};
use crate::models::{EmbedVerdict, IneligibleReason};

/// Source of asset bytes consulted by the encoder.
pub trait AssetReader {
  /// Returns `true` when a regular file exists at `path`.
  fn exists(&self, path: &Path) -> bool;

  /// Read the full binary contents of `path`.
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads assets straight from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetReader;

impl AssetReader for FsAssetReader {
  fn exists(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
  }
}

/// Base64 payloads memoised by absolute asset path.
///
/// A cache is meant to live for a single stylesheet transform. Each path is read and encoded
/// at most once, so the size check and the final data URI share the same payload.
#[derive(Debug, Default)]
pub struct EncodeCache {
  entries: HashMap<PathBuf, Arc<str>>,
}

impl EncodeCache {
  /// Create an empty cache.
  pub fn new() -> Self {
    Self::default()
  }

  /// Cached payload for `path`, if it was already encoded.
  pub fn get(&self, path: &Path) -> Option<Arc<str>> {
    self.entries.get(path).cloned()
  }

  /// Number of encoded assets held by the cache.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when nothing has been encoded yet.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  fn insert(&mut self, path: &Path, payload: Arc<str>) {
    self.entries.insert(path.to_path_buf(), payload);
  }
}

/// Decides whether an asset can be inlined and produces its payload.
#[derive(Debug, Clone, Default)]
pub struct AssetEncoder<R = FsAssetReader> {
  reader: R,
}

impl AssetEncoder {
  /// Create an encoder reading from the local filesystem.
  pub fn new() -> Self {
    Self::with_reader(FsAssetReader)
  }
}

impl<R: AssetReader> AssetEncoder<R> {
  /// Create an encoder backed by a custom reader.
  pub fn with_reader(reader: R) -> Self {
    Self { reader }
  }

  /// Access the underlying reader.
  pub fn reader(&self) -> &R {
    &self.reader
  }

  /// Evaluate the eligibility rules for `path`, referenced from the stylesheet `logical_id`.
  ///
  /// Rules run in a fixed order and stop at the first failure: extension, `embed` directory,
  /// existence, IE exclusion of the referencing stylesheet, and finally the size cap for
  /// non-font assets. Only the size check reads the file. A failing rule is reported as an
  /// [`EmbedVerdict::Ineligible`] value; read errors on existing files are returned as errors.
  pub fn evaluate(
    &self,
    cache: &mut EncodeCache,
    logical_id: &str,
    path: &Path,
  ) -> Result<EmbedVerdict> {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
      return Ok(EmbedVerdict::Ineligible(IneligibleReason::Extension));
    };
    let Some(mime_type) = mime::mime_type(extension) else {
      return Ok(EmbedVerdict::Ineligible(IneligibleReason::Extension));
    };

    if !is_embed_path(path) {
      return Ok(EmbedVerdict::Ineligible(IneligibleReason::NotInEmbedDir));
    }

    if !self.reader.exists(path) {
      return Ok(EmbedVerdict::Ineligible(IneligibleReason::Missing));
    }

    if is_excluded_logical_id(logical_id) {
      return Ok(EmbedVerdict::Ineligible(IneligibleReason::ExcludedStylesheet));
    }

    let payload = self.encoded_contents(cache, path)?;
    if !mime::is_font(extension) && payload.len() >= MAX_IMAGE_SIZE {
      return Ok(EmbedVerdict::Ineligible(IneligibleReason::TooLarge));
    }

    Ok(EmbedVerdict::Eligible { mime_type, payload })
  }

  /// Return the single-line base64 contents of `path`, reading it only on a cache miss.
  pub fn encoded_contents(&self, cache: &mut EncodeCache, path: &Path) -> Result<Arc<str>> {
    if let Some(payload) = cache.get(path) {
      return Ok(payload);
    }

    let bytes = self
      .reader
      .read(path)
      .with_context(|| format!("failed to read asset at {}", path.display()))?;
    let payload: Arc<str> = general_purpose::STANDARD.encode(bytes).into();
    cache.insert(path, Arc::clone(&payload));
    Ok(payload)
  }
}
