//! Stylesheet rewriting that swaps eligible `url(...)` references for data URIs.

use std::path::{Path, PathBuf};

use anyhow::Result;
use regex::Regex;

use crate::asset_paths::{is_absolute_reference, resolve_asset_path};
use crate::encoder::{AssetEncoder, AssetReader, EncodeCache, FsAssetReader};
use crate::models::{
  AssetReference, EmbedVerdict, IneligibleReason, RewriteReport, SkippedReference,
};

fn url_detector() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"url\(['"]?([^\s)]+\.[a-z]+)(\?\d+)?['"]?\)"#).expect("invalid url() regex")
  })
}

/// Collect every `url(...)` reference in `css`, left to right.
///
/// This is a token scan, not a CSS parser: quotes are optional on either side and need not
/// pair up, and only URLs ending in a lowercase dotted extension are recognised.
pub fn scan_references(css: &str) -> Vec<AssetReference<'_>> {
  url_detector()
    .captures_iter(css)
    .filter_map(|caps| {
      let whole = caps.get(0)?;
      let url = caps.get(1)?;
      Some(AssetReference {
        span: whole.range(),
        url: url.as_str(),
        version: caps.get(2).map(|suffix| suffix.as_str()),
      })
    })
    .collect()
}

/// Rewrites stylesheets against a public asset root.
#[derive(Debug, Clone)]
pub struct CssRewriter<R = FsAssetReader> {
  public_root: PathBuf,
  encoder: AssetEncoder<R>,
}

impl CssRewriter {
  /// Create a rewriter resolving references below `public_root` on the local filesystem.
  pub fn new(public_root: impl Into<PathBuf>) -> Self {
    Self::with_encoder(public_root, AssetEncoder::new())
  }
}

impl<R: AssetReader> CssRewriter<R> {
  /// Create a rewriter with a custom encoder, typically one backed by a test reader.
  pub fn with_encoder(public_root: impl Into<PathBuf>, encoder: AssetEncoder<R>) -> Self {
    Self {
      public_root: public_root.into(),
      encoder,
    }
  }

  /// Root directory that relative references are resolved against.
  pub fn public_root(&self) -> &Path {
    &self.public_root
  }

  /// Encoder used to evaluate candidate assets.
  pub fn encoder(&self) -> &AssetEncoder<R> {
    &self.encoder
  }

  /// Rewrite `css`, inlining every eligible asset as a base64 data URI.
  ///
  /// `logical_id` names the stylesheet being processed and only feeds the IE exclusion
  /// rule. When `embedding_enabled` is false the input is returned untouched. A read failure
  /// on an existing asset aborts the whole transform.
  pub fn rewrite(&self, css: &str, logical_id: &str, embedding_enabled: bool) -> Result<String> {
    if !embedding_enabled {
      return Ok(css.to_string());
    }

    self
      .rewrite_with_report(css, logical_id)
      .map(|report| report.css)
  }

  /// Rewrite `css` and describe which references were inlined or skipped.
  pub fn rewrite_with_report(&self, css: &str, logical_id: &str) -> Result<RewriteReport> {
    let mut cache = EncodeCache::new();
    let mut report = RewriteReport {
      css: String::with_capacity(css.len()),
      ..RewriteReport::default()
    };
    let mut last = 0;

    for reference in scan_references(css) {
      report.css.push_str(&css[last..reference.span.start]);
      last = reference.span.end;

      let (replacement, skipped) = self.substitute(&mut cache, logical_id, &reference)?;
      match skipped {
        Some(reason) => {
          log::debug!("leaving url({}) in {logical_id}: {reason}", reference.url);
          report.skipped.push(SkippedReference {
            url: reference.url.to_string(),
            reason,
          });
        }
        None => {
          report
            .embedded
            .push(resolve_asset_path(&self.public_root, reference.url));
        }
      }
      report.css.push_str(&replacement);
    }

    report.css.push_str(&css[last..]);
    log::debug!(
      "{logical_id}: embedded {} asset(s), skipped {}",
      report.embedded.len(),
      report.skipped.len()
    );
    Ok(report)
  }

  fn substitute(
    &self,
    cache: &mut EncodeCache,
    logical_id: &str,
    reference: &AssetReference<'_>,
  ) -> Result<(String, Option<IneligibleReason>)> {
    if is_absolute_reference(reference.url) {
      return Ok((reference.passthrough(), Some(IneligibleReason::External)));
    }

    let real_path = resolve_asset_path(&self.public_root, reference.url);
    match self.encoder.evaluate(cache, logical_id, &real_path)? {
      EmbedVerdict::Ineligible(reason) => Ok((reference.passthrough(), Some(reason))),
      EmbedVerdict::Eligible { mime_type, payload } => Ok((
        format!("url(\"data:{mime_type};charset=utf-8;base64,{payload}\")"),
        None,
      )),
    }
  }
}
