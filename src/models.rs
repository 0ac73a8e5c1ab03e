//! Data structures produced while rewriting a stylesheet.

use std::fmt;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

/// A single `url(...)` occurrence found in stylesheet text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference<'a> {
  /// Byte range of the whole `url(...)` token in the source text.
  pub span: Range<usize>,
  /// Referenced URL without quotes or version suffix.
  pub url: &'a str,
  /// Optional `?<digits>` cache-busting suffix, kept when the reference is passed through.
  pub version: Option<&'a str>,
}

impl AssetReference<'_> {
  /// Unquoted `url(...)` form emitted when the reference is not embedded.
  pub fn passthrough(&self) -> String {
    format!("url({}{})", self.url, self.version.unwrap_or_default())
  }
}

/// Why an asset was left as a regular reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
  /// The reference carries a scheme or is protocol-relative.
  External,
  /// The extension is not in the MIME table.
  Extension,
  /// The asset does not live under an `embed` directory.
  NotInEmbedDir,
  /// No file exists at the resolved path.
  Missing,
  /// The referencing stylesheet is an IE fallback.
  ExcludedStylesheet,
  /// The encoded image reaches the data URI size cap.
  TooLarge,
}

impl fmt::Display for IneligibleReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      Self::External => "external reference",
      Self::Extension => "extension is not embeddable",
      Self::NotInEmbedDir => "not inside an embed directory",
      Self::Missing => "file does not exist",
      Self::ExcludedStylesheet => "stylesheet is an IE fallback",
      Self::TooLarge => "encoded size exceeds the data URI limit",
    };
    f.write_str(text)
  }
}

/// Outcome of evaluating one candidate asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedVerdict {
  /// The asset stays a regular reference.
  Ineligible(IneligibleReason),
  /// The asset may be inlined.
  Eligible {
    /// MIME type looked up from the asset extension.
    mime_type: &'static str,
    /// Single-line base64 payload shared with the encode cache.
    payload: Arc<str>,
  },
}

impl EmbedVerdict {
  /// Returns `true` for [`EmbedVerdict::Eligible`].
  pub fn is_eligible(&self) -> bool {
    matches!(self, Self::Eligible { .. })
  }
}

/// Reference left untouched during a rewrite, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedReference {
  /// URL as written in the stylesheet.
  pub url: String,
  /// Rule that rejected the reference.
  pub reason: IneligibleReason,
}

/// Summary of a rewrite, listing what was inlined and what was not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
  /// Transformed stylesheet text.
  pub css: String,
  /// Resolved paths of every inlined asset, in source order.
  pub embedded: Vec<PathBuf>,
  /// References that were passed through.
  pub skipped: Vec<SkippedReference>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn passthrough_drops_quotes_and_keeps_version() {
    let reference = AssetReference {
      span: 0..26,
      url: "embed/logo.png",
      version: Some("?123"),
    };
    assert_eq!(reference.passthrough(), "url(embed/logo.png?123)");
  }

  #[test]
  fn reasons_render_for_logs() {
    assert_eq!(IneligibleReason::Missing.to_string(), "file does not exist");
  }
}
