use std::path::{Component, Path};

use regex::Regex;

/// Directory name marking assets that may be inlined.
pub const EMBED_DIR_NAME: &str = "embed";

fn scheme_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^[^/?#]*:").expect("invalid scheme regex"))
}

/// Determine whether a stylesheet reference points outside the public root.
///
/// Anything carrying a scheme (`http:`, `data:`, ...) or starting with `//` is treated as
/// external. A colon ahead of the first path separator counts as a scheme even when it is
/// not a well-formed one, so odd references are left alone rather than resolved on disk.
pub fn is_absolute_reference(value: &str) -> bool {
  value.starts_with("//") || scheme_pattern().is_match(value)
}

/// Returns `true` when one of the parent directories of `path` is named `embed`.
///
/// Only whole components match; `embedded/` or `my-embed/` do not qualify.
pub fn is_embed_path(path: &Path) -> bool {
  let Some(parent) = path.parent() else {
    return false;
  };

  parent
    .components()
    .any(|component| matches!(component, Component::Normal(name) if name == EMBED_DIR_NAME))
}

/// Returns `true` for logical stylesheet ids reserved for IE fallbacks.
///
/// These stylesheets are served to browsers that cannot handle data URIs, so a `_ie` marker
/// anywhere in the id or an `ie` directory segment disables embedding for the whole file.
pub fn is_excluded_logical_id(logical_id: &str) -> bool {
  if logical_id.contains("_ie") {
    return true;
  }

  let mut segments: Vec<&str> = logical_id.split(['/', '\\']).collect();
  segments.pop();
  segments.iter().any(|segment| *segment == "ie")
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::{is_absolute_reference, is_embed_path, is_excluded_logical_id};

  #[test]
  fn treats_schemes_as_absolute() {
    assert!(is_absolute_reference("http://cdn.example.com/x.png"));
    assert!(is_absolute_reference("HTTPS://cdn.example.com/x.png"));
    assert!(is_absolute_reference("data:image/png;base64,abc"));
  }

  #[test]
  fn treats_protocol_relative_urls_as_absolute() {
    assert!(is_absolute_reference("//cdn.example.com/embed/x.png"));
  }

  #[test]
  fn treats_malformed_schemes_as_absolute() {
    assert!(is_absolute_reference("ht!tp:weird.png"));
    assert!(is_absolute_reference(":nothing.png"));
  }

  #[test]
  fn keeps_relative_paths() {
    assert!(!is_absolute_reference("embed/logo.png"));
    assert!(!is_absolute_reference("/embed/logo.png"));
    assert!(!is_absolute_reference("../images/a:b.png"));
  }

  #[test]
  fn matches_embed_directory_components_only() {
    assert!(is_embed_path(Path::new("/srv/public/embed/logo.png")));
    assert!(is_embed_path(Path::new("embed/icons/logo.png")));
    assert!(!is_embed_path(Path::new("/srv/public/embedded/logo.png")));
    assert!(!is_embed_path(Path::new("/srv/public/my-embed/logo.png")));
    assert!(!is_embed_path(Path::new("/srv/public/embed")));
  }

  #[test]
  fn excludes_ie_logical_ids() {
    assert!(is_excluded_logical_id("app_ie.css"));
    assert!(is_excluded_logical_id("ie/app.css"));
    assert!(is_excluded_logical_id("themes/ie/app.css"));
    assert!(!is_excluded_logical_id("app.css"));
    assert!(!is_excluded_logical_id("movie/app.css"));
    assert!(!is_excluded_logical_id("ie.css"));
    // `ie` only counts as a directory, never as the final segment.
    assert!(!is_excluded_logical_id("ie"));
    assert!(!is_excluded_logical_id("styles/ie"));
  }
}
