use std::path::{Path, PathBuf};

/// Map a stylesheet-relative reference onto the public root.
///
/// Leading slashes are dropped so that root-relative references (`/embed/logo.png`) land
/// inside `public_root` instead of replacing it, matching how the files are served.
pub fn resolve_asset_path(public_root: &Path, reference: &str) -> PathBuf {
  let trimmed = reference.trim_start_matches(['/', '\\']);
  public_root.join(trimmed)
}

/// Produce the forward-slash logical id for a stylesheet below `source_root`.
///
/// Files outside the source root keep their full path so exclusion checks still see every
/// directory component.
pub fn logical_id_for(source_root: &Path, stylesheet: &Path) -> String {
  let relative = stylesheet.strip_prefix(source_root).unwrap_or(stylesheet);
  relative.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
  use std::path::{Path, PathBuf};

  use super::{logical_id_for, resolve_asset_path};

  #[test]
  fn joins_relative_references() {
    let result = resolve_asset_path(Path::new("public"), "embed/logo.png");
    assert_eq!(result, PathBuf::from("public").join("embed/logo.png"));
  }

  #[test]
  fn keeps_root_relative_references_inside_public_root() {
    let result = resolve_asset_path(Path::new("/srv/public"), "/embed/logo.png");
    assert_eq!(result, PathBuf::from("/srv/public/embed/logo.png"));
  }

  #[test]
  fn derives_logical_ids_relative_to_source_root() {
    let root = Path::new("app/assets/stylesheets");
    let id = logical_id_for(root, &root.join("ie").join("app.css"));
    assert_eq!(id, "ie/app.css");
  }

  #[test]
  fn falls_back_to_full_path_outside_source_root() {
    let id = logical_id_for(Path::new("app/assets"), Path::new("vendor/app_ie.css"));
    assert_eq!(id, "vendor/app_ie.css");
  }
}
