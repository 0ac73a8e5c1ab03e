//! Static MIME table for embeddable assets.

/// Mapping from file extension to MIME type for every embeddable asset.
pub const EMBED_MIME_TYPES: &[(&str, &str)] = &[
  ("png", "image/png"),
  ("jpg", "image/jpeg"),
  ("jpeg", "image/jpeg"),
  ("gif", "image/gif"),
  ("tif", "image/tiff"),
  ("tiff", "image/tiff"),
  ("ttf", "font/truetype"),
  ("otf", "font/opentype"),
  ("woff", "font/woff"),
];

/// Font extensions, exempt from the data URI size cap.
pub const EMBED_FONTS: &[&str] = &["ttf", "otf", "woff"];

/// Maximum base64 length for non-font assets (32k minus padding, an IE8 limit).
pub const MAX_IMAGE_SIZE: usize = 32_700;

/// Look up the MIME type for an extension, without the leading dot.
///
/// Keys are lowercase and matching is case-sensitive.
pub fn mime_type(extension: &str) -> Option<&'static str> {
  EMBED_MIME_TYPES
    .iter()
    .find(|(ext, _)| *ext == extension)
    .map(|(_, mime)| *mime)
}

/// Whether `extension` names a font.
pub fn is_font(extension: &str) -> bool {
  EMBED_FONTS.iter().any(|font| *font == extension)
}
