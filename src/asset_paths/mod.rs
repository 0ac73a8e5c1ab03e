//! Helpers for classifying and resolving asset references found in stylesheets.
//!
//! The predicates live apart from the rewriter so that each eligibility rule can be tested on
//! plain strings and paths without touching the filesystem.

mod filters;
mod resolve;

pub use filters::{EMBED_DIR_NAME, is_absolute_reference, is_embed_path, is_excluded_logical_id};
pub use resolve::{logical_id_for, resolve_asset_path};
