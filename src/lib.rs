#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod encoder;
pub mod mime;
pub mod models;
pub mod processor;
pub mod rewriter;

pub use config::EmbedConfig;
pub use encoder::{AssetEncoder, AssetReader, EncodeCache, FsAssetReader};
pub use models::{AssetReference, EmbedVerdict, IneligibleReason, RewriteReport};
pub use processor::{ProcessedStylesheet, StylesheetProcessor};
pub use rewriter::{CssRewriter, scan_references};
