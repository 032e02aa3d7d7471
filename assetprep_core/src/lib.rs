//! Asset preparation steps for an SDF font and a packed texture atlas.
//!
//! Each module is one independent, run-once transformation over local
//! files: merging descriptors into a single data bundle, patching glyph
//! offsets, locating the brightest texel of an SDF texture, flipping
//! textures vertically, and converting texture-packer plist output into
//! JSON. None of them share state. This crate contains no CLI or config.

#![deny(unsafe_code)]

pub mod atlas;
pub mod brightest;
pub mod bundle;
pub mod error;
pub mod flip;
pub mod fsio;
pub mod glyphs;

#[cfg(test)]
mod test_util;

pub use atlas::{AtlasDescription, AtlasFrame, AtlasMetadata, ExtractOptions, Scalar};
pub use brightest::{BrightSpot, ScanOptions};
pub use bundle::DataBundle;
pub use error::{PrepError, PrepResult};
pub use fsio::JsonStyle;
pub use glyphs::{FontMetrics, Glyph, OffsetCorrection};
