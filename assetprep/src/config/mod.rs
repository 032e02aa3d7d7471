//! TOML configuration: file locations and step options.
//!
//! Every section is optional; missing keys take the defaults below, which
//! name the files the asset pipeline has always used.

mod io;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use assetprep_core::{ExtractOptions, JsonStyle, OffsetCorrection, ScanOptions};

pub use io::DEFAULT_CONFIG_FILE;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub bundle: BundleConfig,
    pub glyphs: GlyphsConfig,
    pub whitest_cell: WhitestCellConfig,
    pub flip: FlipConfig,
    pub atlas: AtlasConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent JSON output.
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub font: PathBuf,
    pub textures: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphsConfig {
    pub metrics: PathBuf,
    pub corrections: Vec<OffsetCorrection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitestCellConfig {
    pub image: PathBuf,
    pub metrics: PathBuf,
    pub ignore_alpha: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipConfig {
    pub images: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub plist: PathBuf,
    pub output: PathBuf,
    /// Frame names are cut at the first occurrence of this marker.
    pub image_extension: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            font: PathBuf::from("font.json"),
            textures: PathBuf::from("textures.json"),
            output: PathBuf::from("data.json"),
        }
    }
}

impl Default for GlyphsConfig {
    fn default() -> Self {
        Self {
            metrics: PathBuf::from("Ubuntu-R.json"),
            corrections: OffsetCorrection::accented_defaults(),
        }
    }
}

impl Default for WhitestCellConfig {
    fn default() -> Self {
        Self {
            image: PathBuf::from("Ubuntu-R.png"),
            metrics: PathBuf::from("Ubuntu-R.json"),
            ignore_alpha: false,
        }
    }
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self {
            images: vec![PathBuf::from("Ubuntu-R.png"), PathBuf::from("textures.png")],
        }
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            plist: PathBuf::from("textures.plist"),
            output: PathBuf::from("textures.json"),
            image_extension: ExtractOptions::default().image_extension,
        }
    }
}

impl OutputConfig {
    pub fn json_style(&self) -> JsonStyle {
        JsonStyle {
            pretty: self.pretty,
        }
    }
}

impl WhitestCellConfig {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            ignore_alpha: self.ignore_alpha,
        }
    }
}

impl AtlasConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            image_extension: self.image_extension.clone(),
        }
    }
}
