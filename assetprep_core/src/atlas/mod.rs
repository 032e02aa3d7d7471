//! Texture atlas description extracted from texture-packer plist output.
//!
//! The packer writes a cocos2d-style plist: a `frames` dict keyed by source
//! filename, each entry holding `frame` (`{{x,y},{w,h}}`), `offset`
//! (`{x,y}`) and a few fields we don't need, followed by a `metadata` dict
//! with the atlas `size`. Format 3 files name the same fields
//! `textureRect`, `spriteOffset` and `textureRotated`; both are accepted.
//!
//! The output is the JSON the renderer loads:
//!
//! ```json
//! {"images": [{"name": "a", "position": [[2,3],[12,23]], "offset": [1,1]}],
//!  "metadata": {"size": [100,100]}}
//! ```

pub mod plist;
pub mod tuple;

use std::fmt;
use std::ops::Add;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atlas::plist::PlistValue;
use crate::error::{PrepError, PrepResult};
use crate::fsio::{self, JsonStyle};

const FRAME_KEYS: &[&str] = &["frame", "textureRect"];
const OFFSET_KEYS: &[&str] = &["offset", "spriteOffset"];
const ROTATED_KEYS: &[&str] = &["rotated", "textureRotated"];

/// One atlas coordinate. Integer arithmetic stays integral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

impl Scalar {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl Add for Scalar {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map_or_else(|| Self::Float(a as f64 + b as f64), Self::Int),
            (a, b) => Self::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
        }
    }
}

/// `[x, y]`, or `[w, h]` for sizes.
pub type Point = [Scalar; 2];

/// One packed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasFrame {
    /// Source filename up to the image extension.
    pub name: String,
    /// Top-left and bottom-right corners in atlas pixels.
    pub position: [Point; 2],
    /// Offset of the trimmed image from its untrimmed origin.
    pub offset: Point,
}

impl AtlasFrame {
    /// Builds a frame from the packer's origin-and-size rectangle.
    pub fn from_rect(name: impl Into<String>, rect: [Point; 2], offset: Point) -> Self {
        let [origin, size] = rect;
        Self {
            name: name.into(),
            position: [origin, [origin[0] + size[0], origin[1] + size[1]]],
            offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasMetadata {
    /// `[width, height]` of the packed texture.
    pub size: Point,
}

/// `{"images": [...], "metadata": {"size": [w, h]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasDescription {
    pub images: Vec<AtlasFrame>,
    pub metadata: AtlasMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Frame names are cut at the first occurrence of this marker.
    pub image_extension: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            image_extension: ".png".to_owned(),
        }
    }
}

impl ExtractOptions {
    /// `a.png` -> `a`. Keys without the marker are used whole.
    pub fn frame_name<'a>(&self, key: &'a str) -> &'a str {
        if self.image_extension.is_empty() {
            return key;
        }
        key.split_once(self.image_extension.as_str())
            .map_or(key, |(name, _)| name)
    }
}

/// Extracts the atlas description from plist text.
pub fn extract_atlas(text: &str, options: &ExtractOptions) -> PrepResult<AtlasDescription> {
    let root = plist::parse_plist(text)?;

    let frames = lookup(&root, &["frames"], "plist")?;
    let entries = frames
        .as_dict()
        .ok_or_else(|| expected("plist.frames", "dict", frames))?;

    let mut images = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        images.push(extract_frame(key, entry, options)?);
    }

    let metadata = lookup(&root, &["metadata"], "plist")?;
    let size = tuple::parse_point(string_at(metadata, &["size"], "plist.metadata")?)?;

    log::debug!("atlas: {} frames, size {}x{}", images.len(), size[0], size[1]);
    Ok(AtlasDescription {
        images,
        metadata: AtlasMetadata { size },
    })
}

fn extract_frame(key: &str, entry: &PlistValue, options: &ExtractOptions) -> PrepResult<AtlasFrame> {
    let context = format!("plist.frames.{key}");
    let rect = tuple::parse_rect(string_at(entry, FRAME_KEYS, &context)?)?;
    let offset = tuple::parse_point(string_at(entry, OFFSET_KEYS, &context)?)?;

    let rotated = ROTATED_KEYS
        .iter()
        .find_map(|k| entry.get(k))
        .and_then(PlistValue::as_bool);
    if rotated == Some(true) {
        log::warn!("atlas: frame {key:?} is rotated; its rectangle describes rotated pixels");
    }

    Ok(AtlasFrame::from_rect(options.frame_name(key), rect, offset))
}

/// First of `keys` present in `dict`.
fn lookup<'a>(dict: &'a PlistValue, keys: &[&str], context: &str) -> PrepResult<&'a PlistValue> {
    if dict.as_dict().is_none() {
        return Err(expected(context, "dict", dict));
    }
    keys.iter()
        .find_map(|k| dict.get(k))
        .ok_or_else(|| PrepError::missing(format!("{context}.{}", keys.join("|"))))
}

fn string_at<'a>(dict: &'a PlistValue, keys: &[&str], context: &str) -> PrepResult<&'a str> {
    let value = lookup(dict, keys, context)?;
    value
        .as_str()
        .ok_or_else(|| expected(&format!("{context}.{}", keys[0]), "string", value))
}

fn expected(context: &str, kind: &str, found: &PlistValue) -> PrepError {
    PrepError::drift(context, format!("expected <{kind}>, found <{}>", found.kind()))
}

/// Reads the plist at `plist_path`, extracts the description, and writes it
/// as JSON to `output`.
pub fn extract_file(
    plist_path: &Path,
    output: &Path,
    options: &ExtractOptions,
    style: JsonStyle,
) -> PrepResult<AtlasDescription> {
    let text = fsio::read_text(plist_path)?;
    let description = extract_atlas(&text, options).map_err(|e| e.in_document(plist_path))?;
    fsio::write_json(output, &description, style)?;
    log::info!(
        "atlas: {} frames from {} written to {}",
        description.images.len(),
        plist_path.display(),
        output.display()
    );
    Ok(description)
}
