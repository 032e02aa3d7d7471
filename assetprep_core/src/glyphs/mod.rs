//! Glyph metrics documents and the vertical-offset corrector.
//!
//! The metrics file is the JSON emitted by the SDF font generator: a
//! `chars` list of glyph records, a `common` section, and whatever else
//! the generator writes. Only `yoffset` and `common.whitestCell` are ever
//! modified; everything else round-trips untouched and in order.

use std::collections::HashMap;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::brightest::BrightSpot;
use crate::error::{PrepError, PrepResult};
use crate::fsio::{self, JsonStyle};

/// Key under `common` that receives the brightest texel coordinate.
pub const WHITEST_CELL_KEY: &str = "whitestCell";

const CHARS_KEY: &str = "chars";

/// One glyph record. Field order and unknown fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Glyph(Map<String, Value>);

impl Glyph {
    /// The `char` field, if present and a string.
    pub fn character(&self) -> Option<&str> {
        self.0.get("char").and_then(Value::as_str)
    }

    pub fn yoffset(&self) -> Option<&Value> {
        self.0.get("yoffset")
    }

    pub fn set_yoffset(&mut self, yoffset: Value) {
        self.0.insert("yoffset".to_owned(), yoffset);
    }

    /// Any other field (`x`, `width`, `xadvance`, ...).
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

impl From<Map<String, Value>> for Glyph {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// A glyph metrics document.
///
/// `chars` is written back at the position it was read from, so the
/// top-level key order of the file survives a rewrite.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct FontMetrics {
    pub chars: Vec<Glyph>,
    /// Every other top-level key, in document order.
    pub extra: Map<String, Value>,
    /// Number of `extra` keys that precede `chars`.
    chars_at: usize,
}

impl TryFrom<Map<String, Value>> for FontMetrics {
    type Error = PrepError;

    fn try_from(document: Map<String, Value>) -> PrepResult<Self> {
        let mut chars = None;
        let mut extra = Map::new();
        let mut chars_at = 0;
        for (key, value) in document {
            if key != CHARS_KEY {
                extra.insert(key, value);
                continue;
            }
            let Value::Array(items) = value else {
                return Err(PrepError::drift(CHARS_KEY, "expected an array"));
            };
            let mut glyphs = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                let Value::Object(fields) = item else {
                    return Err(PrepError::drift(format!("{CHARS_KEY}[{i}]"), "expected an object"));
                };
                glyphs.push(Glyph::from(fields));
            }
            chars = Some(glyphs);
            chars_at = extra.len();
        }
        let chars = chars.ok_or_else(|| PrepError::missing(CHARS_KEY))?;
        Ok(Self {
            chars,
            extra,
            chars_at,
        })
    }
}

impl Serialize for FontMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.extra.len() + 1))?;
        let at = self.chars_at.min(self.extra.len());
        for (key, value) in self.extra.iter().take(at) {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(CHARS_KEY, &self.chars)?;
        for (key, value) in self.extra.iter().skip(at) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Copy the `yoffset` of `reference` onto every character of `dependents`.
///
/// Used for accented capitals whose generated offset is wrong: the accent
/// pushes the glyph's box up, but the baseline placement must match the
/// bare letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetCorrection {
    pub reference: String,
    /// Each `char` of this string names one dependent glyph.
    pub dependents: String,
}

impl OffsetCorrection {
    pub fn new(reference: impl Into<String>, dependents: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            dependents: dependents.into(),
        }
    }

    /// `A -> À` and `E -> ÉÈÊ`.
    pub fn accented_defaults() -> Vec<Self> {
        vec![Self::new("A", "À"), Self::new("E", "ÉÈÊ")]
    }
}

impl FontMetrics {
    /// Index of the first glyph whose `char` equals `ch`.
    pub fn position(&self, ch: &str) -> Option<usize> {
        self.chars.iter().position(|g| g.character() == Some(ch))
    }

    pub fn glyph(&self, ch: &str) -> Option<&Glyph> {
        self.position(ch).map(|i| &self.chars[i])
    }

    /// Character to index of its first occurrence. Later duplicates are
    /// shadowed, matching `position`.
    fn index(&self) -> HashMap<String, usize> {
        let mut index = HashMap::with_capacity(self.chars.len());
        for (i, glyph) in self.chars.iter().enumerate() {
            if let Some(ch) = glyph.character() {
                index.entry(ch.to_owned()).or_insert(i);
            }
        }
        index
    }

    /// Applies `corrections` in order and returns the number of glyph
    /// offsets written.
    ///
    /// Every character is resolved before anything is written: on
    /// `FieldNotFound` the document is unchanged. A correction whose
    /// reference was rewritten by an earlier correction sees the new value.
    pub fn apply_corrections(&mut self, corrections: &[OffsetCorrection]) -> PrepResult<usize> {
        let index = self.index();
        let lookup = |ch: &str| {
            index
                .get(ch)
                .copied()
                .ok_or_else(|| PrepError::missing(format!("glyph {ch:?}")))
        };

        let mut pending: HashMap<usize, Value> = HashMap::new();
        let mut written = 0;
        for correction in corrections {
            let reference = lookup(&correction.reference)?;
            let yoffset = match pending.get(&reference) {
                Some(v) => v.clone(),
                None => self.chars[reference].yoffset().cloned().ok_or_else(|| {
                    PrepError::missing(format!("yoffset of glyph {:?}", correction.reference))
                })?,
            };
            let mut buf = [0u8; 4];
            for ch in correction.dependents.chars() {
                let dependent = lookup(&*ch.encode_utf8(&mut buf))?;
                pending.insert(dependent, yoffset.clone());
                written += 1;
            }
            log::debug!(
                "glyphs: {:?} -> {:?} yoffset {yoffset}",
                correction.reference,
                correction.dependents
            );
        }

        for (&i, yoffset) in &pending {
            self.chars[i].set_yoffset(yoffset.clone());
        }
        Ok(written)
    }

    /// Stores `spot` as `common.whitestCell = [x, y]`.
    pub fn set_whitest_cell(&mut self, spot: &BrightSpot) -> PrepResult<()> {
        let common = self
            .extra
            .get_mut("common")
            .ok_or_else(|| PrepError::missing("common"))?;
        let common = common
            .as_object_mut()
            .ok_or_else(|| PrepError::drift("common", "expected an object"))?;
        common.insert(
            WHITEST_CELL_KEY.to_owned(),
            Value::from(vec![spot.x, spot.y]),
        );
        Ok(())
    }
}

/// Reads the metrics file at `path`, applies `corrections`, and writes it
/// back. Returns the number of offsets written.
pub fn correct_file(
    path: &Path,
    corrections: &[OffsetCorrection],
    style: JsonStyle,
) -> PrepResult<usize> {
    let mut metrics: FontMetrics = fsio::read_json(path)?;
    let written = metrics.apply_corrections(corrections)?;
    fsio::write_json(path, &metrics, style)?;
    log::info!(
        "glyphs: corrected {written} offsets in {}",
        path.display()
    );
    Ok(written)
}
