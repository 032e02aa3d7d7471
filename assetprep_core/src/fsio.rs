//! File I/O shared by the steps: whole-file reads, JSON decode/encode, and
//! atomic replacement of destination files.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{PrepError, PrepResult};

/// How JSON output is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonStyle {
    /// Indented output instead of a single line.
    pub pretty: bool,
}

pub fn read_bytes(path: &Path) -> PrepResult<Vec<u8>> {
    fs::read(path).map_err(|e| PrepError::io(path, e))
}

pub fn read_text(path: &Path) -> PrepResult<String> {
    fs::read_to_string(path).map_err(|e| PrepError::io(path, e))
}

/// Reads and decodes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> PrepResult<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| PrepError::malformed(path.display().to_string(), e))
}

/// Encodes `value` as JSON and atomically replaces `path` with it.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, style: JsonStyle) -> PrepResult<()> {
    let encoded = if style.pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    };
    let bytes = encoded.map_err(|e| PrepError::malformed(path.display().to_string(), e))?;
    write_atomic(path, &bytes)
}

/// Decodes the image at `path`. The format comes from the extension, or
/// from the content when the extension is unknown.
pub fn read_image(path: &Path) -> PrepResult<DynamicImage> {
    let bytes = read_bytes(path)?;
    let format = match ImageFormat::from_path(path) {
        Ok(format) => format,
        Err(_) => image::guess_format(&bytes)
            .map_err(|e| PrepError::malformed(path.display().to_string(), e))?,
    };
    image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| PrepError::malformed(path.display().to_string(), e))
}

/// Encodes `image` in the format named by the extension of `path`.
/// Nothing is written.
pub fn encode_image(path: &Path, image: &DynamicImage) -> PrepResult<Vec<u8>> {
    let format = ImageFormat::from_path(path).map_err(|source| PrepError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, format)
        .map_err(|source| PrepError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(encoded.into_inner())
}

/// Encodes `image` for `path` and atomically replaces the file.
pub fn write_image(path: &Path, image: &DynamicImage) -> PrepResult<()> {
    let bytes = encode_image(path, image)?;
    write_atomic(path, &bytes)
}

/// Writes `bytes` to a temp file next to `path`, then renames it over
/// `path`. On failure the previous contents of `path` are left in place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> PrepResult<()> {
    let tmp = temp_path(path)?;
    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(PrepError::io(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(PrepError::io(path, e));
    }
    log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Hidden sibling of `path` used as the staging file for `write_atomic`.
fn temp_path(path: &Path) -> PrepResult<PathBuf> {
    let name = path.file_name().ok_or_else(|| PrepError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    Ok(path.with_file_name(format!(
        ".{}.{}.tmp",
        name.to_string_lossy(),
        std::process::id()
    )))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use image::{DynamicImage, GrayImage, Luma};
    use serde_json::{Value, json};

    use super::{
        JsonStyle, encode_image, read_image, read_json, temp_path, write_atomic, write_image,
        write_json,
    };
    use crate::error::PrepError;
    use crate::test_util::TestDir;

    #[test]
    fn write_then_read_json() {
        let dir = TestDir::new("fsio_roundtrip");
        let path = dir.path.join("out.json");
        let value = json!({"b": 1, "a": [1, 2, 3], "c": "é"});
        write_json(&path, &value, JsonStyle::default()).expect("write");
        let back: Value = read_json(&path).expect("read");
        assert_eq!(back, value);
    }

    #[test]
    fn key_order_is_preserved() {
        let dir = TestDir::new("fsio_order");
        let path = dir.path.join("out.json");
        fs::write(&path, r#"{"zeta":1,"alpha":2}"#).expect("seed");
        let value: Value = read_json(&path).expect("read");
        write_json(&path, &value, JsonStyle::default()).expect("write");
        assert_eq!(fs::read_to_string(&path).expect("reread"), r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn pretty_output_is_indented() {
        let dir = TestDir::new("fsio_pretty");
        let path = dir.path.join("out.json");
        write_json(&path, &json!({"a": 1}), JsonStyle { pretty: true }).expect("write");
        assert_eq!(fs::read_to_string(&path).expect("reread"), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = TestDir::new("fsio_missing");
        let err = read_json::<Value>(&dir.path.join("nope.json")).unwrap_err();
        assert!(matches!(err, PrepError::FileNotFound { .. }));
    }

    #[test]
    fn bad_json_is_malformed() {
        let dir = TestDir::new("fsio_bad");
        let path = dir.path.join("bad.json");
        fs::write(&path, "{not json").expect("seed");
        let err = read_json::<Value>(&path).unwrap_err();
        assert!(matches!(err, PrepError::MalformedDocument { .. }));
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = TestDir::new("fsio_atomic");
        let path = dir.path.join("data.bin");
        fs::write(&path, b"old").expect("seed");
        write_atomic(&path, b"new").expect("write");
        assert_eq!(fs::read(&path).expect("reread"), b"new");
        let leftovers: Vec<_> = fs::read_dir(&dir.path)
            .expect("list")
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }

    #[test]
    fn failed_write_keeps_old_contents() {
        let dir = TestDir::new("fsio_failed");
        let target = dir.path.join("missing_dir").join("data.json");
        let err = write_atomic(&target, b"x").unwrap_err();
        assert!(matches!(err, PrepError::FileNotFound { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn png_roundtrip_keeps_pixels() {
        let dir = TestDir::new("fsio_png");
        let path = dir.path.join("tex.png");
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(3, 2, |x, y| {
            Luma([(x + 3 * y) as u8 * 40])
        }));
        write_image(&path, &img).expect("write");
        let back = read_image(&path).expect("read");
        assert_eq!(back, img);
    }

    #[test]
    fn unknown_extension_fails_to_encode() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(1, 1));
        let err = encode_image(Path::new("tex.unknownformat"), &img).unwrap_err();
        assert!(matches!(err, PrepError::Image { .. }));
    }

    #[test]
    fn undecodable_image_is_malformed() {
        let dir = TestDir::new("fsio_bad_png");
        let path = dir.path.join("tex.png");
        fs::write(&path, b"not a png").expect("seed");
        let err = read_image(&path).unwrap_err();
        assert!(matches!(err, PrepError::MalformedDocument { .. }));
    }

    #[test]
    fn missing_image_is_file_not_found() {
        let dir = TestDir::new("fsio_no_png");
        let err = read_image(&dir.path.join("tex.png")).unwrap_err();
        assert!(matches!(err, PrepError::FileNotFound { .. }));
    }

    #[test]
    fn temp_path_is_hidden_sibling() {
        let tmp = temp_path(Path::new("assets/data.json")).expect("temp path");
        assert_eq!(tmp.parent(), Some(Path::new("assets")));
        let name = tmp.file_name().expect("name").to_string_lossy().into_owned();
        assert!(name.starts_with(".data.json."));
        assert!(name.ends_with(".tmp"));
    }
}
