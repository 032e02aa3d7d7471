//! Vertical flip of texture files.
//!
//! The generators write images top row first, while the renderer samples
//! textures with a bottom-left origin.

use std::path::Path;

use image::DynamicImage;

use crate::error::PrepResult;
use crate::fsio;

/// Reverses row order. Color type and dimensions are unchanged.
pub fn flip_vertical(image: &DynamicImage) -> DynamicImage {
    image.flipv()
}

/// Flips the image at `path` in place. The file is replaced atomically in
/// the format its extension names.
pub fn flip_file(path: &Path) -> PrepResult<()> {
    flip_files(&[path])
}

/// Flips every image in `paths` in place.
///
/// All images are decoded, flipped and encoded before the first file is
/// replaced, so a missing or undecodable image leaves every file as it was.
pub fn flip_files<P: AsRef<Path>>(paths: &[P]) -> PrepResult<()> {
    let mut staged = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let flipped = flip_vertical(&fsio::read_image(path)?);
        let bytes = fsio::encode_image(path, &flipped)?;
        staged.push((path, bytes, flipped.width(), flipped.height()));
    }
    for (path, bytes, width, height) in staged {
        fsio::write_atomic(path, &bytes)?;
        log::info!("flip: {} ({width}x{height})", path.display());
    }
    Ok(())
}
