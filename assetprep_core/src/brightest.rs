//! Brightest-sample search over an SDF font texture.
//!
//! The renderer needs one texel that is guaranteed to be deep inside a
//! glyph (distance value at its maximum) to draw solid fills from the font
//! atlas. The coordinate is stored in the metrics file as
//! `common.whitestCell`.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Pixel};

use crate::error::{PrepError, PrepResult};
use crate::fsio::{self, JsonStyle};
use crate::glyphs::FontMetrics;

/// Which samples take part in the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Skip the alpha channel of images that have one.
    pub ignore_alpha: bool,
}

/// Location and value of the maximum sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightSpot {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Channel index within the pixel.
    pub channel: usize,
    /// Raw sample value in the image's native range.
    pub value: f64,
}

/// Finds the maximum sample of `image`.
///
/// Samples are visited row-major with channels innermost, and only a
/// strictly greater sample replaces the current best, so ties resolve to
/// the first occurrence. NaN samples are skipped.
pub fn brightest_sample(image: &DynamicImage, options: ScanOptions) -> PrepResult<BrightSpot> {
    let skip_alpha = options.ignore_alpha && image.color().has_alpha();
    let spot = match image {
        DynamicImage::ImageLuma8(buf) => scan(buf, skip_alpha),
        DynamicImage::ImageLumaA8(buf) => scan(buf, skip_alpha),
        DynamicImage::ImageRgb8(buf) => scan(buf, skip_alpha),
        DynamicImage::ImageRgba8(buf) => scan(buf, skip_alpha),
        DynamicImage::ImageLuma16(buf) => scan(buf, skip_alpha),
        DynamicImage::ImageLumaA16(buf) => scan(buf, skip_alpha),
        DynamicImage::ImageRgb16(buf) => scan(buf, skip_alpha),
        DynamicImage::ImageRgba16(buf) => scan(buf, skip_alpha),
        DynamicImage::ImageRgb32F(buf) => scan(buf, skip_alpha),
        DynamicImage::ImageRgba32F(buf) => scan(buf, skip_alpha),
        // Converted alpha is synthetic unless the source had one.
        other => scan(
            &other.to_rgba32f(),
            options.ignore_alpha || !other.color().has_alpha(),
        ),
    };
    spot.ok_or_else(|| PrepError::malformed("image", "no samples to scan"))
}

/// Row-major argmax over the raw samples. With `skip_alpha` the last
/// channel of every pixel is ignored.
fn scan<P>(buf: &ImageBuffer<P, Vec<P::Subpixel>>, skip_alpha: bool) -> Option<BrightSpot>
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    let channels = usize::from(P::CHANNEL_COUNT);
    let alpha = skip_alpha.then_some(channels - 1);
    let width = buf.width() as usize;

    let mut best: Option<BrightSpot> = None;
    for (i, pixel) in buf.as_raw().chunks_exact(channels).enumerate() {
        for (channel, &sample) in pixel.iter().enumerate() {
            if alpha == Some(channel) {
                continue;
            }
            let value: f64 = sample.into();
            if value.is_nan() || best.is_some_and(|b| value <= b.value) {
                continue;
            }
            best = Some(BrightSpot {
                x: (i % width) as u32,
                y: (i / width) as u32,
                channel,
                value,
            });
        }
    }
    best
}

/// Finds the brightest texel of the image at `image_path` and records it in
/// the metrics file at `metrics_path`.
pub fn mark_whitest_cell(
    image_path: &Path,
    metrics_path: &Path,
    options: ScanOptions,
    style: JsonStyle,
) -> PrepResult<BrightSpot> {
    let image = fsio::read_image(image_path)?;
    let spot = brightest_sample(&image, options).map_err(|e| e.in_document(image_path))?;
    log::info!(
        "max value of {} found at ({}, {}) in {}",
        spot.value,
        spot.x,
        spot.y,
        image_path.display()
    );

    let mut metrics: FontMetrics = fsio::read_json(metrics_path)?;
    metrics.set_whitest_cell(&spot)?;
    fsio::write_json(metrics_path, &metrics, style)?;
    Ok(spot)
}
