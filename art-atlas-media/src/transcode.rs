//! Size-bounded transcoding to the canonical JPEG format.
//!
//! Every input is decoded, flattened onto white if it carries transparency,
//! pre-scaled if its long edge is over the limit, then JPEG-encoded with a
//! bounded search over quality and dimensions until it fits the byte budget.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, GenericImageView, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::MediaError;

/// Extension of the canonical output format.
pub const CANONICAL_EXTENSION: &str = "jpg";

pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_MAX_DIMENSION: u32 = 2000;

/// Long-edge limit used when the input is far over budget.
pub const AGGRESSIVE_MAX_DIMENSION: u32 = 1200;
/// Input size, as a multiple of the budget, above which the aggressive limit applies.
const AGGRESSIVE_INPUT_FACTOR: u64 = 10;

const START_QUALITY: u8 = 85;
const QUALITY_STEP: u8 = 5;
const QUALITY_FLOOR: u8 = 50;
pub const MAX_ATTEMPTS: u32 = 20;
/// Dimensions only shrink on attempts with a zero-based index above this.
const SHRINK_AFTER_ATTEMPT: u32 = 5;
/// Dimensions only shrink while the output is above this multiple of the budget.
const SHRINK_TRIGGER_RATIO: f64 = 1.5;
const SHRINK_FACTOR: f64 = 0.9;

/// Solid background that transparent pixels are composited onto.
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Byte and dimension limits for a transcoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeBudget {
    pub max_bytes: u64,
    pub max_dimension: u32,
}

impl Default for TranscodeBudget {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

impl TranscodeBudget {
    pub fn is_over(&self, size: u64) -> bool {
        size > self.max_bytes
    }
}

/// Result of a transcode.
#[derive(Debug, Clone)]
pub struct Transcoded {
    /// JPEG bytes.
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Quality the final bytes were encoded at.
    pub quality: u8,
    /// Number of encodes performed.
    pub attempts: u32,
    /// False when the attempt bound ran out before the budget was met.
    pub within_budget: bool,
    pub source_width: u32,
    pub source_height: u32,
}

/// Transcode raw image bytes to a JPEG that fits `budget` where possible.
///
/// Always produces JPEG output, even when the input is already under budget.
/// Missing the budget after [`MAX_ATTEMPTS`] encodes is not an error: the last
/// encode is returned with `within_budget` unset.
pub fn transcode(raw: &[u8], budget: &TranscodeBudget) -> Result<Transcoded, MediaError> {
    let decoded = image::load_from_memory(raw).map_err(MediaError::Decode)?;
    let (source_width, source_height) = decoded.dimensions();
    let mut rgb = flatten_to_rgb(decoded);

    if let Some((w, h)) = prescale_target(source_width, source_height, raw.len() as u64, budget) {
        log::debug!("Pre-scaling {source_width}x{source_height} to {w}x{h}");
        rgb = imageops::resize(&rgb, w, h, FilterType::Lanczos3);
    }

    let mut result = compress_within_budget(rgb, budget.max_bytes, encode_jpeg)?;
    result.source_width = source_width;
    result.source_height = source_height;
    Ok(result)
}

/// Convert to 8-bit RGB, compositing any alpha channel onto [`BACKGROUND`].
pub(crate) fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let a = a as u32;
        let blend = |c: u8, bg: u8| ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
        out.put_pixel(
            x,
            y,
            Rgb([
                blend(r, BACKGROUND[0]),
                blend(g, BACKGROUND[1]),
                blend(b, BACKGROUND[2]),
            ]),
        );
    }
    out
}

/// Target dimensions for the pre-scale step, or `None` if the image is small enough.
///
/// Inputs larger than ten times the byte budget use the aggressive
/// [`AGGRESSIVE_MAX_DIMENSION`] limit (never looser than `max_dimension`).
pub fn prescale_target(
    width: u32,
    height: u32,
    input_len: u64,
    budget: &TranscodeBudget,
) -> Option<(u32, u32)> {
    let limit = if input_len > budget.max_bytes.saturating_mul(AGGRESSIVE_INPUT_FACTOR) {
        AGGRESSIVE_MAX_DIMENSION.min(budget.max_dimension)
    } else {
        budget.max_dimension
    };
    if width.max(height) <= limit || limit == 0 {
        return None;
    }
    Some(scale_long_edge(width, height, limit))
}

/// Scale so the long edge equals `limit`; the short edge follows the same ratio, rounded down.
pub(crate) fn scale_long_edge(width: u32, height: u32, limit: u32) -> (u32, u32) {
    let (w, h, l) = (width as u64, height as u64, limit as u64);
    if width > height {
        (limit, ((h * l) / w).max(1) as u32)
    } else {
        (((w * l) / h).max(1) as u32, limit)
    }
}

/// Encode repeatedly until the output fits `max_bytes` or the attempt bound is hit.
///
/// Quality starts at 85 and drops by 5 per failed attempt down to 50. From
/// the seventh attempt on, while the output is still more than 1.5x the
/// budget, both dimensions also shrink by 10% before the next encode.
pub(crate) fn compress_within_budget<F>(
    mut img: RgbImage,
    max_bytes: u64,
    mut encode: F,
) -> Result<Transcoded, MediaError>
where
    F: FnMut(&RgbImage, u8) -> Result<Vec<u8>, MediaError>,
{
    let mut quality = START_QUALITY;
    let mut bytes = encode(&img, quality)?;
    let mut attempts = 1;

    loop {
        let size = bytes.len() as u64;
        let (width, height) = img.dimensions();
        log::debug!("Attempt {attempts}: {width}x{height} q{quality} -> {size} bytes");

        let within_budget = size <= max_bytes;
        if within_budget || attempts == MAX_ATTEMPTS {
            if !within_budget {
                log::warn!(
                    "Budget of {max_bytes} bytes not met after {MAX_ATTEMPTS} attempts ({size} bytes)"
                );
            }
            return Ok(Transcoded {
                bytes,
                width,
                height,
                quality,
                attempts,
                within_budget,
                source_width: width,
                source_height: height,
            });
        }

        // `attempts - 1` is the zero-based index of the encode just measured
        if attempts - 1 > SHRINK_AFTER_ATTEMPT
            && size as f64 > max_bytes as f64 * SHRINK_TRIGGER_RATIO
        {
            let w = ((width as f64 * SHRINK_FACTOR) as u32).max(1);
            let h = ((height as f64 * SHRINK_FACTOR) as u32).max(1);
            img = imageops::resize(&img, w, h, FilterType::Lanczos3);
        }
        quality = quality.saturating_sub(QUALITY_STEP).max(QUALITY_FLOOR);
        bytes = encode(&img, quality)?;
        attempts += 1;
    }
}

pub(crate) fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, MediaError> {
    let mut out = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
        encoder
            .encode(
                img.as_raw(),
                img.width(),
                img.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(MediaError::Encode)?;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "tests/transcode_tests.rs"]
mod tests;
