use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};

use super::*;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    })
}

/// Deterministic pseudo-random noise; compresses badly on purpose.
fn noise(width: u32, height: u32) -> RgbImage {
    let mut state: u32 = 0x1234_5678;
    RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        Rgb([next(), next(), next()])
    })
}

fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Fake encoder whose output size is width * height * quality / 100.
fn sized_by_area(img: &RgbImage, quality: u8) -> Result<Vec<u8>, MediaError> {
    let len = img.width() as usize * img.height() as usize * quality as usize / 100;
    Ok(vec![0u8; len])
}

// -- format normalization --

#[test]
fn test_under_budget_input_is_still_jpeg() {
    let raw = png_bytes(DynamicImage::ImageRgb8(gradient(64, 48)));
    let out = transcode(&raw, &TranscodeBudget::default()).unwrap();
    assert_eq!(&out.bytes[..3], &JPEG_MAGIC);
    assert_eq!((out.width, out.height), (64, 48));
    assert!(out.within_budget);
    assert_eq!(out.attempts, 1);
    assert_eq!(out.quality, 85);
    assert_eq!(
        image::guess_format(&out.bytes).unwrap(),
        ImageFormat::Jpeg
    );
}

#[test]
fn test_transparent_input_is_flattened_onto_white() {
    let rgba = RgbaImage::from_pixel(32, 32, Rgba([255, 0, 0, 0]));
    let raw = png_bytes(DynamicImage::ImageRgba8(rgba));
    let out = transcode(&raw, &TranscodeBudget::default()).unwrap();

    let decoded = image::load_from_memory(&out.bytes).unwrap().into_rgb8();
    let px = decoded.get_pixel(16, 16);
    assert!(px.0.iter().all(|&c| c >= 250), "expected white, got {px:?}");
}

#[test]
fn test_flatten_blends_partial_alpha() {
    let rgba = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 128]));
    let rgb = flatten_to_rgb(DynamicImage::ImageRgba8(rgba));
    assert_eq!(rgb.get_pixel(0, 0), &Rgb([127, 127, 127]));
}

#[test]
fn test_flatten_grayscale_variants() {
    let luma = image::GrayImage::from_pixel(2, 2, Luma([40]));
    let rgb = flatten_to_rgb(DynamicImage::ImageLuma8(luma));
    assert_eq!(rgb.get_pixel(1, 1), &Rgb([40, 40, 40]));

    let luma_alpha = image::GrayAlphaImage::from_pixel(2, 2, LumaA([0, 0]));
    let rgb = flatten_to_rgb(DynamicImage::ImageLumaA8(luma_alpha));
    assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
}

#[test]
fn test_undecodable_input_is_a_decode_error() {
    let err = transcode(b"<svg xmlns='http://www.w3.org/2000/svg'/>", &TranscodeBudget::default())
        .unwrap_err();
    assert!(err.is_decode());
}

// -- pre-scale --

#[test]
fn test_prescale_uses_aggressive_limit_for_huge_inputs() {
    // 15 MB input against a 1 MiB budget: over 10x, so the 1200 px limit applies
    let target = prescale_target(6000, 4000, 15 * 1024 * 1024, &TranscodeBudget::default());
    assert_eq!(target, Some((1200, 800)));
}

#[test]
fn test_prescale_uses_max_dimension_for_moderate_inputs() {
    let target = prescale_target(3000, 1500, 2 * 1024 * 1024, &TranscodeBudget::default());
    assert_eq!(target, Some((2000, 1000)));
}

#[test]
fn test_prescale_portrait_rounds_down() {
    let target = prescale_target(1000, 3000, 500_000, &TranscodeBudget::default());
    assert_eq!(target, Some((666, 2000)));
}

#[test]
fn test_prescale_skips_small_images() {
    assert_eq!(
        prescale_target(1800, 1200, 2 * 1024 * 1024, &TranscodeBudget::default()),
        None
    );
    // Huge file but already within the aggressive limit
    assert_eq!(
        prescale_target(1200, 900, 50 * 1024 * 1024, &TranscodeBudget::default()),
        None
    );
}

#[test]
fn test_prescale_aggressive_never_looser_than_max_dimension() {
    let budget = TranscodeBudget {
        max_bytes: 1000,
        max_dimension: 800,
    };
    assert_eq!(prescale_target(1600, 1600, 1_000_000, &budget), Some((800, 800)));
}

#[test]
fn test_transcode_prescales_and_keeps_aspect_ratio() {
    let raw = png_bytes(DynamicImage::ImageRgb8(gradient(800, 400)));
    let budget = TranscodeBudget {
        max_bytes: 10 * 1024 * 1024,
        max_dimension: 400,
    };
    let out = transcode(&raw, &budget).unwrap();
    assert_eq!((out.width, out.height), (400, 200));
    assert_eq!((out.source_width, out.source_height), (800, 400));

    let decoded = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (400, 200));
}

#[test]
fn test_transcode_large_input_with_default_budget() {
    // Noise PNG far over ten times the 1 MiB default: aggressive 1200 px pre-scale
    let raw = png_bytes(DynamicImage::ImageRgb8(noise(3000, 2000)));
    let budget = TranscodeBudget::default();
    assert!(raw.len() as u64 > 10 * budget.max_bytes);

    let out = transcode(&raw, &budget).unwrap();
    assert_eq!(&out.bytes[..3], &JPEG_MAGIC);
    assert!(out.within_budget);
    assert!(out.bytes.len() as u64 <= budget.max_bytes);
    assert_eq!((out.width, out.height), (1200, 800));
    assert_eq!((out.source_width, out.source_height), (3000, 2000));

    let decoded = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1200, 800));
}

// -- compression loop --

#[test]
fn test_compress_first_attempt_fits() {
    let out = compress_within_budget(gradient(100, 100), 100_000, sized_by_area).unwrap();
    assert_eq!(out.attempts, 1);
    assert_eq!(out.quality, 85);
    assert!(out.within_budget);
}

#[test]
fn test_compress_lowers_quality_without_shrinking_when_close() {
    // Sizes run 8500, 8000, ... 5500, 5000: never above 1.5x the budget
    // after the sixth attempt, so resolution is preserved.
    let out = compress_within_budget(gradient(100, 100), 5000, sized_by_area).unwrap();
    assert!(out.within_budget);
    assert_eq!(out.attempts, 8);
    assert_eq!(out.quality, 50);
    assert_eq!((out.width, out.height), (100, 100));
    assert_eq!(out.bytes.len(), 5000);
}

#[test]
fn test_compress_shrinks_then_gives_up_best_effort() {
    // From the seventh attempt the image shrinks 100 -> 90 -> 81 -> 72 -> 64
    // -> 57 -> 51; at 51x51 the output (1300) is within 1.5x of the budget so
    // shrinking stops and the quality floor holds it above budget.
    let out = compress_within_budget(gradient(100, 100), 1000, sized_by_area).unwrap();
    assert!(!out.within_budget);
    assert_eq!(out.attempts, MAX_ATTEMPTS);
    assert_eq!(out.quality, 50);
    assert_eq!((out.width, out.height), (51, 51));
    assert_eq!(out.bytes.len(), 1300);
}

#[test]
fn test_compress_quality_never_drops_below_floor() {
    let mut seen = Vec::new();
    let out = compress_within_budget(gradient(10, 10), 0, |_, q| {
        seen.push(q);
        Ok(vec![0u8; 10])
    })
    .unwrap();
    assert!(!out.within_budget);
    assert_eq!(seen.len(), MAX_ATTEMPTS as usize);
    assert_eq!(&seen[..4], &[85, 80, 75, 70]);
    assert!(seen.iter().all(|&q| q >= 50));
    assert_eq!(*seen.last().unwrap(), 50);
}

#[test]
fn test_compress_returns_final_encode_when_budget_missed() {
    let mut calls = 0usize;
    let out = compress_within_budget(gradient(10, 10), 0, |_, _| {
        calls += 1;
        Ok(vec![0u8; calls])
    })
    .unwrap();
    assert_eq!(calls, MAX_ATTEMPTS as usize);
    assert_eq!(out.bytes.len(), MAX_ATTEMPTS as usize);
    assert_eq!(out.attempts, MAX_ATTEMPTS);
}

#[test]
fn test_compress_propagates_encoder_errors() {
    let result = compress_within_budget(gradient(4, 4), 10, |_, _| {
        Err(MediaError::store("encoder exploded"))
    });
    assert!(result.is_err());
}

#[test]
fn test_real_noise_respects_budget_or_exhausts_attempts() {
    let raw = png_bytes(DynamicImage::ImageRgb8(noise(600, 300)));
    let budget = TranscodeBudget {
        max_bytes: 80_000,
        max_dimension: 2000,
    };
    let out = transcode(&raw, &budget).unwrap();

    assert_eq!(&out.bytes[..3], &JPEG_MAGIC);
    assert!(out.bytes.len() as u64 <= budget.max_bytes || out.attempts == MAX_ATTEMPTS);
    assert!((out.bytes.len() as u64) < raw.len() as u64);
    let ratio = out.width as f64 / out.height as f64;
    assert!((ratio - 2.0).abs() < 0.1, "aspect ratio drifted to {ratio}");
}
