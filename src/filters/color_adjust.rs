//! Color adjustment filters: Contrast, Brightness.
//!
//! These are pixel-wise operations that don't require spatial context.
//! Only R, G and B are remapped; alpha is always preserved unchanged.
//! Results are rounded to the nearest integer and clamped to 0-255.

use ndarray::Array3;

use crate::error::{CoreError, Result};
use crate::raster::{RasterBuffer, ALPHA, CHANNELS};

/// Channel value contrast pivots around.
const MID_GRAY: f32 = 128.0;

/// Largest absolute brightness level.
pub const MAX_BRIGHTNESS_LEVEL: i32 = 100;

// ============================================================================
// Shared helper
// ============================================================================

/// Apply `f` to every color channel, copying alpha.
fn remap_color_channels<F>(input: &RasterBuffer, f: F) -> RasterBuffer
where
    F: Fn(u8) -> u8,
{
    let src = input.view();
    let (height, width, _) = src.dim();
    let mut output = Array3::<u8>::zeros((height, width, CHANNELS));

    for y in 0..height {
        for x in 0..width {
            for c in 0..ALPHA {
                output[[y, x, c]] = f(src[[y, x, c]]);
            }
            output[[y, x, ALPHA]] = src[[y, x, ALPHA]];
        }
    }

    RasterBuffer::from_output(output)
}

#[inline]
fn saturate(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

// ============================================================================
// Contrast
// ============================================================================

/// Contrast factor `259 * (level + 255) / (255 * (259 - level))`.
///
/// Fails with `InvalidParameter` when the denominator is zero or negative
/// (`level >= 259`) or the factor is not finite.
pub fn contrast_factor(level: i32) -> Result<f32> {
    let level = level as f32;
    let denominator = 255.0 * (259.0 - level);
    if denominator <= 0.0 {
        return Err(CoreError::InvalidParameter(format!(
            "contrast level {} must be below 259",
            level
        )));
    }

    let factor = 259.0 * (level + 255.0) / denominator;
    if !factor.is_finite() {
        return Err(CoreError::InvalidParameter(format!(
            "contrast level {} gives a non-finite factor",
            level
        )));
    }
    Ok(factor)
}

/// Adjust image contrast.
///
/// # Arguments
/// * `input` - Source image
/// * `level` - Contrast adjustment, nominally -100 (flat gray) to 100 (strong),
///   0 = no change
///
/// # Returns
/// Contrast-adjusted image, or `InvalidParameter` if `level` gives no usable factor
pub fn contrast_u8(input: &RasterBuffer, level: i32) -> Result<RasterBuffer> {
    let factor = contrast_factor(level)?;

    Ok(remap_color_channels(input, |v| {
        saturate(factor * (v as f32 - MID_GRAY) + MID_GRAY)
    }))
}

// ============================================================================
// Brightness
// ============================================================================

/// Adjust image brightness.
///
/// # Arguments
/// * `input` - Source image
/// * `level` - Brightness adjustment: -100 (black) to 100 (white), 0 = no change.
///   The channel offset is `level * 255 / 100`.
///
/// # Returns
/// Brightness-adjusted image, or `InvalidParameter` when `level` is out of range
pub fn brightness_u8(input: &RasterBuffer, level: i32) -> Result<RasterBuffer> {
    if !(-MAX_BRIGHTNESS_LEVEL..=MAX_BRIGHTNESS_LEVEL).contains(&level) {
        return Err(CoreError::InvalidParameter(format!(
            "brightness level {} outside -{}..={}",
            level, MAX_BRIGHTNESS_LEVEL, MAX_BRIGHTNESS_LEVEL
        )));
    }

    let offset = level as f32 * 255.0 / MAX_BRIGHTNESS_LEVEL as f32;
    Ok(remap_color_channels(input, |v| saturate(v as f32 + offset)))
}
