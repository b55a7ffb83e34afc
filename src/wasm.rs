//! WebAssembly exports for the pixel transform filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are
//! passed as flat RGBA bytes (`ImageData.data`) plus width and height.
//!
//! WASM runs without a thread pool, so every call uses
//! [`PipelineOptions::sequential`]. Errors reach JavaScript as `Error`
//! objects carrying the `CoreError` message.

use wasm_bindgen::prelude::*;

use crate::{ConversionMethod, FilterRequest, PipelineOptions, RasterBuffer, TransformPipeline};

fn run(
    data: &[u8],
    width: usize,
    height: usize,
    request: FilterRequest,
) -> Result<Vec<u8>, JsError> {
    let input = RasterBuffer::from_raw(width, height, data.to_vec())?;
    let mut pipeline = TransformPipeline::new(PipelineOptions::sequential());
    let result = pipeline.apply(&input, &request)?;
    Ok(result.into_raw())
}

// ============================================================================
// Generic Dispatch
// ============================================================================

/// Apply a filter described as JSON.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `request` - e.g. `{"filter": "sharpen", "intensity": 50}`
///
/// # Returns
/// Flat array of RGBA bytes with the same dimensions
#[wasm_bindgen]
pub fn apply_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    request: &str,
) -> Result<Vec<u8>, JsError> {
    let request: FilterRequest = serde_json::from_str(request)?;
    run(data, width, height, request)
}

// ============================================================================
// Color Remap Filters
// ============================================================================

/// Convert to grayscale. Unknown methods fall back to "luminance".
#[wasm_bindgen]
pub fn grayscale_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    method: &str,
) -> Result<Vec<u8>, JsError> {
    let method = ConversionMethod::from_name(method);
    run(data, width, height, FilterRequest::Grayscale { method })
}

/// Adjust contrast, `level` in -100..=100.
#[wasm_bindgen]
pub fn contrast_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    level: i32,
) -> Result<Vec<u8>, JsError> {
    run(data, width, height, FilterRequest::Contrast { level })
}

/// Adjust brightness, `level` in -100..=100.
#[wasm_bindgen]
pub fn brightness_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    level: i32,
) -> Result<Vec<u8>, JsError> {
    run(data, width, height, FilterRequest::Brightness { level })
}

// ============================================================================
// Convolution Filters
// ============================================================================

/// Sharpen, `intensity` in 1..=100.
#[wasm_bindgen]
pub fn sharpen_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    intensity: u8,
) -> Result<Vec<u8>, JsError> {
    run(data, width, height, FilterRequest::Sharpen { intensity })
}

/// Blur, `intensity` in 1..=100.
#[wasm_bindgen]
pub fn blur_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    intensity: u8,
) -> Result<Vec<u8>, JsError> {
    run(data, width, height, FilterRequest::Blur { intensity })
}

/// Edge detection, `intensity` in 1..=100.
#[wasm_bindgen]
pub fn edge_detect_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    intensity: u8,
) -> Result<Vec<u8>, JsError> {
    run(data, width, height, FilterRequest::EdgeDetect { intensity })
}
