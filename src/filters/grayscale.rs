//! Grayscale conversion filter.
//!
//! Three conversion methods are supported:
//! - **Luminance**: Rec. 601 weights `0.299 R + 0.587 G + 0.114 B` (default)
//! - **Average**: `(R + G + B) / 3`
//! - **Lightness**: `(max(R, G, B) + min(R, G, B)) / 2`
//!
//! All three are evaluated in integer fixed point, so the gray value is the
//! exact result rounded half up. It is written to R, G and B; alpha is preserved.

use std::fmt;
use std::str::FromStr;

use log::warn;
use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::raster::{RasterBuffer, ALPHA, CHANNELS};

/// ITU-R BT.601 luminance coefficients, scaled by `LUMA_SCALE`
const LUMA_R: u32 = 299;
const LUMA_G: u32 = 587;
const LUMA_B: u32 = 114;
const LUMA_SCALE: u32 = 1000;

/// How RGB is collapsed into a single gray value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ConversionMethod {
    #[default]
    Luminance,
    Average,
    Lightness,
}

impl ConversionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionMethod::Luminance => "luminance",
            ConversionMethod::Average => "average",
            ConversionMethod::Lightness => "lightness",
        }
    }

    /// Lenient lookup: any unrecognized name falls back to `Luminance`.
    ///
    /// Use `str::parse` instead when an unknown name should be an error.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!("unknown grayscale method '{}', using luminance", name);
            ConversionMethod::Luminance
        })
    }

    /// Gray value for one pixel, rounded half up.
    #[inline]
    pub fn gray(&self, r: u8, g: u8, b: u8) -> u8 {
        let (r, g, b) = (r as u32, g as u32, b as u32);
        let gray = match self {
            ConversionMethod::Luminance => {
                (LUMA_R * r + LUMA_G * g + LUMA_B * b + LUMA_SCALE / 2) / LUMA_SCALE
            }
            ConversionMethod::Average => (r + g + b + 1) / 3,
            ConversionMethod::Lightness => (r.max(g).max(b) + r.min(g).min(b) + 1) / 2,
        };
        // Weights sum to at most 1, so gray never exceeds 255.
        gray.min(255) as u8
    }
}

impl FromStr for ConversionMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "luminance" => Ok(ConversionMethod::Luminance),
            "average" => Ok(ConversionMethod::Average),
            "lightness" => Ok(ConversionMethod::Lightness),
            _ => Err(CoreError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl From<String> for ConversionMethod {
    fn from(name: String) -> Self {
        ConversionMethod::from_name(&name)
    }
}

impl fmt::Display for ConversionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert an RGBA image to grayscale.
///
/// Output is RGBA with R=G=B=gray, A preserved.
///
/// # Arguments
/// * `input` - Source image
/// * `method` - How to combine R, G and B
///
/// # Returns
/// New buffer of the same dimensions
pub fn grayscale_rgba_u8(input: &RasterBuffer, method: ConversionMethod) -> RasterBuffer {
    let src = input.view();
    let (height, width, _) = src.dim();
    let mut output = Array3::<u8>::zeros((height, width, CHANNELS));

    for y in 0..height {
        for x in 0..width {
            let r = src[[y, x, 0]];
            let g = src[[y, x, 1]];
            let b = src[[y, x, 2]];

            let gray = method.gray(r, g, b);

            output[[y, x, 0]] = gray;
            output[[y, x, 1]] = gray;
            output[[y, x, 2]] = gray;
            output[[y, x, ALPHA]] = src[[y, x, ALPHA]];
        }
    }

    RasterBuffer::from_output(output)
}
