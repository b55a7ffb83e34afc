//! RGBA raster buffer shared by all operators.
//!
//! Pixels are stored as an `ndarray::Array3<u8>` of shape `(height, width, 4)`
//! in standard layout, so the flat byte at `(y * width + x) * 4 + channel`
//! is `array[[y, x, channel]]`.

use ndarray::{Array3, ArrayView3};

use crate::error::{CoreError, Result};

/// Number of interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Index of the alpha channel.
pub const ALPHA: usize = 3;

/// Width, height and interleaved RGBA bytes of one image.
///
/// Dimensions are fixed at construction. Operators read a buffer and return a
/// freshly allocated one; they never write into their input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    data: Array3<u8>,
}

impl RasterBuffer {
    /// Create a transparent black buffer.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            data: Array3::<u8>::zeros((height, width, CHANNELS)),
        })
    }

    /// Create a buffer where every pixel has the same RGBA value.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self> {
        check_dimensions(width, height)?;
        let data = Array3::from_shape_fn((height, width, CHANNELS), |(_, _, c)| rgba[c]);
        Ok(Self { data })
    }

    /// Wrap a flat RGBA byte vector, as produced by an image decoder.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - Interleaved RGBA bytes, length must be `width * height * 4`
    pub fn from_raw(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;

        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| {
                CoreError::InvalidInput(format!("{}x{} image is too large", width, height))
            })?;
        if pixels.len() != expected {
            return Err(CoreError::InvalidInput(format!(
                "expected {} bytes for a {}x{} RGBA image, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }

        let data = Array3::from_shape_vec((height, width, CHANNELS), pixels)
            .map_err(|e| CoreError::InvalidInput(e.to_string()))?;
        Ok(Self { data })
    }

    /// Wrap an existing `(height, width, 4)` array.
    pub fn from_array(array: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = array.dim();
        check_dimensions(width, height)?;
        if channels != CHANNELS {
            return Err(CoreError::InvalidInput(format!(
                "expected {} channels, got {}",
                CHANNELS, channels
            )));
        }

        let data = if array.is_standard_layout() {
            array
        } else {
            array.as_standard_layout().into_owned()
        };
        Ok(Self { data })
    }

    /// Wrap operator output. The caller guarantees shape `(h, w, 4)` with h, w > 0.
    pub(crate) fn from_output(data: Array3<u8>) -> Self {
        debug_assert_eq!(data.dim().2, CHANNELS);
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some([
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
            self.data[[y, x, 3]],
        ])
    }

    /// Read-only `(height, width, 4)` view of the pixels.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Copy the pixels out as flat RGBA bytes.
    pub fn to_raw(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }

    /// Consume the buffer and return its flat RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        if !self.data.is_standard_layout() {
            return self.to_raw();
        }
        let len = self.data.len();
        let (mut raw, offset) = self.data.into_raw_vec_and_offset();
        raw.drain(..offset.unwrap_or(0));
        raw.truncate(len);
        raw
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidInput(format!(
            "image dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}
