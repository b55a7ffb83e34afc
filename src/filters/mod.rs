//! Filter modules for image processing effects.
//!
//! ## Supported Format
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGBA8 | (H, W, 4) | u8 | Red, green, blue, alpha, 0-255 |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - Read a [`RasterBuffer`](crate::RasterBuffer), return a new one
//! - **Alpha preservation** - Alpha is never modified
//! - **Saturation** - Results are rounded and clamped to 0-255
//! - **Thread-safe** - Convolution uses rayon for row-parallel processing
//!
//! ## Filter Categories
//!
//! - **Pixel-wise**: grayscale, contrast, brightness
//! - **Convolution**: sharpen, blur, edge detection (3x3 kernels from [`kernel`])

pub mod grayscale;
pub mod color_adjust;
pub mod kernel;
pub mod convolve;
