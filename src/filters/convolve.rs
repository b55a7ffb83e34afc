//! 3x3 convolution shared by sharpen, blur and edge detection.
//!
//! For every interior pixel and each of R, G, B:
//!
//! ```text
//! sum = Σ input[y + ky, x + kx, c] * kernel[(ky + 1) * 3 + (kx + 1)]    ky, kx ∈ -1..=1
//! ```
//!
//! The sum is accumulated in f64, so any finite `f32` kernel gives a finite
//! sum, then rounded and clamped to 0-255. Alpha is copied everywhere, and
//! the 1-pixel border is copied verbatim from the source. Images narrower or
//! shorter than 3 pixels have no interior and come back unchanged.
//!
//! Each output row depends only on the read-only source, so interior rows are
//! split across the rayon pool for images at or above the parallel threshold.

use log::trace;
use ndarray::{s, ArrayView3, ArrayViewMut2, Axis};
use rayon::prelude::*;

use super::kernel::Kernel;
use crate::error::{CoreError, Result};
use crate::raster::{RasterBuffer, ALPHA};

/// Pixel count from which rows are convolved in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64 * 64;

/// Convolve with the default parallel threshold.
///
/// # Arguments
/// * `input` - Source image
/// * `kernel` - Weights, applied as given (no normalization)
///
/// # Returns
/// New image of the same dimensions, or `InvalidParameter` for a non-finite kernel
pub fn convolve_3x3(input: &RasterBuffer, kernel: &Kernel) -> Result<RasterBuffer> {
    convolve_3x3_with_threshold(input, kernel, DEFAULT_PARALLEL_THRESHOLD)
}

/// Convolve, parallelizing rows when `width * height >= parallel_threshold`.
///
/// Output is byte-identical whichever path runs.
pub fn convolve_3x3_with_threshold(
    input: &RasterBuffer,
    kernel: &Kernel,
    parallel_threshold: usize,
) -> Result<RasterBuffer> {
    if !kernel.is_finite() {
        return Err(CoreError::InvalidParameter(format!(
            "kernel has non-finite weights: {:?}",
            kernel.weights()
        )));
    }

    let src = input.view();
    let (height, width, _) = src.dim();

    // Border pixels and every alpha value are already final.
    let mut output = src.to_owned();
    if width < 3 || height < 3 {
        return Ok(RasterBuffer::from_output(output));
    }

    let parallel = width * height >= parallel_threshold;
    trace!(
        "convolving {}x{} ({})",
        width,
        height,
        if parallel { "parallel" } else { "sequential" }
    );

    let mut interior = output.slice_mut(s![1..height - 1, .., ..]);
    if parallel {
        interior
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i, row)| convolve_row(&src, kernel, i + 1, row));
    } else {
        for (i, row) in interior.axis_iter_mut(Axis(0)).enumerate() {
            convolve_row(&src, kernel, i + 1, row);
        }
    }

    Ok(RasterBuffer::from_output(output))
}

/// Fill interior columns of output row `y`. `row` has shape `(width, 4)`.
fn convolve_row(src: &ArrayView3<u8>, kernel: &Kernel, y: usize, mut row: ArrayViewMut2<u8>) {
    let width = src.dim().1;

    for x in 1..width - 1 {
        for c in 0..ALPHA {
            let mut sum = 0.0f64;
            for ky in -1isize..=1 {
                let py = (y as isize + ky) as usize;
                for kx in -1isize..=1 {
                    let px = (x as isize + kx) as usize;
                    sum += src[[py, px, c]] as f64 * kernel.weight(ky, kx) as f64;
                }
            }
            row[[x, c]] = sum.round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::kernel::{blur_kernel, edge_detect_kernel, sharpen_kernel};
    use crate::raster::CHANNELS;

    fn noise(width: usize, height: usize, seed: u32) -> RasterBuffer {
        // Small LCG so the tests stay deterministic.
        let mut state = seed;
        let pixels = (0..width * height * CHANNELS)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 24) as u8
            })
            .collect();
        RasterBuffer::from_raw(width, height, pixels).unwrap()
    }

    fn assert_border_unchanged(input: &RasterBuffer, output: &RasterBuffer) {
        let (w, h) = input.dimensions();
        for y in 0..h {
            for x in 0..w {
                if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                    assert_eq!(input.pixel(x, y), output.pixel(x, y), "border ({}, {})", x, y);
                }
            }
        }
    }

    // ========================================================================
    // Identity / Border Tests
    // ========================================================================

    #[test]
    fn test_identity_kernel() {
        let img = noise(9, 7, 1);
        let result = convolve_3x3(&img, &Kernel::identity()).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_border_untouched_by_any_kernel() {
        let img = noise(8, 6, 2);
        let kernels = [
            sharpen_kernel(100).unwrap(),
            blur_kernel(37).unwrap(),
            edge_detect_kernel(80).unwrap(),
            Kernel::new([-50.0, 3.5, 0.0, 12.0, -7.0, 1.0, 9.0, -2.0, 40.0]),
        ];

        for kernel in &kernels {
            let result = convolve_3x3(&img, kernel).unwrap();
            assert_border_unchanged(&img, &result);
        }
    }

    #[test]
    fn test_alpha_copied_everywhere() {
        let img = noise(6, 6, 3);
        let result = convolve_3x3(&img, &edge_detect_kernel(100).unwrap()).unwrap();
        for y in 0..6 {
            for x in 0..6 {
                assert_eq!(result.pixel(x, y).unwrap()[3], img.pixel(x, y).unwrap()[3]);
            }
        }
    }

    #[test]
    fn test_degenerate_sizes_return_copy() {
        for (w, h) in [(1, 1), (2, 5), (5, 2), (2, 2)] {
            let img = noise(w, h, 4);
            let result = convolve_3x3(&img, &sharpen_kernel(100).unwrap()).unwrap();
            assert_eq!(result, img);
        }
    }

    // ========================================================================
    // Arithmetic Tests
    // ========================================================================

    #[test]
    fn test_single_interior_pixel() {
        // 3x3 image: center red = 100, all neighbours red = 10.
        let mut pixels = vec![0u8; 3 * 3 * CHANNELS];
        for i in 0..9 {
            pixels[i * 4] = 10;
            pixels[i * 4 + 3] = 255;
        }
        pixels[4 * 4] = 100;
        let img = RasterBuffer::from_raw(3, 3, pixels).unwrap();

        let result = convolve_3x3(&img, &sharpen_kernel(50).unwrap()).unwrap();

        // 5 * 100 - 4 * 10 = 460 -> clamped
        assert_eq!(result.pixel(1, 1), Some([255, 0, 0, 255]));

        let result = convolve_3x3(&img, &blur_kernel(100).unwrap()).unwrap();
        // (8 * 10 + 100) / 9 = 20
        assert_eq!(result.pixel(1, 1), Some([20, 0, 0, 255]));
    }

    #[test]
    fn test_flat_region_sharpen_invariant() {
        let img = RasterBuffer::filled(5, 5, [128, 128, 128, 255]).unwrap();
        let result = convolve_3x3(&img, &sharpen_kernel(50).unwrap()).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_flat_region_edge_detect_is_zero() {
        let img = RasterBuffer::filled(4, 4, [90, 180, 30, 200]).unwrap();
        let result = convolve_3x3(&img, &edge_detect_kernel(50).unwrap()).unwrap();
        assert_eq!(result.pixel(1, 1), Some([0, 0, 0, 200]));
        assert_eq!(result.pixel(0, 0), Some([90, 180, 30, 200]));
    }

    #[test]
    fn test_huge_finite_weights_saturate_by_sign() {
        // Top row red = 200, 200, 100; everything else 0.
        let mut pixels = vec![0u8; 3 * 3 * CHANNELS];
        pixels[0] = 200;
        pixels[4] = 200;
        pixels[8] = 100;
        let img = RasterBuffer::from_raw(3, 3, pixels).unwrap();

        let max = f32::MAX;
        let up = Kernel::new([max, max, -max, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let down = Kernel::new([-max, -max, max, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        // (200 + 200 - 100) * f32::MAX overflows f32 but not f64.
        assert_eq!(convolve_3x3(&img, &up).unwrap().pixel(1, 1).unwrap()[0], 255);
        assert_eq!(convolve_3x3(&img, &down).unwrap().pixel(1, 1).unwrap()[0], 0);
    }

    #[test]
    fn test_non_finite_kernel_rejected() {
        let img = noise(4, 4, 5);
        let kernel = Kernel::new([0.0, 0.0, 0.0, 0.0, f32::NAN, 0.0, 0.0, 0.0, 0.0]);
        assert!(matches!(
            convolve_3x3(&img, &kernel),
            Err(CoreError::InvalidParameter(_))
        ));
    }

    // ========================================================================
    // Parallel Tests
    // ========================================================================

    #[test]
    fn test_parallel_matches_sequential() {
        let img = noise(33, 21, 6);
        let kernel = sharpen_kernel(73).unwrap();

        let sequential = convolve_3x3_with_threshold(&img, &kernel, usize::MAX).unwrap();
        let parallel = convolve_3x3_with_threshold(&img, &kernel, 0).unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_idempotent() {
        let img = noise(12, 12, 7);
        let kernel = blur_kernel(64).unwrap();
        assert_eq!(
            convolve_3x3(&img, &kernel).unwrap(),
            convolve_3x3(&img, &kernel).unwrap()
        );
    }
}
