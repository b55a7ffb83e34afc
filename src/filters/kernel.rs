//! 3x3 convolution kernels: Sharpen, Blur, Edge Detection.
//!
//! Every factory takes an intensity in 1-100 and derives the weights from
//! `strength = intensity / 50`, so 50 is unit strength and 100 is double.
//!
//! ```text
//! sharpen (s)        blur (t = intensity / 100)       edge detect (s)
//!  0  -s   0          t/9  t/9      t/9               -s  -s  -s
//! -s 1+4s -s          t/9  1-8t/9   t/9               -s  8s  -s
//!  0  -s   0          t/9  t/9      t/9               -s  -s  -s
//! ```
//!
//! Blur weights always sum to 1 (brightness preserving), edge detection
//! weights always sum to 0 (flat regions map to 0). The convolution itself
//! never normalizes.

use std::ops::Index;

use crate::error::{CoreError, Result};

/// Lowest accepted filter intensity.
pub const MIN_INTENSITY: u8 = 1;
/// Highest accepted filter intensity.
pub const MAX_INTENSITY: u8 = 100;
/// Intensity that maps to unit strength.
pub const UNIT_INTENSITY: f32 = 50.0;

/// Nine weights in row-major order; `(ky, kx)` lives at `(ky + 1) * 3 + (kx + 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel([f32; 9]);

impl Kernel {
    pub const fn new(weights: [f32; 9]) -> Self {
        Self(weights)
    }

    /// Kernel that leaves every pixel unchanged.
    pub const fn identity() -> Self {
        Self([0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0])
    }

    pub fn weights(&self) -> &[f32; 9] {
        &self.0
    }

    /// Weight at offset `(ky, kx)`, both in `-1..=1`.
    #[inline]
    pub fn weight(&self, ky: isize, kx: isize) -> f32 {
        self.0[((ky + 1) * 3 + (kx + 1)) as usize]
    }

    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|w| w.is_finite())
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<usize> for Kernel {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.0[index]
    }
}

fn check_intensity(intensity: u8) -> Result<f32> {
    if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&intensity) {
        return Err(CoreError::InvalidParameter(format!(
            "intensity {} outside {}..={}",
            intensity, MIN_INTENSITY, MAX_INTENSITY
        )));
    }
    Ok(intensity as f32)
}

// ============================================================================
// Sharpen
// ============================================================================

/// 4-connected unsharp kernel.
///
/// # Arguments
/// * `intensity` - 1-100, 50 gives `[0,-1,0,-1,5,-1,0,-1,0]`
pub fn sharpen_kernel(intensity: u8) -> Result<Kernel> {
    let strength = check_intensity(intensity)? / UNIT_INTENSITY;
    let center = 1.0 + 4.0 * strength;
    let edge = -strength;

    Ok(Kernel([
        0.0, edge, 0.0, //
        edge, center, edge, //
        0.0, edge, 0.0,
    ]))
}

// ============================================================================
// Blur
// ============================================================================

/// Blend between the identity and a 3x3 box blur.
///
/// # Arguments
/// * `intensity` - 1-100, 100 gives a plain box blur (all weights 1/9)
pub fn blur_kernel(intensity: u8) -> Result<Kernel> {
    let strength = check_intensity(intensity)? / UNIT_INTENSITY;
    let t = (strength / 2.0).min(1.0);
    let side = t / 9.0;
    let center = 1.0 - 8.0 * side;

    Ok(Kernel([
        side, side, side, //
        side, center, side, //
        side, side, side,
    ]))
}

// ============================================================================
// Edge Detection
// ============================================================================

/// 8-connected Laplacian scaled by strength.
///
/// # Arguments
/// * `intensity` - 1-100, 50 gives `[-1,-1,-1,-1,8,-1,-1,-1,-1]`
pub fn edge_detect_kernel(intensity: u8) -> Result<Kernel> {
    let strength = check_intensity(intensity)? / UNIT_INTENSITY;
    let n = -strength;

    Ok(Kernel([
        n, n, n, //
        n, 8.0 * strength, n, //
        n, n, n,
    ]))
}
