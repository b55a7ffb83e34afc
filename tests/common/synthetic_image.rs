/// Generates an RGBA checkerboard with opaque cells of two colors.
pub fn checkerboard_rgba(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height * 4];
    for y in 0..height {
        for x in 0..width {
            let dark = ((x / cell) + (y / cell)) & 1 == 0;
            let rgba = if dark { [32, 40, 48, 255] } else { [220, 210, 200, 255] };
            let i = (y * width + x) * 4;
            img[i..i + 4].copy_from_slice(&rgba);
        }
    }
    img
}

/// Generates pseudo-random RGBA bytes (including alpha) from `seed`.
pub fn noise_rgba(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..width * height * 4)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 56) as u8
        })
        .collect()
}

/// One row per `red` value, repeated `height` times; green and blue zero, alpha opaque.
pub fn red_ramp_rgba(red: &[u8], height: usize) -> Vec<u8> {
    let mut img = Vec::with_capacity(red.len() * height * 4);
    for _ in 0..height {
        for &r in red {
            img.extend_from_slice(&[r, 0, 0, 255]);
        }
    }
    img
}
