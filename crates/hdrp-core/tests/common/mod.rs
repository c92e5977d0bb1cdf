use ndarray::Array2;

use hdrp_core::align::AlignConfig;
use hdrp_core::plane::PixelPlane;

/// Deterministic noise plane from a linear congruential generator.
pub fn noise_plane(height: usize, width: usize, seed: u64) -> PixelPlane {
    let mut state = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    let mut data = Array2::<u16>::zeros((height, width));
    for row in 0..height {
        for col in 0..width {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            data[[row, col]] = (state >> 48) as u16;
        }
    }
    PixelPlane::new(data)
}

/// Smooth deterministic pattern sampled at a window offset.
///
/// Spatial wavelengths are long enough that block-match distances stay
/// monotone in the shift error at every pyramid level, so integer shifts of
/// the pattern are recovered exactly away from the borders.
pub fn smooth_plane(height: usize, width: usize, origin_row: i64, origin_col: i64) -> PixelPlane {
    let mut data = Array2::<u16>::zeros((height, width));
    for row in 0..height {
        for col in 0..width {
            data[[row, col]] = smooth_sample(origin_row + row as i64, origin_col + col as i64);
        }
    }
    PixelPlane::new(data)
}

fn smooth_sample(y: i64, x: i64) -> u16 {
    let yf = y as f64;
    let xf = x as f64;
    let v = 31_000.0
        + 12_000.0 * (0.013 * yf + 1.0).sin()
        + 12_000.0 * (0.017 * xf + 2.0).sin()
        + 4_000.0 * (0.008 * (xf + yf)).sin();
    v as u16
}

/// The smooth pattern with its content translated by (+dy, +dx).
pub fn smooth_plane_shifted(height: usize, width: usize, dy: i64, dx: i64) -> PixelPlane {
    smooth_plane(height, width, -dy, -dx)
}

pub fn uniform_plane(height: usize, width: usize, fill: u16) -> PixelPlane {
    PixelPlane::new(Array2::from_elem((height, width), fill))
}

/// Largest finest-level displacement magnitude the coarse-to-fine search can
/// accumulate: each level's radius scaled to level-0 pixels.
pub fn compound_envelope(config: &AlignConfig) -> i32 {
    let mut total = 0i64;
    let mut scale = 1i64;
    for level in 0..config.num_levels() {
        if level > 0 {
            scale *= config.inv_scale_factors[level] as i64;
        }
        total += config.search_radii[level] as i64 * scale;
    }
    total as i32
}
