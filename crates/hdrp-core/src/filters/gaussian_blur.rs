use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::plane::PixelPlane;

/// Blur a plane with a separable Gaussian.
///
/// The kernel width follows the rule OpenCV applies to 16-bit input when no
/// explicit size is given: radius = round(4 * sigma). Borders reflect
/// without repeating the edge sample.
pub fn gaussian_blur_plane(plane: &PixelPlane, sigma: f32) -> PixelPlane {
    let kernel = make_gaussian_kernel(sigma);
    let row_pass = convolve_rows(plane.data(), &kernel);
    PixelPlane::new(convolve_cols(&row_pass, &kernel))
}

fn make_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (4.0 * sigma).round().max(1.0) as usize;
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f32; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

/// Reflect an out-of-range index back into `[0, len)` without repeating the
/// border sample (`-1` maps to `1`, `len` maps to `len - 2`).
fn reflect_101(idx: isize, len: isize) -> usize {
    if len == 1 {
        return 0;
    }
    let mut i = idx;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * len - 2 - i;
        } else {
            return i as usize;
        }
    }
}

fn convolve_rows(data: &Array2<u16>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    let convolve_row = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let src_col =
                        reflect_101(col as isize + ki as isize - radius as isize, w as isize);
                    sum += data[[row, src_col]] as f32 * kv;
                }
                sum
            })
            .collect()
    };

    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(convolve_row).collect()
    } else {
        (0..h).map(convolve_row).collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}

fn convolve_cols(data: &Array2<f32>, kernel: &[f32]) -> Array2<u16> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    let convolve_row = |row: usize| -> Vec<u16> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let src_row =
                        reflect_101(row as isize + ki as isize - radius as isize, h as isize);
                    sum += data[[src_row, col]] * kv;
                }
                sum.round().clamp(0.0, 65_535.0) as u16
            })
            .collect()
    };

    let rows: Vec<Vec<u16>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(convolve_row).collect()
    } else {
        (0..h).map(convolve_row).collect()
    };

    let mut result = Array2::<u16>::zeros((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}
