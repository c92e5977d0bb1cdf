use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::EPSILON;
use crate::plane::PixelPlane;

use super::gamma::{srgb_compress, srgb_decompress};

/// Decimation factor for the thumbnail used by the automatic gain search.
const GAIN_SEARCH_DECIMATION: usize = 25;
/// Gain increment per search step.
const GAIN_STEP: u32 = 2;
/// Upper bound of the gain search. Also terminates the search on planes
/// whose histogram never compresses, such as an all-black input.
const MAX_GAIN: u32 = 30;
/// Spread of the well-exposedness weight around mid-gray.
const EXPOSURE_WEIGHT_SIGMA: f32 = 0.2;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FinishConfig {
    /// Fixed synthetic-exposure gain. Searched automatically when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain: Option<u32>,
}

/// Tone-mapped plane plus the gain that produced it.
#[derive(Clone, Debug)]
pub struct ToneMapped {
    pub image: PixelPlane,
    pub gain: u32,
}

/// Local tone map by two-exposure fusion.
///
/// A synthetic long exposure is fused with the input in gamma space, and the
/// input is then rescaled by the per-pixel brightening the fusion chose.
pub fn tonemap_plane(plane: &PixelPlane, config: &FinishConfig) -> ToneMapped {
    let gain = match config.gain {
        Some(gain) => gain,
        None => estimate_gain(plane),
    };
    info!(gain, "tone mapping");

    let long = scale_plane(plane, f64::from(gain));
    let short_gamma = srgb_compress(plane);
    let long_gamma = srgb_compress(&long);
    let fused_gamma = fuse_exposures(&short_gamma, &long_gamma);
    let fused = srgb_decompress(&fused_gamma);
    let image = apply_scaling(plane, plane, &fused);

    ToneMapped { image, gain }
}

/// Search for the smallest gain whose synthetic long exposure compresses the
/// histogram enough without saturating. Runs on a decimated thumbnail.
fn estimate_gain(plane: &PixelPlane) -> u32 {
    let thumb = decimate(plane, GAIN_SEARCH_DECIMATION);
    let short_mean = mean_normalized(&srgb_compress(&thumb));

    let mut gain = 0u32;
    let mut compression = 1.0f64;
    let mut saturated = 0.0f64;
    let mut best_gain = false;

    while gain < MAX_GAIN
        && ((compression < 1.9 && saturated < 0.95)
            || (!best_gain && compression < 6.0 && saturated < 0.33))
    {
        gain += GAIN_STEP;
        let long_gamma = srgb_compress(&scale_plane(&thumb, f64::from(gain)));
        let long_mean = mean_normalized(&long_gamma);
        compression = long_mean / (short_mean + EPSILON);
        // Only meaningful when the burst is underexposed.
        best_gain = long_mean > (1.0 - short_mean) / 2.0;
        saturated = saturated_fraction(&long_gamma, 0.95);
        debug!(gain, compression, saturated, "gain search step");
    }

    gain
}

/// Per-pixel blend of two gamma-encoded exposures, weighted by closeness to
/// mid-gray.
pub fn fuse_exposures(short: &PixelPlane, long: &PixelPlane) -> PixelPlane {
    let (h, w) = (short.height(), short.width());
    let mut data = Array2::<u16>::zeros((h, w));

    for row in 0..h {
        for col in 0..w {
            let s = short.data()[[row, col]] as f32 / 65_535.0;
            let l = long.data()[[row, col]] as f32 / 65_535.0;
            let ws = well_exposedness(s);
            let wl = well_exposedness(l);
            let fused = (ws * s + wl * l) / (ws + wl + EPSILON as f32);
            data[[row, col]] = (fused.clamp(0.0, 1.0) * 65_535.0) as u16;
        }
    }

    PixelPlane::new(data)
}

/// Rescale `image` by the per-pixel ratio `fused / short`, leaving pixels
/// with an empty short exposure untouched. All planes must share a shape.
pub fn apply_scaling(
    image: &PixelPlane,
    short_gray: &PixelPlane,
    fused_gray: &PixelPlane,
) -> PixelPlane {
    let (h, w) = (image.height(), image.width());
    let mut data = Array2::<u16>::zeros((h, w));

    for row in 0..h {
        for col in 0..w {
            let short = short_gray.data()[[row, col]];
            let scale = if short == 0 {
                1.0
            } else {
                f64::from(fused_gray.data()[[row, col]]) / f64::from(short)
            };
            let value = f64::from(image.data()[[row, col]]) * scale;
            data[[row, col]] = value.clamp(0.0, 65_535.0) as u16;
        }
    }

    PixelPlane::new(data)
}

fn well_exposedness(v: f32) -> f32 {
    let d = v - 0.5;
    (-(d * d) / (2.0 * EXPOSURE_WEIGHT_SIGMA * EXPOSURE_WEIGHT_SIGMA)).exp()
}

/// Multiply every sample by `gain`, saturating at the 16-bit range.
fn scale_plane(plane: &PixelPlane, gain: f64) -> PixelPlane {
    let data = plane
        .data()
        .mapv(|v| (f64::from(v) * gain).clamp(0.0, 65_535.0) as u16);
    PixelPlane::new(data)
}

fn mean_normalized(plane: &PixelPlane) -> f64 {
    let count = plane.height() * plane.width();
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = plane.data().iter().map(|&v| u64::from(v)).sum();
    sum as f64 / count as f64 / 65_535.0
}

fn saturated_fraction(plane: &PixelPlane, threshold: f64) -> f64 {
    let count = plane.height() * plane.width();
    if count == 0 {
        return 0.0;
    }
    let limit = (threshold * 65_535.0) as u16;
    let over = plane.data().iter().filter(|&&v| v > limit).count();
    over as f64 / count as f64
}

/// Nearest-neighbour thumbnail for the gain search.
fn decimate(plane: &PixelPlane, factor: usize) -> PixelPlane {
    let (h, w) = (plane.height(), plane.width());
    if h == 0 || w == 0 || factor <= 1 {
        return plane.clone();
    }
    let out_h = (h / factor).max(1);
    let out_w = (w / factor).max(1);
    let mut data = Array2::<u16>::zeros((out_h, out_w));

    for r in 0..out_h {
        for c in 0..out_w {
            data[[r, c]] = plane.data()[[(r * factor).min(h - 1), (c * factor).min(w - 1)]];
        }
    }

    PixelPlane::new(data)
}
