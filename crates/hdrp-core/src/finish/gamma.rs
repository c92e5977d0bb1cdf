use crate::plane::PixelPlane;

// sRGB piecewise transfer constants.
const COMPRESS_THRESHOLD: f32 = 0.003_130_8;
const DECOMPRESS_THRESHOLD: f32 = 0.040_45;
const GAIN_MIN: f32 = 12.92;
const GAIN_MAX: f32 = 1.055;
const EXPONENT: f32 = 2.4;

/// Encode a linear plane with the sRGB transfer curve.
pub fn srgb_compress(plane: &PixelPlane) -> PixelPlane {
    map_normalized(plane, |x| {
        if x <= COMPRESS_THRESHOLD {
            GAIN_MIN * x
        } else {
            GAIN_MAX * x.powf(1.0 / EXPONENT) - GAIN_MAX + 1.0
        }
    })
}

/// Decode an sRGB-encoded plane back to linear.
pub fn srgb_decompress(plane: &PixelPlane) -> PixelPlane {
    map_normalized(plane, |x| {
        if x <= DECOMPRESS_THRESHOLD {
            x / GAIN_MIN
        } else {
            ((x + GAIN_MAX - 1.0) / GAIN_MAX).powf(EXPONENT)
        }
    })
}

/// Apply a transfer function in normalized [0, 1] space, clip, and quantize
/// back to 16 bits.
fn map_normalized(plane: &PixelPlane, f: impl Fn(f32) -> f32) -> PixelPlane {
    let data = plane.data().mapv(|v| {
        let x = f(v as f32 / 65_535.0).clamp(0.0, 1.0);
        (x * 65_535.0) as u16
    });
    PixelPlane::new(data)
}
