use ndarray::Array2;

use crate::error::{HdrpError, Result};
use crate::filters::gaussian_blur::gaussian_blur_plane;
use crate::plane::PixelPlane;

/// Gaussian image pyramid, finest level first.
#[derive(Clone, Debug)]
pub struct Pyramid {
    levels: Vec<PixelPlane>,
}

impl Pyramid {
    pub fn levels(&self) -> &[PixelPlane] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> &PixelPlane {
        &self.levels[index]
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }
}

/// Build the alignment pyramid for one frame.
///
/// Level 0 is the source plane. Each later level blurs the previous one with
/// sigma = factor * 0.5 and decimates it by that factor; level dimensions
/// are the previous level's integer-divided by the factor.
pub fn build_pyramid(source: &PixelPlane, inv_scale_factors: &[usize]) -> Result<Pyramid> {
    let mut levels: Vec<PixelPlane> = Vec::with_capacity(inv_scale_factors.len());

    for (i, &factor) in inv_scale_factors.iter().enumerate() {
        if i == 0 {
            if factor != 1 {
                return Err(HdrpError::InvalidScaleFactor(factor));
            }
            levels.push(source.clone());
            continue;
        }

        match factor {
            1 | 2 | 4 => {
                let sigma = factor as f32 * 0.5;
                let blurred = gaussian_blur_plane(&levels[i - 1], sigma);
                levels.push(decimate(&blurred, factor));
            }
            _ => return Err(HdrpError::InvalidScaleFactor(factor)),
        }
    }

    Ok(Pyramid { levels })
}

/// Downsample by taking every `factor`-th sample in each axis.
fn decimate(plane: &PixelPlane, factor: usize) -> PixelPlane {
    let new_h = plane.height() / factor;
    let new_w = plane.width() / factor;
    let mut result = Array2::<u16>::zeros((new_h, new_w));

    for r in 0..new_h {
        for c in 0..new_w {
            result[[r, c]] = plane.data()[[r * factor, c * factor]];
        }
    }

    PixelPlane::new(result)
}
