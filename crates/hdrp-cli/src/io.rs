use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, Luma};
use ndarray::Array2;

use hdrp_core::plane::PixelPlane;

/// Load a grayscale image file into a 16-bit plane.
pub fn load_plane(path: &Path) -> Result<PixelPlane> {
    let img =
        image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();

    let mut data = Array2::<u16>::zeros((h as usize, w as usize));
    for row in 0..h as usize {
        for col in 0..w as usize {
            data[[row, col]] = gray.get_pixel(col as u32, row as u32).0[0];
        }
    }

    Ok(PixelPlane::new(data))
}

/// Save a plane as 16-bit grayscale PNG.
pub fn save_plane(plane: &PixelPlane, path: &Path) -> Result<()> {
    let h = plane.height();
    let w = plane.width();

    let mut pixels: Vec<u16> = Vec::with_capacity(h * w);
    for row in 0..h {
        for col in 0..w {
            pixels.push(plane.data()[[row, col]]);
        }
    }

    let img = image::ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .expect("buffer size matches dimensions");
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
