use ndarray::Array2;

use crate::error::{HdrpError, Result};

use super::{AlignmentGrid, Disp};

/// Project a coarser level's displacement grid onto a finer tile grid.
///
/// Displacements are scaled by the pyramid ratio between the two levels and
/// each coarse cell is replicated over a `repeat` x `repeat` block of fine
/// cells, where `repeat = pyramid_ratio / tile_ratio` and `tile_ratio` is
/// the fine tile size over the coarse tile size. Fine cells beyond the
/// projected area keep a zero displacement.
pub fn upsample_alignment(
    src: &AlignmentGrid,
    target_h: usize,
    target_w: usize,
    pyramid_ratio: usize,
    tile_ratio: usize,
) -> Result<AlignmentGrid> {
    if tile_ratio == 0 || pyramid_ratio % tile_ratio != 0 {
        return Err(HdrpError::InvalidRatio {
            pyramid_ratio,
            tile_ratio,
        });
    }
    let repeat = pyramid_ratio / tile_ratio;
    if repeat == 0 {
        return Err(HdrpError::InvalidRatio {
            pyramid_ratio,
            tile_ratio,
        });
    }

    let (src_h, src_w) = src.dim();
    if src_h * repeat > target_h || src_w * repeat > target_w {
        return Err(HdrpError::GridOverflow {
            src_h: src_h * repeat,
            src_w: src_w * repeat,
            dst_h: target_h,
            dst_w: target_w,
        });
    }

    let mut dst = Array2::<Disp>::default((target_h, target_w));

    for i in 0..src_h {
        for j in 0..src_w {
            let d = src[[i, j]];
            let scaled = Disp {
                dy: d.dy * pyramid_ratio as i32,
                dx: d.dx * pyramid_ratio as i32,
            };
            for a in 0..repeat {
                for b in 0..repeat {
                    dst[[i * repeat + a, j * repeat + b]] = scaled;
                }
            }
        }
    }

    Ok(dst)
}
