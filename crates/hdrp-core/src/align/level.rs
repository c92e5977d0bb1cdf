use ndarray::Array2;

use crate::error::{HdrpError, Result};
use crate::plane::PixelPlane;

use super::distance::{resolve_kernel, DistanceKind};
use super::{AlignmentGrid, Disp};

/// Parameters of a single-level block-matching pass.
#[derive(Clone, Copy, Debug)]
pub struct LevelParams {
    pub tile_size: usize,
    pub search_radius: usize,
    pub metric: DistanceKind,
    pub pad_fill: u16,
}

/// Tile grid shape at one level: half-tile stride, one short of the count
/// that would run past the plane edge.
pub fn grid_shape(height: usize, width: usize, tile_size: usize) -> Result<(usize, usize)> {
    let stride = tile_size / 2;
    if stride == 0 {
        return Err(HdrpError::TileGeometryInvalid {
            height,
            width,
            tile_size,
        });
    }
    let h = (height / stride) as isize - 1;
    let w = (width / stride) as isize - 1;
    if h <= 0 || w <= 0 {
        return Err(HdrpError::TileGeometryInvalid {
            height,
            width,
            tile_size,
        });
    }
    Ok((h as usize, w as usize))
}

/// Align one pyramid level of an alternate frame against the reference.
///
/// Each reference tile scans a `(2r+1)`-square window of the padded
/// alternate plane around its propagated coarse displacement. The first
/// candidate to reach the minimum distance wins; candidates that overlap the
/// border fill compare against maximum intensity and lose.
pub fn align_level(
    reference: &PixelPlane,
    alternate: &PixelPlane,
    prior: Option<&AlignmentGrid>,
    params: &LevelParams,
) -> Result<AlignmentGrid> {
    let (num_tiles_h, num_tiles_w) =
        grid_shape(reference.height(), reference.width(), params.tile_size)?;

    if let Some(grid) = prior {
        let (actual_h, actual_w) = grid.dim();
        if (actual_h, actual_w) != (num_tiles_h, num_tiles_w) {
            return Err(HdrpError::PriorGridMismatch {
                expected_h: num_tiles_h,
                expected_w: num_tiles_w,
                actual_h,
                actual_w,
            });
        }
    }

    let tile = params.tile_size;
    let stride = tile / 2;
    let radius = params.search_radius;
    let kernel = resolve_kernel(params.metric, tile)?;

    // Padded once per level, not per tile.
    let padded = alternate.pad(radius, params.pad_fill);

    // Clamp limit for the propagated tile origin. The pad width cancels out
    // of the subtraction, and the [0, 2r] candidate offsets below walk the
    // window back across the full padded range.
    let alt_row_idx_max = (padded.height() - (tile + 2 * radius)) as isize;
    let alt_col_idx_max = (padded.width() - (tile + 2 * radius)) as isize;

    let mut grid = Array2::<Disp>::default((num_tiles_h, num_tiles_w));

    for tile_row in 0..num_tiles_h {
        for tile_col in 0..num_tiles_w {
            let ref_row = tile_row * stride;
            let ref_col = tile_col * stride;

            let seed = prior.map_or(Disp::default(), |g| g[[tile_row, tile_col]]);

            let alt_row = (ref_row as isize + seed.dy as isize).clamp(0, alt_row_idx_max) as usize;
            let alt_col = (ref_col as isize + seed.dx as isize).clamp(0, alt_col_idx_max) as usize;

            let mut min_distance = u64::MAX;
            let mut min_row = 0usize;
            let mut min_col = 0usize;

            for search_row in 0..=2 * radius {
                for search_col in 0..=2 * radius {
                    let distance = kernel(
                        reference,
                        &padded,
                        ref_row,
                        ref_col,
                        alt_row + search_row,
                        alt_col + search_col,
                    )?;
                    if distance < min_distance {
                        min_distance = distance;
                        min_row = search_row;
                        min_col = search_col;
                    }
                }
            }

            grid[[tile_row, tile_col]] = Disp {
                dy: seed.dy + min_row as i32 - radius as i32,
                dx: seed.dx + min_col as i32 - radius as i32,
            };
        }
    }

    Ok(grid)
}
