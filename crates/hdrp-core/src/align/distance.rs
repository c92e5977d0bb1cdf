use serde::{Deserialize, Serialize};

use crate::error::{HdrpError, Result};
use crate::plane::PixelPlane;

/// Tile distance metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceKind {
    /// Sum of absolute differences.
    L1,
    /// Sum of squared differences.
    L2,
}

/// Tile distance between plane `a` at `(r1, c1)` and plane `b` at `(r2, c2)`.
pub type DistanceFn = fn(&PixelPlane, &PixelPlane, usize, usize, usize, usize) -> Result<u64>;

/// Pick the specialized kernel for a metric and tile size once, outside the
/// per-tile search loop.
pub fn resolve_kernel(kind: DistanceKind, tile_size: usize) -> Result<DistanceFn> {
    match (kind, tile_size) {
        (DistanceKind::L1, 8) => Ok(l1_distance::<8>),
        (DistanceKind::L1, 16) => Ok(l1_distance::<16>),
        (DistanceKind::L2, 8) => Ok(l2_distance::<8>),
        (DistanceKind::L2, 16) => Ok(l2_distance::<16>),
        (_, other) => Err(HdrpError::InvalidTileSize(other)),
    }
}

fn check_origin<const T: usize>(plane: &PixelPlane, row: usize, col: usize) -> Result<()> {
    let (h, w) = (plane.height(), plane.width());
    if h < T || w < T || row > h - T || col > w - T {
        return Err(HdrpError::TileOutOfRange {
            row,
            col,
            height: h,
            width: w,
        });
    }
    Ok(())
}

/// Sum of absolute differences over a `T`x`T` tile.
///
/// Differences are widened to `i32` before the absolute value so the
/// subtraction never wraps in the pixel type.
pub fn l1_distance<const T: usize>(
    a: &PixelPlane,
    b: &PixelPlane,
    r1: usize,
    c1: usize,
    r2: usize,
    c2: usize,
) -> Result<u64> {
    check_origin::<T>(a, r1, c1)?;
    check_origin::<T>(b, r2, c2)?;

    let mut sum = 0u64;
    for row in 0..T {
        let ra = a.data().row(r1 + row);
        let rb = b.data().row(r2 + row);
        for col in 0..T {
            let d = i32::from(ra[c1 + col]) - i32::from(rb[c2 + col]);
            sum += u64::from(d.unsigned_abs());
        }
    }
    Ok(sum)
}

/// Sum of squared differences over a `T`x`T` tile.
///
/// A full-range 16x16 tile sums to 256 * 65535^2 < 2^41, well inside the
/// 64-bit accumulator.
pub fn l2_distance<const T: usize>(
    a: &PixelPlane,
    b: &PixelPlane,
    r1: usize,
    c1: usize,
    r2: usize,
    c2: usize,
) -> Result<u64> {
    check_origin::<T>(a, r1, c1)?;
    check_origin::<T>(b, r2, c2)?;

    let mut sum = 0u64;
    for row in 0..T {
        let ra = a.data().row(r1 + row);
        let rb = b.data().row(r2 + row);
        for col in 0..T {
            let d = i64::from(ra[c1 + col]) - i64::from(rb[c2 + col]);
            sum += (d * d) as u64;
        }
    }
    Ok(sum)
}
