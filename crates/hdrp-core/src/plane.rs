use ndarray::{s, Array2, ArrayView2};

use crate::error::{HdrpError, Result};

/// A rectangular 16-bit single-channel image.
///
/// Planes are effectively immutable: the pyramid builder constructs them and
/// the alignment engine only reads. Row stride is carried by the underlying
/// `Array2` and by every view taken from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelPlane {
    data: Array2<u16>,
}

impl PixelPlane {
    pub fn new(data: Array2<u16>) -> Self {
        Self { data }
    }

    /// Build a plane of the given shape from a single fill value.
    pub fn filled(height: usize, width: usize, fill: u16) -> Self {
        Self {
            data: Array2::from_elem((height, width), fill),
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn data(&self) -> &Array2<u16> {
        &self.data
    }

    /// Bounds-checked pixel read.
    pub fn sample(&self, row: usize, col: usize) -> Result<u16> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(HdrpError::SampleOutOfRange {
                row,
                col,
                height: self.height(),
                width: self.width(),
            })
    }

    /// Zero-copy rectangular subview.
    pub fn view(
        &self,
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    ) -> Result<ArrayView2<'_, u16>> {
        if row + height > self.height() || col + width > self.width() {
            return Err(HdrpError::ViewOutOfRange {
                row,
                col,
                view_h: height,
                view_w: width,
                height: self.height(),
                width: self.width(),
            });
        }
        Ok(self.data.slice(s![row..row + height, col..col + width]))
    }

    /// Copy into a larger plane with a constant border of `radius` samples on
    /// every side.
    pub fn pad(&self, radius: usize, fill: u16) -> PixelPlane {
        let (h, w) = self.data.dim();
        let mut out = Array2::from_elem((h + 2 * radius, w + 2 * radius), fill);
        out.slice_mut(s![radius..radius + h, radius..radius + w])
            .assign(&self.data);
        PixelPlane::new(out)
    }

    /// Extend the right and bottom edges by replication until both dimensions
    /// are multiples of `multiple`.
    pub fn pad_to_multiple(&self, multiple: usize) -> PixelPlane {
        let (h, w) = self.data.dim();
        if multiple <= 1 || h == 0 || w == 0 {
            return self.clone();
        }
        let new_h = h.div_ceil(multiple) * multiple;
        let new_w = w.div_ceil(multiple) * multiple;
        if new_h == h && new_w == w {
            return self.clone();
        }

        let mut out = Array2::<u16>::zeros((new_h, new_w));
        for row in 0..new_h {
            for col in 0..new_w {
                out[[row, col]] = self.data[[row.min(h - 1), col.min(w - 1)]];
            }
        }
        PixelPlane::new(out)
    }
}
