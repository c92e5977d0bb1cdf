use crate::error::{HdrpError, Result};
use crate::plane::PixelPlane;

/// An ordered burst of same-sized grayscale planes with a distinguished
/// reference frame. Built once, read-only afterwards.
#[derive(Clone, Debug)]
pub struct Burst {
    frames: Vec<PixelPlane>,
    reference_index: usize,
}

impl Burst {
    pub fn new(frames: Vec<PixelPlane>, reference_index: usize) -> Result<Self> {
        if frames.is_empty() {
            return Err(HdrpError::EmptyBurst);
        }
        if reference_index >= frames.len() {
            return Err(HdrpError::ReferenceOutOfRange {
                index: reference_index,
                total: frames.len(),
            });
        }

        let (h, w) = (frames[0].height(), frames[0].width());
        for (index, frame) in frames.iter().enumerate() {
            if frame.height() != h || frame.width() != w {
                return Err(HdrpError::FrameSizeMismatch {
                    index,
                    expected_h: h,
                    expected_w: w,
                    got_h: frame.height(),
                    got_w: frame.width(),
                });
            }
        }

        Ok(Self {
            frames,
            reference_index,
        })
    }

    pub fn frames(&self) -> &[PixelPlane] {
        &self.frames
    }

    pub fn reference_index(&self) -> usize {
        self.reference_index
    }

    pub fn reference(&self) -> &PixelPlane {
        &self.frames[self.reference_index]
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
