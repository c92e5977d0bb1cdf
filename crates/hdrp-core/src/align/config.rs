use serde::{Deserialize, Serialize};

use crate::error::{HdrpError, Result};

use super::distance::DistanceKind;

/// Per-level parameters of the coarse-to-fine search, finest level first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Inverse scale factor from the previous level to each level.
    pub inv_scale_factors: Vec<usize>,
    /// Square tile size per level.
    pub tile_sizes: Vec<usize>,
    /// Half-extent of the search window per level, in that level's pixels.
    pub search_radii: Vec<usize>,
    /// Distance metric per level.
    pub metrics: Vec<DistanceKind>,
    /// Border fill for the padded alternate plane. Off-image candidates
    /// compare against maximum intensity and lose the search.
    pub pad_fill: u16,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            inv_scale_factors: vec![1, 2, 4, 4],
            tile_sizes: vec![16, 16, 16, 8],
            search_radii: vec![1, 4, 4, 1],
            metrics: vec![
                DistanceKind::L2,
                DistanceKind::L2,
                DistanceKind::L2,
                DistanceKind::L1,
            ],
            pad_fill: u16::MAX,
        }
    }
}

impl AlignConfig {
    pub fn num_levels(&self) -> usize {
        self.inv_scale_factors.len()
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        let n = self.inv_scale_factors.len();
        if n == 0 {
            return Err(HdrpError::InvalidConfig("no pyramid levels".into()));
        }
        if self.tile_sizes.len() != n || self.search_radii.len() != n || self.metrics.len() != n {
            return Err(HdrpError::InvalidConfig(format!(
                "per-level lists disagree on length: {} scale factors, {} tile sizes, {} radii, {} metrics",
                n,
                self.tile_sizes.len(),
                self.search_radii.len(),
                self.metrics.len(),
            )));
        }

        if self.inv_scale_factors[0] != 1 {
            return Err(HdrpError::InvalidScaleFactor(self.inv_scale_factors[0]));
        }
        for &factor in &self.inv_scale_factors {
            if !matches!(factor, 1 | 2 | 4) {
                return Err(HdrpError::InvalidScaleFactor(factor));
            }
        }
        for &tile in &self.tile_sizes {
            if !matches!(tile, 8 | 16) {
                return Err(HdrpError::InvalidTileSize(tile));
            }
        }

        Ok(())
    }
}
