pub mod config;
pub mod distance;
pub mod level;
pub mod pyramid;
pub mod upsample;

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::burst::Burst;
use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::Result;
use crate::plane::PixelPlane;

pub use config::AlignConfig;
pub use distance::DistanceKind;
pub use level::{align_level, grid_shape, LevelParams};
pub use pyramid::{build_pyramid, Pyramid};
pub use upsample::upsample_alignment;

/// Per-tile displacement in pixels of the level it belongs to. Aligning a
/// reference tile means taking alternate-plane samples offset by (+dy, +dx).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disp {
    pub dy: i32,
    pub dx: i32,
}

/// Dense per-tile displacement grid for one level.
pub type AlignmentGrid = Array2<Disp>;

/// Finest-level alignment for a whole burst. The reference frame carries no
/// grid; its displacement is zero everywhere.
#[derive(Clone, Debug)]
pub struct BurstAlignment {
    pub reference_index: usize,
    pub grids: Vec<Option<AlignmentGrid>>,
}

/// Align every non-reference frame of the burst to the reference.
pub fn align_burst(burst: &Burst, config: &AlignConfig) -> Result<BurstAlignment> {
    align_burst_with_progress(burst, config, |_| {})
}

/// Same as [`align_burst`], reporting the number of finished frames after
/// each one completes.
pub fn align_burst_with_progress<F>(
    burst: &Burst,
    config: &AlignConfig,
    on_frame_done: F,
) -> Result<BurstAlignment>
where
    F: Fn(usize) + Send + Sync,
{
    config.validate()?;

    info!(
        frames = burst.len(),
        levels = config.num_levels(),
        reference = burst.reference_index(),
        "aligning burst"
    );

    let ref_pyramid = build_pyramid(burst.reference(), &config.inv_scale_factors)?;
    let counter = AtomicUsize::new(0);

    let process = |index: usize, frame: &PixelPlane| -> Result<Option<AlignmentGrid>> {
        let grid = if index == burst.reference_index() {
            None
        } else {
            let alt_pyramid = build_pyramid(frame, &config.inv_scale_factors)?;
            Some(align_frame(&ref_pyramid, &alt_pyramid, config)?)
        };
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_frame_done(done);
        Ok(grid)
    };

    let results: Vec<Result<Option<AlignmentGrid>>> =
        if burst.len() >= PARALLEL_FRAME_THRESHOLD {
            burst
                .frames()
                .par_iter()
                .enumerate()
                .map(|(i, frame)| process(i, frame))
                .collect()
        } else {
            burst
                .frames()
                .iter()
                .enumerate()
                .map(|(i, frame)| process(i, frame))
                .collect()
        };

    let grids = results.into_iter().collect::<Result<Vec<_>>>()?;

    Ok(BurstAlignment {
        reference_index: burst.reference_index(),
        grids,
    })
}

/// Coarse-to-fine alignment of one frame: seed each level's search with the
/// upsampled alignment of the level above it.
fn align_frame(
    reference: &Pyramid,
    alternate: &Pyramid,
    config: &AlignConfig,
) -> Result<AlignmentGrid> {
    let num_levels = config.num_levels();
    let mut curr: Option<AlignmentGrid> = None;

    for level in (0..num_levels).rev() {
        let prev = curr.take();

        let ref_plane = reference.level(level);
        let alt_plane = alternate.level(level);

        let params = LevelParams {
            tile_size: config.tile_sizes[level],
            search_radius: config.search_radii[level],
            metric: config.metrics[level],
            pad_fill: config.pad_fill,
        };

        let prior = match prev {
            // Coarsest level: the aligner seeds an all-zero grid.
            None => None,
            Some(prev) => {
                let (target_h, target_w) =
                    grid_shape(ref_plane.height(), ref_plane.width(), params.tile_size)?;
                let pyramid_ratio = config.inv_scale_factors[level + 1];
                let tile_ratio = config.tile_sizes[level] / config.tile_sizes[level + 1];
                Some(upsample_alignment(
                    &prev,
                    target_h,
                    target_w,
                    pyramid_ratio,
                    tile_ratio,
                )?)
            }
        };

        debug!(
            level,
            tile = params.tile_size,
            radius = params.search_radius,
            "aligning level"
        );
        curr = Some(align_level(ref_plane, alt_plane, prior.as_ref(), &params)?);
    }

    // validate() rejects empty configs, so the loop ran at least once.
    Ok(curr.expect("at least one pyramid level"))
}
