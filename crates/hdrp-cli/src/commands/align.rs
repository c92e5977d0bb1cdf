use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use hdrp_core::align::{align_burst_with_progress, AlignConfig, Disp};
use hdrp_core::burst::Burst;

use crate::io::load_plane;

#[derive(Args)]
pub struct AlignArgs {
    /// Input frames, 16-bit grayscale
    pub frames: Vec<PathBuf>,

    /// Index of the reference frame
    #[arg(short, long, default_value = "0")]
    pub reference: usize,

    /// Write per-frame displacement grids as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct GridRecord {
    frame: usize,
    rows: usize,
    cols: usize,
    displacements: Vec<Vec<Disp>>,
}

pub fn run(args: &AlignArgs) -> Result<()> {
    if args.frames.len() < 2 {
        bail!("need at least two frames to align");
    }

    let config = AlignConfig::default();
    let finest_tile = config.tile_sizes[0];

    let mut planes = Vec::with_capacity(args.frames.len());
    for path in &args.frames {
        let plane = load_plane(path)?;
        planes.push(plane.pad_to_multiple(finest_tile));
    }

    let burst = Burst::new(planes, args.reference)?;

    let pb = ProgressBar::new(burst.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Aligning frames");

    let alignment =
        align_burst_with_progress(&burst, &config, |done| pb.set_position(done as u64))?;
    pb.finish_with_message("Aligned");

    println!("\n{:>5}  {:>10}  {:>8}  {:>8}", "Frame", "Grid", "Max|dy|", "Max|dx|");
    println!("{}", "-".repeat(38));
    for (idx, grid) in alignment.grids.iter().enumerate() {
        match grid {
            None => println!("{:>5}  {:>10}  {:>8}  {:>8}", idx, "reference", "-", "-"),
            Some(g) => {
                let (rows, cols) = g.dim();
                let max_dy = g.iter().map(|d| d.dy.abs()).max().unwrap_or(0);
                let max_dx = g.iter().map(|d| d.dx.abs()).max().unwrap_or(0);
                println!(
                    "{:>5}  {:>10}  {:>8}  {:>8}",
                    idx,
                    format!("{rows}x{cols}"),
                    max_dy,
                    max_dx
                );
            }
        }
    }

    if let Some(ref path) = args.output {
        let records: Vec<GridRecord> = alignment
            .grids
            .iter()
            .enumerate()
            .filter_map(|(frame, grid)| {
                grid.as_ref().map(|g| {
                    let (rows, cols) = g.dim();
                    GridRecord {
                        frame,
                        rows,
                        cols,
                        displacements: g.outer_iter().map(|row| row.to_vec()).collect(),
                    }
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&records)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nGrids saved to {}", path.display());
    }

    Ok(())
}
