use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use hdrp_core::finish::{tonemap_plane, FinishConfig};

use crate::io::{load_plane, save_plane};

#[derive(Args)]
pub struct FinishArgs {
    /// Input image, 16-bit grayscale
    pub image: PathBuf,

    /// Fixed tone-mapping gain (searched automatically when omitted)
    #[arg(short, long)]
    pub gain: Option<u32>,

    /// Output path
    #[arg(short, long, default_value = "finished.png")]
    pub output: PathBuf,
}

pub fn run(args: &FinishArgs) -> Result<()> {
    let plane = load_plane(&args.image)?;

    let config = FinishConfig { gain: args.gain };
    let result = tonemap_plane(&plane, &config);

    save_plane(&result.image, &args.output)?;
    println!(
        "Tone mapped with gain {}, saved to {}",
        result.gain,
        args.output.display()
    );

    Ok(())
}
