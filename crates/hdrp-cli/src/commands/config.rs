use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use hdrp_core::align::AlignConfig;
use hdrp_core::finish::FinishConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Default)]
struct HdrpConfig {
    align: AlignConfig,
    finish: FinishConfig,
}

/// Print or save the full default configuration as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = HdrpConfig::default();
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
