//! Sample command

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use spar_core::file_io::save_model;
use spar_core::model::SparModel;
use tracing::info;

#[derive(Args)]
pub struct SampleArgs {
    /// Where to write the model
    #[arg(default_value = "spar.json")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: SampleArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.path.display());
    }
    save_model(&SparModel::sample(), &args.path)?;
    info!(path = %args.path.display(), "sample model written");
    Ok(())
}
