//! Check command: load and validate a model without analyzing it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

#[derive(Args)]
pub struct CheckArgs {
    /// Model file (JSON)
    pub model: PathBuf,

    /// Station loads CSV replacing the model's loads
    #[arg(long)]
    pub loads: Option<PathBuf>,
}

pub fn execute(args: CheckArgs) -> Result<()> {
    let model = super::load_with_loads(&args.model, args.loads.as_deref())?;
    model
        .validate()
        .with_context(|| format!("{} is invalid", args.model.display()))?;

    info!(segments = model.segments.len(), loads = model.loads.len(), "model is valid");
    println!("{}: OK ({} segments)", args.model.display(), model.segments.len());
    Ok(())
}
