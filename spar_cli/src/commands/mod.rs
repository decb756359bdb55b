//! Subcommands

pub mod check;
pub mod run;
pub mod sample;

use std::path::Path;

use anyhow::{Context, Result};
use spar_core::file_io::{load_model, read_station_loads};
use spar_core::model::SparModel;
use tracing::info;

/// Load a model, replacing its loads with the CSV at `loads` when given.
pub fn load_with_loads(model_path: &Path, loads: Option<&Path>) -> Result<SparModel> {
    let mut model = load_model(model_path).with_context(|| format!("loading model {}", model_path.display()))?;

    if let Some(path) = loads {
        model.loads = read_station_loads(path).with_context(|| format!("reading loads {}", path.display()))?;
        info!(path = %path.display(), count = model.loads.len(), "station loads replaced from CSV");
    }
    Ok(model)
}
