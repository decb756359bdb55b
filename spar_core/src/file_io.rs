//! # File I/O Module
//!
//! Reading model files and writing reports:
//! - **Atomic saves**: write to `.tmp`, sync, rename, so a crash never leaves
//!   a half-written report
//! - **Version validation**: a model newer than this build is rejected
//! - **CSV**: one file per element type, plus station loads as CSV input
//!
//! ## Example
//!
//! ```rust,no_run
//! use spar_core::analysis::analyze;
//! use spar_core::file_io::{load_model, save_report, write_report_csv};
//! use std::path::Path;
//!
//! let model = load_model(Path::new("spar.json"))?;
//! let report = analyze(&model)?;
//!
//! save_report(&report, Path::new("out/report.json"))?;
//! write_report_csv(&report, Path::new("out"))?;
//! # Ok::<(), spar_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::SparReport;
use crate::errors::{CalcError, CalcResult};
use crate::loads::StationLoad;
use crate::model::{SparModel, SCHEMA_VERSION};
use crate::report::{write_csv, ReportRow};

/// Report CSV file names, in the order they are written
pub const WEB_CSV: &str = "web.csv";
pub const FLANGE_CSV: &str = "flange.csv";
pub const STIFFENER_CSV: &str = "stiffener.csv";
pub const RIVET_CSV: &str = "rivet.csv";

/// Write `contents` to `path` through a synced temp file and a rename.
fn write_atomic(path: &Path, contents: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn read_to_string(path: &Path) -> CalcResult<String> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;
    Ok(contents)
}

/// Load a model from a JSON file.
///
/// # Returns
///
/// * `Ok(SparModel)` - Parsed model; not yet validated
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON or malformed chart
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_model(path: &Path) -> CalcResult<SparModel> {
    let contents = read_to_string(path)?;

    let model: SparModel = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid model in {}: {}", path.display(), e),
    })?;

    validate_version(&model.version)?;
    info!(path = %path.display(), segments = model.segments.len(), "loaded model");

    Ok(model)
}

/// Save a model as pretty-printed JSON.
pub fn save_model(model: &SparModel, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(model)?;
    write_atomic(path, json.as_bytes())
}

/// Save a report as pretty-printed JSON. Undefined values are written as `null`.
pub fn save_report(report: &SparReport, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    write_atomic(path, json.as_bytes())?;
    info!(path = %path.display(), "saved report");
    Ok(())
}

fn save_rows<R: ReportRow>(rows: &[R], path: &Path) -> CalcResult<()> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows)?;
    write_atomic(path, &buffer)
}

/// Write one CSV per element type into `dir`, creating it if needed.
///
/// Element types with no rows still get a header-only file. Returns the
/// paths written.
pub fn write_report_csv(report: &SparReport, dir: &Path) -> CalcResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| {
        CalcError::file_error("create directory", dir.display().to_string(), e.to_string())
    })?;

    let paths: Vec<PathBuf> = [WEB_CSV, FLANGE_CSV, STIFFENER_CSV, RIVET_CSV]
        .iter()
        .map(|name| dir.join(name))
        .collect();

    save_rows(&report.web, &paths[0])?;
    save_rows(&report.flange, &paths[1])?;
    save_rows(&report.stiffener, &paths[2])?;
    save_rows(&report.rivet, &paths[3])?;

    info!(dir = %dir.display(), files = paths.len(), "wrote report CSV files");
    Ok(paths)
}

/// One line of a station-load CSV.
#[derive(Debug, Serialize, Deserialize)]
struct LoadRecord {
    #[serde(rename = "y[mm]")]
    station_mm: f64,
    #[serde(rename = "S[N]")]
    shear_n: f64,
    #[serde(rename = "M[N*m]")]
    moment_nm: f64,
}

/// Read station loads from CSV with columns `y[mm]`, `S[N]`, `M[N*m]`.
pub fn read_station_loads(path: &Path) -> CalcResult<Vec<StationLoad>> {
    let contents = read_to_string(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let mut loads = Vec::new();
    for (line, record) in reader.deserialize::<LoadRecord>().enumerate() {
        let record = record.map_err(|e| CalcError::SerializationError {
            reason: format!("{} record {}: {}", path.display(), line + 1, e),
        })?;
        loads.push(StationLoad::new(record.station_mm, record.shear_n, record.moment_nm));
    }
    Ok(loads)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Option<Vec<u32>> { v.split('.').map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version).ok_or_else(mismatch)?;
    let current_parts = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // Within 0.x, a newer minor version may carry fields this build ignores
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}
