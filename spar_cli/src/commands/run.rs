//! Run command

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use spar_core::analysis::{analyze, SparReport};
use spar_core::file_io::{save_report, write_report_csv};
use tracing::info;

#[derive(Args)]
pub struct RunArgs {
    /// Model file (JSON)
    pub model: PathBuf,

    /// Station loads CSV (y[mm], S[N], M[N*m]) replacing the model's loads
    #[arg(long)]
    pub loads: Option<PathBuf>,

    /// Output directory for report.json and the CSV files
    #[arg(short, long, default_value = "spar_report")]
    pub out: PathBuf,

    /// Fail when any margin is negative or undefined
    #[arg(long)]
    pub strict: bool,

    /// Print the summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let model = super::load_with_loads(&args.model, args.loads.as_deref())?;
    let report = analyze(&model).context("model is invalid")?;

    let written = write_report_csv(&report, &args.out)?;
    let json_path = args.out.join("report.json");
    save_report(&report, &json_path)?;
    info!(files = written.len() + 1, out = %args.out.display(), "reports written");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        print_summary(&report);
    }

    if args.strict && !report.summary.all_positive() {
        bail!(
            "{} negative and {} undefined margins",
            report.summary.failing_count,
            report.summary.undefined_count
        );
    }
    Ok(())
}

fn print_summary(report: &SparReport) {
    println!("{:<10} {:>10} {:>10} {:>10} {:>10}", "STA[mm]", "web", "flange", "stiffener", "rivet");
    for segment in &report.segments {
        println!(
            "{:<10} {:>10} {:>10} {:>10} {:>10}",
            segment.y_left,
            fmt_margin(Some(segment.web)),
            fmt_margin(segment.flange),
            fmt_margin(segment.stiffener),
            fmt_margin(segment.rivet)
        );
    }

    let summary = &report.summary;
    match &summary.governing {
        Some(g) => println!(
            "\nGoverning: {} at STA {} mm, M.S. = {:.3}",
            g.element.display_name(),
            g.y_left,
            g.margin
        ),
        None => println!("\nNo defined margin"),
    }
    if summary.undefined_count > 0 {
        println!("Undefined margins: {} (see Status column)", summary.undefined_count);
    }
    println!("Web mass: {:.3} kg", summary.web_mass_kg);
}

fn fmt_margin(margin: Option<f64>) -> String {
    match margin {
        None => "-".to_string(),
        Some(m) if m.is_nan() => "UNDEF".to_string(),
        Some(m) => format!("{:.3}", m),
    }
}
