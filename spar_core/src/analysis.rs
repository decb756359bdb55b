//! # Spar Analysis
//!
//! Runs every element check of a [`SparModel`] and collects the rows into a
//! [`SparReport`]. The model is validated first; after that, nothing aborts
//! the run. A margin that falls off a chart is recorded as undefined in its
//! row and counted in the summary.
//!
//! ## Example
//!
//! ```rust
//! use spar_core::analysis::analyze;
//! use spar_core::model::SparModel;
//!
//! let report = analyze(&SparModel::sample()).unwrap();
//! assert_eq!(report.web.len(), 2);
//! assert_eq!(report.summary.undefined_count, 0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::CalcResult;
use crate::model::{SparModel, SCHEMA_VERSION};
use crate::report::{FlangeRow, ReportRow, RivetRow, StiffenerRow, WebRow};

/// Which element a margin belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Web,
    Flange,
    Stiffener,
    Rivet,
}

impl ElementKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Web => "Web",
            ElementKind::Flange => "Compression flange",
            ElementKind::Stiffener => "Stiffener",
            ElementKind::Rivet => "Rivet row",
        }
    }
}

/// The lowest defined margin in a report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoverningMargin {
    pub element: ElementKind,
    /// Left station of the governing segment (mm)
    pub y_left: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// `None` when no margin is defined
    pub governing: Option<GoverningMargin>,
    /// Rows whose margin could not be evaluated
    pub undefined_count: usize,
    /// Rows with a defined negative margin
    pub failing_count: usize,
    /// Total web mass over all segments (kg)
    pub web_mass_kg: f64,
}

impl ReportSummary {
    fn new() -> Self {
        ReportSummary {
            governing: None,
            undefined_count: 0,
            failing_count: 0,
            web_mass_kg: 0.0,
        }
    }

    fn record<R: ReportRow>(&mut self, element: ElementKind, y_left: f64, row: &R) {
        let margin = row.margin();
        if !row.status().is_ok() || margin.is_nan() {
            warn!(
                element = element.display_name(),
                y_left,
                status = %row.status().label(),
                "margin undefined"
            );
            self.undefined_count += 1;
            return;
        }
        if margin < 0.0 {
            warn!(element = element.display_name(), y_left, margin, "negative margin");
            self.failing_count += 1;
        }
        let lower = match &self.governing {
            Some(current) => margin < current.margin,
            None => true,
        };
        if lower {
            self.governing = Some(GoverningMargin {
                element,
                y_left,
                margin,
            });
        }
    }

    /// True when every margin is defined and non-negative
    pub fn all_positive(&self) -> bool {
        self.undefined_count == 0 && self.failing_count == 0
    }
}

/// Margins of one segment, in model order. `None` where the segment has no
/// such element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMargins {
    /// Position in `SparModel::segments`
    pub index: usize,
    pub y_left: f64,
    pub web: f64,
    pub flange: Option<f64>,
    pub stiffener: Option<f64>,
    pub rivet: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub version: String,
    pub label: String,
    pub generated_at: DateTime<Utc>,
}

/// All rows of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparReport {
    pub meta: ReportMeta,
    pub web: Vec<WebRow>,
    pub flange: Vec<FlangeRow>,
    pub stiffener: Vec<StiffenerRow>,
    pub rivet: Vec<RivetRow>,
    /// One entry per segment, matching rows by segment rather than station
    pub segments: Vec<SegmentMargins>,
    pub summary: ReportSummary,
}

/// Evaluate every element of `model`.
///
/// # Errors
///
/// Only input errors from [`SparModel::validate`]. Chart range misses end up
/// in the rows, not here.
pub fn analyze(model: &SparModel) -> CalcResult<SparReport> {
    model.validate()?;
    info!(label = %model.label, segments = model.segments.len(), "analyzing spar");

    let mut report = SparReport {
        meta: ReportMeta {
            version: SCHEMA_VERSION.to_string(),
            label: model.label.clone(),
            generated_at: Utc::now(),
        },
        web: Vec::with_capacity(model.segments.len()),
        flange: Vec::new(),
        stiffener: Vec::new(),
        rivet: Vec::new(),
        segments: Vec::with_capacity(model.segments.len()),
        summary: ReportSummary::new(),
    };

    for (index, segment) in model.segments.iter().enumerate() {
        let web = segment.build_web(model)?;
        let load = model.design_load(web.y_left)?;
        let he = segment.he_mm;
        debug!(
            y_left = web.y_left,
            y_right = web.y_right,
            shear = load.shear_n,
            moment = load.moment_nm,
            "segment loads"
        );

        let web_row = WebRow::compute(&web, load.shear_n, he)?;
        report.summary.record(ElementKind::Web, web.y_left, &web_row);
        let mut margins = SegmentMargins {
            index,
            y_left: web.y_left,
            web: web_row.margin(),
            flange: None,
            stiffener: None,
            rivet: None,
        };
        report.web.push(web_row);
        report.summary.web_mass_kg += web.mass_kg();

        if let Some(input) = &segment.flange {
            let flange = input.build(&web, model.effective_web_width_ratio, model.material)?;
            let row = FlangeRow::compute(&flange, load.moment_nm, he)?;
            report.summary.record(ElementKind::Flange, web.y_left, &row);
            margins.flange = Some(row.margin());
            report.flange.push(row);
        }

        if let Some(input) = &segment.stiffener {
            let stiffener = input.build(&web, model.material)?;
            let row = StiffenerRow::compute(&stiffener, segment.stiffener_he())?;
            report.summary.record(ElementKind::Stiffener, web.y_left, &row);
            if !row.crippling_status.is_ok() {
                warn!(
                    y_left = web.y_left,
                    status = %row.crippling_status.label(),
                    "stiffener crippling undefined"
                );
            }
            margins.stiffener = Some(row.margin());
            report.stiffener.push(row);
        }

        if let Some(input) = &segment.rivet {
            let rivet = input.build()?;
            let row = RivetRow::compute(&rivet, &web, input.pitch, load.shear_n, he)?;
            report.summary.record(ElementKind::Rivet, web.y_left, &row);
            margins.rivet = Some(row.margin());
            report.rivet.push(row);
        }
        report.segments.push(margins);
    }

    match &report.summary.governing {
        Some(g) => info!(
            element = g.element.display_name(),
            y_left = g.y_left,
            margin = g.margin,
            undefined = report.summary.undefined_count,
            "analysis complete"
        ),
        None => warn!(
            undefined = report.summary.undefined_count,
            "analysis complete with no defined margin"
        ),
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::StationLoad;
    use crate::model::{FlangeInput, SegmentInput, WebInput};
    use crate::report::RowStatus;

    #[test]
    fn test_sample_report() {
        let report = analyze(&SparModel::sample()).unwrap();
        assert_eq!(report.web.len(), 2);
        assert_eq!(report.flange.len(), 2);
        assert_eq!(report.stiffener.len(), 2);
        assert_eq!(report.rivet.len(), 2);
        assert_eq!(report.meta.label, "sample front spar");

        assert!((report.web[0].margin - 0.622037).abs() < 1e-6);
        assert!((report.flange[0].margin - 0.054098).abs() < 1e-5);
        assert!((report.stiffener[0].margin - 0.034976).abs() < 1e-5);
        assert!((report.rivet[0].hole_loss_margin - 0.310606).abs() < 1e-5);
        assert!(report.summary.all_positive());
    }

    #[test]
    fn test_governing_margin_is_minimum() {
        let report = analyze(&SparModel::sample()).unwrap();
        let governing = report.summary.governing.unwrap();

        let all: Vec<f64> = report
            .web
            .iter()
            .map(|r| r.margin)
            .chain(report.flange.iter().map(|r| r.margin))
            .chain(report.stiffener.iter().map(|r| r.margin))
            .chain(report.rivet.iter().map(|r| r.margin.min(r.hole_loss_margin)))
            .collect();
        let min = all.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_eq!(governing.margin, min);
    }

    #[test]
    fn test_undefined_margin_does_not_abort() {
        let mut model = SparModel::sample();
        // A slender flange falls off the crippling curve
        model.segments[0].flange = Some(FlangeInput {
            thickness: 1.0,
            b_bottom: 150.0,
            b_height: 20.0,
        });
        let report = analyze(&model).unwrap();

        assert_eq!(report.flange.len(), 2);
        assert!(report.flange[0].margin.is_nan());
        assert!(matches!(report.flange[0].status, RowStatus::Undefined(_)));
        assert_eq!(report.summary.undefined_count, 1);
        assert!(!report.summary.all_positive());
        // The rest of the run still evaluated
        assert!(report.flange[1].status.is_ok());
        assert!(report.summary.governing.unwrap().margin.is_finite());
    }

    #[test]
    fn test_segment_margins_match_by_index() {
        let mut model = SparModel::sample();
        // More significant figures than a web CSV cell keeps
        model.segments[0].web.y_left = 1234.5;
        model.segments[0].web.y_right = 1400.0;
        model.segments[0].web.division = 1;
        model.segments[0].flange = None;
        model.loads.push(StationLoad::new(1234.5, 20000.0, 30000.0));
        let report = analyze(&model).unwrap();

        assert_eq!(report.segments.len(), model.segments.len());
        let first = &report.segments[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.y_left, 1234.5);
        assert_eq!(first.web, report.web[0].margin);
        assert_eq!(first.flange, None);
        assert!(report.stiffener[0].status.is_ok());
        assert_eq!(first.stiffener, Some(report.stiffener[0].margin));
        let rivet = &report.rivet[0];
        assert_eq!(first.rivet, Some(rivet.margin.min(rivet.hole_loss_margin)));

        // The second segment's flange is the only flange row
        assert_eq!(report.segments[1].flange, Some(report.flange[0].margin));
    }

    #[test]
    fn test_invalid_model_is_rejected_before_analysis() {
        let mut model = SparModel::sample();
        model.segments.push(SegmentInput {
            web: WebInput {
                y_left: 1500.0,
                y_right: 1400.0,
                division: 2,
                thickness: 1.6,
            },
            he_mm: 270.0,
            flange: None,
            stiffener: None,
            rivet: None,
        });
        assert!(analyze(&model).unwrap_err().is_configuration_error());
    }

    #[test]
    fn test_web_mass_is_summed() {
        let model = SparModel::sample();
        let report = analyze(&model).unwrap();
        let expected: f64 = model
            .segments
            .iter()
            .map(|s| s.build_web(&model).unwrap().mass_kg())
            .sum();
        assert!((report.summary.web_mass_kg - expected).abs() < 1e-12);
        assert!(report.summary.web_mass_kg > 0.667);
    }

    #[test]
    fn test_report_serializes() {
        let report = analyze(&SparModel::sample()).unwrap();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"governing\""));
        assert!(json.contains("\"generated_at\""));
    }
}
