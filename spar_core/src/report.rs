//! # Margin Report Rows
//!
//! One write-once record per element per station, holding every intermediate
//! value of the check and the resulting M.S. Rows are built from the elements'
//! `CalcResult` chains; this is the only place where an out-of-range lookup
//! becomes a `NaN` cell. The row's [`RowStatus`] keeps the reason so the
//! undefined margin is visible in the output rather than read as a number.
//!
//! Column order and units follow the published report layout for each
//! element type; every CSV adds a trailing `Status` column. Rows keep full
//! precision; web CSV cells are rounded to [`WEB_SIGNIFICANT_FIGURES`] when
//! written.
//!
//! ## Example
//!
//! ```rust
//! use spar_core::elements::Web;
//! use spar_core::report::{ReportRow, RowStatus, WebRow};
//!
//! let web = Web::new(625.0, 1000.0, 3, 2.03).unwrap();
//! let row = WebRow::compute(&web, 38429.0, 297.0).unwrap();
//! assert_eq!(row.spacing_de, 125.0);
//! assert!((row.margin - 0.622037).abs() < 1e-6);
//! assert_eq!(row.status, RowStatus::Ok);
//! assert_eq!(row.record().last().unwrap(), "0.622");
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::crippling::abscissa;
use crate::elements::{CompressionFlange, Rivet, RivetClass, Stiffener, Web};
use crate::errors::{CalcError, CalcResult};
use crate::units::round_sig;

/// Significant figures kept in web report rows
pub const WEB_SIGNIFICANT_FIGURES: u32 = 4;

/// Whether every value in a row is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "error")]
pub enum RowStatus {
    Ok,
    /// At least one value fell outside a chart or table; the first such
    /// error is kept
    Undefined(CalcError),
}

impl RowStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, RowStatus::Ok)
    }

    /// Text for the `Status` column
    pub fn label(&self) -> String {
        match self {
            RowStatus::Ok => "OK".to_string(),
            RowStatus::Undefined(e) => format!("UNDEFINED: {}", e),
        }
    }
}

/// Collects domain errors while a row is assembled.
#[derive(Debug, Default)]
struct Sentinel {
    first: Option<CalcError>,
}

impl Sentinel {
    /// Unwrap a value, turning a domain error into `NaN`. Any other error is
    /// a caller mistake and propagates.
    fn take(&mut self, result: CalcResult<f64>) -> CalcResult<f64> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if e.is_domain_error() => {
                if self.first.is_none() {
                    self.first = Some(e);
                }
                Ok(f64::NAN)
            }
            Err(e) => Err(e),
        }
    }

    fn status(self) -> RowStatus {
        match self.first {
            None => RowStatus::Ok,
            Some(e) => RowStatus::Undefined(e),
        }
    }
}

/// A fixed-schema report record.
pub trait ReportRow {
    /// Column headers, in output order, excluding `Status`
    const HEADERS: &'static [&'static str];

    /// Cell values in header order
    fn record(&self) -> Vec<String>;

    fn status(&self) -> &RowStatus;

    /// M.S. of the row (`NaN` when undefined)
    fn margin(&self) -> f64;
}

fn cell(value: f64) -> String {
    value.to_string()
}

fn web_cell(value: f64) -> String {
    cell(round_sig(value, WEB_SIGNIFICANT_FIGURES))
}

// ============================================================================
// Web
// ============================================================================

/// Web shear check at one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebRow {
    pub y_left: f64,
    pub y_right: f64,
    pub division: u32,
    pub spacing_de: f64,
    pub web_thickness: f64,
    /// Web height at the smallest station (mm)
    pub web_height: f64,
    /// Maximum shear flow (N/m)
    pub q_max: f64,
    pub f_scr: f64,
    pub f_su: f64,
    pub f_s: f64,
    pub margin: f64,
    pub status: RowStatus,
}

impl WebRow {
    /// Run the web check for front-spar shear `sf` (N) at effective depth `he` (mm).
    pub fn compute(web: &Web, sf: f64, he: f64) -> CalcResult<Self> {
        let mut sentinel = Sentinel::default();
        let f_scr = sentinel.take(web.buckling_stress().map(|s| s.0))?;
        let f_su = sentinel.take(web.ultimate_shear_allowable().map(|s| s.0))?;
        let margin = sentinel.take(web.margin(sf, he))?;

        Ok(WebRow {
            y_left: web.y_left,
            y_right: web.y_right,
            division: web.division,
            spacing_de: web.width_b(),
            web_thickness: web.thickness,
            web_height: web.height_a(),
            q_max: web.q_max(sf, he),
            f_scr,
            f_su,
            f_s: web.shear_stress(sf, he).0,
            margin,
            status: sentinel.status(),
        })
    }
}

impl ReportRow for WebRow {
    const HEADERS: &'static [&'static str] = &[
        "Left STA[mm]",
        "Right STA[mm]",
        "Division",
        "Spacing de[mm]",
        "Web thickness[mm]",
        "Web height at min STA[mm]",
        "q_max[N/m]",
        "F_scr[MPa]",
        "F_su[MPa]",
        "f_s[MPa]",
        "M.S.",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            web_cell(self.y_left),
            web_cell(self.y_right),
            self.division.to_string(),
            web_cell(self.spacing_de),
            web_cell(self.web_thickness),
            web_cell(self.web_height),
            web_cell(self.q_max),
            web_cell(self.f_scr),
            web_cell(self.f_su),
            web_cell(self.f_s),
            web_cell(self.margin),
        ]
    }

    fn status(&self) -> &RowStatus {
        &self.status
    }

    fn margin(&self) -> f64 {
        self.margin
    }
}

// ============================================================================
// Compression flange
// ============================================================================

/// Compression flange crippling check at one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlangeRow {
    pub y_left: f64,
    pub y_right: f64,
    pub web_thickness: f64,
    /// Front-spar bending moment (N·m)
    pub moment: f64,
    pub flange_thickness: f64,
    pub b_bottom: f64,
    pub b_height: f64,
    /// Axial force (N)
    pub axial_force: f64,
    /// Compression area (mm²)
    pub area: f64,
    pub f_c: f64,
    /// Crippling chart abscissa sqrt(F_cy/E)·(b/t)
    pub abscissa: f64,
    pub f_cc: f64,
    pub margin: f64,
    pub status: RowStatus,
}

impl FlangeRow {
    /// Run the flange check for front-spar moment `moment` (N·m) at effective depth `he` (mm).
    pub fn compute(flange: &CompressionFlange<'_>, moment: f64, he: f64) -> CalcResult<Self> {
        let mut sentinel = Sentinel::default();
        let web = flange.web();
        let crippling = flange.crippling();
        let abscissa = match &crippling {
            Ok(c) => c.abscissa,
            // The abscissa is still meaningful when only the chart lookup failed
            Err(_) => match flange.compressive_yield() {
                Ok(fcy) => abscissa(fcy, flange.material.youngs_modulus(), flange.b_over_t()),
                Err(_) => f64::NAN,
            },
        };
        let f_cc = sentinel.take(crippling.map(|c| c.stress.0))?;
        let margin = sentinel.take(flange.margin(moment, he))?;

        Ok(FlangeRow {
            y_left: web.y_left,
            y_right: web.y_right,
            web_thickness: web.thickness,
            moment,
            flange_thickness: flange.thickness,
            b_bottom: flange.b_bottom,
            b_height: flange.b_height,
            axial_force: flange.axial_force(moment, he),
            area: flange.area(),
            f_c: flange.compressive_stress(moment, he).0,
            abscissa,
            f_cc,
            margin,
            status: sentinel.status(),
        })
    }
}

impl ReportRow for FlangeRow {
    const HEADERS: &'static [&'static str] = &[
        "Left STA[mm]",
        "Right STA[mm]",
        "Web thickness[mm]",
        "Moment[N*m]",
        "t_f[mm]",
        "b bottom[mm]",
        "b height[mm]",
        "P[N]",
        "A[mm^2]",
        "f_c[MPa]",
        "sqrt(Fcy/E)(b/t)",
        "F_cc[MPa]",
        "M.S.",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            cell(self.y_left),
            cell(self.y_right),
            cell(self.web_thickness),
            cell(self.moment),
            cell(self.flange_thickness),
            cell(self.b_bottom),
            cell(self.b_height),
            cell(self.axial_force),
            cell(self.area),
            cell(self.f_c),
            cell(self.abscissa),
            cell(self.f_cc),
            cell(self.margin),
        ]
    }

    fn status(&self) -> &RowStatus {
        &self.status
    }

    fn margin(&self) -> f64 {
        self.margin
    }
}

// ============================================================================
// Stiffener
// ============================================================================

/// Stiffener inertia check at one station, with the leg crippling stress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StiffenerRow {
    pub y_left: f64,
    pub web_thickness: f64,
    pub stiffener_thickness: f64,
    pub spacing: f64,
    pub he: f64,
    pub bs1_bottom: f64,
    pub bs2_height: f64,
    /// Stiffener inertia (mm⁴)
    pub inertia: f64,
    /// Required inertia (mm⁴)
    pub required_inertia: f64,
    pub margin: f64,
    /// Leg crippling stress, an independent check (MPa)
    pub f_cc: f64,
    /// Inertia check status
    pub status: RowStatus,
    /// Crippling status, kept apart because F_cc does not enter the M.S.
    pub crippling_status: RowStatus,
}

impl StiffenerRow {
    pub fn compute(stiffener: &Stiffener<'_>, he: f64) -> CalcResult<Self> {
        let mut sentinel = Sentinel::default();
        let web = stiffener.web();
        let required_inertia = sentinel.take(stiffener.required_inertia(he))?;
        let margin = sentinel.take(stiffener.margin(he))?;
        let mut crippling = Sentinel::default();
        let f_cc = crippling.take(stiffener.crippling().map(|c| c.stress.0))?;

        Ok(StiffenerRow {
            y_left: web.y_left,
            web_thickness: web.thickness,
            stiffener_thickness: stiffener.thickness,
            spacing: stiffener.spacing(),
            he,
            bs1_bottom: stiffener.bs1_bottom,
            bs2_height: stiffener.bs2_height,
            inertia: stiffener.inertia(),
            required_inertia,
            margin,
            f_cc,
            status: sentinel.status(),
            crippling_status: crippling.status(),
        })
    }
}

impl ReportRow for StiffenerRow {
    const HEADERS: &'static [&'static str] = &[
        "Web thickness[mm]",
        "Stiffener thickness[mm]",
        "Stiffener spacing[mm]",
        "he[mm]",
        "bs1 bottom[mm]",
        "bs2 height[mm]",
        "I[mm^4]",
        "I_U[mm^4]",
        "M.S.",
        "F_cc[MPa]",
        "F_cc status",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            cell(self.web_thickness),
            cell(self.stiffener_thickness),
            cell(self.spacing),
            cell(self.he),
            cell(self.bs1_bottom),
            cell(self.bs2_height),
            cell(self.inertia),
            cell(self.required_inertia),
            cell(self.margin),
            cell(self.f_cc),
            self.crippling_status.label(),
        ]
    }

    fn status(&self) -> &RowStatus {
        &self.status
    }

    fn margin(&self) -> f64 {
        self.margin
    }
}

// ============================================================================
// Rivet row
// ============================================================================

/// Web-to-flange rivet row check at one station, with the web net-section
/// margin along the same row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RivetRow {
    pub y_left: f64,
    pub diameter: f64,
    pub pitch: f64,
    pub class: RivetClass,
    /// Single-shear allowable (N)
    pub allowable_load: f64,
    /// Load per rivet (N)
    pub applied_load: f64,
    pub margin: f64,
    /// Web shear stress on the net section between holes (MPa)
    pub f_sj: f64,
    /// Web M.S. including hole loss
    pub hole_loss_margin: f64,
    pub status: RowStatus,
}

impl RivetRow {
    pub fn compute(rivet: &Rivet, web: &Web, pitch: f64, sf: f64, he: f64) -> CalcResult<Self> {
        let mut sentinel = Sentinel::default();
        let margin = rivet.margin(sf, he, pitch)?;
        let f_sj = web.net_section_shear_stress(pitch, rivet.diameter, sf, he)?.0;
        let hole_loss_margin = sentinel.take(web.hole_loss_margin(pitch, rivet.diameter, sf, he))?;

        Ok(RivetRow {
            y_left: web.y_left,
            diameter: rivet.diameter,
            pitch,
            class: rivet.class,
            allowable_load: rivet.allowable_load(),
            applied_load: rivet.applied_load(sf, he, pitch),
            margin,
            f_sj,
            hole_loss_margin,
            status: sentinel.status(),
        })
    }
}

impl ReportRow for RivetRow {
    const HEADERS: &'static [&'static str] = &[
        "Left STA[mm]",
        "Diameter[mm]",
        "Pitch[mm]",
        "Class",
        "P_allow[N]",
        "Load per rivet[N]",
        "M.S.",
        "f_sj[MPa]",
        "Web hole-loss M.S.",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            cell(self.y_left),
            cell(self.diameter),
            cell(self.pitch),
            self.class.to_string(),
            cell(self.allowable_load),
            cell(self.applied_load),
            cell(self.margin),
            cell(self.f_sj),
            cell(self.hole_loss_margin),
        ]
    }

    fn status(&self) -> &RowStatus {
        &self.status
    }

    fn margin(&self) -> f64 {
        self.margin.min(self.hole_loss_margin)
    }
}

// ============================================================================
// CSV output
// ============================================================================

/// Write a header line and `rows` as CSV, ending each line with the status.
pub fn write_csv<R: ReportRow, W: Write>(writer: W, rows: &[R]) -> CalcResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = R::HEADERS.to_vec();
    header.push("Status");
    csv_writer.write_record(&header)?;

    for row in rows {
        let mut record = row.record();
        record.push(row.status().label());
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush().map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    Ok(())
}
