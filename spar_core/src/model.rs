//! # Spar Model
//!
//! `SparModel` is the input document for one analysis run: the spar height
//! chart, material constants, station loads, and per-segment element sizes.
//! Models are stored as JSON and carry a schema version checked on load.
//!
//! ## Structure
//!
//! ```text
//! SparModel
//! ├── version, label
//! ├── material, height_curve, effective_web_width_ratio
//! ├── load_factors, loads_are_design_loads
//! ├── loads: [StationLoad]
//! └── segments: [SegmentInput]
//!     ├── web, he_mm
//!     └── flange?, stiffener?, rivet?
//! ```
//!
//! ## Example
//!
//! ```rust
//! use spar_core::model::SparModel;
//!
//! let model = SparModel::sample();
//! model.validate().unwrap();
//!
//! let load = model.design_load(625.0).unwrap();
//! assert_eq!(load.shear_n, 38429.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::charts::FRONT_SPAR_HEIGHT;
use crate::curve::DesignCurve;
use crate::elements::flange::DEFAULT_EFFECTIVE_WEB_WIDTH_RATIO;
use crate::elements::{self, CompressionFlange, Rivet, RivetClass, Stiffener, Web};
use crate::errors::{CalcError, CalcResult};
use crate::loads::{LoadFactors, StationLoad};
use crate::materials::MaterialConstants;

/// Current schema version for model files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Two stations closer than this are the same station (mm)
const STATION_TOLERANCE_MM: f64 = 1e-6;

fn default_height_curve() -> DesignCurve {
    FRONT_SPAR_HEIGHT.clone()
}

fn default_effective_web_width_ratio() -> f64 {
    DEFAULT_EFFECTIVE_WEB_WIDTH_RATIO
}

/// Root input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparModel {
    /// Schema version of the file
    pub version: String,

    /// Free-form name for the run, copied into the report
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub material: MaterialConstants,

    /// Spar height (mm) vs. station (mm)
    #[serde(default = "default_height_curve")]
    pub height_curve: DesignCurve,

    /// Web strip acting with each compression flange, in web thicknesses
    #[serde(default = "default_effective_web_width_ratio")]
    pub effective_web_width_ratio: f64,

    /// When true, `loads` are already front-spar ultimate loads and
    /// `load_factors` is not applied
    #[serde(default)]
    pub loads_are_design_loads: bool,

    #[serde(default)]
    pub load_factors: LoadFactors,

    pub loads: Vec<StationLoad>,

    pub segments: Vec<SegmentInput>,
}

/// Sizes of the elements in one spar segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentInput {
    pub web: WebInput,

    /// Distance between flange centroids (mm)
    pub he_mm: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flange: Option<FlangeInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stiffener: Option<StiffenerInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rivet: Option<RivetInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebInput {
    pub y_left: f64,
    pub y_right: f64,
    pub division: u32,
    pub thickness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlangeInput {
    pub thickness: f64,
    pub b_bottom: f64,
    pub b_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StiffenerInput {
    pub thickness: f64,
    pub bs1_bottom: f64,
    pub bs2_height: f64,
    /// Depth used for the inertia check; the segment's `he_mm` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub he_mm: Option<f64>,
}

/// Web-to-flange rivet row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RivetInput {
    pub diameter: f64,
    pub pitch: f64,
    #[serde(default)]
    pub class: RivetClass,
}

impl SegmentInput {
    /// Build the web on `model`'s height curve and material
    pub fn build_web(&self, model: &SparModel) -> CalcResult<Web> {
        Web::with_height_curve(
            self.web.y_left,
            self.web.y_right,
            self.web.division,
            self.web.thickness,
            &model.height_curve,
            model.material,
        )
    }

    /// Depth for the stiffener check
    pub fn stiffener_he(&self) -> f64 {
        self.stiffener.and_then(|s| s.he_mm).unwrap_or(self.he_mm)
    }
}

impl FlangeInput {
    pub fn build<'a>(
        &self,
        web: &'a Web,
        effective_web_width_ratio: f64,
        material: MaterialConstants,
    ) -> CalcResult<CompressionFlange<'a>> {
        CompressionFlange::with_effective_web(
            self.thickness,
            self.b_bottom,
            self.b_height,
            web,
            effective_web_width_ratio,
        )
        .map(|flange| flange.with_material(material))
    }
}

impl StiffenerInput {
    pub fn build<'a>(&self, web: &'a Web, material: MaterialConstants) -> CalcResult<Stiffener<'a>> {
        Stiffener::new(self.thickness, self.bs1_bottom, self.bs2_height, web)
            .map(|stiffener| stiffener.with_material(material))
    }
}

impl RivetInput {
    pub fn build(&self) -> CalcResult<Rivet> {
        Rivet::with_class(self.diameter, self.class)
    }
}

/// Prefix an input error's field with the segment it came from.
fn in_segment(index: usize, part: &str, err: CalcError) -> CalcError {
    match err {
        CalcError::InvalidInput { field, value, reason } => CalcError::InvalidInput {
            field: format!("segments[{}].{}.{}", index, part, field),
            value,
            reason,
        },
        // A station off the height chart is a bad model, not an undefined margin
        CalcError::OutOfRange { quantity, value, min, max } => CalcError::InvalidInput {
            field: format!("segments[{}].{}", index, part),
            value: value.to_string(),
            reason: format!("{} outside [{}, {}]", quantity, min, max),
        },
        other => other,
    }
}

fn require_positive(field: String, value: f64) -> CalcResult<()> {
    elements::require_positive(&field, value, "Must be a positive number")
}

impl SparModel {
    /// Create an empty model at the current schema version with default
    /// material, height chart and load factors.
    pub fn new(label: impl Into<String>) -> Self {
        SparModel {
            version: SCHEMA_VERSION.to_string(),
            label: label.into(),
            material: MaterialConstants::default(),
            height_curve: default_height_curve(),
            effective_web_width_ratio: DEFAULT_EFFECTIVE_WEB_WIDTH_RATIO,
            loads_are_design_loads: false,
            load_factors: LoadFactors::default(),
            loads: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// A two-segment model with front-spar design loads, used by the CLI's
    /// `sample` command and in tests.
    pub fn sample() -> Self {
        let mut model = SparModel::new("sample front spar");
        model.loads_are_design_loads = true;
        model.loads = vec![
            StationLoad::new(625.0, 38429.0, 74623.0),
            StationLoad::new(1000.0, 25000.0, 45000.0),
        ];
        model.segments = vec![
            SegmentInput {
                web: WebInput {
                    y_left: 625.0,
                    y_right: 1000.0,
                    division: 3,
                    thickness: 2.03,
                },
                he_mm: 297.0,
                flange: Some(FlangeInput {
                    thickness: 6.0,
                    b_bottom: 34.5,
                    b_height: 34.5,
                }),
                stiffener: Some(StiffenerInput {
                    thickness: 2.29,
                    bs1_bottom: 22.0,
                    bs2_height: 19.0,
                    he_mm: Some(289.0),
                }),
                rivet: Some(RivetInput {
                    diameter: 4.8,
                    pitch: 25.0,
                    class: RivetClass::Ad,
                }),
            },
            SegmentInput {
                web: WebInput {
                    y_left: 1000.0,
                    y_right: 1500.0,
                    division: 4,
                    thickness: 1.8,
                },
                he_mm: 280.0,
                flange: Some(FlangeInput {
                    thickness: 5.0,
                    b_bottom: 30.0,
                    b_height: 30.0,
                }),
                stiffener: Some(StiffenerInput {
                    thickness: 2.0,
                    bs1_bottom: 22.0,
                    bs2_height: 22.0,
                    he_mm: None,
                }),
                rivet: Some(RivetInput {
                    diameter: 4.0,
                    pitch: 22.0,
                    class: RivetClass::Ad,
                }),
            },
        ];
        model
    }

    /// Input load at `station`, as given in the file.
    pub fn load_at(&self, station: f64) -> CalcResult<StationLoad> {
        self.loads
            .iter()
            .find(|load| (load.station_mm - station).abs() < STATION_TOLERANCE_MM)
            .copied()
            .ok_or_else(|| {
                CalcError::invalid_input(
                    "loads",
                    station.to_string(),
                    "No station load given at this station",
                )
            })
    }

    /// Front-spar ultimate load at `station`.
    pub fn design_load(&self, station: f64) -> CalcResult<StationLoad> {
        let load = self.load_at(station)?;
        if self.loads_are_design_loads {
            Ok(load)
        } else {
            Ok(self.load_factors.front_spar(&load))
        }
    }

    /// Check the whole model before any margin is computed.
    ///
    /// Every problem found here is an input error; nothing is evaluated on
    /// a model that fails.
    pub fn validate(&self) -> CalcResult<()> {
        if self.segments.is_empty() {
            return Err(CalcError::missing_field("segments"));
        }
        if self.effective_web_width_ratio < 0.0 || !self.effective_web_width_ratio.is_finite() {
            return Err(CalcError::invalid_input(
                "effective_web_width_ratio",
                self.effective_web_width_ratio.to_string(),
                "Must be a non-negative number",
            ));
        }
        require_positive("material.youngs_modulus_ksi".to_string(), self.material.youngs_modulus_ksi)?;
        require_positive("material.density_g_cm3".to_string(), self.material.density_g_cm3)?;
        if !self.loads_are_design_loads {
            self.load_factors.validate()?;
        }

        for (i, load) in self.loads.iter().enumerate() {
            for (name, value) in [
                ("station_mm", load.station_mm),
                ("shear_n", load.shear_n),
                ("moment_nm", load.moment_nm),
            ] {
                if !value.is_finite() {
                    return Err(CalcError::invalid_input(
                        format!("loads[{}].{}", i, name),
                        value.to_string(),
                        "Must be a finite number",
                    ));
                }
            }
        }

        for (i, segment) in self.segments.iter().enumerate() {
            let web = segment.build_web(self).map_err(|e| in_segment(i, "web", e))?;
            require_positive(format!("segments[{}].he_mm", i), segment.he_mm)?;
            self.load_at(segment.web.y_left).map_err(|_| {
                CalcError::invalid_input(
                    format!("segments[{}].web.y_left", i),
                    segment.web.y_left.to_string(),
                    "No station load given at the segment's left station",
                )
            })?;

            if let Some(flange) = &segment.flange {
                flange
                    .build(&web, self.effective_web_width_ratio, self.material)
                    .map_err(|e| in_segment(i, "flange", e))?;
            }
            if let Some(stiffener) = &segment.stiffener {
                stiffener.build(&web, self.material).map_err(|e| in_segment(i, "stiffener", e))?;
                require_positive(format!("segments[{}].stiffener.he_mm", i), segment.stiffener_he())?;
            }
            if let Some(rivet) = &segment.rivet {
                let built = rivet.build().map_err(|e| in_segment(i, "rivet", e))?;
                elements::check_pitch(rivet.pitch, built.diameter).map_err(|e| in_segment(i, "rivet", e))?;
            }
        }
        Ok(())
    }
}
