//! # Rivet
//!
//! Solid rivet in single shear. The allowable load is the shank area times
//! the rivet alloy's shear strength; there is no chart lookup.
//!
//! ## Example
//!
//! ```rust
//! use spar_core::elements::Rivet;
//!
//! let rivet = Rivet::new(6.35).unwrap();
//! assert!((rivet.allowable_load() - 6550.55).abs() < 0.01);
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::elements::web::check_effective_depth;
use crate::elements::{check_pitch, require_positive};
use crate::errors::CalcResult;
use crate::units::{Ksi, Mpa};

/// Rivet alloy designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RivetClass {
    /// 2117-T3
    #[default]
    #[serde(rename = "AD")]
    Ad,
    /// 2017-T3
    #[serde(rename = "D")]
    D,
    /// 2024-T31
    #[serde(rename = "DD")]
    Dd,
}

impl RivetClass {
    /// Shear strength F_su of the driven rivet
    pub fn shear_strength(&self) -> Ksi {
        match self {
            RivetClass::Ad => Ksi(30.0),
            RivetClass::D => Ksi(38.0),
            RivetClass::Dd => Ksi(41.0),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RivetClass::Ad => "AD",
            RivetClass::D => "D",
            RivetClass::Dd => "DD",
        }
    }
}

impl fmt::Display for RivetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A rivet of given shank diameter and alloy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rivet {
    /// Shank diameter (mm)
    pub diameter: f64,
    pub class: RivetClass,
}

impl Rivet {
    /// An AD rivet of the given diameter (mm)
    pub fn new(diameter: f64) -> CalcResult<Self> {
        Rivet::with_class(diameter, RivetClass::Ad)
    }

    pub fn with_class(diameter: f64, class: RivetClass) -> CalcResult<Self> {
        require_positive("diameter", diameter, "Rivet diameter must be positive")?;
        Ok(Rivet { diameter, class })
    }

    /// Shear strength of the rivet alloy
    pub fn shear_strength(&self) -> Mpa {
        self.class.shear_strength().into()
    }

    /// Single-shear allowable load, P_allow = π/4 · D² · F_su (N)
    pub fn allowable_load(&self) -> f64 {
        PI / 4.0 * self.diameter.powi(2) * self.shear_strength().0
    }

    /// Load on one rivet of a row carrying shear flow `q` at pitch `p` (N).
    ///
    /// # Arguments
    ///
    /// * `sf` - shear force carried by the front spar (N)
    /// * `he` - distance between flange centroids (mm)
    /// * `pitch` - rivet pitch (mm)
    pub fn applied_load(&self, sf: f64, he: f64, pitch: f64) -> f64 {
        sf / he * pitch
    }

    /// M.S. = P_allow / (q · p) − 1
    pub fn margin(&self, sf: f64, he: f64, pitch: f64) -> CalcResult<f64> {
        check_effective_depth(he)?;
        check_pitch(pitch, self.diameter)?;
        Ok(self.allowable_load() / self.applied_load(sf, he, pitch) - 1.0)
    }
}
