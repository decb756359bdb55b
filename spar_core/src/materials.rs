//! # Materials
//!
//! Material constants and thickness-banded allowables for 7075 aluminium.
//!
//! Handbook allowables such as F_su and F_cy are published per thickness
//! range. They are step functions of thickness and deliberately discontinuous,
//! so they are modelled with [`ThicknessBands`] rather than with a
//! [`DesignCurve`](crate::curve::DesignCurve): interpolating between bands
//! would invent values the handbook does not give.
//!
//! ## Example
//!
//! ```rust
//! use spar_core::materials::WEB_SHEAR_ULTIMATE;
//!
//! // 2.03 mm = 0.0799 in falls in the (0.062, 0.187] band -> 44 ksi
//! let fsu = WEB_SHEAR_ULTIMATE.allowable(2.03).unwrap();
//! assert!((fsu.0 - 303.37).abs() < 0.01);
//!
//! // 7 mm is thicker than the table covers
//! assert!(WEB_SHEAR_ULTIMATE.allowable(7.0).is_err());
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{mm_to_inch, Ksi, Mpa};

/// Which end of each band is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandClosure {
    /// Bands are `[lower, upper)`
    UpperExclusive,
    /// Bands are `(lower, upper]`
    UpperInclusive,
}

/// One row of a thickness table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThicknessBand {
    /// Upper thickness bound (in)
    pub upper_in: f64,
    /// Allowable stress for the band (ksi)
    pub stress: Ksi,
}

/// A handbook table mapping thickness ranges to discrete allowables.
///
/// Only built through [`ThicknessBands::new`], which checks the band edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThicknessBands {
    /// Allowable name, used in error messages
    pub name: String,
    /// Lower bound of the first band (in)
    pub lower_in: f64,
    /// Bands ordered by increasing upper bound
    pub bands: Vec<ThicknessBand>,
    pub closure: BandClosure,
}

impl ThicknessBands {
    /// Build a table, checking that the band edges increase.
    pub fn new(
        name: impl Into<String>,
        lower_in: f64,
        bands: &[(f64, f64)],
        closure: BandClosure,
    ) -> CalcResult<Self> {
        let name = name.into();
        if bands.is_empty() {
            return Err(CalcError::invalid_table(name, "no thickness bands"));
        }
        if !lower_in.is_finite() || lower_in < 0.0 {
            return Err(CalcError::invalid_table(
                name,
                format!("lower bound {} must be a finite, non-negative thickness", lower_in),
            ));
        }
        let mut previous = lower_in;
        for &(upper, stress) in bands {
            if !upper.is_finite() || !stress.is_finite() {
                return Err(CalcError::invalid_table(name, "band values must be finite"));
            }
            if upper <= previous {
                return Err(CalcError::invalid_table(
                    name,
                    format!("band edge {} does not exceed {}", upper, previous),
                ));
            }
            previous = upper;
        }
        Ok(ThicknessBands {
            name,
            lower_in,
            bands: bands
                .iter()
                .map(|&(upper_in, ksi)| ThicknessBand {
                    upper_in,
                    stress: Ksi(ksi),
                })
                .collect(),
            closure,
        })
    }

    /// Upper bound of the last band (in)
    pub fn upper_in(&self) -> f64 {
        self.bands.last().map(|b| b.upper_in).unwrap_or(self.lower_in)
    }

    /// Look up the band stress for a thickness given in inches.
    pub fn allowable_ksi(&self, thickness_in: f64) -> CalcResult<Ksi> {
        let out_of_range = || CalcError::out_of_range(self.name.clone(), thickness_in, self.lower_in, self.upper_in());

        let above_lower = match self.closure {
            BandClosure::UpperExclusive => thickness_in >= self.lower_in,
            BandClosure::UpperInclusive => thickness_in > self.lower_in,
        };
        if !above_lower {
            return Err(out_of_range());
        }

        self.bands
            .iter()
            .find(|band| match self.closure {
                BandClosure::UpperExclusive => thickness_in < band.upper_in,
                BandClosure::UpperInclusive => thickness_in <= band.upper_in,
            })
            .map(|band| band.stress)
            .ok_or_else(out_of_range)
    }

    /// Look up the allowable for a thickness in mm, returned in MPa.
    pub fn allowable(&self, thickness_mm: f64) -> CalcResult<Mpa> {
        self.allowable_ksi(mm_to_inch(thickness_mm)).map(Mpa::from)
    }
}

/// Elastic and mass constants of a sheet/extrusion material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialConstants {
    /// Young's modulus (ksi)
    pub youngs_modulus_ksi: f64,
    /// Density (g/cm³)
    pub density_g_cm3: f64,
}

impl MaterialConstants {
    /// 7075-T6 aluminium
    pub const AL_7075: MaterialConstants = MaterialConstants {
        youngs_modulus_ksi: 10.3e3,
        density_g_cm3: 2.81,
    };

    /// Young's modulus in MPa
    pub fn youngs_modulus(&self) -> Mpa {
        Ksi(self.youngs_modulus_ksi).into()
    }
}

impl Default for MaterialConstants {
    fn default() -> Self {
        MaterialConstants::AL_7075
    }
}

/// 7075 sheet ultimate shear stress F_su, used for webs.
pub static WEB_SHEAR_ULTIMATE: Lazy<ThicknessBands> = Lazy::new(|| {
    fixed_bands(
        "web F_su thickness [in]",
        0.011,
        &[(0.039, 42.0), (0.062, 42.0), (0.187, 44.0), (0.249, 45.0)],
        BandClosure::UpperInclusive,
    )
});

/// 7075 extrusion compressive yield F_cy, used for compression flanges.
pub static FLANGE_COMPRESSIVE_YIELD: Lazy<ThicknessBands> = Lazy::new(|| {
    fixed_bands(
        "flange F_cy thickness [in]",
        0.0,
        &[(0.499, 68.0), (5.000, 69.0)],
        BandClosure::UpperExclusive,
    )
});

/// 7075 sheet compressive yield F_cy, used for stiffeners.
pub static STIFFENER_COMPRESSIVE_YIELD: Lazy<ThicknessBands> = Lazy::new(|| {
    fixed_bands(
        "stiffener F_cy thickness [in]",
        0.012,
        &[(0.040, 61.0), (0.062, 62.0), (0.187, 64.0), (0.249, 65.0)],
        BandClosure::UpperExclusive,
    )
});

fn fixed_bands(name: &str, lower_in: f64, bands: &[(f64, f64)], closure: BandClosure) -> ThicknessBands {
    match ThicknessBands::new(name, lower_in, bands, closure) {
        Ok(table) => table,
        Err(e) => panic!("built-in table '{}' is malformed: {}", name, e),
    }
}
