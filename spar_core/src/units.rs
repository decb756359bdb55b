//! # Unit Types
//!
//! Handbook allowables are tabulated in US customary units (ksi, inch) while
//! spar geometry and loads are in SI (mm, N, MPa). This module holds the
//! conversions between the two plus newtype wrappers for stresses, which is
//! where the two systems meet.
//!
//! ## Conventions
//!
//! - Length: millimeters (mm) for geometry, inches (in) for table lookups
//! - Stress: megapascals (MPa) exposed, kips per square inch (ksi) tabulated
//! - Force: newtons (N); moment: newton-meters (N·m)
//!
//! ## Example
//!
//! ```rust
//! use spar_core::units::{mm_to_inch, Ksi, Mpa};
//!
//! let fsu: Mpa = Ksi(30.0).into();
//! assert!((fsu.0 - 206.84).abs() < 0.01);
//!
//! assert!((mm_to_inch(25.4) - 1.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Megapascals per ksi (1 lbf/in² = 6894.757293168361 Pa)
pub const MPA_PER_KSI: f64 = 6.894_757_293_168_361;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Convert stress from ksi to MPa
pub fn ksi_to_mpa(ksi: f64) -> f64 {
    ksi * MPA_PER_KSI
}

/// Convert stress from MPa to ksi
pub fn mpa_to_ksi(mpa: f64) -> f64 {
    mpa / MPA_PER_KSI
}

/// Convert length from mm to inch
pub fn mm_to_inch(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Convert length from inch to mm
pub fn inch_to_mm(inch: f64) -> f64 {
    inch * MM_PER_INCH
}

/// Round to `sig` significant figures.
///
/// Zero and non-finite values are returned unchanged so that `NaN` cells stay
/// `NaN` in reports.
///
/// ```rust
/// use spar_core::units::round_sig;
///
/// assert_eq!(round_sig(103.387, 4), 103.4);
/// assert_eq!(round_sig(0.0062203, 2), 0.0062);
/// assert!(round_sig(f64::NAN, 4).is_nan());
/// ```
pub fn round_sig(value: f64, sig: u32) -> f64 {
    if value == 0.0 || !value.is_finite() || sig == 0 {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = sig as i32 - 1 - magnitude;
    if decimals >= 0 {
        let factor = 10f64.powi(decimals);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-decimals);
        (value / factor).round() * factor
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mpa(pub f64);

/// Stress in kips per square inch (ksi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ksi(pub f64);

impl From<Ksi> for Mpa {
    fn from(ksi: Ksi) -> Self {
        Mpa(ksi_to_mpa(ksi.0))
    }
}

impl From<Mpa> for Ksi {
    fn from(mpa: Mpa) -> Self {
        Ksi(mpa_to_ksi(mpa.0))
    }
}
