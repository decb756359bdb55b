//! # Crippling Master Curve
//!
//! Non-dimensional crippling curve for 7075 formed and extruded sections,
//! shared by compression flanges and stiffeners.
//!
//! The chart plots `F_cc / F_cy` against `x = sqrt(F_cy / E) · (b/t)` and is
//! digitized as three half-open, left-inclusive segments:
//!
//! | range of `x`                    | `F_cc / F_cy`                     |
//! |---------------------------------|-----------------------------------|
//! | `x < 0.1`                       | undefined (below chart)           |
//! | `0.1 ≤ x < 0.1 · 5^(27/33)`     | `0.5 · 2^(2.2/1.5)` (plateau)     |
//! | `0.1 · 5^(27/33) ≤ x < 10`      | `10^(-0.20761) · x^(-0.78427)`    |
//! | `x ≥ 10`                        | undefined (above chart)           |
//!
//! The fitted constants were read in ksi, so `F_cy` is taken to ksi for the
//! ordinate multiplication and the result brought back to MPa.
//!
//! ## Example
//!
//! ```rust
//! use spar_core::crippling::crippling_stress;
//! use spar_core::units::{Ksi, Mpa};
//!
//! let fcy: Mpa = Ksi(68.0).into();
//! let e: Mpa = Ksi(10.3e3).into();
//! let c = crippling_stress(fcy, e, 34.5 / 6.0).unwrap();
//! assert!((c.abscissa - 0.4672).abs() < 1e-4);
//! assert!((c.stress.0 - 527.98).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{ksi_to_mpa, mpa_to_ksi, Mpa};

/// Smallest abscissa on the chart
pub const ABSCISSA_MIN: f64 = 0.1;

/// Largest abscissa on the chart (exclusive)
pub const ABSCISSA_MAX: f64 = 10.0;

/// End of the plateau segment, `0.1 · 5^(27/33)`
pub fn plateau_end() -> f64 {
    0.1 * 5f64.powf(27.0 / 33.0)
}

/// Ordinate of the plateau segment, `0.5 · 2^(2.2/1.5)`
pub fn plateau_ratio() -> f64 {
    0.5 * 2f64.powf(2.2 / 1.5)
}

/// Ordinate of the sloped segment, a fitted log-log line
pub fn sloped_ratio(x: f64) -> f64 {
    10f64.powf(-0.20761) * x.powf(-0.78427)
}

/// Which part of the chart a lookup landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveSegment {
    Plateau,
    Sloped,
}

/// A crippling lookup: chart coordinates and resulting stress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crippling {
    /// `sqrt(F_cy / E) · (b/t)`
    pub abscissa: f64,
    /// `F_cc / F_cy`
    pub ratio: f64,
    pub segment: CurveSegment,
    /// Crippling stress F_cc
    pub stress: Mpa,
}

/// Chart abscissa `sqrt(F_cy / E) · (b/t)`
pub fn abscissa(fcy: Mpa, youngs_modulus: Mpa, b_over_t: f64) -> f64 {
    (fcy.0 / youngs_modulus.0).sqrt() * b_over_t
}

/// Read the chart ordinate `F_cc / F_cy` at abscissa `x`.
///
/// # Errors
///
/// [`CalcError::OutOfRange`] for `x < 0.1`, `x ≥ 10`, or NaN.
pub fn crippling_ratio(x: f64) -> CalcResult<(f64, CurveSegment)> {
    if x.is_nan() || x < ABSCISSA_MIN {
        Err(CalcError::out_of_range("crippling abscissa", x, ABSCISSA_MIN, ABSCISSA_MAX))
    } else if x < plateau_end() {
        Ok((plateau_ratio(), CurveSegment::Plateau))
    } else if x < ABSCISSA_MAX {
        Ok((sloped_ratio(x), CurveSegment::Sloped))
    } else {
        Err(CalcError::out_of_range("crippling abscissa", x, ABSCISSA_MIN, ABSCISSA_MAX))
    }
}

/// Crippling stress of a thin-walled section.
///
/// # Arguments
///
/// * `fcy` - compressive yield of the element
/// * `youngs_modulus` - Young's modulus of the element
/// * `b_over_t` - width-to-thickness ratio of the critical leg
pub fn crippling_stress(fcy: Mpa, youngs_modulus: Mpa, b_over_t: f64) -> CalcResult<Crippling> {
    let x = abscissa(fcy, youngs_modulus, b_over_t);
    let (ratio, segment) = crippling_ratio(x)?;
    let stress = Mpa(ksi_to_mpa(ratio * mpa_to_ksi(fcy.0)));
    Ok(Crippling {
        abscissa: x,
        ratio,
        segment,
        stress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Ksi;

    #[test]
    fn test_constants() {
        assert!((plateau_end() - 0.373151).abs() < 1e-6);
        assert!((plateau_ratio() - 1.381913).abs() < 1e-6);
    }

    #[test]
    fn test_segment_boundaries_are_left_inclusive() {
        assert!(crippling_ratio(0.099_999).is_err());
        assert_eq!(crippling_ratio(0.1).unwrap().1, CurveSegment::Plateau);

        let end = plateau_end();
        assert_eq!(crippling_ratio(end).unwrap().1, CurveSegment::Sloped);
        assert_eq!(crippling_ratio(end - 1e-12).unwrap().1, CurveSegment::Plateau);

        assert_eq!(crippling_ratio(9.999_999).unwrap().1, CurveSegment::Sloped);
        assert!(crippling_ratio(10.0).unwrap_err().is_domain_error());
        assert!(crippling_ratio(f64::NAN).is_err());
    }

    #[test]
    fn test_sloped_segment_continuous_towards_upper_limit() {
        let near = crippling_ratio(10.0 - 1e-9).unwrap().0;
        assert!((near - sloped_ratio(10.0)).abs() < 1e-9);
        assert!((near - 0.101887).abs() < 1e-6);
    }

    #[test]
    fn test_plateau_junction_matches_fit() {
        // The fitted line meets the plateau within 3% at the junction
        let end = plateau_end();
        let plateau = crippling_ratio(end - 1e-12).unwrap().0;
        let sloped = crippling_ratio(end).unwrap().0;
        assert!((plateau - sloped).abs() / plateau < 0.03);
    }

    #[test]
    fn test_flange_crippling() {
        let fcy: Mpa = Ksi(68.0).into();
        let e: Mpa = Ksi(10.3e3).into();
        let c = crippling_stress(fcy, e, 5.75).unwrap();
        assert_eq!(c.segment, CurveSegment::Sloped);
        assert!((c.ratio - 1.12613).abs() < 1e-5);
        assert!((c.stress.0 - 527.978).abs() < 1e-3);
    }

    #[test]
    fn test_stress_equals_ratio_times_fcy() {
        let fcy: Mpa = Ksi(64.0).into();
        let e: Mpa = Ksi(10.3e3).into();
        let c = crippling_stress(fcy, e, 22.0 / 2.29).unwrap();
        assert!((c.stress.0 - c.ratio * fcy.0).abs() < 1e-9);
    }

    #[test]
    fn test_too_slender_is_undefined() {
        let fcy: Mpa = Ksi(68.0).into();
        let e: Mpa = Ksi(10.3e3).into();
        // x = 0.08125 * 130 > 10
        assert!(crippling_stress(fcy, e, 130.0).is_err());
    }
}
