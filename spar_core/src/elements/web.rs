//! # Web
//!
//! Shear web of one spar segment, divided into equal panels by stiffeners.
//!
//! ## Assumptions
//!
//! - Strength is checked on the panel at the smallest station of the segment,
//!   where shear flow is largest.
//! - A tapered web is treated as a rectangle using the panel height at the
//!   smallest station (the larger one, since the spar tapers toward the tip).
//! - Shear flow is uniform over the effective depth: `q = S / he`.
//!
//! ## Example
//!
//! ```rust
//! use spar_core::elements::Web;
//!
//! let web = Web::new(625.0, 1000.0, 3, 2.03).unwrap();
//! assert_eq!(web.width_b(), 125.0);
//!
//! let ms = web.margin(38429.0, 297.0).unwrap();
//! assert!((ms - 0.622).abs() < 1e-3);
//! ```

use serde::Serialize;
use tracing::debug;

use crate::charts::{FRONT_SPAR_HEIGHT, WEB_BUCKLING_COEFFICIENT};
use crate::curve::DesignCurve;
use crate::elements::{check_pitch, require_positive};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{MaterialConstants, WEB_SHEAR_ULTIMATE};
use crate::units::Mpa;

/// Web geometry for one spar segment. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Web {
    /// Smallest station of the segment (mm)
    pub y_left: f64,
    /// Largest station of the segment (mm)
    pub y_right: f64,
    /// Number of panels the stiffeners divide the segment into
    pub division: u32,
    /// Web thickness (mm)
    pub thickness: f64,
    /// Spar height at `y_left` (mm)
    height_a: f64,
    /// Spar height at `y_right` (mm)
    height_right: f64,
    material: MaterialConstants,
}

impl Web {
    /// Build a 7075 web using the built-in front-spar height chart.
    pub fn new(y_left: f64, y_right: f64, division: u32, thickness: f64) -> CalcResult<Self> {
        Web::with_height_curve(
            y_left,
            y_right,
            division,
            thickness,
            &FRONT_SPAR_HEIGHT,
            MaterialConstants::AL_7075,
        )
    }

    /// Build a web whose panel heights come from `height_curve` (station → height).
    pub fn with_height_curve(
        y_left: f64,
        y_right: f64,
        division: u32,
        thickness: f64,
        height_curve: &DesignCurve,
        material: MaterialConstants,
    ) -> CalcResult<Self> {
        for (field, value) in [("y_left", y_left), ("y_right", y_right)] {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Station must be a finite number"));
            }
        }
        if y_right <= y_left {
            return Err(CalcError::invalid_input(
                "y_right",
                y_right.to_string(),
                format!("Right station must exceed left station {}", y_left),
            ));
        }
        if division == 0 {
            return Err(CalcError::invalid_input(
                "division",
                "0",
                "Web must have at least one panel",
            ));
        }
        require_positive("thickness", thickness, "Web thickness must be positive")?;
        let height_a = height_curve.lookup(y_left)?;
        let height_right = height_curve.lookup(y_right)?;

        Ok(Web {
            y_left,
            y_right,
            division,
            thickness,
            height_a,
            height_right,
            material,
        })
    }

    /// Panel width between stiffeners, equal to the stiffener spacing `de` (mm)
    pub fn width_b(&self) -> f64 {
        (self.y_right - self.y_left) / self.division as f64
    }

    /// Panel height at the smallest station (mm)
    pub fn height_a(&self) -> f64 {
        self.height_a
    }

    pub fn material(&self) -> MaterialConstants {
        self.material
    }

    /// Long side over short side of the checked panel (always ≥ 1)
    pub fn panel_aspect(&self) -> f64 {
        let aspect = self.height_a / self.width_b();
        if aspect < 1.0 {
            1.0 / aspect
        } else {
            aspect
        }
    }

    /// Shear buckling coefficient k read from the chart
    pub fn buckling_coefficient(&self) -> CalcResult<f64> {
        WEB_BUCKLING_COEFFICIENT.lookup(self.panel_aspect())
    }

    /// Initial shear buckling stress `F_scr = k · E · (t / b)²`
    pub fn buckling_stress(&self) -> CalcResult<Mpa> {
        let k = self.buckling_coefficient()?;
        let ratio = self.thickness / self.width_b();
        Ok(Mpa(k * self.material.youngs_modulus().0 * ratio.powi(2)))
    }

    /// Ultimate shear allowable F_su for this thickness
    pub fn ultimate_shear_allowable(&self) -> CalcResult<Mpa> {
        WEB_SHEAR_ULTIMATE.allowable(self.thickness)
    }

    /// Governing allowable `min(F_scr, F_su)`
    pub fn allowable_shear(&self) -> CalcResult<Mpa> {
        let f_scr = self.buckling_stress()?;
        let f_su = self.ultimate_shear_allowable()?;
        Ok(Mpa(f_scr.0.min(f_su.0)))
    }

    /// Maximum shear flow in the web (N/m).
    ///
    /// # Arguments
    ///
    /// * `sf` - shear force carried by the front spar (N)
    /// * `he` - distance between flange centroids (mm)
    pub fn q_max(&self, sf: f64, he: f64) -> f64 {
        sf / he * 1000.0
    }

    /// Web shear stress f_s (MPa)
    pub fn shear_stress(&self, sf: f64, he: f64) -> Mpa {
        let q_max = self.q_max(sf, he);
        Mpa(q_max / self.thickness * 1000.0 / 1.0e6)
    }

    /// M.S. = min(F_scr, F_su) / f_s − 1
    pub fn margin(&self, sf: f64, he: f64) -> CalcResult<f64> {
        check_effective_depth(he)?;
        let allowable = self.allowable_shear()?;
        let f_s = self.shear_stress(sf, he);
        let ms = allowable.0 / f_s.0 - 1.0;
        debug!(
            y_left = self.y_left,
            allowable = allowable.0,
            f_s = f_s.0,
            ms,
            "web shear margin"
        );
        Ok(ms)
    }

    /// Shear stress on the net section along a rivet line,
    /// `f_sj = f_s · p / (p − d)` (MPa).
    ///
    /// # Arguments
    ///
    /// * `pitch` - rivet pitch p (mm)
    /// * `diameter` - rivet diameter d (mm)
    pub fn net_section_shear_stress(&self, pitch: f64, diameter: f64, sf: f64, he: f64) -> CalcResult<Mpa> {
        require_positive("diameter", diameter, "Rivet diameter must be positive")?;
        check_pitch(pitch, diameter)?;
        let f_s = self.shear_stress(sf, he);
        Ok(Mpa(f_s.0 * pitch / (pitch - diameter)))
    }

    /// M.S. including rivet hole loss, min(F_scr, F_su) / f_sj − 1
    pub fn hole_loss_margin(&self, pitch: f64, diameter: f64, sf: f64, he: f64) -> CalcResult<f64> {
        check_effective_depth(he)?;
        let allowable = self.allowable_shear()?;
        let f_sj = self.net_section_shear_stress(pitch, diameter, sf, he)?;
        Ok(allowable.0 / f_sj.0 - 1.0)
    }

    /// Solid volume of the segment's web, a trapezoid in side view (cm³)
    pub fn volume_cm3(&self) -> f64 {
        let area_mm2 = (self.height_a + self.height_right) * (self.y_right - self.y_left) / 2.0;
        area_mm2 * self.thickness / 1000.0
    }

    /// Web mass (kg)
    pub fn mass_kg(&self) -> f64 {
        self.volume_cm3() * self.material.density_g_cm3 / 1000.0
    }
}

pub(crate) fn check_effective_depth(he: f64) -> CalcResult<()> {
    require_positive("he", he, "Effective depth must be positive")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Interpolation;
    use crate::units::{ksi_to_mpa, Ksi};

    fn test_web() -> Web {
        Web::new(625.0, 1000.0, 3, 2.03).unwrap()
    }

    #[test]
    fn test_geometry() {
        let web = test_web();
        assert_eq!(web.width_b(), 125.0);
        assert_eq!(web.height_a(), 320.0);
        assert!((web.panel_aspect() - 2.56).abs() < 1e-12);
    }

    #[test]
    fn test_buckling() {
        let web = test_web();
        assert!((web.buckling_coefficient().unwrap() - 5.52).abs() < 1e-12);
        // F_scr = 5.52 * 71016 * (2.03 / 125)^2
        assert!((web.buckling_stress().unwrap().0 - 103.387).abs() < 1e-3);
    }

    #[test]
    fn test_reference_margin() {
        let web = test_web();
        assert!((web.q_max(38429.0, 297.0) - 129390.57).abs() < 0.01);
        assert!((web.shear_stress(38429.0, 297.0).0 - 63.7392).abs() < 1e-4);
        assert_eq!(web.ultimate_shear_allowable().unwrap(), Mpa::from(Ksi(44.0)));
        // Buckling governs
        assert!((web.margin(38429.0, 297.0).unwrap() - 0.622037).abs() < 1e-5);
    }

    #[test]
    fn test_hole_loss() {
        let web = test_web();
        let f_sj = web.net_section_shear_stress(25.0, 4.8, 38429.0, 297.0).unwrap();
        assert!((f_sj.0 - 78.885).abs() < 1e-3);
        assert!((web.hole_loss_margin(25.0, 4.8, 38429.0, 297.0).unwrap() - 0.310606).abs() < 1e-5);
        assert!(web.hole_loss_margin(4.0, 4.8, 38429.0, 297.0).is_err());
    }

    #[test]
    fn test_tall_narrow_panel_inverts_aspect() {
        let web = Web::new(625.0, 665.0, 1, 2.03).unwrap();
        assert!(web.panel_aspect() >= 1.0);
        assert_eq!(web.panel_aspect(), web.height_a() / web.width_b());

        let wide = Web::new(625.0, 1625.0, 1, 2.03).unwrap();
        assert!((wide.panel_aspect() - wide.width_b() / wide.height_a()).abs() < 1e-12);
    }

    #[test]
    fn test_aspect_beyond_chart_is_undefined() {
        // 320 / 20 = 16 > 12
        let web = Web::new(625.0, 645.0, 1, 2.03).unwrap();
        let err = web.margin(38429.0, 297.0).unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_thick_web_is_undefined() {
        // 7 mm = 0.276 in, beyond the F_su table
        let web = Web::new(625.0, 1000.0, 3, 7.0).unwrap();
        assert!(web.ultimate_shear_allowable().is_err());
        assert!(web.margin(38429.0, 297.0).unwrap_err().is_domain_error());
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(Web::new(1000.0, 625.0, 3, 2.03).is_err());
        assert!(Web::new(625.0, 1000.0, 0, 2.03).is_err());
        assert!(Web::new(625.0, 1000.0, 3, 0.0).is_err());
        // Station outside the height chart
        assert!(Web::new(500.0, 1000.0, 3, 2.03).unwrap_err().is_domain_error());
        assert!(test_web().margin(38429.0, 0.0).is_err());
    }

    #[test]
    fn test_nan_inputs_are_input_errors() {
        let err = Web::new(625.0, 1000.0, 3, f64::NAN).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(Web::new(f64::NAN, 1000.0, 3, 2.03).unwrap_err().is_configuration_error());
        assert!(Web::new(625.0, f64::NAN, 3, 2.03).unwrap_err().is_configuration_error());

        let web = test_web();
        assert!(web.margin(38429.0, f64::NAN).unwrap_err().is_configuration_error());
        assert!(web
            .hole_loss_margin(f64::NAN, 4.8, 38429.0, 297.0)
            .unwrap_err()
            .is_configuration_error());
    }

    #[test]
    fn test_volume_and_mass() {
        let web = test_web();
        assert!((web.volume_cm3() - 237.40125).abs() < 1e-6);
        assert!((web.mass_kg() - 0.667097).abs() < 1e-6);
    }

    #[test]
    fn test_custom_height_curve() {
        let flat = DesignCurve::new("h", vec![(0.0, 200.0), (2000.0, 200.0)], Interpolation::Linear).unwrap();
        let web = Web::with_height_curve(0.0, 400.0, 2, 2.03, &flat, MaterialConstants::AL_7075).unwrap();
        assert_eq!(web.panel_aspect(), 1.0);
        assert_eq!(web.buckling_coefficient().unwrap(), 8.0);
        let f_scr = web.buckling_stress().unwrap().0;
        assert!((f_scr - 8.0 * ksi_to_mpa(10.3e3) * (2.03f64 / 200.0).powi(2)).abs() < 1e-9);
    }

    #[test]
    fn test_margin_is_idempotent() {
        let web = test_web();
        assert_eq!(web.margin(38429.0, 297.0).unwrap(), web.margin(38429.0, 297.0).unwrap());
    }
}
