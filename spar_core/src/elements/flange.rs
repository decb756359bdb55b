//! # Compression Flange
//!
//! Angle-section spar cap on the compression side, checked for crippling
//! under the axial force the bending moment puts into it.
//!
//! The flange reads its web's thickness through a shared borrow; it never
//! owns or changes the web. Its own material constants set the modulus used
//! for crippling.
//!
//! ## Example
//!
//! ```rust
//! use spar_core::elements::{CompressionFlange, Web};
//!
//! let web = Web::new(625.0, 1000.0, 3, 2.03).unwrap();
//! let flange = CompressionFlange::new(6.0, 34.5, 34.5, &web).unwrap();
//!
//! let ms = flange.margin(74623.0, 297.0).unwrap();
//! assert!((ms - 0.054).abs() < 1e-3);
//! ```

use serde::Serialize;
use tracing::debug;

use crate::crippling::{crippling_stress, Crippling};
use crate::elements::require_positive;
use crate::elements::web::{check_effective_depth, Web};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{MaterialConstants, FLANGE_COMPRESSIVE_YIELD};
use crate::units::Mpa;

/// Width of web, in web thicknesses, assumed to act with the flange.
pub const DEFAULT_EFFECTIVE_WEB_WIDTH_RATIO: f64 = 30.0;

/// Compression flange of one spar segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionFlange<'a> {
    /// Flange thickness t_f (mm)
    pub thickness: f64,
    /// Bottom (horizontal) leg width (mm)
    pub b_bottom: f64,
    /// Vertical leg height (mm)
    pub b_height: f64,
    /// Effective web strip width over web thickness
    pub effective_web_width_ratio: f64,
    pub material: MaterialConstants,
    #[serde(skip)]
    web: &'a Web,
}

impl<'a> CompressionFlange<'a> {
    /// Build a 7075 flange on `web` with the default effective web strip.
    pub fn new(thickness: f64, b_bottom: f64, b_height: f64, web: &'a Web) -> CalcResult<Self> {
        CompressionFlange::with_effective_web(thickness, b_bottom, b_height, web, DEFAULT_EFFECTIVE_WEB_WIDTH_RATIO)
    }

    /// Build a flange with an explicit effective web width ratio.
    pub fn with_effective_web(
        thickness: f64,
        b_bottom: f64,
        b_height: f64,
        web: &'a Web,
        effective_web_width_ratio: f64,
    ) -> CalcResult<Self> {
        for (field, value) in [("thickness", thickness), ("b_bottom", b_bottom), ("b_height", b_height)] {
            require_positive(field, value, "Flange dimensions must be positive")?;
        }
        if b_bottom < thickness || b_height < thickness {
            return Err(CalcError::invalid_input(
                "thickness",
                thickness.to_string(),
                "Flange legs must be at least as long as the flange is thick",
            ));
        }
        if !effective_web_width_ratio.is_finite() || effective_web_width_ratio < 0.0 {
            return Err(CalcError::invalid_input(
                "effective_web_width_ratio",
                effective_web_width_ratio.to_string(),
                "Effective web width ratio cannot be negative",
            ));
        }
        Ok(CompressionFlange {
            thickness,
            b_bottom,
            b_height,
            effective_web_width_ratio,
            material: MaterialConstants::AL_7075,
            web,
        })
    }

    /// Use `material` for this flange's crippling modulus
    pub fn with_material(mut self, material: MaterialConstants) -> Self {
        self.material = material;
        self
    }

    /// The web this flange is attached to
    pub fn web(&self) -> &Web {
        self.web
    }

    /// Critical leg width over thickness
    pub fn b_over_t(&self) -> f64 {
        self.b_bottom / self.thickness
    }

    /// Compressive yield F_cy for this thickness
    pub fn compressive_yield(&self) -> CalcResult<Mpa> {
        FLANGE_COMPRESSIVE_YIELD.allowable(self.thickness)
    }

    /// Crippling lookup: chart abscissa, ratio and F_cc
    pub fn crippling(&self) -> CalcResult<Crippling> {
        let fcy = self.compressive_yield()?;
        crippling_stress(fcy, self.material.youngs_modulus(), self.b_over_t())
    }

    /// Crippling stress F_cc
    pub fn crippling_stress(&self) -> CalcResult<Mpa> {
        self.crippling().map(|c| c.stress)
    }

    /// Area of the angle alone (mm²)
    pub fn angle_area(&self) -> f64 {
        (self.b_bottom + self.b_height) * self.thickness - self.thickness.powi(2)
    }

    /// Area of the web strip acting with the flange (mm²)
    pub fn effective_web_area(&self) -> f64 {
        self.effective_web_width_ratio * self.web.thickness.powi(2)
    }

    /// Total compression area A (mm²)
    pub fn area(&self) -> f64 {
        self.angle_area() + self.effective_web_area()
    }

    /// Axial force P = M / he (N)
    ///
    /// # Arguments
    ///
    /// * `moment` - bending moment carried by the front spar (N·m)
    /// * `he` - distance between flange centroids (mm)
    pub fn axial_force(&self, moment: f64, he: f64) -> f64 {
        moment * 1000.0 / he
    }

    /// Compressive stress f_c = P / A (MPa)
    pub fn compressive_stress(&self, moment: f64, he: f64) -> Mpa {
        Mpa(self.axial_force(moment, he) / self.area())
    }

    /// M.S. = F_cc / f_c − 1
    pub fn margin(&self, moment: f64, he: f64) -> CalcResult<f64> {
        check_effective_depth(he)?;
        let f_cc = self.crippling_stress()?;
        let f_c = self.compressive_stress(moment, he);
        let ms = f_cc.0 / f_c.0 - 1.0;
        debug!(
            y_left = self.web.y_left,
            f_cc = f_cc.0,
            f_c = f_c.0,
            ms,
            "flange crippling margin"
        );
        Ok(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crippling::CurveSegment;

    fn test_web() -> Web {
        Web::new(625.0, 1000.0, 3, 2.03).unwrap()
    }

    #[test]
    fn test_area() {
        let web = test_web();
        let flange = CompressionFlange::new(6.0, 34.5, 34.5, &web).unwrap();
        assert!((flange.angle_area() - 378.0).abs() < 1e-9);
        // 30 * 2.03^2
        assert!((flange.effective_web_area() - 123.627).abs() < 1e-9);
        assert!((flange.area() - 501.627).abs() < 1e-9);
    }

    #[test]
    fn test_reference_margin() {
        let web = test_web();
        let flange = CompressionFlange::new(6.0, 34.5, 34.5, &web).unwrap();

        assert!((flange.axial_force(74623.0, 297.0) - 251255.892).abs() < 1e-3);
        assert!((flange.compressive_stress(74623.0, 297.0).0 - 500.8819).abs() < 1e-4);

        let c = flange.crippling().unwrap();
        assert_eq!(c.segment, CurveSegment::Sloped);
        assert!((c.abscissa - 0.467201).abs() < 1e-6);
        assert!((c.stress.0 - 527.978).abs() < 1e-3);

        assert!((flange.margin(74623.0, 297.0).unwrap() - 0.054098).abs() < 1e-5);
    }

    #[test]
    fn test_effective_web_ratio_is_configurable() {
        let web = test_web();
        let bare = CompressionFlange::with_effective_web(6.0, 34.5, 34.5, &web, 0.0).unwrap();
        assert_eq!(bare.area(), bare.angle_area());

        let default = CompressionFlange::new(6.0, 34.5, 34.5, &web).unwrap();
        assert!(bare.margin(74623.0, 297.0).unwrap() < default.margin(74623.0, 297.0).unwrap());
    }

    #[test]
    fn test_slender_flange_is_undefined() {
        let web = test_web();
        // b/t = 150 puts the abscissa past 10
        let flange = CompressionFlange::new(1.0, 150.0, 20.0, &web).unwrap();
        let err = flange.margin(74623.0, 297.0).unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_invalid_dimensions() {
        let web = test_web();
        assert!(CompressionFlange::new(0.0, 34.5, 34.5, &web).is_err());
        assert!(CompressionFlange::new(6.0, 5.0, 34.5, &web).is_err());
        assert!(CompressionFlange::with_effective_web(6.0, 34.5, 34.5, &web, -1.0).is_err());
        assert!(CompressionFlange::with_effective_web(6.0, 34.5, 34.5, &web, f64::NAN).is_err());
        let err = CompressionFlange::new(f64::NAN, 34.5, 34.5, &web).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_crippling_uses_flange_modulus() {
        let soft = MaterialConstants {
            youngs_modulus_ksi: 5.0e3,
            density_g_cm3: 2.81,
        };
        // The web's material does not reach the flange
        let soft_web = Web::with_height_curve(
            625.0,
            1000.0,
            3,
            2.03,
            &crate::charts::FRONT_SPAR_HEIGHT,
            soft,
        )
        .unwrap();
        let on_soft_web = CompressionFlange::new(6.0, 34.5, 34.5, &soft_web).unwrap();
        assert!((on_soft_web.crippling().unwrap().abscissa - 0.467201).abs() < 1e-6);

        let web = test_web();
        let soft_flange = CompressionFlange::new(6.0, 34.5, 34.5, &web).unwrap().with_material(soft);
        // F_cy 68 ksi over E 5000 ksi
        let expected = (68.0f64 / 5.0e3).sqrt() * 34.5 / 6.0;
        assert!((soft_flange.crippling().unwrap().abscissa - expected).abs() < 1e-9);
        assert!(soft_flange.crippling_stress().unwrap().0 < on_soft_web.crippling_stress().unwrap().0);
    }

    #[test]
    fn test_flange_reads_web_thickness() {
        let thin = Web::new(625.0, 1000.0, 3, 1.0).unwrap();
        let thick = Web::new(625.0, 1000.0, 3, 3.0).unwrap();
        let a_thin = CompressionFlange::new(6.0, 34.5, 34.5, &thin).unwrap().area();
        let a_thick = CompressionFlange::new(6.0, 34.5, 34.5, &thick).unwrap().area();
        assert!((a_thick - a_thin - 30.0 * (9.0 - 1.0)).abs() < 1e-9);
    }
}
