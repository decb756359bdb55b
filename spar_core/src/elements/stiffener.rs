//! # Stiffener
//!
//! Angle stiffener dividing the web into shear panels. Two independent checks
//! are made:
//!
//! - **Panel stabilization**: the stiffener's inertia must exceed the inertia
//!   `I_U` the web needs for its panel edges to stay straight. This is the
//!   stiffener's M.S.
//! - **Local crippling** of the outstanding leg, from the shared crippling
//!   curve. Reported alongside, not folded into the M.S.
//!
//! The stiffener spacing `de` is the web's panel width. Crippling uses the
//! stiffener's own material, not the web's.

use serde::Serialize;
use tracing::debug;

use crate::charts::STIFFENER_INERTIA_RATIO;
use crate::crippling::{crippling_stress, Crippling};
use crate::elements::require_positive;
use crate::elements::web::{check_effective_depth, Web};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{MaterialConstants, STIFFENER_COMPRESSIVE_YIELD};
use crate::units::Mpa;

/// Angle stiffener attached to a web.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stiffener<'a> {
    /// Stiffener thickness (mm)
    pub thickness: f64,
    /// Leg against the web, bs1 (mm)
    pub bs1_bottom: f64,
    /// Outstanding leg, bs2 (mm)
    pub bs2_height: f64,
    pub material: MaterialConstants,
    #[serde(skip)]
    web: &'a Web,
}

impl<'a> Stiffener<'a> {
    pub fn new(thickness: f64, bs1_bottom: f64, bs2_height: f64, web: &'a Web) -> CalcResult<Self> {
        for (field, value) in [("thickness", thickness), ("bs1_bottom", bs1_bottom), ("bs2_height", bs2_height)] {
            require_positive(field, value, "Stiffener dimensions must be positive")?;
        }
        if bs1_bottom < thickness || bs2_height < thickness {
            return Err(CalcError::invalid_input(
                "thickness",
                thickness.to_string(),
                "Stiffener legs must be at least as long as the stiffener is thick",
            ));
        }
        Ok(Stiffener {
            thickness,
            bs1_bottom,
            bs2_height,
            material: MaterialConstants::AL_7075,
            web,
        })
    }

    /// Use `material` for this stiffener's crippling modulus
    pub fn with_material(mut self, material: MaterialConstants) -> Self {
        self.material = material;
        self
    }

    /// The web this stiffener is attached to
    pub fn web(&self) -> &Web {
        self.web
    }

    /// Stiffener spacing de (mm)
    pub fn spacing(&self) -> f64 {
        self.web.width_b()
    }

    /// Second moment of area of the angle about the web face (mm⁴).
    ///
    /// `I = (bs1·t³ + t·bs2³ − t⁴) / 3`; the `t⁴` term removes the corner
    /// counted by both legs.
    pub fn inertia(&self) -> f64 {
        let t = self.thickness;
        (self.bs1_bottom * t.powi(3) + t * self.bs2_height.powi(3) - t.powi(4)) / 3.0
    }

    /// Cross-sectional area (mm²)
    pub fn area(&self) -> f64 {
        (self.bs1_bottom + self.bs2_height) * self.thickness - self.thickness.powi(2)
    }

    /// Inertia required to stabilize the web panels,
    /// `I_U = f(he/de) · he · t_web³` (mm⁴).
    ///
    /// # Arguments
    ///
    /// * `he` - distance between flange centroids (mm)
    ///
    /// # Errors
    ///
    /// [`CalcError::OutOfRange`] when `he/de` is outside `[1, 4]`.
    pub fn required_inertia(&self, he: f64) -> CalcResult<f64> {
        check_effective_depth(he)?;
        let ratio = STIFFENER_INERTIA_RATIO.lookup(he / self.spacing())?;
        Ok(ratio * he * self.web.thickness.powi(3))
    }

    /// M.S. = I / I_U − 1
    pub fn margin(&self, he: f64) -> CalcResult<f64> {
        let i_u = self.required_inertia(he)?;
        let i = self.inertia();
        let ms = i / i_u - 1.0;
        debug!(y_left = self.web.y_left, i, i_u, ms, "stiffener inertia margin");
        Ok(ms)
    }

    /// Compressive yield F_cy for this thickness
    pub fn compressive_yield(&self) -> CalcResult<Mpa> {
        STIFFENER_COMPRESSIVE_YIELD.allowable(self.thickness)
    }

    /// Crippling of the leg against the web, `b/t = bs1 / t`
    pub fn crippling(&self) -> CalcResult<Crippling> {
        let fcy = self.compressive_yield()?;
        crippling_stress(
            fcy,
            self.material.youngs_modulus(),
            self.bs1_bottom / self.thickness,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Ksi;

    fn test_web() -> Web {
        Web::new(625.0, 1000.0, 3, 2.03).unwrap()
    }

    #[test]
    fn test_section_properties() {
        let web = test_web();
        let s = Stiffener::new(2.29, 22.0, 19.0, &web).unwrap();
        assert!((s.inertia() - 5314.6024).abs() < 1e-3);
        assert!((s.area() - 88.6459).abs() < 1e-9);
        assert_eq!(s.spacing(), 125.0);
    }

    #[test]
    fn test_reference_margin() {
        let web = test_web();
        let s = Stiffener::new(2.29, 22.0, 19.0, &web).unwrap();
        // f(289 / 125 = 2.312) = 2.124
        assert!((s.required_inertia(289.0).unwrap() - 5135.0002).abs() < 1e-3);
        assert!((s.margin(289.0).unwrap() - 0.034976).abs() < 1e-5);
    }

    #[test]
    fn test_required_inertia_out_of_range() {
        let web = test_web();
        let s = Stiffener::new(2.29, 22.0, 19.0, &web).unwrap();
        // he/de below 1 and above 4
        assert!(s.required_inertia(100.0).unwrap_err().is_domain_error());
        assert!(s.margin(600.0).unwrap_err().is_domain_error());
        // Chart ends are inside the domain
        assert!(s.required_inertia(125.0).is_ok());
        assert!(s.required_inertia(500.0).is_ok());
    }

    #[test]
    fn test_crippling_is_independent_of_margin() {
        let web = test_web();
        let s = Stiffener::new(2.29, 22.0, 19.0, &web).unwrap();
        assert_eq!(s.compressive_yield().unwrap(), Mpa::from(Ksi(64.0)));
        let c = s.crippling().unwrap();
        assert!((c.abscissa - 0.757284).abs() < 1e-6);
        // A stiffener thicker than the F_cy table still has an inertia margin
        let thick = Stiffener::new(6.5, 30.0, 30.0, &web).unwrap();
        assert!(thick.crippling().unwrap_err().is_domain_error());
        assert!(thick.margin(289.0).is_ok());
    }

    #[test]
    fn test_invalid_dimensions() {
        let web = test_web();
        assert!(Stiffener::new(-1.0, 22.0, 19.0, &web).is_err());
        assert!(Stiffener::new(2.29, 2.0, 19.0, &web).is_err());
        for (t, bs1, bs2) in [(f64::NAN, 22.0, 19.0), (2.29, f64::NAN, 19.0), (2.29, 22.0, f64::NAN)] {
            assert!(Stiffener::new(t, bs1, bs2, &web).unwrap_err().is_configuration_error());
        }
        let s = Stiffener::new(2.29, 22.0, 19.0, &web).unwrap();
        assert!(s.required_inertia(f64::NAN).unwrap_err().is_configuration_error());
    }

    #[test]
    fn test_crippling_uses_stiffener_modulus() {
        let web = test_web();
        let stiff = MaterialConstants {
            youngs_modulus_ksi: 16.0e3,
            density_g_cm3: 4.43,
        };
        let default = Stiffener::new(2.29, 22.0, 19.0, &web).unwrap();
        let titanium = Stiffener::new(2.29, 22.0, 19.0, &web).unwrap().with_material(stiff);
        let ratio = titanium.crippling().unwrap().abscissa / default.crippling().unwrap().abscissa;
        assert!((ratio - (10.3e3f64 / 16.0e3).sqrt()).abs() < 1e-9);
        // Inertia margin does not depend on modulus
        assert_eq!(titanium.margin(289.0).unwrap(), default.margin(289.0).unwrap());
    }
}
