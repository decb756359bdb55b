//! # Structural Elements
//!
//! The four parts of a front-spar section that are sized for margin of
//! safety. Each follows the same pattern:
//!
//! - constructor validates geometry and returns `CalcResult<Self>`
//! - applied stress from the station loads
//! - allowable from a design chart or thickness table
//! - `margin(..) -> CalcResult<f64>` = allowable / applied − 1
//!
//! Flanges and stiffeners borrow the [`Web`] they sit on and read its
//! geometry; nothing is shared mutably.
//!
//! - [`web`] - shear buckling and ultimate shear
//! - [`flange`] - compression flange crippling
//! - [`stiffener`] - panel-stabilizing inertia and leg crippling
//! - [`rivet`] - rivet shear allowable

pub mod flange;
pub mod rivet;
pub mod stiffener;
pub mod web;

pub use flange::CompressionFlange;
pub use rivet::{Rivet, RivetClass};
pub use stiffener::Stiffener;
pub use web::Web;

use crate::errors::{CalcError, CalcResult};

/// Reject zero, negative and NaN dimensions.
pub(crate) fn require_positive(field: &str, value: f64, reason: &str) -> CalcResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), reason))
    }
}

/// Rivets must leave material between holes.
pub(crate) fn check_pitch(pitch: f64, diameter: f64) -> CalcResult<()> {
    if pitch.is_nan() || pitch <= diameter {
        return Err(CalcError::invalid_input(
            "pitch",
            pitch.to_string(),
            format!("Rivet pitch must exceed rivet diameter {}", diameter),
        ));
    }
    Ok(())
}
