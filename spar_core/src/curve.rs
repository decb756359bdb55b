//! # Design Curves
//!
//! Piecewise-linear (or zero-order hold) lookup over digitized handbook charts.
//! Every empirical chart in the crate is a [`DesignCurve`], from the buckling
//! coefficient vs. panel aspect to the spar height vs. station.
//!
//! A curve is defined only over `[x_min, x_max]`. Lookups outside that range
//! return [`CalcError::OutOfRange`]; values are never clamped or extrapolated.
//!
//! ## Example
//!
//! ```rust
//! use spar_core::curve::{DesignCurve, Interpolation};
//!
//! let k = DesignCurve::new(
//!     "buckling coefficient",
//!     vec![(1.0, 8.0), (1.2, 7.0), (1.5, 6.2)],
//!     Interpolation::Linear,
//! ).unwrap();
//!
//! assert_eq!(k.lookup(1.2).unwrap(), 7.0);
//! assert!((k.lookup(1.1).unwrap() - 7.5).abs() < 1e-12);
//! assert!(k.lookup(1.6).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// How values between breakpoints are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Straight line between the two bounding breakpoints
    #[default]
    Linear,
    /// Hold the preceding breakpoint's value over `[x_i, x_{i+1})`
    Step,
}

/// Unvalidated curve data as it appears in a model file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCurve {
    pub name: String,
    pub points: Vec<(f64, f64)>,
    #[serde(default)]
    pub interpolation: Interpolation,
}

/// An ordered set of `(x, y)` breakpoints with strictly increasing `x`.
///
/// Construction validates the table, so a `DesignCurve` that exists is always
/// usable. Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCurve", into = "RawCurve")]
pub struct DesignCurve {
    name: String,
    points: Vec<(f64, f64)>,
    interpolation: Interpolation,
}

impl DesignCurve {
    /// Build a curve from breakpoints sorted by `x`.
    ///
    /// # Errors
    ///
    /// [`CalcError::InvalidTable`] when there are fewer than two points, a
    /// value is not finite, or `x` is not strictly increasing.
    pub fn new(
        name: impl Into<String>,
        points: Vec<(f64, f64)>,
        interpolation: Interpolation,
    ) -> CalcResult<Self> {
        let name = name.into();
        if points.len() < 2 {
            return Err(CalcError::invalid_table(
                name,
                format!("need at least 2 breakpoints, got {}", points.len()),
            ));
        }
        if let Some((x, y)) = points.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(CalcError::invalid_table(
                name,
                format!("breakpoint ({}, {}) is not finite", x, y),
            ));
        }
        if let Some(pair) = points.windows(2).find(|pair| pair[1].0 <= pair[0].0) {
            return Err(CalcError::invalid_table(
                name,
                format!(
                    "x must be strictly increasing, found {} after {}",
                    pair[1].0, pair[0].0
                ),
            ));
        }
        Ok(DesignCurve {
            name,
            points,
            interpolation,
        })
    }

    /// Build a linear curve from parallel `x` and `y` slices.
    pub fn from_columns(name: impl Into<String>, xs: &[f64], ys: &[f64]) -> CalcResult<Self> {
        let name = name.into();
        if xs.len() != ys.len() {
            return Err(CalcError::invalid_table(
                name,
                format!("{} x values but {} y values", xs.len(), ys.len()),
            ));
        }
        let points = xs.iter().copied().zip(ys.iter().copied()).collect();
        DesignCurve::new(name, points, Interpolation::Linear)
    }

    /// Chart name used in error messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Breakpoints in increasing `x`
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Closed domain `(x_min, x_max)`
    pub fn domain(&self) -> (f64, f64) {
        // new() guarantees at least two points
        (self.points[0].0, self.points[self.points.len() - 1].0)
    }

    /// True when `x` lies inside the closed domain.
    pub fn contains(&self, x: f64) -> bool {
        let (min, max) = self.domain();
        x >= min && x <= max
    }

    /// Read the chart at `x`.
    ///
    /// # Errors
    ///
    /// [`CalcError::OutOfRange`] when `x` is outside `[x_min, x_max]` or NaN.
    pub fn lookup(&self, x: f64) -> CalcResult<f64> {
        let (min, max) = self.domain();
        if !self.contains(x) {
            return Err(CalcError::out_of_range(self.name.clone(), x, min, max));
        }

        // First breakpoint with x_i > x; x lies in [x_{idx-1}, x_idx)
        let idx = self.points.partition_point(|&(xi, _)| xi <= x);
        if idx == self.points.len() {
            // x == x_max, the closed right boundary
            return Ok(self.points[idx - 1].1);
        }

        let (x0, y0) = self.points[idx - 1];
        if x == x0 {
            return Ok(y0);
        }
        match self.interpolation {
            Interpolation::Step => Ok(y0),
            Interpolation::Linear => {
                let (x1, y1) = self.points[idx];
                Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
            }
        }
    }
}

impl TryFrom<RawCurve> for DesignCurve {
    type Error = CalcError;

    fn try_from(raw: RawCurve) -> Result<Self, Self::Error> {
        DesignCurve::new(raw.name, raw.points, raw.interpolation)
    }
}

impl From<DesignCurve> for RawCurve {
    fn from(curve: DesignCurve) -> Self {
        RawCurve {
            name: curve.name,
            points: curve.points,
            interpolation: curve.interpolation,
        }
    }
}
