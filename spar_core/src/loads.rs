//! # Station Loads
//!
//! Shear force and bending moment at spanwise stations, as produced by the
//! wing load integration. The integration itself happens elsewhere; this
//! module only carries its results and the factors that turn whole-wing loads
//! into front-spar design loads.
//!
//! ## Example
//!
//! ```rust
//! use spar_core::loads::{LoadFactors, StationLoad};
//!
//! let wing = StationLoad::new(625.0, 32024.2, 62185.8);
//! let spar = LoadFactors::default().front_spar(&wing);
//!
//! // 1.5 ultimate factor × 0.8 front-spar share
//! assert!((spar.shear_n - 38429.0).abs() < 0.1);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::curve::{DesignCurve, Interpolation};
use crate::errors::{CalcError, CalcResult};

/// Loads at one spanwise station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationLoad {
    /// Spanwise station (mm)
    pub station_mm: f64,
    /// Shear force S (N)
    pub shear_n: f64,
    /// Bending moment M (N·m)
    pub moment_nm: f64,
}

impl StationLoad {
    pub fn new(station_mm: f64, shear_n: f64, moment_nm: f64) -> Self {
        StationLoad {
            station_mm,
            shear_n,
            moment_nm,
        }
    }
}

/// Factors applied to whole-wing loads to obtain front-spar design loads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadFactors {
    /// Ultimate (safety) factor on limit loads
    pub safety_factor: f64,
    /// Fraction of the wing shear and moment carried by the front spar
    pub front_spar_share: f64,
}

impl Default for LoadFactors {
    fn default() -> Self {
        LoadFactors {
            safety_factor: 1.5,
            front_spar_share: 0.8,
        }
    }
}

impl LoadFactors {
    /// Combined multiplier
    pub fn multiplier(&self) -> f64 {
        self.safety_factor * self.front_spar_share
    }

    /// Scale a whole-wing station load to the front-spar design load.
    pub fn front_spar(&self, load: &StationLoad) -> StationLoad {
        StationLoad {
            station_mm: load.station_mm,
            shear_n: load.shear_n * self.safety_factor * self.front_spar_share,
            moment_nm: load.moment_nm * self.safety_factor * self.front_spar_share,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.safety_factor <= 0.0 {
            return Err(CalcError::invalid_input(
                "load_factors.safety_factor",
                self.safety_factor.to_string(),
                "Safety factor must be positive",
            ));
        }
        if self.front_spar_share <= 0.0 || self.front_spar_share > 1.0 {
            return Err(CalcError::invalid_input(
                "load_factors.front_spar_share",
                self.front_spar_share.to_string(),
                "Front spar share must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// Stations bounding each mass segment of the half wing (mm).
const MASS_STATIONS: [f64; 19] = [
    625.0, 750.0, 1000.0, 1250.0, 1500.0, 1750.0, 2000.0, 2250.0, 2500.0, 2750.0, 3000.0, 3250.0,
    3500.0, 3750.0, 4000.0, 4250.0, 4500.0, 4750.0, 5000.0,
];

/// Mass of each segment between consecutive stations (kg).
const SEGMENT_MASS_KG: [f64; 18] = [
    15.0, 12.0, 11.0, 7.0, 6.0, 5.0, 4.0, 4.0, 3.0, 4.0, 4.0, 3.0, 3.0, 3.0, 2.0, 2.0, 2.0, 1.0,
];

/// Gravitational acceleration used for segment weights (m/s²)
const GRAVITY: f64 = 9.8;

/// Running weight of the wing structure (N/mm) vs. station (mm).
///
/// Each segment's weight is spread evenly over its length and held constant
/// until the next station; the tip station carries zero.
pub static RUNNING_MASS: Lazy<DesignCurve> = Lazy::new(|| {
    let mut points: Vec<(f64, f64)> = MASS_STATIONS
        .windows(2)
        .zip(SEGMENT_MASS_KG.iter())
        .map(|(pair, mass)| (pair[0], GRAVITY * mass / (pair[1] - pair[0])))
        .collect();
    points.push((MASS_STATIONS[MASS_STATIONS.len() - 1], 0.0));

    match DesignCurve::new("running mass station", points, Interpolation::Step) {
        Ok(curve) => curve,
        Err(e) => panic!("built-in running mass table is malformed: {}", e),
    }
});

/// Running weight of the wing structure at station `y` (N/mm)
pub fn running_load_density(y: f64) -> CalcResult<f64> {
    RUNNING_MASS.lookup(y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_spar_factors() {
        let factors = LoadFactors::default();
        assert!((factors.multiplier() - 1.2).abs() < 1e-12);

        let spar = factors.front_spar(&StationLoad::new(1000.0, 1000.0, 2000.0));
        assert_eq!(spar.station_mm, 1000.0);
        assert!((spar.shear_n - 1200.0).abs() < 1e-9);
        assert!((spar.moment_nm - 2400.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_factors() {
        let bad = LoadFactors {
            safety_factor: 1.5,
            front_spar_share: 1.2,
        };
        assert!(bad.validate().is_err());
        assert!(LoadFactors::default().validate().is_ok());
    }

    #[test]
    fn test_running_mass_is_step() {
        // 9.8 * 15 kg over 125 mm
        assert!((running_load_density(625.0).unwrap() - 1.176).abs() < 1e-12);
        assert!((running_load_density(700.0).unwrap() - 1.176).abs() < 1e-12);
        // 9.8 * 12 kg over 250 mm
        assert!((running_load_density(750.0).unwrap() - 0.4704).abs() < 1e-12);
        assert_eq!(running_load_density(5000.0).unwrap(), 0.0);
        assert!(running_load_density(5001.0).unwrap_err().is_domain_error());
        assert!(running_load_density(600.0).is_err());
    }

    #[test]
    fn test_running_mass_totals_segment_weights() {
        // Integrating the step curve recovers the total weight
        let total: f64 = MASS_STATIONS
            .windows(2)
            .map(|pair| running_load_density(pair[0]).unwrap() * (pair[1] - pair[0]))
            .sum();
        let expected: f64 = SEGMENT_MASS_KG.iter().sum::<f64>() * GRAVITY;
        assert!((total - expected).abs() < 1e-9);
    }

    #[test]
    fn test_serialization() {
        let load = StationLoad::new(625.0, 38429.0, 74623.0);
        let json = serde_json::to_string(&load).unwrap();
        let roundtrip: StationLoad = serde_json::from_str(&json).unwrap();
        assert_eq!(load, roundtrip);
    }
}
