//! # Handbook Charts
//!
//! Digitized design charts shared by the structural elements. Each chart is
//! built once on first use.

use once_cell::sync::Lazy;

use crate::curve::{DesignCurve, Interpolation};

/// Shear buckling coefficient `k` vs. panel aspect ratio (long side / short
/// side) for a web panel with edges restrained by stiffeners and flanges.
pub static WEB_BUCKLING_COEFFICIENT: Lazy<DesignCurve> = Lazy::new(|| {
    fixed_curve(
        "panel aspect ratio",
        &[0.9, 1.0, 1.2, 1.5, 2.0, 3.0, 4.0, 5.0, 8.0, 12.0],
        &[11.0, 8.0, 7.0, 6.2, 5.8, 5.3, 5.1, 5.0, 4.8, 4.8],
        Interpolation::Linear,
    )
});

/// Required stiffener inertia factor `I_U / (he · t³)` vs. `he / de`.
pub static STIFFENER_INERTIA_RATIO: Lazy<DesignCurve> = Lazy::new(|| {
    fixed_curve(
        "he/de",
        &[1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0],
        &[0.1, 0.6, 1.5, 2.5, 3.7, 4.8, 6.2],
        Interpolation::Linear,
    )
});

/// Front-spar height [mm] vs. station [mm], root (STA 625) to tip (STA 5000).
pub static FRONT_SPAR_HEIGHT: Lazy<DesignCurve> = Lazy::new(|| {
    fixed_curve(
        "front spar station",
        &[625.0, 5000.0],
        &[320.0, 130.0],
        Interpolation::Linear,
    )
});

fn fixed_curve(name: &str, xs: &[f64], ys: &[f64], interpolation: Interpolation) -> DesignCurve {
    let points = xs.iter().copied().zip(ys.iter().copied()).collect();
    match DesignCurve::new(name, points, interpolation) {
        Ok(curve) => curve,
        // Tables above are constants; a failure here is a typo in this file.
        Err(e) => panic!("built-in chart '{}' is malformed: {}", name, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckling_coefficient_at_breakpoint() {
        assert_eq!(WEB_BUCKLING_COEFFICIENT.lookup(1.2).unwrap(), 7.0);
        assert_eq!(WEB_BUCKLING_COEFFICIENT.domain(), (0.9, 12.0));
    }

    #[test]
    fn test_buckling_coefficient_out_of_range() {
        assert!(WEB_BUCKLING_COEFFICIENT.lookup(12.01).unwrap_err().is_domain_error());
    }

    #[test]
    fn test_inertia_ratio() {
        // 1.5 + (2.5 - 1.5) * 0.312 / 0.5
        assert!((STIFFENER_INERTIA_RATIO.lookup(2.312).unwrap() - 2.124).abs() < 1e-12);
        assert!(STIFFENER_INERTIA_RATIO.lookup(0.99).is_err());
        assert!(STIFFENER_INERTIA_RATIO.lookup(4.01).is_err());
    }

    #[test]
    fn test_front_spar_height() {
        assert_eq!(FRONT_SPAR_HEIGHT.lookup(625.0).unwrap(), 320.0);
        assert!((FRONT_SPAR_HEIGHT.lookup(1000.0).unwrap() - 303.714_285_714).abs() < 1e-6);
        assert_eq!(FRONT_SPAR_HEIGHT.lookup(5000.0).unwrap(), 130.0);
    }
}
