//! Curvature and spiral-term conversions.
//!
//! Radii are signed: positive turns left (counter-clockwise), negative turns
//! right. A radius of zero stands for an infinite radius, i.e. a straight
//! line, and maps to zero curvature.
//!
//! Spiral curves describe their curvature polynomial through *terms*: the
//! coefficient of `s^n` is `1 / (A_n * |A_n|^n)`, so a term always carries
//! the sign of its coefficient and has the dimension of a length.

use super::TOLERANCE;

/// Returns the signed curvature of a signed radius. Zero radius yields zero.
#[must_use]
pub fn curvature_from_radius(radius: f64) -> f64 {
    if radius.abs() < TOLERANCE {
        0.0
    } else {
        1.0 / radius
    }
}

/// Returns the signed radius of a signed curvature. Zero curvature yields zero.
#[must_use]
pub fn radius_from_curvature(curvature: f64) -> f64 {
    if curvature.abs() < TOLERANCE {
        0.0
    } else {
        1.0 / curvature
    }
}

/// Converts the coefficient of `s^power` into a spiral term.
///
/// Returns `None` when the coefficient is exactly zero: such a term is
/// absent from the spiral rather than infinite.
#[must_use]
pub fn spiral_term(coefficient: f64, power: u32) -> Option<f64> {
    // Coefficients of high powers are legitimately tiny (1e-16 and below),
    // so only a true zero counts as absent.
    if coefficient.abs() < f64::MIN_POSITIVE {
        return None;
    }
    let exponent = -1.0 / f64::from(power + 1);
    Some(coefficient.signum() * coefficient.abs().powf(exponent))
}

/// Converts a spiral term back into the coefficient of `s^power`.
#[must_use]
pub fn spiral_coefficient(term: Option<f64>, power: u32) -> f64 {
    term.map_or(0.0, |a| 1.0 / (a * a.abs().powf(f64::from(power))))
}

/// Converts the amplitude of a trigonometric curvature term into its
/// reciprocal length form. Zero is absent.
#[must_use]
pub fn reciprocal_term(coefficient: f64) -> Option<f64> {
    if coefficient.abs() < f64::MIN_POSITIVE {
        None
    } else {
        Some(1.0 / coefficient)
    }
}

/// Inverse of [`reciprocal_term`].
#[must_use]
pub fn reciprocal_coefficient(term: Option<f64>) -> f64 {
    term.map_or(0.0, |a| 1.0 / a)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_radius_is_straight() {
        assert!(curvature_from_radius(0.0).abs() < f64::EPSILON);
        assert!(radius_from_curvature(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn radius_curvature_sign_preserved() {
        assert_relative_eq!(curvature_from_radius(-300.0), -1.0 / 300.0);
        assert_relative_eq!(radius_from_curvature(-1.0 / 300.0), -300.0, max_relative = 1e-12);
    }

    #[test]
    fn constant_term_is_radius() {
        assert_relative_eq!(spiral_term(1.0 / 300.0, 0).unwrap(), 300.0, max_relative = 1e-12);
    }

    #[test]
    fn linear_term_keeps_sign() {
        // Clothoid from 300 m to 1000 m over 100 m.
        let k1 = (1.0 / 1000.0 - 1.0 / 300.0) / 100.0;
        assert_relative_eq!(
            spiral_term(k1, 1).unwrap(),
            -207.019_667_802_706,
            max_relative = 1e-9
        );
    }

    #[test]
    fn odd_power_term_keeps_sign() {
        let a = spiral_term(-2.4e-9, 2).unwrap();
        assert!(a < 0.0);
        assert_relative_eq!(spiral_coefficient(Some(a), 2), -2.4e-9, max_relative = 1e-12);
    }

    #[test]
    fn zero_coefficient_is_absent() {
        assert!(spiral_term(0.0, 3).is_none());
        assert!(reciprocal_term(0.0).is_none());
        assert!(spiral_coefficient(None, 5).abs() < f64::EPSILON);
    }

    #[test]
    fn tiny_high_order_coefficients_survive() {
        let k7 = 4.666_666_666_666_667e-16;
        let a = spiral_term(k7, 7).unwrap();
        assert_relative_eq!(spiral_coefficient(Some(a), 7), k7, max_relative = 1e-10);
    }

    #[test]
    fn reciprocal_round_trip() {
        let a = reciprocal_term(-0.001_166_666_666_666_667).unwrap();
        assert_relative_eq!(a, -857.142_857_142_857, max_relative = 1e-12);
        assert_relative_eq!(
            reciprocal_coefficient(Some(a)),
            -0.001_166_666_666_666_667,
            max_relative = 1e-12
        );
    }
}
