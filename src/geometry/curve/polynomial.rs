use crate::error::{GeometryError, Result};
use crate::math::{quadrature, Point2, Vector2, TOLERANCE};

use super::{CurveDomain, PlanarCurve};

/// Newton iterations allowed when inverting arc length.
const MAX_NEWTON_STEPS: usize = 50;

/// A planar curve given by one polynomial per coordinate:
/// `x(t) = Σ cx_i t^i`, `y(t) = Σ cy_i t^i`.
///
/// The parameter is not arc length in general; see
/// [`PolynomialCurve::parameter_at_length`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialCurve {
    coefficients_x: Vec<f64>,
    coefficients_y: Vec<f64>,
}

impl PolynomialCurve {
    /// Creates a new polynomial curve, coefficients lowest power first.
    ///
    /// # Errors
    ///
    /// Returns an error if either coefficient list is empty.
    pub fn new(coefficients_x: Vec<f64>, coefficients_y: Vec<f64>) -> Result<Self> {
        if coefficients_x.is_empty() || coefficients_y.is_empty() {
            return Err(GeometryError::Degenerate(
                "polynomial curve needs at least one coefficient per axis".into(),
            )
            .into());
        }
        Ok(Self {
            coefficients_x,
            coefficients_y,
        })
    }

    /// Returns the x coefficients, lowest power first.
    #[must_use]
    pub fn coefficients_x(&self) -> &[f64] {
        &self.coefficients_x
    }

    /// Returns the y coefficients, lowest power first.
    #[must_use]
    pub fn coefficients_y(&self) -> &[f64] {
        &self.coefficients_y
    }

    /// Derivative vector `(x'(t), y'(t))`.
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector2 {
        Vector2::new(
            horner_derivative(&self.coefficients_x, t),
            horner_derivative(&self.coefficients_y, t),
        )
    }

    /// Arc length between parameters `t0` and `t1`, negative if `t1 < t0`.
    #[must_use]
    pub fn arc_length(&self, t0: f64, t1: f64) -> f64 {
        quadrature::integrate(
            |t| self.derivative(t).norm(),
            t0,
            t1,
            quadrature::panel_count(t1 - t0),
        )
    }

    /// Returns the parameter reached after travelling the signed arc length
    /// `length` from parameter `t0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve has a stationary point on the way or
    /// the iteration does not converge.
    pub fn parameter_at_length(&self, t0: f64, length: f64) -> Result<f64> {
        let speed = self.derivative(t0).norm();
        if speed < TOLERANCE {
            return Err(GeometryError::Degenerate("stationary polynomial curve".into()).into());
        }
        let mut t = t0 + length / speed;
        for _ in 0..MAX_NEWTON_STEPS {
            let residual = self.arc_length(t0, t) - length;
            let speed = self.derivative(t).norm();
            if speed < TOLERANCE {
                return Err(
                    GeometryError::Degenerate("stationary polynomial curve".into()).into(),
                );
            }
            let step = residual / speed;
            t -= step;
            if step.abs() < TOLERANCE * (1.0 + t.abs()) {
                return Ok(t);
            }
        }
        Err(GeometryError::Degenerate("arc length inversion did not converge".into()).into())
    }
}

fn horner(coefficients: &[f64], t: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

fn horner_derivative(coefficients: &[f64], t: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .fold(0.0, |acc, (i, c)| acc * t + c * power_f64(i))
}

fn horner_second_derivative(coefficients: &[f64], t: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .skip(2)
        .rev()
        .fold(0.0, |acc, (i, c)| acc * t + c * power_f64(i * (i - 1)))
}

/// Coefficient indices are tiny, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
fn power_f64(n: usize) -> f64 {
    n as f64
}

impl PlanarCurve for PolynomialCurve {
    fn evaluate(&self, t: f64) -> Point2 {
        Point2::new(horner(&self.coefficients_x, t), horner(&self.coefficients_y, t))
    }

    fn tangent(&self, t: f64) -> Result<Vector2> {
        let d = self.derivative(t);
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(d / len)
    }

    fn curvature(&self, t: f64) -> f64 {
        let d1 = self.derivative(t);
        let d2 = Vector2::new(
            horner_second_derivative(&self.coefficients_x, t),
            horner_second_derivative(&self.coefficients_y, t),
        );
        let speed = d1.norm();
        if speed < TOLERANCE {
            return 0.0;
        }
        d1.perp(&d2) / (speed * speed * speed)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn parabola() -> PolynomialCurve {
        PolynomialCurve::new(vec![0.0, 1.0], vec![10.0, 0.0, 0.0025]).unwrap()
    }

    #[test]
    fn evaluates_coefficients() {
        let p = parabola().evaluate(100.0);
        assert_relative_eq!(p.x, 100.0);
        assert_relative_eq!(p.y, 35.0, max_relative = 1e-12);
    }

    #[test]
    fn parabola_arc_length() {
        // y = a x^2 over [0, 100] with a = 0.0025.
        assert_relative_eq!(
            parabola().arc_length(0.0, 100.0),
            104.022_882_387_721_85,
            max_relative = 1e-10
        );
    }

    #[test]
    fn length_inversion() {
        let curve = parabola();
        let t = curve.parameter_at_length(0.0, 104.022_882_387_721_85).unwrap();
        assert_abs_diff_eq!(t, 100.0, epsilon = 1e-8);
        let back = curve.parameter_at_length(100.0, -104.022_882_387_721_85).unwrap();
        assert_abs_diff_eq!(back, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn curvature_at_vertex() {
        assert_relative_eq!(parabola().curvature(0.0), 0.005, max_relative = 1e-12);
    }

    #[test]
    fn empty_coefficients_rejected() {
        assert!(PolynomialCurve::new(vec![], vec![1.0]).is_err());
    }
}
