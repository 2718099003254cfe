//! Transition shapes between two boundary values.
//!
//! A transition describes how a curvature-like quantity (horizontal
//! curvature, or a cant elevation) moves from `start` to `end` over a
//! length `L`. The polynomial families are expanded into powers of the
//! arc length `s` so their coefficients can be handed to spiral curves
//! directly; the trigonometric families keep their closed form.

use std::f64::consts::{PI, TAU};
use std::ops::Add;

use crate::error::{MappingError, Result};

use super::TOLERANCE;

/// Highest power of `s` a curvature polynomial can carry.
pub const MAX_POWER: usize = 7;

/// A quantity that varies along a transition of known length.
pub trait TransitionShape {
    /// Value at arc length `s` from the transition start.
    fn value(&self, s: f64) -> f64;

    /// First derivative with respect to `s`.
    fn slope(&self, s: f64) -> f64;

    /// Integral of the value from `0` to `s`.
    fn integral(&self, s: f64) -> f64;
}

/// Rejects lengths that cannot carry a transition.
pub(crate) fn check_length(length: f64) -> Result<()> {
    if length.is_finite() && length > TOLERANCE {
        Ok(())
    } else {
        Err(MappingError::invalid(format!(
            "transition length must be positive, got {length}"
        )))
    }
}

/// Powers and their products stay far below 2^52, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
fn small_f64(n: usize) -> f64 {
    n as f64
}

/// A polynomial `Σ c_n s^n` of degree at most [`MAX_POWER`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurvaturePolynomial {
    coefficients: [f64; MAX_POWER + 1],
}

impl CurvaturePolynomial {
    /// Creates a polynomial from its coefficients, lowest power first.
    #[must_use]
    pub fn from_coefficients(coefficients: [f64; MAX_POWER + 1]) -> Self {
        Self { coefficients }
    }

    /// A constant value.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        let mut coefficients = [0.0; MAX_POWER + 1];
        coefficients[0] = value;
        Self { coefficients }
    }

    /// Linear change: `v0 + Δ t`, with `t = s / L`.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is not positive.
    pub fn linear(start: f64, end: f64, length: f64) -> Result<Self> {
        Self::from_normalized(&[start, end - start], length)
    }

    /// Bloss curve: `v0 + Δ (3t² - 2t³)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is not positive.
    pub fn bloss(start: f64, end: f64, length: f64) -> Result<Self> {
        let delta = end - start;
        Self::from_normalized(&[start, 0.0, 3.0 * delta, -2.0 * delta], length)
    }

    /// First half of a Helmert curve: `v0 + 2Δ t²` for `t ∈ [0, 1/2]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is not positive.
    pub fn helmert_first_half(start: f64, end: f64, length: f64) -> Result<Self> {
        let delta = end - start;
        Self::from_normalized(&[start, 0.0, 2.0 * delta], length)
    }

    /// Second half of a Helmert curve: `v1 - 2Δ (1 - t)²` for `t ∈ [1/2, 1]`,
    /// expanded in the parameter of the whole transition.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is not positive.
    pub fn helmert_second_half(start: f64, end: f64, length: f64) -> Result<Self> {
        let delta = end - start;
        Self::from_normalized(&[end - 2.0 * delta, 4.0 * delta, -2.0 * delta], length)
    }

    /// Viennese bend: `v0 + Δ (35t⁴ - 84t⁵ + 70t⁶ - 20t⁷)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is not positive.
    pub fn viennese(start: f64, end: f64, length: f64) -> Result<Self> {
        let delta = end - start;
        Self::from_normalized(
            &[
                start,
                0.0,
                0.0,
                0.0,
                35.0 * delta,
                -84.0 * delta,
                70.0 * delta,
                -20.0 * delta,
            ],
            length,
        )
    }

    /// Converts coefficients of `t = s / L` into coefficients of `s`.
    fn from_normalized(normalized: &[f64], length: f64) -> Result<Self> {
        check_length(length)?;
        let mut coefficients = [0.0; MAX_POWER + 1];
        let mut scale = 1.0;
        for (c, n) in coefficients.iter_mut().zip(normalized) {
            *c = n * scale;
            scale /= length;
        }
        Ok(Self { coefficients })
    }

    /// Coefficients, lowest power first.
    #[must_use]
    pub fn coefficients(&self) -> &[f64; MAX_POWER + 1] {
        &self.coefficients
    }

    /// Coefficient of `s^power`, zero beyond [`MAX_POWER`].
    #[must_use]
    pub fn coefficient(&self, power: usize) -> f64 {
        self.coefficients.get(power).copied().unwrap_or(0.0)
    }

    /// Highest power with a non-zero coefficient, `None` for the zero
    /// polynomial.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        self.coefficients
            .iter()
            .rposition(|c| c.abs() >= f64::MIN_POSITIVE)
    }

    /// Multiplies every coefficient by `factor`.
    #[must_use]
    pub fn scaled(mut self, factor: f64) -> Self {
        for c in &mut self.coefficients {
            *c *= factor;
        }
        self
    }

    /// Returns the second derivative with respect to `s`.
    #[must_use]
    pub fn second_derivative(&self) -> Self {
        let mut coefficients = [0.0; MAX_POWER + 1];
        for (power, c) in self.coefficients.iter().enumerate().skip(2) {
            let factor = small_f64(power * (power - 1));
            coefficients[power - 2] = c * factor;
        }
        Self { coefficients }
    }
}

impl Add for CurvaturePolynomial {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        for (c, r) in self.coefficients.iter_mut().zip(rhs.coefficients) {
            *c += r;
        }
        self
    }
}

impl TransitionShape for CurvaturePolynomial {
    fn value(&self, s: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * s + c)
    }

    fn slope(&self, s: f64) -> f64 {
        self.coefficients
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(0.0, |acc, (power, c)| acc * s + c * small_f64(power))
    }

    fn integral(&self, s: f64) -> f64 {
        self.coefficients
            .iter()
            .enumerate()
            .rev()
            .fold(0.0, |acc, (power, c)| acc * s + c / small_f64(power + 1))
            * s
    }
}

/// Sine transition: `v0 + Δ (t - sin(2πt) / 2π)`, stored as
/// `constant + linear·s + amplitude·sin(2πs/L)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineTransition {
    constant: f64,
    linear: f64,
    amplitude: f64,
    length: f64,
}

impl SineTransition {
    /// Solves the sine transition between two boundary values.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is not positive.
    pub fn new(start: f64, end: f64, length: f64) -> Result<Self> {
        check_length(length)?;
        let delta = end - start;
        Ok(Self {
            constant: start,
            linear: delta / length,
            amplitude: -delta / TAU,
            length,
        })
    }

    /// Constant coefficient.
    #[must_use]
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Coefficient of `s`.
    #[must_use]
    pub fn linear(&self) -> f64 {
        self.linear
    }

    /// Amplitude of the `sin(2πs/L)` term.
    #[must_use]
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Transition length `L`.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Multiplies the whole transition by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            constant: self.constant * factor,
            linear: self.linear * factor,
            amplitude: self.amplitude * factor,
            length: self.length,
        }
    }
}

impl TransitionShape for SineTransition {
    fn value(&self, s: f64) -> f64 {
        self.constant + self.linear * s + self.amplitude * (TAU * s / self.length).sin()
    }

    fn slope(&self, s: f64) -> f64 {
        self.linear + self.amplitude * TAU / self.length * (TAU * s / self.length).cos()
    }

    fn integral(&self, s: f64) -> f64 {
        self.constant * s
            + 0.5 * self.linear * s * s
            + self.amplitude * self.length / TAU * (1.0 - (TAU * s / self.length).cos())
    }
}

/// Cosine transition: `(v0 + v1)/2 - (Δ/2) cos(πt)`, stored as
/// `constant + amplitude·cos(πs/L)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosineTransition {
    constant: f64,
    amplitude: f64,
    length: f64,
}

impl CosineTransition {
    /// Solves the cosine transition between two boundary values.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is not positive.
    pub fn new(start: f64, end: f64, length: f64) -> Result<Self> {
        check_length(length)?;
        Ok(Self {
            constant: 0.5 * (start + end),
            amplitude: 0.5 * (start - end),
            length,
        })
    }

    /// Constant coefficient.
    #[must_use]
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Amplitude of the `cos(πs/L)` term.
    #[must_use]
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Transition length `L`.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Multiplies the whole transition by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            constant: self.constant * factor,
            amplitude: self.amplitude * factor,
            length: self.length,
        }
    }
}

impl TransitionShape for CosineTransition {
    fn value(&self, s: f64) -> f64 {
        self.constant + self.amplitude * (PI * s / self.length).cos()
    }

    fn slope(&self, s: f64) -> f64 {
        -self.amplitude * PI / self.length * (PI * s / self.length).sin()
    }

    fn integral(&self, s: f64) -> f64 {
        self.constant * s + self.amplitude * self.length / PI * (PI * s / self.length).sin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const K0: f64 = 1.0 / 300.0;
    const K1: f64 = 1.0 / 1000.0;
    const L: f64 = 100.0;

    fn assert_boundaries(shape: &impl TransitionShape, start: f64, end: f64, length: f64) {
        assert_abs_diff_eq!(shape.value(0.0), start, epsilon = 1e-14);
        assert_abs_diff_eq!(shape.value(length), end, epsilon = 1e-14);
    }

    #[test]
    fn every_family_meets_its_boundaries() {
        assert_boundaries(&CurvaturePolynomial::linear(K0, K1, L).unwrap(), K0, K1, L);
        assert_boundaries(&CurvaturePolynomial::bloss(K0, K1, L).unwrap(), K0, K1, L);
        assert_boundaries(&CurvaturePolynomial::viennese(K0, K1, L).unwrap(), K0, K1, L);
        assert_boundaries(&SineTransition::new(K0, K1, L).unwrap(), K0, K1, L);
        assert_boundaries(&CosineTransition::new(K0, K1, L).unwrap(), K0, K1, L);
    }

    #[test]
    fn smooth_families_start_and_end_flat() {
        let bloss = CurvaturePolynomial::bloss(K0, K1, L).unwrap();
        let viennese = CurvaturePolynomial::viennese(K0, K1, L).unwrap();
        let sine = SineTransition::new(K0, K1, L).unwrap();
        let cosine = CosineTransition::new(K0, K1, L).unwrap();
        for s in [0.0, L] {
            assert_abs_diff_eq!(bloss.slope(s), 0.0, epsilon = 1e-15);
            assert_abs_diff_eq!(viennese.slope(s), 0.0, epsilon = 1e-15);
            assert_abs_diff_eq!(sine.slope(s), 0.0, epsilon = 1e-15);
            assert_abs_diff_eq!(cosine.slope(s), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn helmert_halves_meet_at_midpoint() {
        let first = CurvaturePolynomial::helmert_first_half(K0, K1, L).unwrap();
        let second = CurvaturePolynomial::helmert_second_half(K0, K1, L).unwrap();
        let mid = 0.5 * L;
        assert_relative_eq!(first.value(mid), 0.5 * (K0 + K1), max_relative = 1e-12);
        assert_relative_eq!(second.value(mid), first.value(mid), max_relative = 1e-12);
        assert_relative_eq!(second.slope(mid), first.slope(mid), max_relative = 1e-12);
        assert_abs_diff_eq!(second.value(L), K1, epsilon = 1e-15);
        assert_abs_diff_eq!(second.slope(L), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn bloss_coefficients_in_arc_length() {
        let bloss = CurvaturePolynomial::bloss(K0, K1, L).unwrap();
        let delta = K1 - K0;
        assert_relative_eq!(bloss.coefficient(2), 3.0 * delta / (L * L), max_relative = 1e-12);
        assert_relative_eq!(bloss.coefficient(3), -2.0 * delta / (L * L * L), max_relative = 1e-12);
        assert_eq!(bloss.degree(), Some(3));
    }

    #[test]
    fn integral_matches_quadrature() {
        let viennese = CurvaturePolynomial::viennese(K0, K1, L).unwrap();
        let numeric = crate::math::quadrature::integrate(|s| viennese.value(s), 0.0, 70.0, 8);
        assert_relative_eq!(viennese.integral(70.0), numeric, max_relative = 1e-12);

        let sine = SineTransition::new(K0, K1, L).unwrap();
        let numeric = crate::math::quadrature::integrate(|s| sine.value(s), 0.0, 70.0, 32);
        assert_relative_eq!(sine.integral(70.0), numeric, max_relative = 1e-10);

        let cosine = CosineTransition::new(K0, K1, L).unwrap();
        let numeric = crate::math::quadrature::integrate(|s| cosine.value(s), 0.0, 70.0, 32);
        assert_relative_eq!(cosine.integral(70.0), numeric, max_relative = 1e-10);
    }

    #[test]
    fn second_derivative_of_viennese_shape() {
        let shape = CurvaturePolynomial::viennese(0.0, 1.0, L).unwrap();
        let second = shape.second_derivative();
        assert_relative_eq!(second.coefficient(2), 420.0 / L.powi(4), max_relative = 1e-12);
        assert_relative_eq!(second.coefficient(5), -840.0 / L.powi(7), max_relative = 1e-12);
        assert_eq!(second.degree(), Some(5));
        // The shape is flat in curvature at both ends.
        assert_abs_diff_eq!(second.value(0.0), 0.0, epsilon = 1e-18);
        assert_abs_diff_eq!(second.value(L), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(CurvaturePolynomial::bloss(K0, K1, 0.0).is_err());
        assert!(SineTransition::new(K0, K1, -1.0).is_err());
        assert!(CosineTransition::new(K0, K1, f64::NAN).is_err());
    }

    #[test]
    fn scaling_and_addition() {
        let a = CurvaturePolynomial::constant(2.0);
        let b = CurvaturePolynomial::linear(0.0, 1.0, 10.0).unwrap();
        let sum = a.scaled(0.5) + b;
        assert_relative_eq!(sum.value(5.0), 1.5);
        assert!(CurvaturePolynomial::default().degree().is_none());
    }
}
