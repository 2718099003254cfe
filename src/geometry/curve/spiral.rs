use crate::error::{GeometryError, Result};
use crate::geometry::Placement2D;
use crate::math::curvature::{spiral_coefficient, spiral_term};
use crate::math::transition::{CurvaturePolynomial, TransitionShape, MAX_POWER};
use crate::math::{quadrature, Point2, Vector2};

use super::{heading_relative_pose, CurveDomain, PlanarCurve};

/// Highest curvature power a polynomial spiral family can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpiralOrder {
    /// Quadratic, linear and constant terms.
    Second,
    /// Up to the cubic term.
    Third,
    /// Up to the septic term.
    Seventh,
}

impl SpiralOrder {
    /// Highest power of `s` in the curvature polynomial.
    #[must_use]
    pub fn max_power(self) -> usize {
        match self {
            Self::Second => 2,
            Self::Third => 3,
            Self::Seventh => 7,
        }
    }
}

/// A spiral whose curvature is a polynomial in arc length.
///
/// Terms follow the length convention of
/// [`spiral_term`](crate::math::curvature::spiral_term); absent terms
/// contribute nothing. The curve leaves its origin along +x.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialSpiral {
    order: SpiralOrder,
    terms: [Option<f64>; MAX_POWER + 1],
    polynomial: CurvaturePolynomial,
}

impl PolynomialSpiral {
    /// Builds a spiral from the curvature polynomial it should follow.
    ///
    /// # Errors
    ///
    /// Returns an error if the polynomial has non-zero coefficients above
    /// the order's highest power.
    pub fn from_polynomial(order: SpiralOrder, polynomial: &CurvaturePolynomial) -> Result<Self> {
        if polynomial.degree().is_some_and(|d| d > order.max_power()) {
            return Err(GeometryError::Degenerate(format!(
                "curvature polynomial exceeds {order:?} order spiral"
            ))
            .into());
        }
        let mut terms = [None; MAX_POWER + 1];
        for (power, (term, c)) in terms
            .iter_mut()
            .zip(polynomial.coefficients())
            .enumerate()
        {
            *term = spiral_term(*c, power_u32(power));
        }
        Ok(Self::from_terms(order, terms))
    }

    /// Builds a spiral from explicit terms, lowest power first. Terms above
    /// the order's highest power are ignored.
    #[must_use]
    pub fn from_terms(order: SpiralOrder, mut terms: [Option<f64>; MAX_POWER + 1]) -> Self {
        for term in terms.iter_mut().skip(order.max_power() + 1) {
            *term = None;
        }
        let mut coefficients = [0.0; MAX_POWER + 1];
        for (power, (c, term)) in coefficients.iter_mut().zip(terms).enumerate() {
            *c = spiral_coefficient(term, power_u32(power));
        }
        Self {
            order,
            terms,
            polynomial: CurvaturePolynomial::from_coefficients(coefficients),
        }
    }

    /// Returns the order of the spiral.
    #[must_use]
    pub fn order(&self) -> SpiralOrder {
        self.order
    }

    /// Returns the term for `s^power`.
    #[must_use]
    pub fn term(&self, power: usize) -> Option<f64> {
        self.terms.get(power).copied().flatten()
    }

    #[must_use]
    pub fn constant_term(&self) -> Option<f64> {
        self.term(0)
    }

    #[must_use]
    pub fn linear_term(&self) -> Option<f64> {
        self.term(1)
    }

    #[must_use]
    pub fn quadratic_term(&self) -> Option<f64> {
        self.term(2)
    }

    #[must_use]
    pub fn cubic_term(&self) -> Option<f64> {
        self.term(3)
    }

    #[must_use]
    pub fn quartic_term(&self) -> Option<f64> {
        self.term(4)
    }

    #[must_use]
    pub fn quintic_term(&self) -> Option<f64> {
        self.term(5)
    }

    #[must_use]
    pub fn sextic_term(&self) -> Option<f64> {
        self.term(6)
    }

    #[must_use]
    pub fn septic_term(&self) -> Option<f64> {
        self.term(7)
    }

    /// Heading at arc length `s`, relative to the tangent at the origin.
    #[must_use]
    pub fn heading(&self, s: f64) -> f64 {
        self.polynomial.integral(s)
    }
}

/// Powers never exceed [`MAX_POWER`].
#[allow(clippy::cast_possible_truncation)]
fn power_u32(power: usize) -> u32 {
    power as u32
}

impl PlanarCurve for PolynomialSpiral {
    fn evaluate(&self, t: f64) -> Point2 {
        Point2::from(quadrature::integrate_heading(
            |s| self.heading(s),
            0.0,
            t,
            quadrature::panel_count(t),
        ))
    }

    fn tangent(&self, t: f64) -> Result<Vector2> {
        let theta = self.heading(t);
        Ok(Vector2::new(theta.cos(), theta.sin()))
    }

    fn curvature(&self, t: f64) -> f64 {
        self.polynomial.value(t)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    fn relative_pose(&self, from: f64, to: f64) -> Result<Placement2D> {
        Ok(heading_relative_pose(|s| self.heading(s), from, to))
    }
}
