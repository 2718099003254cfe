use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::Placement2D;
use crate::math::curvature::{
    reciprocal_coefficient, reciprocal_term, spiral_coefficient, spiral_term,
};
use crate::math::transition::{CosineTransition, SineTransition};
use crate::math::{quadrature, Point2, Vector2, TOLERANCE};

use super::{heading_relative_pose, CurveDomain, PlanarCurve};

/// A spiral with curvature
/// `κ(s) = 1/A0 + s/(A1|A1|) + (1/A2) sin(2πs/L)`.
///
/// `L` is the length of the transition the spiral was solved for; it is
/// kept so the curve can be evaluated on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct SineSpiral {
    sine_term: f64,
    linear_term: Option<f64>,
    constant_term: Option<f64>,
    length: f64,
}

impl SineSpiral {
    /// Builds a sine spiral from its solved transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition has no sine component.
    pub fn from_transition(transition: &SineTransition) -> Result<Self> {
        let sine_term = reciprocal_term(transition.amplitude()).ok_or_else(|| {
            GeometryError::Degenerate("sine spiral without sine term".into())
        })?;
        Ok(Self {
            sine_term,
            linear_term: spiral_term(transition.linear(), 1),
            constant_term: spiral_term(transition.constant(), 0),
            length: transition.length(),
        })
    }

    /// Returns `A2`.
    #[must_use]
    pub fn sine_term(&self) -> f64 {
        self.sine_term
    }

    /// Returns `A1`.
    #[must_use]
    pub fn linear_term(&self) -> Option<f64> {
        self.linear_term
    }

    /// Returns `A0`.
    #[must_use]
    pub fn constant_term(&self) -> Option<f64> {
        self.constant_term
    }

    /// Returns the transition length `L`.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Heading at arc length `s`, relative to the tangent at the origin.
    #[must_use]
    pub fn heading(&self, s: f64) -> f64 {
        let k0 = spiral_coefficient(self.constant_term, 0);
        let k1 = spiral_coefficient(self.linear_term, 1);
        let ks = reciprocal_coefficient(Some(self.sine_term));
        k0 * s + 0.5 * k1 * s * s + ks * self.length / TAU * (1.0 - (TAU * s / self.length).cos())
    }
}

impl PlanarCurve for SineSpiral {
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
        spiral_coefficient(self.constant_term, 0)
            + spiral_coefficient(self.linear_term, 1) * t
            + reciprocal_coefficient(Some(self.sine_term)) * (TAU * t / self.length).sin()
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    fn relative_pose(&self, from: f64, to: f64) -> Result<Placement2D> {
        Ok(heading_relative_pose(|s| self.heading(s), from, to))
    }
}

/// A spiral with curvature `κ(s) = 1/A0 + (1/A1) cos(πs/L)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CosineSpiral {
    cosine_term: f64,
    constant_term: Option<f64>,
    length: f64,
}

impl CosineSpiral {
    /// Builds a cosine spiral from its solved transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition has no cosine component.
    pub fn from_transition(transition: &CosineTransition) -> Result<Self> {
        if transition.length() < TOLERANCE {
            return Err(GeometryError::Degenerate("cosine spiral of zero length".into()).into());
        }
        let cosine_term = reciprocal_term(transition.amplitude()).ok_or_else(|| {
            GeometryError::Degenerate("cosine spiral without cosine term".into())
        })?;
        Ok(Self {
            cosine_term,
            constant_term: spiral_term(transition.constant(), 0),
            length: transition.length(),
        })
    }

    /// Returns `A1`.
    #[must_use]
    pub fn cosine_term(&self) -> f64 {
        self.cosine_term
    }

    /// Returns `A0`.
    #[must_use]
    pub fn constant_term(&self) -> Option<f64> {
        self.constant_term
    }

    /// Returns the transition length `L`.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Heading at arc length `s`, relative to the tangent at the origin.
    #[must_use]
    pub fn heading(&self, s: f64) -> f64 {
        let k0 = spiral_coefficient(self.constant_term, 0);
        let kc = reciprocal_coefficient(Some(self.cosine_term));
        k0 * s + kc * self.length / PI * (PI * s / self.length).sin()
    }
}

impl PlanarCurve for CosineSpiral {
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
        spiral_coefficient(self.constant_term, 0)
            + reciprocal_coefficient(Some(self.cosine_term)) * (PI * t / self.length).cos()
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    fn relative_pose(&self, from: f64, to: f64) -> Result<Placement2D> {
        Ok(heading_relative_pose(|s| self.heading(s), from, to))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const K0: f64 = 1.0 / 300.0;
    const K1: f64 = 1.0 / 1000.0;

    #[test]
    fn sine_spiral_terms() {
        let transition = SineTransition::new(K0, K1, 100.0).unwrap();
        let spiral = SineSpiral::from_transition(&transition).unwrap();
        assert_relative_eq!(spiral.sine_term(), 2692.793_703_076_96, max_relative = 1e-6);
        assert_relative_eq!(
            spiral.linear_term().unwrap(),
            -207.019_667_802_706,
            max_relative = 1e-9,
        );
        assert_relative_eq!(spiral.constant_term().unwrap(), 300.0, max_relative = 1e-12);
        assert_relative_eq!(spiral.curvature(100.0), K1, max_relative = 1e-12);
    }

    #[test]
    fn cosine_spiral_terms() {
        let transition = CosineTransition::new(K0, K1, 100.0).unwrap();
        let spiral = CosineSpiral::from_transition(&transition).unwrap();
        assert_relative_eq!(spiral.cosine_term(), 857.142_857_142_857, max_relative = 1e-9);
        assert_relative_eq!(
            spiral.constant_term().unwrap(),
            461.538_461_538_462,
            max_relative = 1e-9,
        );
        assert_relative_eq!(spiral.curvature(0.0), K0, max_relative = 1e-12);
        assert_relative_eq!(spiral.curvature(100.0), K1, max_relative = 1e-12);
    }

    #[test]
    fn heading_integrates_curvature() {
        let transition = SineTransition::new(K0, K1, 100.0).unwrap();
        let spiral = SineSpiral::from_transition(&transition).unwrap();
        let numeric = quadrature::integrate(|s| spiral.curvature(s), 0.0, 60.0, 32);
        assert_relative_eq!(spiral.heading(60.0), numeric, max_relative = 1e-10);

        let spiral =
            CosineSpiral::from_transition(&CosineTransition::new(K0, K1, 100.0).unwrap()).unwrap();
        let numeric = quadrature::integrate(|s| spiral.curvature(s), 0.0, 60.0, 32);
        assert_relative_eq!(spiral.heading(60.0), numeric, max_relative = 1e-10);
    }

    #[test]
    fn flat_transition_has_no_trigonometric_term() {
        assert!(SineSpiral::from_transition(&SineTransition::new(K0, K0, 100.0).unwrap()).is_err());
        assert!(
            CosineSpiral::from_transition(&CosineTransition::new(K0, K0, 100.0).unwrap()).is_err()
        );
    }
}
