use crate::error::{GeometryError, Result};
use crate::geometry::Placement2D;
use crate::math::{quadrature, Point2, Vector2};

use super::{heading_relative_pose, CurveDomain, PlanarCurve};

/// An Euler spiral whose curvature grows linearly with arc length:
/// `κ(s) = s / (A |A|)`.
///
/// The origin is the point of zero curvature and the curve leaves it along
/// +x. A negative clothoid constant turns right for positive `s`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clothoid {
    clothoid_constant: f64,
}

impl Clothoid {
    /// Creates a new clothoid.
    ///
    /// # Errors
    ///
    /// Returns an error if the constant is zero or not finite.
    pub fn new(clothoid_constant: f64) -> Result<Self> {
        if !clothoid_constant.is_finite() || clothoid_constant.abs() < f64::MIN_POSITIVE {
            return Err(GeometryError::Degenerate(
                "clothoid constant must be finite and non-zero".into(),
            )
            .into());
        }
        Ok(Self { clothoid_constant })
    }

    /// Returns the clothoid constant `A`.
    #[must_use]
    pub fn clothoid_constant(&self) -> f64 {
        self.clothoid_constant
    }

    /// Heading at arc length `s`, relative to the tangent at the origin.
    #[must_use]
    pub fn heading(&self, s: f64) -> f64 {
        let a = self.clothoid_constant;
        s * s / (2.0 * a * a.abs())
    }
}

impl PlanarCurve for Clothoid {
    fn evaluate(&self, t: f64) -> Point2 {
        let chord = quadrature::integrate_heading(
            |s| self.heading(s),
            0.0,
            t,
            quadrature::panel_count(t),
        );
        Point2::from(chord)
    }

    fn tangent(&self, t: f64) -> Result<Vector2> {
        let theta = self.heading(t);
        Ok(Vector2::new(theta.cos(), theta.sin()))
    }

    fn curvature(&self, t: f64) -> f64 {
        let a = self.clothoid_constant;
        t / (a * a.abs())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    fn relative_pose(&self, from: f64, to: f64) -> Result<Placement2D> {
        Ok(heading_relative_pose(|s| self.heading(s), from, to))
    }
}
