use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{CurveDomain, PlanarCurve};

/// A full circle centred on the origin of its position.
///
/// The parameter is arc length measured counter-clockwise from the local
/// +x axis: `P(t) = r * (cos(t / r), sin(t / r))`. Clockwise travel is
/// expressed by the segment, through a negative length.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    radius: f64,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive.
    pub fn new(radius: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > TOLERANCE) {
            return Err(
                GeometryError::Degenerate("circle radius must be positive".into()).into(),
            );
        }
        Ok(Self { radius })
    }

    /// Returns the radius of the circle.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the circumference of the circle.
    #[must_use]
    pub fn circumference(&self) -> f64 {
        std::f64::consts::TAU * self.radius
    }
}

impl PlanarCurve for Circle {
    fn evaluate(&self, t: f64) -> Point2 {
        let angle = t / self.radius;
        Point2::new(self.radius * angle.cos(), self.radius * angle.sin())
    }

    fn tangent(&self, t: f64) -> Result<Vector2> {
        let angle = t / self.radius;
        Ok(Vector2::new(-angle.sin(), angle.cos()))
    }

    fn curvature(&self, _t: f64) -> f64 {
        1.0 / self.radius
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, self.circumference())
    }
}
