use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{CurveDomain, PlanarCurve};

/// An unbounded straight line through `pnt` along a unit direction.
///
/// The parametric form is `P(t) = pnt + t * direction`, so the parameter is
/// arc length.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pnt: Point2,
    direction: Vector2,
}

impl Line {
    /// Creates a new line. The direction is normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(pnt: Point2, direction: Vector2) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            pnt,
            direction: direction / len,
        })
    }

    /// The line through the origin along +x, the parent curve of every
    /// straight segment.
    #[must_use]
    pub fn x_axis() -> Self {
        Self {
            pnt: Point2::origin(),
            direction: Vector2::x(),
        }
    }

    /// Returns the point at parameter zero.
    #[must_use]
    pub fn pnt(&self) -> &Point2 {
        &self.pnt
    }

    /// Returns the unit direction.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }
}

impl PlanarCurve for Line {
    fn evaluate(&self, t: f64) -> Point2 {
        self.pnt + self.direction * t
    }

    fn tangent(&self, _t: f64) -> Result<Vector2> {
        Ok(self.direction)
    }

    fn curvature(&self, _t: f64) -> f64 {
        0.0
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY)
    }
}
