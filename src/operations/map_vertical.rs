use std::f64::consts::TAU;

use tracing::{debug, trace, warn};

use crate::alignment::{MappedSegment, VerticalCurveType, VerticalDesignParameters};
use crate::error::{MappingError, Result};
use crate::geometry::{Circle, Line, ParentCurve, Placement2D, PolynomialCurve};
use crate::math::{Point2, Vector2};

use super::MappingParams;

/// Maps a vertical (profile) design segment to a placed curve in the
/// distance-along/height plane.
pub struct MapVerticalSegment<'a> {
    params: &'a VerticalDesignParameters,
    mapping: MappingParams,
}

impl<'a> MapVerticalSegment<'a> {
    /// Creates a new `MapVerticalSegment` operation.
    #[must_use]
    pub fn new(params: &'a VerticalDesignParameters) -> Self {
        Self {
            params,
            mapping: MappingParams::default(),
        }
    }

    /// Replaces the mapping tolerances.
    #[must_use]
    pub fn with_params(mut self, mapping: MappingParams) -> Self {
        self.mapping = mapping;
        self
    }

    /// Executes the mapping. Vertical segments never split, so the result
    /// holds exactly one segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is not positive, a gradient is not
    /// finite, or the family is a vertical clothoid.
    pub fn execute(&self) -> Result<Vec<MappedSegment>> {
        let p = self.params;
        self.mapping.check_length(p.horizontal_length)?;
        if !(p.start_gradient.is_finite() && p.end_gradient.is_finite()) {
            return Err(MappingError::invalid("gradients must be finite"));
        }
        debug!(
            family = %p.predefined_type,
            start_dist_along = p.start_dist_along,
            length = p.horizontal_length,
            "mapping vertical segment"
        );

        let placement = Placement2D::new(
            Point2::new(p.start_dist_along, p.start_height),
            Vector2::new(1.0, p.start_gradient),
        )?;

        let segment = match p.predefined_type {
            VerticalCurveType::ConstantGradient => {
                if !self.mapping.is_flat(p.start_gradient, p.end_gradient) {
                    warn!(
                        start_gradient = p.start_gradient,
                        end_gradient = p.end_gradient,
                        "constant gradient with differing end gradient, using start gradient"
                    );
                }
                self.sloped_line(placement)
            }
            VerticalCurveType::CircularArc => self.circular_arc(placement)?,
            VerticalCurveType::ParabolicArc => self.parabolic_arc(placement)?,
            VerticalCurveType::Clothoid => {
                return Err(MappingError::UnsupportedCurveFamily {
                    domain: "vertical",
                    family: p.predefined_type.name(),
                }
                .into())
            }
        };
        Ok(vec![segment])
    }

    fn sloped_line(&self, placement: Placement2D) -> MappedSegment {
        let p = self.params;
        let length = p.horizontal_length * p.start_gradient.hypot(1.0);
        MappedSegment::planar(placement, ParentCurve::new(Line::x_axis()), 0.0, length)
    }

    fn circular_arc(&self, placement: Placement2D) -> Result<MappedSegment> {
        let p = self.params;
        let (theta0, theta1) = (p.start_gradient.atan(), p.end_gradient.atan());
        let rise = (theta1.sin() - theta0.sin()).abs();
        if self.mapping.is_flat(p.start_gradient, p.end_gradient) || self.mapping.is_zero(rise) {
            debug!("equal gradients, circular arc degenerates to a line");
            return Ok(self.sloped_line(placement));
        }

        let radius = p.horizontal_length / rise;
        let sag = p.end_gradient > p.start_gradient;
        let tangent = placement.ref_direction();
        let left = Vector2::new(-tangent.y, tangent.x);
        let normal = if sag { left } else { -left };
        let centre = Point2::from(normal * radius);
        let phi0 = (-centre.y).atan2(-centre.x).rem_euclid(TAU);
        let sweep = radius * (theta1 - theta0).abs();
        let length = if sag { sweep } else { -sweep };
        trace!(radius, centre_x = centre.x, centre_y = centre.y, phi0, length, "vertical circle");

        let parent = ParentCurve::new(Circle::new(radius)?)
            .with_position(Placement2D::from_angle(centre, 0.0));
        Ok(MappedSegment::planar(placement, parent, radius * phi0, length))
    }

    fn parabolic_arc(&self, placement: Placement2D) -> Result<MappedSegment> {
        let p = self.params;
        let a = (p.end_gradient - p.start_gradient) / (2.0 * p.horizontal_length);
        let length = if self.mapping.is_zero(a) {
            p.horizontal_length * p.start_gradient.hypot(1.0)
        } else {
            (parabola_length_integral(p.end_gradient) - parabola_length_integral(p.start_gradient))
                / (4.0 * a)
        };
        trace!(a, length, "vertical parabola");

        let parent = ParentCurve::new(PolynomialCurve::new(
            vec![0.0, 1.0],
            vec![p.start_height, p.start_gradient, a],
        )?);
        Ok(MappedSegment::planar(placement, parent, 0.0, length))
    }
}

/// Antiderivative (up to the factor `1/(4a)`) of the arc length element of
/// `y = a x² + g x`, expressed in the gradient `u = y'`.
fn parabola_length_integral(u: f64) -> f64 {
    u * u.hypot(1.0) + u.asinh()
}
