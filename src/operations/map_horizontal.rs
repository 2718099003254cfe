use tracing::{debug, trace, warn};

use crate::alignment::{
    HorizontalContext, HorizontalCurveType, HorizontalDesignParameters, MappedSegment,
};
use crate::error::{MappingError, Result};
use crate::geometry::{
    Circle, Clothoid, CosineSpiral, CurveGeometry, Line, ParentCurve, Placement2D,
    PolynomialCurve, PolynomialSpiral, SineSpiral, SpiralOrder,
};
use crate::math::curvature::{curvature_from_radius, spiral_term};
use crate::math::transition::{CosineTransition, CurvaturePolynomial, SineTransition};

use super::split::continue_segment;
use super::MappingParams;

/// Maps a horizontal (plan) design segment to placed curves.
///
/// Helmert curves and Viennese bends yield two segments of half the
/// length; the second is composed onto the end of the first. Every other
/// family yields one segment.
pub struct MapHorizontalSegment<'a> {
    params: &'a HorizontalDesignParameters,
    context: HorizontalContext<'a>,
    mapping: MappingParams,
}

impl<'a> MapHorizontalSegment<'a> {
    /// Creates a new `MapHorizontalSegment` operation without alignment
    /// context.
    #[must_use]
    pub fn new(params: &'a HorizontalDesignParameters) -> Self {
        Self {
            params,
            context: HorizontalContext::default(),
            mapping: MappingParams::default(),
        }
    }

    /// Sets the distance along and cant layout of the enclosing alignment.
    #[must_use]
    pub fn with_context(mut self, context: HorizontalContext<'a>) -> Self {
        self.context = context;
        self
    }

    /// Replaces the mapping tolerances.
    #[must_use]
    pub fn with_params(mut self, mapping: MappingParams) -> Self {
        self.mapping = mapping;
        self
    }

    /// Executes the mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is not positive, the radii do not
    /// suit the family, or a Viennese bend lacks its gravity-centre-line
    /// height or a cant segment spanning the same distance range.
    pub fn execute(&self) -> Result<Vec<MappedSegment>> {
        let p = self.params;
        let length = p.segment_length;
        self.mapping.check_length(length)?;
        let (r0, r1) = (p.start_radius_of_curvature, p.end_radius_of_curvature);
        if !(r0.is_finite() && r1.is_finite()) {
            return Err(MappingError::invalid("radii of curvature must be finite"));
        }
        if !(p.start_direction.is_finite() && p.start_point.coords.iter().all(|c| c.is_finite())) {
            return Err(MappingError::invalid("start point and direction must be finite"));
        }
        let (k0, k1) = (curvature_from_radius(r0), curvature_from_radius(r1));
        debug!(
            family = %p.predefined_type,
            start_dist_along = self.context.start_dist_along,
            length,
            k0,
            k1,
            "mapping horizontal segment"
        );

        let placement = Placement2D::from_angle(p.start_point, p.start_direction);
        let delta = k1 - k0;
        let segment = match p.predefined_type {
            HorizontalCurveType::Line => {
                if !(self.mapping.is_zero(k0) && self.mapping.is_zero(k1)) {
                    return Err(MappingError::invalid(format!(
                        "line with non-zero radius ({r0}, {r1})"
                    )));
                }
                MappedSegment::planar(placement, ParentCurve::new(Line::x_axis()), 0.0, length)
            }
            HorizontalCurveType::CircularArc => {
                if self.mapping.is_zero(k0) {
                    return Err(MappingError::invalid("circular arc without start radius"));
                }
                if !self.mapping.is_flat(k0, k1) {
                    warn!(r0, r1, "circular arc with differing end radius, using start radius");
                }
                constant_curvature(placement, k0, length)?
            }
            HorizontalCurveType::Clothoid
            | HorizontalCurveType::Cubic
            | HorizontalCurveType::BlossCurve
            | HorizontalCurveType::CosineCurve
            | HorizontalCurveType::SineCurve
                if self.mapping.is_flat(k0, k1) =>
            {
                debug!("equal curvatures, transition degenerates");
                constant_curvature(placement, k0, length)?
            }
            HorizontalCurveType::Clothoid => {
                let a = spiral_term(delta / length, 1)
                    .ok_or_else(|| MappingError::invalid("clothoid without curvature change"))?;
                trace!(clothoid_constant = a, "clothoid");
                MappedSegment::planar(
                    placement,
                    ParentCurve::new(Clothoid::new(a)?),
                    k0 * length / delta,
                    length,
                )
            }
            HorizontalCurveType::Cubic => {
                let cubic = delta / (6.0 * length);
                trace!(cubic, "cubic parabola");
                let curve = PolynomialCurve::new(vec![0.0, 1.0], vec![0.0, 0.0, 0.0, cubic])?;
                MappedSegment::planar(
                    placement,
                    ParentCurve::new(curve),
                    k0 * length / delta,
                    length,
                )
            }
            HorizontalCurveType::BlossCurve => {
                let shape = CurvaturePolynomial::bloss(k0, k1, length)?;
                let spiral = PolynomialSpiral::from_polynomial(SpiralOrder::Third, &shape)?;
                MappedSegment::planar(placement, ParentCurve::new(spiral), 0.0, length)
            }
            HorizontalCurveType::CosineCurve => {
                let transition = CosineTransition::new(k0, k1, length)?;
                let spiral = CosineSpiral::from_transition(&transition)?;
                MappedSegment::planar(placement, ParentCurve::new(spiral), 0.0, length)
            }
            HorizontalCurveType::SineCurve => {
                let transition = SineTransition::new(k0, k1, length)?;
                let spiral = SineSpiral::from_transition(&transition)?;
                MappedSegment::planar(placement, ParentCurve::new(spiral), 0.0, length)
            }
            HorizontalCurveType::HelmertCurve => return self.helmert(placement, k0, k1),
            HorizontalCurveType::VienneseBend => return self.viennese(placement, k0, k1),
        };
        Ok(vec![segment])
    }

    fn helmert(&self, placement: Placement2D, k0: f64, k1: f64) -> Result<Vec<MappedSegment>> {
        let length = self.params.segment_length;
        let half = 0.5 * length;
        if self.mapping.is_flat(k0, k1) {
            return split_constant(placement, k0, half);
        }
        let first = PolynomialSpiral::from_polynomial(
            SpiralOrder::Second,
            &CurvaturePolynomial::helmert_first_half(k0, k1, length)?,
        )?;
        let second = PolynomialSpiral::from_polynomial(
            SpiralOrder::Second,
            &CurvaturePolynomial::helmert_second_half(k0, k1, length)?,
        )?;
        let first = MappedSegment::planar(placement, ParentCurve::new(first), 0.0, half);
        let second = continue_segment(&first, second.into(), half, half)?;
        Ok(vec![first, second])
    }

    /// The bend follows the seventh-order shape in curvature, corrected by
    /// the lateral acceleration of the vehicle's centre of gravity as the
    /// cant angle changes along the same shape.
    fn viennese(&self, placement: Placement2D, k0: f64, k1: f64) -> Result<Vec<MappedSegment>> {
        let p = self.params;
        let length = p.segment_length;
        let half = 0.5 * length;
        let height = p.gravity_center_line_height.ok_or_else(|| {
            MappingError::invalid("viennese bend without gravity centre line height")
        })?;
        if !height.is_finite() {
            return Err(MappingError::invalid("gravity centre line height must be finite"));
        }

        let layout = self.context.cant.ok_or(MappingError::MissingCantContext)?;
        let start = self.context.start_dist_along;
        let cant = layout
            .segment_at(start)
            .ok_or(MappingError::MissingCantContext)?;
        if (cant.start_dist_along - start).abs() > self.mapping.tolerance
            || (cant.horizontal_length - length).abs() > self.mapping.tolerance
        {
            warn!(
                start,
                length,
                cant_start = cant.start_dist_along,
                cant_length = cant.horizontal_length,
                "viennese bend does not line up with its cant segment"
            );
            return Err(MappingError::MissingCantContext.into());
        }
        let gauge = layout.rail_head_distance();
        if !(gauge.is_finite() && gauge > self.mapping.tolerance) {
            return Err(MappingError::invalid(format!(
                "rail-head distance must be positive, got {gauge}"
            )));
        }
        let psi0 = (cant.start_cant_right - cant.start_cant_left) / gauge;
        let psi1 = (cant.end_cant_right() - cant.end_cant_left()) / gauge;

        if self.mapping.is_flat(k0, k1) && self.mapping.is_flat(psi0, psi1) {
            return split_constant(placement, k0, half);
        }
        let shape = CurvaturePolynomial::viennese(k0, k1, length)?
            + CurvaturePolynomial::viennese(psi0, psi1, length)?
                .second_derivative()
                .scaled(-height);
        trace!(coefficients = ?shape.coefficients(), psi0, psi1, height, "viennese bend");

        let spiral: CurveGeometry =
            PolynomialSpiral::from_polynomial(SpiralOrder::Seventh, &shape)?.into();
        let first = MappedSegment::planar(placement, ParentCurve::new(spiral.clone()), 0.0, half);
        let second = continue_segment(&first, spiral, half, half)?;
        Ok(vec![first, second])
    }
}

/// A line for zero curvature, otherwise a circle walked clockwise for
/// negative curvature.
fn constant_curvature(placement: Placement2D, k: f64, length: f64) -> Result<MappedSegment> {
    if k.abs() < f64::MIN_POSITIVE {
        return Ok(MappedSegment::planar(
            placement,
            ParentCurve::new(Line::x_axis()),
            0.0,
            length,
        ));
    }
    let circle = Circle::new(1.0 / k.abs())?;
    Ok(MappedSegment::planar(
        placement,
        ParentCurve::new(circle),
        0.0,
        length.copysign(k),
    ))
}

/// Split family whose boundary curvatures agree: two equal halves of a
/// line or circle.
fn split_constant(placement: Placement2D, k: f64, half: f64) -> Result<Vec<MappedSegment>> {
    let first = constant_curvature(placement, k, half)?;
    let second = continue_segment(
        &first,
        first.parent_curve().geometry().clone(),
        first.segment_start() + first.segment_length(),
        first.segment_length(),
    )?;
    Ok(vec![first, second])
}
