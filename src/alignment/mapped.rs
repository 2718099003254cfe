use std::f64::consts::PI;

use crate::error::{GeometryError, Result};
use crate::geometry::{CurveGeometry, ParentCurve, Placement2D, Placement3D, PlanarCurve};
use crate::math::{Point2, Vector2};

/// Continuity marker between consecutive segments.
///
/// Mapped segments are always emitted discontinuous; tangent and curvature
/// continuity across segments belongs to whoever assembles the alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionCode {
    #[default]
    Discontinuous,
}

impl TransitionCode {
    /// Upper-case name as used in exchange files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Discontinuous => "DISCONTINUOUS",
        }
    }
}

/// Where a mapped segment starts.
///
/// Horizontal segments are placed in plan coordinates and vertical
/// segments in the distance-along/height plane. Cant segments carry a
/// spatial frame whose axis is rolled by the cant angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentPlacement {
    Planar(Placement2D),
    Spatial(Placement3D),
}

/// A trimmed, placed piece of an analytic parent curve.
///
/// The segment consumes its parent from `segment_start` for
/// `segment_length`; a negative length walks the parent backwards. The
/// parent's point and tangent at `segment_start` coincide with the
/// placement.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedSegment {
    placement: SegmentPlacement,
    parent_curve: ParentCurve,
    segment_start: f64,
    segment_length: f64,
    transition: TransitionCode,
}

impl MappedSegment {
    /// Creates a discontinuous segment in the plane.
    #[must_use]
    pub fn planar(
        placement: Placement2D,
        parent_curve: ParentCurve,
        segment_start: f64,
        segment_length: f64,
    ) -> Self {
        Self {
            placement: SegmentPlacement::Planar(placement),
            parent_curve,
            segment_start,
            segment_length,
            transition: TransitionCode::Discontinuous,
        }
    }

    /// Creates a discontinuous segment with a spatial placement.
    #[must_use]
    pub fn spatial(
        placement: Placement3D,
        parent_curve: ParentCurve,
        segment_start: f64,
        segment_length: f64,
    ) -> Self {
        Self {
            placement: SegmentPlacement::Spatial(placement),
            parent_curve,
            segment_start,
            segment_length,
            transition: TransitionCode::Discontinuous,
        }
    }

    #[must_use]
    pub fn placement(&self) -> &SegmentPlacement {
        &self.placement
    }

    /// Returns the planar placement, `None` for cant segments.
    #[must_use]
    pub fn planar_placement(&self) -> Option<&Placement2D> {
        match &self.placement {
            SegmentPlacement::Planar(p) => Some(p),
            SegmentPlacement::Spatial(_) => None,
        }
    }

    /// Returns the spatial placement, `None` for planar segments.
    #[must_use]
    pub fn spatial_placement(&self) -> Option<&Placement3D> {
        match &self.placement {
            SegmentPlacement::Spatial(p) => Some(p),
            SegmentPlacement::Planar(_) => None,
        }
    }

    #[must_use]
    pub fn parent_curve(&self) -> &ParentCurve {
        &self.parent_curve
    }

    #[must_use]
    pub fn segment_start(&self) -> f64 {
        self.segment_start
    }

    #[must_use]
    pub fn segment_length(&self) -> f64 {
        self.segment_length
    }

    #[must_use]
    pub fn transition(&self) -> TransitionCode {
        self.transition
    }

    /// Parent parameter reached `distance` along the segment.
    fn parameter_at(&self, distance: f64) -> Result<f64> {
        let signed = distance.copysign(self.segment_length);
        match self.parent_curve.geometry() {
            CurveGeometry::Polynomial(curve) => {
                curve.parameter_at_length(self.segment_start, signed)
            }
            _ => Ok(self.segment_start + signed),
        }
    }

    /// Point and direction of travel `distance` along the segment, in the
    /// coordinates of the placement's parent.
    ///
    /// Only the stretch of the parent between `segment_start` and the
    /// requested point is integrated.
    ///
    /// # Errors
    ///
    /// Returns an error for cant segments, which carry no planar trace, or
    /// if the parent curve cannot be evaluated.
    pub fn pose_at(&self, distance: f64) -> Result<Placement2D> {
        let placement = self.planar_placement().ok_or_else(|| {
            GeometryError::Degenerate("cant segments have no planar trace".into())
        })?;
        let t = self.parameter_at(distance)?;
        let mut relative = self.parent_curve.relative_pose(self.segment_start, t)?;
        if self.segment_length < 0.0 {
            let turn = Placement2D::from_angle(Point2::origin(), PI);
            relative = turn.compose(&relative).compose(&turn);
        }
        Ok(placement.compose(&relative))
    }

    /// Point `distance` along the segment.
    ///
    /// # Errors
    ///
    /// See [`MappedSegment::pose_at`].
    pub fn point_at(&self, distance: f64) -> Result<Point2> {
        Ok(self.pose_at(distance)?.location())
    }

    /// Unit direction of travel `distance` along the segment.
    ///
    /// # Errors
    ///
    /// See [`MappedSegment::pose_at`].
    pub fn tangent_at(&self, distance: f64) -> Result<Vector2> {
        Ok(self.pose_at(distance)?.ref_direction())
    }

    /// Pose at the end of the segment.
    ///
    /// # Errors
    ///
    /// See [`MappedSegment::pose_at`].
    pub fn end_state(&self) -> Result<Placement2D> {
        self.pose_at(self.segment_length.abs())
    }

    /// Signed curvature `distance` along the segment, positive turning
    /// left with respect to the direction of travel.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent parameter cannot be resolved.
    pub fn curvature_at(&self, distance: f64) -> Result<f64> {
        let k = self.parent_curve.curvature(self.parameter_at(distance)?);
        Ok(if self.segment_length < 0.0 { -k } else { k })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Line};
    use crate::math::Point3;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn line_segment_follows_placement() {
        let placement = Placement2D::from_angle(Point2::new(10.0, 5.0), FRAC_PI_2);
        let segment = MappedSegment::planar(placement, ParentCurve::new(Line::x_axis()), 0.0, 20.0);
        let end = segment.end_state().unwrap();
        assert_abs_diff_eq!(end.location().x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(end.location().y, 25.0, epsilon = 1e-12);
        assert_eq!(segment.transition().name(), "DISCONTINUOUS");
    }

    #[test]
    fn negative_length_walks_clockwise() {
        let circle = ParentCurve::new(Circle::new(100.0).unwrap());
        let segment = MappedSegment::planar(
            Placement2D::identity(),
            circle,
            0.0,
            -100.0 * FRAC_PI_2,
        );
        let end = segment.end_state().unwrap();
        // A quarter turn to the right from the origin heading +x.
        assert_abs_diff_eq!(end.location().x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(end.location().y, -100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(end.angle(), -FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(segment.curvature_at(1.0).unwrap(), -0.01, epsilon = 1e-15);
    }

    #[test]
    fn segment_start_is_carried_onto_placement() {
        let circle = ParentCurve::new(Circle::new(50.0).unwrap());
        let segment = MappedSegment::planar(Placement2D::identity(), circle, 123.0, 10.0);
        let start = segment.pose_at(0.0).unwrap();
        assert_abs_diff_eq!(start.location().coords.norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(start.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn spatial_segments_have_no_planar_trace() {
        let placement =
            Placement3D::rolled(Point3::origin(), crate::math::Vector3::x(), 0.0).unwrap();
        let segment = MappedSegment::spatial(placement, ParentCurve::new(Line::x_axis()), 0.0, 1.0);
        assert!(segment.pose_at(0.5).is_err());
        assert!(segment.planar_placement().is_none());
        assert!(segment.spatial_placement().is_some());
    }
}
