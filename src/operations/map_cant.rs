use tracing::{debug, trace, warn};

use crate::alignment::{CantCurveType, CantDesignParameters, MappedSegment};
use crate::error::{MappingError, Result};
use crate::geometry::{
    Clothoid, CosineSpiral, CurveGeometry, Line, ParentCurve, Placement3D, PolynomialSpiral,
    SineSpiral, SpiralOrder,
};
use crate::math::curvature::spiral_term;
use crate::math::transition::{
    CosineTransition, CurvaturePolynomial, SineTransition, TransitionShape,
};
use crate::math::{Point3, Vector3};

use super::MappingParams;

/// Cant at one boundary, reduced to the elevation of the track axis and the
/// height difference between the rails.
#[derive(Debug, Clone, Copy)]
struct CantBoundary {
    elevation: f64,
    difference: f64,
}

impl CantBoundary {
    fn new(left: f64, right: f64) -> Self {
        Self {
            elevation: 0.5 * (left + right),
            difference: right - left,
        }
    }
}

/// Elevation shapes of the two halves of a split transition.
struct SplitShapes {
    order: SpiralOrder,
    first: CurvaturePolynomial,
    second: CurvaturePolynomial,
    /// Length the shape function is defined over.
    shape_length: f64,
    /// Rail height difference where the halves meet.
    difference_at_split: f64,
}

/// Maps a cant (superelevation) design segment to placed curves.
///
/// The parent curves trace the axis elevation against the distance along,
/// scaled by the inverse square of the shape length; the placement frame
/// is rolled by the cant angle.
pub struct MapCantSegment<'a> {
    params: &'a CantDesignParameters,
    rail_head_distance: f64,
    mapping: MappingParams,
}

impl<'a> MapCantSegment<'a> {
    /// Creates a new `MapCantSegment` operation.
    ///
    /// * `rail_head_distance` - Distance between the rail heads of the
    ///   cant layout the segment belongs to.
    #[must_use]
    pub fn new(params: &'a CantDesignParameters, rail_head_distance: f64) -> Self {
        Self {
            params,
            rail_head_distance,
            mapping: MappingParams::default(),
        }
    }

    /// Replaces the mapping tolerances.
    #[must_use]
    pub fn with_params(mut self, mapping: MappingParams) -> Self {
        self.mapping = mapping;
        self
    }

    /// Executes the mapping. Helmert curves and Viennese bends yield two
    /// segments of half the length, every other family one.
    ///
    /// # Errors
    ///
    /// Returns an error if the length or rail-head distance is not
    /// positive, a cant value is not finite, or a rail height difference
    /// exceeds the rail-head distance.
    pub fn execute(&self) -> Result<Vec<MappedSegment>> {
        let p = self.params;
        let length = p.horizontal_length;
        self.mapping.check_length(length)?;
        let b = self.rail_head_distance;
        if !(b.is_finite() && b > self.mapping.tolerance) {
            return Err(MappingError::invalid(format!(
                "rail-head distance must be positive, got {b}"
            )));
        }
        let (l0, l1) = (p.start_cant_left, p.end_cant_left());
        let (r0, r1) = (p.start_cant_right, p.end_cant_right());
        if ![l0, l1, r0, r1].iter().all(|v| v.is_finite()) {
            return Err(MappingError::invalid("cant values must be finite"));
        }
        let start = CantBoundary::new(l0, r0);
        let end = CantBoundary::new(l1, r1);
        for boundary in [start, end] {
            if boundary.difference.abs() > b {
                return Err(MappingError::invalid(format!(
                    "rail height difference {} exceeds rail-head distance {b}",
                    boundary.difference
                )));
            }
        }
        debug!(
            family = %p.predefined_type,
            start_dist_along = p.start_dist_along,
            length,
            start_elevation = start.elevation,
            end_elevation = end.elevation,
            "mapping cant segment"
        );

        let (e0, e1) = (start.elevation, end.elevation);
        let (d0, d1) = (start.difference, end.difference);
        match p.predefined_type {
            CantCurveType::HelmertCurve => self.split(
                start,
                SplitShapes {
                    order: SpiralOrder::Second,
                    first: CurvaturePolynomial::helmert_first_half(e0, e1, length)?,
                    second: CurvaturePolynomial::helmert_second_half(e0, e1, length)?,
                    shape_length: 0.5 * length,
                    difference_at_split: CurvaturePolynomial::helmert_first_half(d0, d1, length)?
                        .value(0.5 * length),
                },
                self.mapping.is_flat(e0, e1),
            ),
            CantCurveType::VienneseBend => {
                let shape = CurvaturePolynomial::viennese(e0, e1, length)?;
                self.split(
                    start,
                    SplitShapes {
                        order: SpiralOrder::Seventh,
                        first: shape,
                        second: shape,
                        shape_length: length,
                        difference_at_split: CurvaturePolynomial::viennese(d0, d1, length)?
                            .value(0.5 * length),
                    },
                    self.mapping.is_flat(e0, e1),
                )
            }
            _ => Ok(vec![self.single(start, end)?]),
        }
    }

    fn placement(
        &self,
        dist: f64,
        elevation: f64,
        slope: f64,
        difference: f64,
    ) -> Result<Placement3D> {
        let roll = (difference / self.rail_head_distance).asin();
        Placement3D::rolled(
            Point3::new(dist, elevation, 0.0),
            Vector3::new(1.0, slope, 0.0),
            roll,
        )
    }

    fn single(&self, start: CantBoundary, end: CantBoundary) -> Result<MappedSegment> {
        let p = self.params;
        let length = p.horizontal_length;
        let scale = 1.0 / (length * length);
        let (e0, e1) = (start.elevation, end.elevation);

        let (slope, geometry): (f64, CurveGeometry) = if self.mapping.is_flat(e0, e1) {
            (0.0, Line::x_axis().into())
        } else {
            match p.predefined_type {
                CantCurveType::ConstantCant => {
                    warn!(
                        start_elevation = e0,
                        end_elevation = e1,
                        "constant cant segment with differing end cant, using start cant"
                    );
                    (0.0, Line::x_axis().into())
                }
                CantCurveType::LinearTransition => {
                    let shape = CurvaturePolynomial::linear(e0, e1, length)?;
                    let geometry = match spiral_term(shape.coefficient(1) * scale, 1) {
                        Some(a) => Clothoid::new(a)?.into(),
                        None => Line::x_axis().into(),
                    };
                    (shape.slope(0.0), geometry)
                }
                CantCurveType::BlossCurve => {
                    let shape = CurvaturePolynomial::bloss(e0, e1, length)?;
                    let spiral = PolynomialSpiral::from_polynomial(
                        SpiralOrder::Third,
                        &shape.scaled(scale),
                    )?;
                    (shape.slope(0.0), spiral.into())
                }
                CantCurveType::CosineCurve => {
                    let shape = CosineTransition::new(e0, e1, length)?;
                    let spiral = CosineSpiral::from_transition(&shape.scaled(scale))?;
                    (shape.slope(0.0), spiral.into())
                }
                CantCurveType::SineCurve => {
                    let shape = SineTransition::new(e0, e1, length)?;
                    let spiral = SineSpiral::from_transition(&shape.scaled(scale))?;
                    (shape.slope(0.0), spiral.into())
                }
                CantCurveType::HelmertCurve | CantCurveType::VienneseBend => {
                    return Err(MappingError::invalid(format!(
                        "{} cant segments are split in two",
                        p.predefined_type
                    )))
                }
            }
        };
        trace!(kind = ?geometry.kind(), slope, "cant parent curve");

        let placement = self.placement(p.start_dist_along, e0, slope, start.difference)?;
        Ok(MappedSegment::spatial(
            placement,
            ParentCurve::new(geometry),
            0.0,
            length,
        ))
    }

    fn split(
        &self,
        start: CantBoundary,
        shapes: SplitShapes,
        flat: bool,
    ) -> Result<Vec<MappedSegment>> {
        let p = self.params;
        let half = 0.5 * p.horizontal_length;
        let scale = 1.0 / (shapes.shape_length * shapes.shape_length);
        let geometry = |shape: &CurvaturePolynomial| -> Result<CurveGeometry> {
            if flat {
                Ok(Line::x_axis().into())
            } else {
                Ok(PolynomialSpiral::from_polynomial(shapes.order, &shape.scaled(scale))?.into())
            }
        };

        let first = MappedSegment::spatial(
            self.placement(
                p.start_dist_along,
                start.elevation,
                shapes.first.slope(0.0),
                start.difference,
            )?,
            ParentCurve::new(geometry(&shapes.first)?),
            0.0,
            half,
        );

        // The second half starts where the first one ends.
        let elevation = shapes.first.value(half);
        let slope = shapes.first.slope(half);
        debug!(elevation, slope, "composing second cant half");
        let second = MappedSegment::spatial(
            self.placement(
                p.start_dist_along + half,
                elevation,
                slope,
                shapes.difference_at_split,
            )?,
            ParentCurve::new(geometry(&shapes.second)?),
            half,
            half,
        );
        Ok(vec![first, second])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::CurveKind;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const GAUGE: f64 = 1.5;

    fn map(family: CantCurveType, right: (f64, f64)) -> Vec<MappedSegment> {
        let params = CantDesignParameters::new(family, (0.0, 0.0), right, 100.0);
        MapCantSegment::new(&params, GAUGE).execute().unwrap()
    }

    fn placement(segment: &MappedSegment) -> &Placement3D {
        segment.spatial_placement().unwrap()
    }

    fn spiral(segment: &MappedSegment) -> &PolynomialSpiral {
        segment.parent_curve().as_polynomial_spiral().unwrap()
    }

    #[test]
    fn bloss_cant() {
        let segments = map(CantCurveType::BlossCurve, (0.16, 0.0));
        assert_eq!(segments.len(), 1);
        let segment = &segments[0];
        let location = placement(segment).location();
        assert_abs_diff_eq!(location.y, 0.08, epsilon = 1e-15);
        assert_abs_diff_eq!(placement(segment).ref_direction().x, 1.0);
        assert_relative_eq!(placement(segment).roll(), (0.16 / GAUGE).asin(), max_relative = 1e-12);
        assert_eq!(segment.parent_curve().kind(), CurveKind::ThirdOrderPolynomialSpiral);
        let s = spiral(segment);
        assert_relative_eq!(s.cubic_term().unwrap(), 500.0, max_relative = 1e-9);
        assert_relative_eq!(
            s.quadratic_term().unwrap(),
            -746.900_791_092_862_3,
            max_relative = 1e-9,
        );
        assert!(s.linear_term().is_none());
        assert_relative_eq!(s.constant_term().unwrap(), 125_000.0, max_relative = 1e-9);
        assert_abs_diff_eq!(segment.segment_start(), 0.0);
        assert_relative_eq!(segment.segment_length(), 100.0);
    }

    #[test]
    fn mirrored_rails_share_the_elevation() {
        let params = CantDesignParameters::new(
            CantCurveType::BlossCurve,
            (0.16, 0.0),
            (0.0, 0.0),
            100.0,
        );
        let left = MapCantSegment::new(&params, GAUGE).execute().unwrap();
        let right = map(CantCurveType::BlossCurve, (0.16, 0.0));
        assert_eq!(spiral(&left[0]), spiral(&right[0]));
        assert_relative_eq!(placement(&left[0]).roll(), -placement(&right[0]).roll());
    }

    #[test]
    fn rising_bloss_has_no_constant_term() {
        let segments = map(CantCurveType::BlossCurve, (0.0, 0.16));
        let s = spiral(&segments[0]);
        assert_relative_eq!(s.cubic_term().unwrap(), -500.0, max_relative = 1e-9);
        assert!(s.constant_term().is_none());
    }

    #[test]
    fn constant_cant_is_a_line_at_start_elevation() {
        let segments = map(CantCurveType::ConstantCant, (0.16, 0.0));
        assert_eq!(segments[0].parent_curve().kind(), CurveKind::Line);
        assert_abs_diff_eq!(placement(&segments[0]).location().y, 0.08, epsilon = 1e-15);
    }

    #[test]
    fn linear_transition_is_a_clothoid() {
        let segments = map(CantCurveType::LinearTransition, (0.16, 0.0));
        let clothoid = segments[0].parent_curve().as_clothoid().unwrap();
        assert_relative_eq!(
            clothoid.clothoid_constant(),
            -3_535.533_905_932_74,
            max_relative = 1e-10,
        );
        let d = placement(&segments[0]).ref_direction();
        assert_relative_eq!(d.x, 0.999_999_680_000_154, max_relative = 1e-12);
        assert_relative_eq!(d.y, -0.000_799_999_744_000_123, max_relative = 1e-9);
    }

    #[test]
    fn sine_cant() {
        let segments = map(CantCurveType::SineCurve, (0.16, 0.0));
        let sine = segments[0].parent_curve().as_sine_spiral().unwrap();
        assert_relative_eq!(sine.sine_term(), 785_398.163_397_448, max_relative = 1e-10);
        assert_relative_eq!(
            sine.linear_term().unwrap(),
            -3_535.533_905_932_74,
            max_relative = 1e-10,
        );
        assert_relative_eq!(sine.constant_term().unwrap(), 125_000.0, max_relative = 1e-10);
    }

    #[test]
    fn cosine_cant() {
        let segments = map(CantCurveType::CosineCurve, (0.16, 0.0));
        let cosine = segments[0].parent_curve().as_cosine_spiral().unwrap();
        // (e0 + e1) / 2 = 0.04 and (e0 - e1) / 2 = 0.04, both over L².
        assert_relative_eq!(cosine.constant_term().unwrap(), 250_000.0, max_relative = 1e-10);
        assert_relative_eq!(cosine.cosine_term(), 250_000.0, max_relative = 1e-10);
    }

    #[test]
    fn helmert_cant_splits_at_midpoint() {
        let segments = map(CantCurveType::HelmertCurve, (0.16, 0.0));
        assert_eq!(segments.len(), 2);

        let first = &segments[0];
        assert_abs_diff_eq!(placement(first).location().y, 0.08, epsilon = 1e-15);
        assert_relative_eq!(first.segment_length(), 50.0);
        let s = spiral(first);
        assert_eq!(s.order(), SpiralOrder::Second);
        assert_relative_eq!(
            s.quadratic_term().unwrap(),
            -538.608_672_507_969_6,
            max_relative = 1e-10,
        );
        assert!(s.linear_term().is_none());
        assert_relative_eq!(s.constant_term().unwrap(), 31_250.0, max_relative = 1e-10);

        let second = &segments[1];
        let location = placement(second).location();
        assert_relative_eq!(location.x, 50.0);
        assert_relative_eq!(location.y, 0.04, max_relative = 1e-12);
        let d = placement(second).ref_direction();
        assert_relative_eq!(d.x, 0.999_998_720_000_819, max_relative = 1e-12);
        assert_relative_eq!(d.y, -0.001_599_998_976_000_66, max_relative = 1e-9);
        assert_relative_eq!(placement(second).roll(), (0.08 / GAUGE).asin(), max_relative = 1e-12);
        assert_relative_eq!(second.segment_start(), 50.0);
        assert_relative_eq!(second.segment_length(), 50.0);
        let s = spiral(second);
        assert_relative_eq!(
            s.quadratic_term().unwrap(),
            538.608_672_507_969_6,
            max_relative = 1e-10,
        );
        assert_relative_eq!(s.linear_term().unwrap(), -883.883_476_483_184_5, max_relative = 1e-10);
        assert_relative_eq!(s.constant_term().unwrap(), 15_625.0, max_relative = 1e-10);
    }

    #[test]
    fn viennese_cant_halves_share_the_polynomial() {
        let segments = map(CantCurveType::VienneseBend, (0.1, 0.03));
        assert_eq!(segments.len(), 2);
        let s = spiral(&segments[0]);
        assert_eq!(s.order(), SpiralOrder::Seventh);
        assert_relative_eq!(s.septic_term().unwrap(), 185.935_683_676_356_72, max_relative = 1e-10);
        assert_relative_eq!(
            s.sextic_term().unwrap(),
            -169.870_955_956_538_95,
            max_relative = 1e-10,
        );
        assert_relative_eq!(s.quintic_term().unwrap(), 180.001_218_460_867_8, max_relative = 1e-10);
        assert_relative_eq!(
            s.quartic_term().unwrap(),
            -241.197_489_008_512_3,
            max_relative = 1e-10,
        );
        assert!(s.cubic_term().is_none());
        assert_relative_eq!(s.constant_term().unwrap(), 200_000.0, max_relative = 1e-10);
        assert_eq!(spiral(&segments[1]), s);
        assert_relative_eq!(segments[1].segment_start(), 50.0);
        // The bend is symmetric about its midpoint.
        assert_relative_eq!(placement(&segments[1]).location().y, 0.0325, max_relative = 1e-12);
    }

    #[test]
    fn flat_split_families_keep_two_lines() {
        let segments = map(CantCurveType::HelmertCurve, (0.1, 0.1));
        assert_eq!(segments.len(), 2);
        for segment in &segments {
            assert_eq!(segment.parent_curve().kind(), CurveKind::Line);
        }
    }

    #[test]
    fn negated_cant_negates_terms() {
        for family in [
            CantCurveType::BlossCurve,
            CantCurveType::HelmertCurve,
            CantCurveType::VienneseBend,
        ] {
            let up = map(family, (0.12, 0.02));
            let down = map(family, (-0.12, -0.02));
            for (u, d) in up.iter().zip(&down) {
                for power in 0..8 {
                    let (a, b) = (spiral(u).term(power), spiral(d).term(power));
                    assert_eq!(a.is_some(), b.is_some());
                    if let (Some(a), Some(b)) = (a, b) {
                        assert_relative_eq!(a, -b, max_relative = 1e-12);
                    }
                }
                assert_relative_eq!(placement(u).roll(), -placement(d).roll());
                assert_relative_eq!(u.segment_length(), d.segment_length());
            }
        }
    }

    #[test]
    fn transitions_mirror_and_negate() {
        for family in [
            CantCurveType::LinearTransition,
            CantCurveType::SineCurve,
            CantCurveType::CosineCurve,
        ] {
            let up = &map(family, (0.12, 0.02))[0];
            let down = &map(family, (-0.12, -0.02))[0];
            let params = CantDesignParameters::new(family, (0.12, 0.02), (0.0, 0.0), 100.0);
            let mirrored = &MapCantSegment::new(&params, GAUGE).execute().unwrap()[0];

            assert_eq!(up.parent_curve(), mirrored.parent_curve());
            assert_eq!(placement(up).location(), placement(mirrored).location());
            assert_relative_eq!(placement(up).roll(), -placement(mirrored).roll());

            assert_eq!(up.parent_curve().kind(), down.parent_curve().kind());
            assert_relative_eq!(placement(up).location().y, -placement(down).location().y);
            assert_relative_eq!(
                placement(up).ref_direction().y,
                -placement(down).ref_direction().y,
                max_relative = 1e-12
            );
            assert_relative_eq!(placement(up).roll(), -placement(down).roll());
            for s in [0.0, 25.0, 50.0, 100.0] {
                assert_relative_eq!(
                    up.curvature_at(s).unwrap(),
                    -down.curvature_at(s).unwrap(),
                    epsilon = 1e-15,
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let params =
            CantDesignParameters::new(CantCurveType::ConstantCant, (0.0, 0.0), (0.1, 0.1), 50.0);
        assert!(MapCantSegment::new(&params, 0.0).execute().is_err());
        assert!(MapCantSegment::new(&params, 0.05).execute().is_err());
        let params =
            CantDesignParameters::new(CantCurveType::ConstantCant, (0.0, 0.0), (0.1, 0.1), -5.0);
        assert!(MapCantSegment::new(&params, GAUGE).execute().is_err());
    }
}
