use std::f64::consts::PI;

use crate::error::{GeometryError, Result};
use crate::math::{Isometry2, Point2, Point3, Vector2, Vector3, TOLERANCE};

/// A 2D coordinate frame: an origin and a unit reference direction.
///
/// The frame's y axis is the reference direction rotated a quarter turn
/// counter-clockwise. Composition follows the usual convention:
/// `a.compose(&b)` maps coordinates expressed in `b` first, then in `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement2D {
    isometry: Isometry2,
}

impl Placement2D {
    /// Creates a placement from a location and a (not necessarily unit)
    /// reference direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference direction is zero-length.
    pub fn new(location: Point2, ref_direction: Vector2) -> Result<Self> {
        if ref_direction.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self::from_angle(location, ref_direction.y.atan2(ref_direction.x)))
    }

    /// Creates a placement whose reference direction is rotated `angle`
    /// radians counter-clockwise from +x.
    #[must_use]
    pub fn from_angle(location: Point2, angle: f64) -> Self {
        Self {
            isometry: Isometry2::new(location.coords, angle),
        }
    }

    /// The placement at the origin looking along +x.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            isometry: Isometry2::identity(),
        }
    }

    /// Returns the origin of the frame.
    #[must_use]
    pub fn location(&self) -> Point2 {
        Point2::from(self.isometry.translation.vector)
    }

    /// Returns the unit reference direction (local +x).
    #[must_use]
    pub fn ref_direction(&self) -> Vector2 {
        self.isometry.rotation * Vector2::x()
    }

    /// Returns the angle of the reference direction in `(-π, π]`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.isometry.rotation.angle()
    }

    /// Expresses a frame given in this frame's coordinates in the parent
    /// coordinates of this frame.
    #[must_use]
    pub fn compose(&self, local: &Placement2D) -> Placement2D {
        Self {
            isometry: self.isometry * local.isometry,
        }
    }

    /// Returns the inverse frame.
    #[must_use]
    pub fn inverse(&self) -> Placement2D {
        Self {
            isometry: self.isometry.inverse(),
        }
    }

    /// Returns the same origin looking the opposite way.
    #[must_use]
    pub fn reversed(&self) -> Placement2D {
        Self::from_angle(self.location(), self.angle() + PI)
    }

    /// Maps a point from local to parent coordinates.
    #[must_use]
    pub fn transform_point(&self, point: &Point2) -> Point2 {
        self.isometry.transform_point(point)
    }

    /// Maps a direction from local to parent coordinates.
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector2) -> Vector2 {
        self.isometry.transform_vector(vector)
    }
}

impl Default for Placement2D {
    fn default() -> Self {
        Self::identity()
    }
}

/// A 3D coordinate frame: location, axis (local z) and reference
/// direction (local x).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement3D {
    location: Point3,
    axis: Vector3,
    ref_direction: Vector3,
}

impl Placement3D {
    /// Creates a placement. Both directions are normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if either direction is zero-length or the two are
    /// not perpendicular.
    pub fn new(location: Point3, axis: Vector3, ref_direction: Vector3) -> Result<Self> {
        let axis_len = axis.norm();
        let ref_len = ref_direction.norm();
        if axis_len < TOLERANCE || ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let axis = axis / axis_len;
        let ref_direction = ref_direction / ref_len;
        if axis.dot(&ref_direction).abs() > 1e-9 {
            return Err(GeometryError::Degenerate(
                "placement axis must be perpendicular to its reference direction".into(),
            )
            .into());
        }
        Ok(Self {
            location,
            axis,
            ref_direction,
        })
    }

    /// Creates a placement whose axis is `+z` rolled about `ref_direction`
    /// by `roll` radians (right-hand rule). `ref_direction` must lie in the
    /// xy plane.
    ///
    /// # Errors
    ///
    /// Returns an error if `ref_direction` is zero-length or has a z
    /// component.
    pub fn rolled(location: Point3, ref_direction: Vector3, roll: f64) -> Result<Self> {
        let len = ref_direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let d = ref_direction / len;
        if d.z.abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "rolled frame direction must lie in the xy plane".into(),
            )
            .into());
        }
        // z rotated about d: z cos + (d × z) sin, d ⟂ z.
        let axis = Vector3::z() * roll.cos() + d.cross(&Vector3::z()) * roll.sin();
        Self::new(location, axis, d)
    }

    /// Returns the origin of the frame.
    #[must_use]
    pub fn location(&self) -> &Point3 {
        &self.location
    }

    /// Returns the unit axis (local z).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns the unit reference direction (local x).
    #[must_use]
    pub fn ref_direction(&self) -> &Vector3 {
        &self.ref_direction
    }

    /// Returns the roll of the axis away from `+z` about the reference
    /// direction, in radians.
    #[must_use]
    pub fn roll(&self) -> f64 {
        let side = self.ref_direction.cross(&Vector3::z());
        self.axis.dot(&side).atan2(self.axis.z)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::AlignmapError;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn new_normalizes_direction() {
        let p = Placement2D::new(Point2::new(1.0, 2.0), Vector2::new(3.0, 4.0)).unwrap();
        assert_relative_eq!(p.ref_direction().x, 0.6, max_relative = 1e-12);
        assert_relative_eq!(p.ref_direction().y, 0.8, max_relative = 1e-12);
        assert_relative_eq!(p.location().x, 1.0);
    }

    #[test]
    fn zero_direction_rejected() {
        assert!(Placement2D::new(Point2::origin(), Vector2::zeros()).is_err());
    }

    #[test]
    fn compose_translates_then_rotates() {
        let base = Placement2D::from_angle(Point2::new(10.0, 0.0), FRAC_PI_2);
        let local = Placement2D::from_angle(Point2::new(1.0, 0.0), 0.0);
        let global = base.compose(&local);
        assert_abs_diff_eq!(global.location().x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(global.location().y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(global.angle(), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn inverse_cancels() {
        let p = Placement2D::from_angle(Point2::new(3.0, -4.0), 0.7);
        let id = p.compose(&p.inverse());
        assert_abs_diff_eq!(id.location().coords.norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(id.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn reversed_flips_direction() {
        let p = Placement2D::from_angle(Point2::new(1.0, 1.0), 0.3).reversed();
        assert_relative_eq!(p.ref_direction().x, -(0.3_f64.cos()), max_relative = 1e-12);
        assert_relative_eq!(p.ref_direction().y, -(0.3_f64.sin()), max_relative = 1e-12);
    }

    #[test]
    fn rolled_axis_is_perpendicular() {
        let p = Placement3D::rolled(Point3::origin(), Vector3::new(1.0, 0.01, 0.0), 0.05).unwrap();
        assert_abs_diff_eq!(p.axis().dot(p.ref_direction()), 0.0, epsilon = 1e-15);
        assert_relative_eq!(p.roll(), 0.05, max_relative = 1e-12);
    }

    #[test]
    fn zero_roll_keeps_z_axis() {
        let p = Placement3D::rolled(Point3::origin(), Vector3::x(), 0.0).unwrap();
        assert_relative_eq!(*p.axis(), Vector3::z());
    }

    #[test]
    fn non_perpendicular_axis_rejected() {
        assert!(Placement3D::new(Point3::origin(), Vector3::x(), Vector3::x()).is_err());
    }

    #[test]
    fn rolled_direction_out_of_plane_rejected() {
        let err = Placement3D::rolled(Point3::origin(), Vector3::new(1.0, 0.0, 0.5), 0.1);
        assert!(matches!(
            err,
            Err(AlignmapError::Geometry(GeometryError::Degenerate(_)))
        ));
    }
}
