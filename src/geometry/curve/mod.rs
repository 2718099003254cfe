mod circle;
mod clothoid;
mod line;
mod polynomial;
mod spiral;
mod trigonometric;

pub use circle::Circle;
pub use clothoid::Clothoid;
pub use line::Line;
pub use polynomial::PolynomialCurve;
pub use spiral::{PolynomialSpiral, SpiralOrder};
pub use trigonometric::{CosineSpiral, SineSpiral};

use crate::error::Result;
use crate::math::{quadrature, Point2, Vector2};

use super::Placement2D;

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }
}

/// Trait for parametric curves in their own 2D coordinate system.
pub trait PlanarCurve {
    /// Evaluates the curve at parameter `t`.
    fn evaluate(&self, t: f64) -> Point2;

    /// Computes the unit tangent at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector2>;

    /// Signed curvature at parameter `t`, positive turning left.
    fn curvature(&self, t: f64) -> f64;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Point and tangent at parameter `to`, expressed in the frame of the
    /// point and tangent at `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if either tangent is degenerate.
    fn relative_pose(&self, from: f64, to: f64) -> Result<Placement2D> {
        let start = Placement2D::new(self.evaluate(from), self.tangent(from)?)?;
        let end = Placement2D::new(self.evaluate(to), self.tangent(to)?)?;
        Ok(start.inverse().compose(&end))
    }
}

/// Relative pose of a curve known by its heading, integrated over
/// `[from, to]` only so that a start far from the origin costs no accuracy.
fn heading_relative_pose<F>(heading: F, from: f64, to: f64) -> Placement2D
where
    F: Fn(f64) -> f64,
{
    let h0 = heading(from);
    let chord = quadrature::integrate_heading(
        |s| heading(s) - h0,
        from,
        to,
        quadrature::panel_count(to - from),
    );
    Placement2D::from_angle(Point2::from(chord), heading(to) - h0)
}

/// Discriminant of [`CurveGeometry`], with the spiral order spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    Line,
    Circle,
    Clothoid,
    PolynomialCurve,
    SecondOrderPolynomialSpiral,
    ThirdOrderPolynomialSpiral,
    SeventhOrderPolynomialSpiral,
    SineSpiral,
    CosineSpiral,
}

/// The analytic shape of a parent curve.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveGeometry {
    Line(Line),
    Circle(Circle),
    Clothoid(Clothoid),
    Polynomial(PolynomialCurve),
    PolynomialSpiral(PolynomialSpiral),
    SineSpiral(SineSpiral),
    CosineSpiral(CosineSpiral),
}

impl CurveGeometry {
    /// Returns the kind of this geometry.
    #[must_use]
    pub fn kind(&self) -> CurveKind {
        match self {
            Self::Line(_) => CurveKind::Line,
            Self::Circle(_) => CurveKind::Circle,
            Self::Clothoid(_) => CurveKind::Clothoid,
            Self::Polynomial(_) => CurveKind::PolynomialCurve,
            Self::PolynomialSpiral(s) => match s.order() {
                SpiralOrder::Second => CurveKind::SecondOrderPolynomialSpiral,
                SpiralOrder::Third => CurveKind::ThirdOrderPolynomialSpiral,
                SpiralOrder::Seventh => CurveKind::SeventhOrderPolynomialSpiral,
            },
            Self::SineSpiral(_) => CurveKind::SineSpiral,
            Self::CosineSpiral(_) => CurveKind::CosineSpiral,
        }
    }

    fn as_planar(&self) -> &dyn PlanarCurve {
        match self {
            Self::Line(c) => c,
            Self::Circle(c) => c,
            Self::Clothoid(c) => c,
            Self::Polynomial(c) => c,
            Self::PolynomialSpiral(c) => c,
            Self::SineSpiral(c) => c,
            Self::CosineSpiral(c) => c,
        }
    }
}

impl PlanarCurve for CurveGeometry {
    fn evaluate(&self, t: f64) -> Point2 {
        self.as_planar().evaluate(t)
    }

    fn tangent(&self, t: f64) -> Result<Vector2> {
        self.as_planar().tangent(t)
    }

    fn curvature(&self, t: f64) -> f64 {
        self.as_planar().curvature(t)
    }

    fn domain(&self) -> CurveDomain {
        self.as_planar().domain()
    }

    fn relative_pose(&self, from: f64, to: f64) -> Result<Placement2D> {
        self.as_planar().relative_pose(from, to)
    }
}

macro_rules! impl_from_geometry {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for CurveGeometry {
                fn from(curve: $ty) -> Self {
                    Self::$variant(curve)
                }
            }
        )*
    };
}

impl_from_geometry!(
    Line(Line),
    Circle(Circle),
    Clothoid(Clothoid),
    Polynomial(PolynomialCurve),
    PolynomialSpiral(PolynomialSpiral),
    SineSpiral(SineSpiral),
    CosineSpiral(CosineSpiral),
);

/// A positioned analytic curve, the geometry a mapped segment trims.
///
/// `position` places the curve's own coordinate system inside the segment's
/// coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentCurve {
    position: Placement2D,
    geometry: CurveGeometry,
}

impl ParentCurve {
    /// Creates a parent curve at the identity position.
    #[must_use]
    pub fn new(geometry: impl Into<CurveGeometry>) -> Self {
        Self {
            position: Placement2D::identity(),
            geometry: geometry.into(),
        }
    }

    /// Replaces the position of the curve.
    #[must_use]
    pub fn with_position(mut self, position: Placement2D) -> Self {
        self.position = position;
        self
    }

    /// Returns the position of the curve.
    #[must_use]
    pub fn position(&self) -> &Placement2D {
        &self.position
    }

    /// Returns the analytic shape.
    #[must_use]
    pub fn geometry(&self) -> &CurveGeometry {
        &self.geometry
    }

    /// Returns the kind of the analytic shape.
    #[must_use]
    pub fn kind(&self) -> CurveKind {
        self.geometry.kind()
    }

    /// Point and tangent at parameter `t`, as a frame in the positioned
    /// coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    pub fn pose_at(&self, t: f64) -> Result<Placement2D> {
        Placement2D::new(self.evaluate(t), self.tangent(t)?)
    }

    #[must_use]
    pub fn as_line(&self) -> Option<&Line> {
        match &self.geometry {
            CurveGeometry::Line(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_circle(&self) -> Option<&Circle> {
        match &self.geometry {
            CurveGeometry::Circle(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_clothoid(&self) -> Option<&Clothoid> {
        match &self.geometry {
            CurveGeometry::Clothoid(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_polynomial(&self) -> Option<&PolynomialCurve> {
        match &self.geometry {
            CurveGeometry::Polynomial(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_polynomial_spiral(&self) -> Option<&PolynomialSpiral> {
        match &self.geometry {
            CurveGeometry::PolynomialSpiral(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sine_spiral(&self) -> Option<&SineSpiral> {
        match &self.geometry {
            CurveGeometry::SineSpiral(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_cosine_spiral(&self) -> Option<&CosineSpiral> {
        match &self.geometry {
            CurveGeometry::CosineSpiral(c) => Some(c),
            _ => None,
        }
    }
}

impl PlanarCurve for ParentCurve {
    fn evaluate(&self, t: f64) -> Point2 {
        self.position.transform_point(&self.geometry.evaluate(t))
    }

    fn tangent(&self, t: f64) -> Result<Vector2> {
        Ok(self.position.transform_vector(&self.geometry.tangent(t)?))
    }

    fn curvature(&self, t: f64) -> f64 {
        self.geometry.curvature(t)
    }

    fn domain(&self) -> CurveDomain {
        self.geometry.domain()
    }

    fn relative_pose(&self, from: f64, to: f64) -> Result<Placement2D> {
        self.geometry.relative_pose(from, to)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn position_moves_the_curve() {
        let curve = ParentCurve::new(Line::x_axis())
            .with_position(Placement2D::from_angle(Point2::new(5.0, 5.0), FRAC_PI_2));
        let p = curve.evaluate(2.0);
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 7.0, epsilon = 1e-12);
        let pose = curve.pose_at(2.0).unwrap();
        assert_abs_diff_eq!(pose.angle(), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn kind_spells_out_spiral_order() {
        let spiral = PolynomialSpiral::from_terms(SpiralOrder::Seventh, [None; 8]);
        assert_eq!(
            ParentCurve::new(spiral).kind(),
            CurveKind::SeventhOrderPolynomialSpiral
        );
        assert_eq!(ParentCurve::new(Line::x_axis()).kind(), CurveKind::Line);
    }

    #[test]
    fn accessors_match_variant() {
        let curve = ParentCurve::new(Circle::new(10.0).unwrap());
        assert!(curve.as_circle().is_some());
        assert!(curve.as_line().is_none());
        assert!(curve.as_polynomial_spiral().is_none());
    }
}
