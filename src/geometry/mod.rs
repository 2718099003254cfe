pub mod curve;
pub mod placement;

pub use curve::{
    Circle, Clothoid, CosineSpiral, CurveDomain, CurveGeometry, CurveKind, Line, ParentCurve,
    PlanarCurve, PolynomialCurve, PolynomialSpiral, SineSpiral, SpiralOrder,
};
pub use placement::{Placement2D, Placement3D};
