//! Declarative design descriptions of alignment segments.
//!
//! Signed values follow one convention throughout: positive radii turn
//! left, positive gradients rise, and a zero radius means an infinite
//! radius (a straight line).

use std::fmt;

use crate::math::Point2;

/// Curve families of the horizontal (plan) layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalCurveType {
    Line,
    CircularArc,
    Clothoid,
    Cubic,
    BlossCurve,
    CosineCurve,
    SineCurve,
    HelmertCurve,
    VienneseBend,
}

impl HorizontalCurveType {
    /// Upper-case family name as used in exchange files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Line => "LINE",
            Self::CircularArc => "CIRCULARARC",
            Self::Clothoid => "CLOTHOID",
            Self::Cubic => "CUBIC",
            Self::BlossCurve => "BLOSSCURVE",
            Self::CosineCurve => "COSINECURVE",
            Self::SineCurve => "SINECURVE",
            Self::HelmertCurve => "HELMERTCURVE",
            Self::VienneseBend => "VIENNESEBEND",
        }
    }
}

/// Curve families of the vertical (profile) layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalCurveType {
    ConstantGradient,
    CircularArc,
    ParabolicArc,
    Clothoid,
}

impl VerticalCurveType {
    /// Upper-case family name as used in exchange files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ConstantGradient => "CONSTANTGRADIENT",
            Self::CircularArc => "CIRCULARARC",
            Self::ParabolicArc => "PARABOLICARC",
            Self::Clothoid => "CLOTHOID",
        }
    }
}

/// Curve families of the cant (superelevation) layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CantCurveType {
    ConstantCant,
    LinearTransition,
    BlossCurve,
    CosineCurve,
    SineCurve,
    HelmertCurve,
    VienneseBend,
}

impl CantCurveType {
    /// Upper-case family name as used in exchange files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ConstantCant => "CONSTANTCANT",
            Self::LinearTransition => "LINEARTRANSITION",
            Self::BlossCurve => "BLOSSCURVE",
            Self::CosineCurve => "COSINECURVE",
            Self::SineCurve => "SINECURVE",
            Self::HelmertCurve => "HELMERTCURVE",
            Self::VienneseBend => "VIENNESEBEND",
        }
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.name())
                }
            }
        )*
    };
}

display_by_name!(HorizontalCurveType, VerticalCurveType, CantCurveType);

/// A segment of the horizontal layout.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalDesignParameters {
    /// Start point in plan coordinates.
    pub start_point: Point2,
    /// Start direction in radians, counter-clockwise from +x.
    pub start_direction: f64,
    /// Signed radius at the start, zero for a straight start.
    pub start_radius_of_curvature: f64,
    /// Signed radius at the end, zero for a straight end.
    pub end_radius_of_curvature: f64,
    /// Length along the curve.
    pub segment_length: f64,
    /// Height of the vehicle's centre of gravity above the rail heads.
    pub gravity_center_line_height: Option<f64>,
    pub predefined_type: HorizontalCurveType,
}

impl HorizontalDesignParameters {
    /// Creates parameters starting at the origin along +x.
    #[must_use]
    pub fn new(
        predefined_type: HorizontalCurveType,
        start_radius_of_curvature: f64,
        end_radius_of_curvature: f64,
        segment_length: f64,
    ) -> Self {
        Self {
            start_point: Point2::origin(),
            start_direction: 0.0,
            start_radius_of_curvature,
            end_radius_of_curvature,
            segment_length,
            gravity_center_line_height: None,
            predefined_type,
        }
    }

    /// Moves the start to `point`, heading `direction` radians.
    #[must_use]
    pub fn starting_at(mut self, point: Point2, direction: f64) -> Self {
        self.start_point = point;
        self.start_direction = direction;
        self
    }

    /// Sets the gravity-centre-line height.
    #[must_use]
    pub fn with_gravity_center_line_height(mut self, height: f64) -> Self {
        self.gravity_center_line_height = Some(height);
        self
    }
}

/// A segment of the vertical layout, in the distance-along/height plane.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalDesignParameters {
    /// Distance along the horizontal alignment where the segment starts.
    pub start_dist_along: f64,
    /// Length projected on the horizontal alignment.
    pub horizontal_length: f64,
    pub start_height: f64,
    /// Rise over run at the start.
    pub start_gradient: f64,
    /// Rise over run at the end.
    pub end_gradient: f64,
    pub predefined_type: VerticalCurveType,
}

impl VerticalDesignParameters {
    /// Creates parameters starting at distance zero.
    #[must_use]
    pub fn new(
        predefined_type: VerticalCurveType,
        start_height: f64,
        start_gradient: f64,
        end_gradient: f64,
        horizontal_length: f64,
    ) -> Self {
        Self {
            start_dist_along: 0.0,
            horizontal_length,
            start_height,
            start_gradient,
            end_gradient,
            predefined_type,
        }
    }

    /// Sets the start distance along the alignment.
    #[must_use]
    pub fn at_distance(mut self, start_dist_along: f64) -> Self {
        self.start_dist_along = start_dist_along;
        self
    }
}

/// A segment of the cant layout.
///
/// Cant is given per rail as the height of that rail above the
/// reference; end values default to the start values.
#[derive(Debug, Clone, PartialEq)]
pub struct CantDesignParameters {
    pub start_dist_along: f64,
    pub horizontal_length: f64,
    pub start_cant_left: f64,
    pub end_cant_left: Option<f64>,
    pub start_cant_right: f64,
    pub end_cant_right: Option<f64>,
    pub predefined_type: CantCurveType,
}

impl CantDesignParameters {
    /// Creates parameters starting at distance zero.
    #[must_use]
    pub fn new(
        predefined_type: CantCurveType,
        (start_cant_left, end_cant_left): (f64, f64),
        (start_cant_right, end_cant_right): (f64, f64),
        horizontal_length: f64,
    ) -> Self {
        Self {
            start_dist_along: 0.0,
            horizontal_length,
            start_cant_left,
            end_cant_left: Some(end_cant_left),
            start_cant_right,
            end_cant_right: Some(end_cant_right),
            predefined_type,
        }
    }

    /// Sets the start distance along the alignment.
    #[must_use]
    pub fn at_distance(mut self, start_dist_along: f64) -> Self {
        self.start_dist_along = start_dist_along;
        self
    }

    /// End cant of the left rail.
    #[must_use]
    pub fn end_cant_left(&self) -> f64 {
        self.end_cant_left.unwrap_or(self.start_cant_left)
    }

    /// End cant of the right rail.
    #[must_use]
    pub fn end_cant_right(&self) -> f64 {
        self.end_cant_right.unwrap_or(self.start_cant_right)
    }

    /// Distance along where the segment ends.
    #[must_use]
    pub fn end_dist_along(&self) -> f64 {
        self.start_dist_along + self.horizontal_length
    }
}

/// Design parameters of one segment, tagged by layout domain.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignParameters {
    Horizontal(HorizontalDesignParameters),
    Vertical(VerticalDesignParameters),
    Cant(CantDesignParameters),
}

impl DesignParameters {
    /// Name of the layout domain.
    #[must_use]
    pub fn domain(&self) -> &'static str {
        match self {
            Self::Horizontal(_) => "horizontal",
            Self::Vertical(_) => "vertical",
            Self::Cant(_) => "cant",
        }
    }

    /// Family name of the segment.
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            Self::Horizontal(p) => p.predefined_type.name(),
            Self::Vertical(p) => p.predefined_type.name(),
            Self::Cant(p) => p.predefined_type.name(),
        }
    }
}

impl From<HorizontalDesignParameters> for DesignParameters {
    fn from(params: HorizontalDesignParameters) -> Self {
        Self::Horizontal(params)
    }
}

impl From<VerticalDesignParameters> for DesignParameters {
    fn from(params: VerticalDesignParameters) -> Self {
        Self::Vertical(params)
    }
}

impl From<CantDesignParameters> for DesignParameters {
    fn from(params: CantDesignParameters) -> Self {
        Self::Cant(params)
    }
}
