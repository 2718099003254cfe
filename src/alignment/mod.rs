pub mod context;
pub mod design;
pub mod mapped;
mod store;

pub use context::{CantLayoutContext, HorizontalContext};
pub use design::{
    CantCurveType, CantDesignParameters, DesignParameters, HorizontalCurveType,
    HorizontalDesignParameters, VerticalCurveType, VerticalDesignParameters,
};
pub use mapped::{MappedSegment, SegmentPlacement, TransitionCode};
pub use store::{Alignment, AlignmentSegment, CantLayout, SegmentId};
