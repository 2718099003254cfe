//! Composition of the second half of a split planar segment.

use tracing::trace;

use crate::alignment::MappedSegment;
use crate::error::{GeometryError, Result};
use crate::geometry::{CurveGeometry, ParentCurve};

/// Builds the segment that continues `first`.
///
/// The new segment is placed at `first`'s terminal pose. Its parent curve
/// is positioned so that, in `first`'s local coordinates, the parent's pose
/// at `segment_start` coincides with that terminal pose. The raw design
/// parameters are never consulted.
///
/// # Errors
///
/// Returns an error if `first` is not planar or either curve cannot be
/// evaluated at the junction.
pub(crate) fn continue_segment(
    first: &MappedSegment,
    geometry: CurveGeometry,
    segment_start: f64,
    segment_length: f64,
) -> Result<MappedSegment> {
    let base = first.planar_placement().ok_or_else(|| {
        GeometryError::Degenerate("only planar segments can be continued".into())
    })?;
    let end = first.end_state()?;
    let end_local = base.inverse().compose(&end);

    let parent = ParentCurve::new(geometry);
    let junction = parent.pose_at(segment_start)?;
    let junction = if segment_length < 0.0 {
        junction.reversed()
    } else {
        junction
    };
    let position = end_local.compose(&junction.inverse());
    trace!(
        x = end.location().x,
        y = end.location().y,
        angle = end.angle(),
        position_angle = position.angle(),
        "composed second half"
    );

    Ok(MappedSegment::planar(
        end,
        parent.with_position(position),
        segment_start,
        segment_length,
    ))
}
