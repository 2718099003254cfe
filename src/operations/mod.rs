mod map_alignment;
mod map_cant;
mod map_horizontal;
mod map_vertical;
mod split;

pub use map_alignment::{MapAlignment, MappedAlignment};
pub use map_cant::MapCantSegment;
pub use map_horizontal::MapHorizontalSegment;
pub use map_vertical::MapVerticalSegment;

use crate::error::{MappingError, Result};
use crate::math::TOLERANCE;

/// Parameters controlling segment mapping.
#[derive(Debug, Clone, Copy)]
pub struct MappingParams {
    /// Boundary values closer than this are treated as equal, and
    /// curvature-like values smaller than this as zero.
    pub tolerance: f64,
    /// Segments shorter than this are rejected.
    pub min_segment_length: f64,
}

impl Default for MappingParams {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
            min_segment_length: TOLERANCE,
        }
    }
}

impl MappingParams {
    /// Rejects lengths that cannot carry a segment.
    pub(crate) fn check_length(&self, length: f64) -> Result<()> {
        if length.is_finite() && length >= self.min_segment_length {
            Ok(())
        } else {
            Err(MappingError::invalid(format!(
                "segment length must be positive, got {length}"
            )))
        }
    }

    /// Whether two boundary values describe no change.
    pub(crate) fn is_flat(&self, start: f64, end: f64) -> bool {
        (end - start).abs() < self.tolerance
    }

    /// Whether a curvature-like value is zero.
    pub(crate) fn is_zero(&self, value: f64) -> bool {
        value.abs() < self.tolerance
    }
}
