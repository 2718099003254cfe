use tracing::warn;

use crate::math::TOLERANCE;

use super::design::CantDesignParameters;

/// Read-only view of an alignment's cant layout, consulted by horizontal
/// segments whose geometry depends on superelevation.
#[derive(Debug, Clone, PartialEq)]
pub struct CantLayoutContext {
    rail_head_distance: f64,
    segments: Vec<CantDesignParameters>,
}

impl CantLayoutContext {
    /// Creates a context. Segments are sorted by start distance.
    #[must_use]
    pub fn new(rail_head_distance: f64, mut segments: Vec<CantDesignParameters>) -> Self {
        segments.sort_by(|a, b| a.start_dist_along.total_cmp(&b.start_dist_along));
        Self {
            rail_head_distance,
            segments,
        }
    }

    /// Distance between the rail heads (the gauge used for cant angles).
    #[must_use]
    pub fn rail_head_distance(&self) -> f64 {
        self.rail_head_distance
    }

    /// Cant segments ordered by start distance.
    #[must_use]
    pub fn segments(&self) -> &[CantDesignParameters] {
        &self.segments
    }

    /// Returns the cant segment covering `dist_along`, preferring the one
    /// that starts there when two segments meet.
    #[must_use]
    pub fn segment_at(&self, dist_along: f64) -> Option<&CantDesignParameters> {
        let found = self.segments.iter().find(|s| {
            dist_along >= s.start_dist_along - TOLERANCE
                && dist_along < s.end_dist_along() - TOLERANCE
        });
        if found.is_none() {
            warn!(dist_along, "no cant segment covers distance");
        }
        found
    }
}

/// What the horizontal mapper may know about the rest of the alignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalContext<'a> {
    /// Distance along the alignment where the segment starts.
    pub start_dist_along: f64,
    /// The alignment's cant layout, if it has one.
    pub cant: Option<&'a CantLayoutContext>,
}

impl<'a> HorizontalContext<'a> {
    /// Creates a context for a segment starting at `start_dist_along`.
    #[must_use]
    pub fn new(start_dist_along: f64, cant: Option<&'a CantLayoutContext>) -> Self {
        Self {
            start_dist_along,
            cant,
        }
    }
}
