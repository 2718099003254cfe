use tracing::debug;

use crate::alignment::{Alignment, HorizontalContext, MappedSegment};
use crate::error::Result;

use super::{MapCantSegment, MapHorizontalSegment, MapVerticalSegment, MappingParams};

/// Mapped segments of a whole alignment, one flat list per layout in
/// layout order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedAlignment {
    pub horizontal: Vec<MappedSegment>,
    pub vertical: Vec<MappedSegment>,
    pub cant: Vec<MappedSegment>,
}

/// Maps every layout of an alignment.
///
/// Horizontal segments receive their cumulative distance along and the
/// alignment's cant layout, so Viennese bends resolve against their
/// sibling cant segments.
pub struct MapAlignment<'a> {
    alignment: &'a Alignment,
    mapping: MappingParams,
}

impl<'a> MapAlignment<'a> {
    /// Creates a new `MapAlignment` operation.
    #[must_use]
    pub fn new(alignment: &'a Alignment) -> Self {
        Self {
            alignment,
            mapping: MappingParams::default(),
        }
    }

    /// Replaces the mapping tolerances used for every segment.
    #[must_use]
    pub fn with_params(mut self, mapping: MappingParams) -> Self {
        self.mapping = mapping;
        self
    }

    /// Executes the mapping. The first failing segment aborts the call.
    ///
    /// # Errors
    ///
    /// Returns an error if a layout refers to a missing or foreign segment,
    /// or any segment fails to map.
    pub fn execute(&self) -> Result<MappedAlignment> {
        let alignment = self.alignment;
        let cant_context = alignment.cant_context()?;
        let stations = alignment.horizontal_stations()?;
        let mut mapped = MappedAlignment::default();

        for (&id, station) in alignment.horizontal_layout().iter().zip(stations) {
            let context = HorizontalContext::new(station, cant_context.as_ref());
            mapped.horizontal.extend(
                MapHorizontalSegment::new(alignment.horizontal(id)?)
                    .with_context(context)
                    .with_params(self.mapping)
                    .execute()?,
            );
        }

        for &id in alignment.vertical_layout() {
            mapped.vertical.extend(
                MapVerticalSegment::new(alignment.vertical(id)?)
                    .with_params(self.mapping)
                    .execute()?,
            );
        }

        if let Some(layout) = alignment.cant_layout() {
            for &id in layout.segments() {
                mapped.cant.extend(
                    MapCantSegment::new(alignment.cant(id)?, layout.rail_head_distance)
                        .with_params(self.mapping)
                        .execute()?,
                );
            }
        }

        debug!(
            horizontal = mapped.horizontal.len(),
            vertical = mapped.vertical.len(),
            cant = mapped.cant.len(),
            "mapped alignment"
        );
        Ok(mapped)
    }
}
