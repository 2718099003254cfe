use slotmap::SlotMap;

use crate::error::AlignmentError;

use super::context::CantLayoutContext;
use super::design::{
    CantDesignParameters, DesignParameters, HorizontalDesignParameters, VerticalDesignParameters,
};

slotmap::new_key_type! {
    /// Unique identifier for a segment in an [`Alignment`].
    pub struct SegmentId;
}

/// One design segment with a stable identity.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSegment {
    global_id: Option<String>,
    design_parameters: DesignParameters,
}

impl AlignmentSegment {
    /// Wraps design parameters.
    #[must_use]
    pub fn new(design_parameters: impl Into<DesignParameters>) -> Self {
        Self {
            global_id: None,
            design_parameters: design_parameters.into(),
        }
    }

    /// Attaches an externally assigned identifier.
    #[must_use]
    pub fn with_global_id(mut self, global_id: impl Into<String>) -> Self {
        self.global_id = Some(global_id.into());
        self
    }

    #[must_use]
    pub fn global_id(&self) -> Option<&str> {
        self.global_id.as_deref()
    }

    #[must_use]
    pub fn design_parameters(&self) -> &DesignParameters {
        &self.design_parameters
    }
}

/// The cant layout: ordered segments plus the rail-head distance.
#[derive(Debug, Clone, PartialEq)]
pub struct CantLayout {
    /// Distance between the rail heads.
    pub rail_head_distance: f64,
    segments: Vec<SegmentId>,
}

impl CantLayout {
    #[must_use]
    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }
}

/// Arena owning every segment of one alignment, grouped by layout.
///
/// Segments are never mutated once added; layouts keep them in the order
/// they were appended.
#[derive(Debug, Default)]
pub struct Alignment {
    segments: SlotMap<SegmentId, AlignmentSegment>,
    horizontal: Vec<SegmentId>,
    vertical: Vec<SegmentId>,
    cant: Option<CantLayout>,
}

impl Alignment {
    /// Creates a new, empty alignment without a cant layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cant layout with the given rail-head distance. An existing
    /// layout keeps its segments and takes the new distance.
    pub fn set_rail_head_distance(&mut self, rail_head_distance: f64) {
        match &mut self.cant {
            Some(layout) => layout.rail_head_distance = rail_head_distance,
            None => {
                self.cant = Some(CantLayout {
                    rail_head_distance,
                    segments: Vec::new(),
                });
            }
        }
    }

    /// Appends a segment to the layout of its domain and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a cant segment is added before a cant layout
    /// exists.
    pub fn add_segment(&mut self, segment: AlignmentSegment) -> Result<SegmentId, AlignmentError> {
        let layout = match segment.design_parameters() {
            DesignParameters::Horizontal(_) => &mut self.horizontal,
            DesignParameters::Vertical(_) => &mut self.vertical,
            DesignParameters::Cant(_) => match &mut self.cant {
                Some(cant) => &mut cant.segments,
                None => return Err(AlignmentError::MissingCantLayout),
            },
        };
        let id = self.segments.insert(segment);
        layout.push(id);
        Ok(id)
    }

    /// Returns the segment, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID does not belong to this alignment.
    pub fn segment(&self, id: SegmentId) -> Result<&AlignmentSegment, AlignmentError> {
        self.segments
            .get(id)
            .ok_or_else(|| AlignmentError::SegmentNotFound(format!("{id:?}")))
    }

    /// Number of segments across all layouts.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn horizontal_layout(&self) -> &[SegmentId] {
        &self.horizontal
    }

    #[must_use]
    pub fn vertical_layout(&self) -> &[SegmentId] {
        &self.vertical
    }

    #[must_use]
    pub fn cant_layout(&self) -> Option<&CantLayout> {
        self.cant.as_ref()
    }

    /// Horizontal design parameters of a segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is missing or not horizontal.
    pub fn horizontal(&self, id: SegmentId) -> Result<&HorizontalDesignParameters, AlignmentError> {
        match self.segment(id)?.design_parameters() {
            DesignParameters::Horizontal(p) => Ok(p),
            other => Err(AlignmentError::DomainMismatch {
                expected: "horizontal",
                found: other.domain(),
            }),
        }
    }

    /// Vertical design parameters of a segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is missing or not vertical.
    pub fn vertical(&self, id: SegmentId) -> Result<&VerticalDesignParameters, AlignmentError> {
        match self.segment(id)?.design_parameters() {
            DesignParameters::Vertical(p) => Ok(p),
            other => Err(AlignmentError::DomainMismatch {
                expected: "vertical",
                found: other.domain(),
            }),
        }
    }

    /// Cant design parameters of a segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is missing or not a cant segment.
    pub fn cant(&self, id: SegmentId) -> Result<&CantDesignParameters, AlignmentError> {
        match self.segment(id)?.design_parameters() {
            DesignParameters::Cant(p) => Ok(p),
            other => Err(AlignmentError::DomainMismatch {
                expected: "cant",
                found: other.domain(),
            }),
        }
    }

    /// Distance along the alignment where each horizontal segment starts.
    ///
    /// # Errors
    ///
    /// Returns an error if a layout entry is not a horizontal segment.
    pub fn horizontal_stations(&self) -> Result<Vec<f64>, AlignmentError> {
        let mut station = 0.0;
        self.horizontal
            .iter()
            .map(|&id| {
                let start = station;
                station += self.horizontal(id)?.segment_length;
                Ok(start)
            })
            .collect()
    }

    /// Builds the read-only cant context, `None` without a cant layout.
    ///
    /// # Errors
    ///
    /// Returns an error if a layout entry is not a cant segment.
    pub fn cant_context(&self) -> Result<Option<CantLayoutContext>, AlignmentError> {
        let Some(layout) = &self.cant else {
            return Ok(None);
        };
        let segments = layout
            .segments
            .iter()
            .map(|&id| self.cant(id).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(CantLayoutContext::new(layout.rail_head_distance, segments)))
    }
}
