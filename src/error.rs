use thiserror::Error;

/// Top-level error type for alignment mapping.
#[derive(Debug, Error)]
pub enum AlignmapError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

/// Errors raised while mapping a design segment to analytic curves.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("{domain} curve family {family} is not supported")]
    UnsupportedCurveFamily {
        domain: &'static str,
        family: &'static str,
    },

    #[error("invalid segment parameters: {0}")]
    InvalidSegmentParameters(String),

    #[error("viennese bend requires a cant segment spanning the same distance range")]
    MissingCantContext,
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the alignment segment store.
#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("segment not found: {0}")]
    SegmentNotFound(String),

    #[error("alignment has no cant layout, set a rail-head distance first")]
    MissingCantLayout,

    #[error("segment belongs to the {found} layout, expected {expected}")]
    DomainMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Convenience type alias for results using [`AlignmapError`].
pub type Result<T> = std::result::Result<T, AlignmapError>;

impl MappingError {
    /// Shorthand for an [`MappingError::InvalidSegmentParameters`] wrapped in
    /// the top-level error.
    pub(crate) fn invalid(message: impl Into<String>) -> AlignmapError {
        Self::InvalidSegmentParameters(message.into()).into()
    }
}
