//! Error types for sequence validation and DBA averaging.

/// Errors from frame sequence validation.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Returned when an empty frame list is provided as a sequence.
    #[error("sequence must be non-empty")]
    EmptySequence,

    /// Returned when a frame contains NaN, infinity, or negative infinity.
    #[error("sequence contains non-finite value at frame {index}, axis {axis}")]
    NonFiniteValue {
        /// Position of the first frame with a non-finite value.
        index: usize,
        /// Axis (0 = x, 1 = y, 2 = z) holding the non-finite value.
        axis: usize,
    },
}

/// Errors from DBA barycenter averaging.
#[derive(Debug, thiserror::Error)]
pub enum DbaError {
    /// Returned when `average()` is called with no sequences.
    #[error("cannot average zero sequences")]
    InsufficientData,

    /// Returned when one of the input sequences has no frames.
    #[error("sequence {index} is empty")]
    MalformedSequence {
        /// Position of the offending sequence in the input slice.
        index: usize,
    },

    /// Wraps a validation error on the computed average.
    #[error("invalid average sequence: {0}")]
    Dtw(#[from] DtwError),
}
