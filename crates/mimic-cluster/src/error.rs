use mimic_dtw::DbaError;

/// Errors from k-means clustering operations.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// Returned when k is zero.
    #[error("k must be at least 1, got {k}")]
    InvalidK {
        /// The invalid k value provided.
        k: usize,
    },

    /// Returned when no sequences are provided.
    #[error("cannot cluster zero sequences")]
    InsufficientData,

    /// Returned when an input sequence is empty or contains non-finite values.
    #[error("sequence {index} is empty or contains non-finite values")]
    MalformedSequence {
        /// Position of the offending sequence in the input slice.
        index: usize,
    },

    /// Wraps a DBA error encountered during centroid computation.
    #[error("DBA error during centroid update: {0}")]
    Dba(#[from] DbaError),
}
