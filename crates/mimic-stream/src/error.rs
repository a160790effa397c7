//! Error types for matching, calibration and training.

use mimic_cluster::ClusterError;

/// Errors from [`StreamMatcher`](crate::StreamMatcher) construction.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// Returned when the prototype is empty or contains non-finite values.
    #[error("prototype must be a non-empty sequence of finite frames")]
    InvalidPrototype,

    /// Returned when the frame metric yields a negative or non-finite value
    /// on a canary pair.
    #[error("frame distance returned {value} on a canary pair, expected a finite non-negative value")]
    InvalidDistance {
        /// The offending distance value.
        value: f64,
    },
}

/// Errors from threshold calibration.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    /// Returned when no hold-out examples are provided.
    #[error("cannot calibrate against zero examples")]
    InsufficientData,

    /// Returned when a hold-out example is empty or contains non-finite values.
    #[error("example {index} is empty or contains non-finite values")]
    MalformedSequence {
        /// Position of the offending example.
        index: usize,
    },

    /// Wraps a matcher construction error.
    #[error("cannot build trial matcher: {0}")]
    Match(#[from] MatchError),
}

/// Errors from [`GestureModel`](crate::GestureModel) training.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Returned when a training example is empty or contains non-finite values.
    #[error("example {index} is empty or contains non-finite values")]
    MalformedExample {
        /// Position of the offending example in the training input.
        index: usize,
    },

    /// Wraps a prototype clustering error.
    #[error("prototype clustering failed: {0}")]
    Cluster(#[from] ClusterError),

    /// Wraps a threshold calibration error.
    #[error("threshold calibration failed: {0}")]
    Calibration(#[from] CalibrationError),

    /// Wraps a matcher construction error.
    #[error("cannot build matcher: {0}")]
    Match(#[from] MatchError),
}
