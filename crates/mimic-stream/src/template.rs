//! Trained gesture template: everything needed to rebuild a matcher.

use serde::{Deserialize, Serialize};

use mimic_dtw::{FrameDistance, Sequence};

use crate::error::MatchError;
use crate::matcher::{MatcherConfig, StreamMatcher};

/// Prototype, threshold, average example length and class of one gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureTemplate {
    /// Averaged prototype sequence.
    pub prototype: Sequence,
    /// Acceptance threshold on the accumulated warping cost.
    pub threshold: f64,
    /// Rounded mean length of the training examples.
    pub avg_length: usize,
    /// Class id stamped on matches.
    pub class_id: u32,
}

impl GestureTemplate {
    /// Return the matcher configuration described by this template.
    #[must_use]
    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig::new(self.threshold, self.avg_length).with_class_id(self.class_id)
    }

    /// Build a fresh Euclidean matcher from this template.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the matcher rejects the prototype.
    pub fn matcher(&self) -> Result<StreamMatcher, MatchError> {
        StreamMatcher::new(self.prototype.as_slice().to_vec(), self.matcher_config())
    }

    /// Build a fresh matcher over a custom frame metric.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the matcher rejects the prototype or metric.
    pub fn matcher_with_metric<D: FrameDistance>(
        &self,
        metric: D,
    ) -> Result<StreamMatcher<D>, MatchError> {
        StreamMatcher::with_metric(
            self.prototype.as_slice().to_vec(),
            self.matcher_config(),
            metric,
        )
    }
}
