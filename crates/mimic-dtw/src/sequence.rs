//! Frame sequence type with validation guarantees.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::DtwError;
use crate::frame::Frame;

/// Owned, validated frame sequence. Guaranteed non-empty with all finite values.
///
/// Represents one recorded example or a prototype. Lengths differ freely
/// between sequences of the same gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Frame>", into = "Vec<Frame>")]
pub struct Sequence(Vec<Frame>);

impl Sequence {
    /// Create a new sequence, validating that it is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySequence`] | `frames` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any axis of any frame is NaN or infinite |
    pub fn new(frames: Vec<Frame>) -> Result<Self, DtwError> {
        if frames.is_empty() {
            return Err(DtwError::EmptySequence);
        }
        for (index, frame) in frames.iter().enumerate() {
            if let Some(axis) = frame.first_non_finite_axis() {
                return Err(DtwError::NonFiniteValue { index, axis });
            }
        }
        Ok(Self(frames))
    }

    /// Return the frames as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Frame] {
        &self.0
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the sequence has no frames.
    ///
    /// A [`Sequence`] constructed via [`Sequence::new`] is always non-empty,
    /// so this always returns `false` for valid instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<Frame> {
        self.0
    }
}

impl AsRef<[Frame]> for Sequence {
    fn as_ref(&self) -> &[Frame] {
        &self.0
    }
}

impl Index<usize> for Sequence {
    type Output = Frame;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl TryFrom<Vec<Frame>> for Sequence {
    type Error = DtwError;

    fn try_from(frames: Vec<Frame>) -> Result<Self, Self::Error> {
        Self::new(frames)
    }
}

impl From<Sequence> for Vec<Frame> {
    fn from(sequence: Sequence) -> Self {
        sequence.0
    }
}
