//! Domain types for mimic-io.

use mimic_dtw::Sequence;

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One named gesture with its cropped training examples.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureData {
    /// Display name, unique within a [`GestureSet`].
    pub name: String,
    /// Class id stamped on matches of this gesture.
    pub class_id: u32,
    /// Cropped examples in file order.
    pub examples: Vec<Sequence>,
}

/// All gestures read from one gesture file, in file order.
///
/// Produced by [`GestureReader`](crate::GestureReader).
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSet {
    gestures: Vec<GestureData>,
}

impl GestureSet {
    pub(crate) fn new(gestures: Vec<GestureData>) -> Self {
        Self { gestures }
    }

    /// Return the gestures.
    #[must_use]
    pub fn gestures(&self) -> &[GestureData] {
        &self.gestures
    }

    /// Look a gesture up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GestureData> {
        self.gestures.iter().find(|g| g.name == name)
    }

    /// Return the number of gestures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    /// Return true if the set holds no gestures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    /// Return the total number of examples across gestures.
    #[must_use]
    pub fn n_examples(&self) -> usize {
        self.gestures.iter().map(|g| g.examples.len()).sum()
    }
}
