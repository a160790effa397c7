//! File I/O, validation, and serialization for the mimic pipeline.

mod domain;
mod error;
mod frame_reader;
mod gesture_reader;
mod writer;

pub use domain::{ExperimentName, GestureData, GestureSet};
pub use error::IoError;
pub use frame_reader::FrameReader;
pub use gesture_reader::GestureReader;
pub use writer::{TemplateEntry, TemplateSet, TemplateWriter, read_templates};
