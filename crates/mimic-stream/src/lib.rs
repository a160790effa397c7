//! Real-time detection of time-warped gesture occurrences in a motion stream.
//!
//! [`StreamMatcher`] consumes one frame at a time and reports completed
//! [`Match`]es against a fixed prototype with O(prototype length) work and no
//! allocation per frame. [`CalibrationConfig`] picks a detection threshold from
//! held-out examples, and [`GestureModel`] ties prototype learning,
//! calibration and matching together for one gesture class.

mod calibrate;
mod error;
mod matcher;
mod model;
mod pool;
mod template;

pub use calibrate::{Calibration, CalibrationConfig, signal_variance};
pub use error::{CalibrationError, MatchError, ModelError};
pub use matcher::{Match, MatcherConfig, StreamMatcher};
pub use model::{GestureModel, TrainingConfig};
pub use template::GestureTemplate;
