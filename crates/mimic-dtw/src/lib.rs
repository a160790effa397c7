//! Motion frames, DTW alignment, and DBA barycenter averaging.
//!
//! Pure math library, zero I/O. Provides the tri-axial [`Frame`] value type,
//! pluggable pointwise [`FrameDistance`] metrics, full-matrix Dynamic Time
//! Warping with warping path extraction, and DTW Barycenter Averaging
//! over sequences of differing length.

mod alignment;
mod dba;
mod distance;
mod dtw;
mod error;
mod frame;
mod sequence;

pub use alignment::{Alignment, WarpingPath, WarpingStep};
pub use dba::{DbaConfig, DbaResult};
pub use distance::{DtwDistance, Euclidean, FrameDistance, Manhattan};
pub use dtw::Dtw;
pub use error::{DbaError, DtwError};
pub use frame::Frame;
pub use sequence::Sequence;
