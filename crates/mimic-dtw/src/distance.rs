//! Pointwise frame distance metrics and the DTW distance newtype.

use std::cmp::Ordering;
use std::fmt;

use crate::frame::Frame;

/// A pointwise distance between two motion frames.
///
/// Implementations must be total and non-negative, and monotone in the
/// per-axis differences: the streaming matcher compares accumulated costs
/// from different calls directly.
///
/// Any `Fn(&Frame, &Frame) -> f64` closure is a `FrameDistance`.
pub trait FrameDistance {
    /// Return the distance between `a` and `b`.
    fn distance(&self, a: &Frame, b: &Frame) -> f64;
}

impl<F> FrameDistance for F
where
    F: Fn(&Frame, &Frame) -> f64,
{
    fn distance(&self, a: &Frame, b: &Frame) -> f64 {
        self(a, b)
    }
}

/// L2 norm of the per-axis difference. The default metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl FrameDistance for Euclidean {
    #[inline]
    fn distance(&self, a: &Frame, b: &Frame) -> f64 {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        let dz = a.z - b.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// L1 norm of the per-axis difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl FrameDistance for Manhattan {
    #[inline]
    fn distance(&self, a: &Frame, b: &Frame) -> f64 {
        (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs()
    }
}

/// A non-negative accumulated DTW cost.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DtwDistance(f64);

impl DtwDistance {
    /// Infinite DTW distance, returned when one of the inputs is empty.
    pub const INFINITY: Self = Self(f64::INFINITY);

    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for DtwDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
