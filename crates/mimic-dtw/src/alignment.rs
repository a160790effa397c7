//! Alignment output: total warping cost plus the index correspondence path.

use crate::distance::DtwDistance;

/// One correspondence on a warping path: element `a` of the first sequence is
/// matched to element `b` of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarpingStep {
    /// Index in the first sequence.
    pub a: usize,
    /// Index in the second sequence.
    pub b: usize,
}

/// Index correspondences in forward order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    pub(crate) fn from_reversed(mut steps: Vec<WarpingStep>) -> Self {
        steps.reverse();
        Self(steps)
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of correspondences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps (one of the inputs was empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the boundary and continuity constraints for sequences of length
    /// `n` and `m`: starts at `(0, 0)`, ends at `(n-1, m-1)`, and every step
    /// advances each index by at most one and at least one index by one.
    #[must_use]
    pub fn is_boundary_constrained(&self, n: usize, m: usize) -> bool {
        let (Some(first), Some(last)) = (self.0.first(), self.0.last()) else {
            return n == 0 || m == 0;
        };
        if *first != (WarpingStep { a: 0, b: 0 }) || *last != (WarpingStep { a: n - 1, b: m - 1 }) {
            return false;
        }
        self.0.windows(2).all(|w| {
            let da = w[1].a.wrapping_sub(w[0].a);
            let db = w[1].b.wrapping_sub(w[0].b);
            da <= 1 && db <= 1 && da + db >= 1
        })
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of a full DTW alignment between two sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Accumulated frame-distance cost along the optimal path.
    pub distance: DtwDistance,
    /// Optimal warping path in forward order.
    pub path: WarpingPath,
}
