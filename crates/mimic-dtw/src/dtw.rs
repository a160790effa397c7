//! Boundary-constrained DTW alignment between two whole frame sequences.

use tracing::instrument;

use crate::alignment::{Alignment, WarpingPath, WarpingStep};
use crate::distance::{DtwDistance, Euclidean, FrameDistance};
use crate::frame::Frame;

/// Backtracking direction recorded for each cost cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    /// From `cost[i-1][j]`: advance in the first sequence only.
    Left,
    /// From `cost[i][j-1]`: advance in the second sequence only.
    Up,
    /// From `cost[i-1][j-1]`: one-to-one correspondence.
    Diagonal,
}

/// Pick the cheapest predecessor. Ties resolve left, then up, then diagonal.
#[inline]
fn cheapest(left: f64, up: f64, diagonal: f64) -> (f64, Move) {
    if left <= up && left <= diagonal {
        (left, Move::Left)
    } else if up <= diagonal {
        (up, Move::Up)
    } else {
        (diagonal, Move::Diagonal)
    }
}

/// Offline DTW calculator over a pointwise frame metric.
///
/// The accumulated cost is the plain sum of frame distances along the
/// optimal path (no final square root). Runs in `O(n * m)` time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw<D = Euclidean> {
    metric: D,
}

impl Dtw<Euclidean> {
    /// Create a DTW calculator using the Euclidean frame distance.
    #[must_use]
    pub fn euclidean() -> Self {
        Self { metric: Euclidean }
    }
}

impl<D: FrameDistance> Dtw<D> {
    /// Create a DTW calculator over an arbitrary frame metric.
    #[must_use]
    pub fn new(metric: D) -> Self {
        Self { metric }
    }

    /// Return the frame metric.
    #[must_use]
    pub fn metric(&self) -> &D {
        &self.metric
    }

    /// Compute only the DTW cost between `a` and `b`.
    ///
    /// Uses a rolling two-row buffer, `O(m)` space. The value equals
    /// `self.align(a, b).distance`. Returns [`DtwDistance::INFINITY`] if either
    /// input is empty.
    #[must_use]
    #[instrument(skip_all, fields(n = a.len(), m = b.len()))]
    pub fn distance(&self, a: &[Frame], b: &[Frame]) -> DtwDistance {
        if a.is_empty() || b.is_empty() {
            return DtwDistance::INFINITY;
        }
        let m = b.len();

        // Row 0 of the cost matrix: cost[0][0] = 0, the rest unreachable.
        let mut prev = vec![f64::INFINITY; m + 1];
        let mut curr = vec![f64::INFINITY; m + 1];
        prev[0] = 0.0;

        for fa in a {
            curr[0] = f64::INFINITY;
            for (j, fb) in b.iter().enumerate() {
                let (best, _) = cheapest(prev[j + 1], curr[j], prev[j]);
                curr[j + 1] = self.metric.distance(fa, fb) + best;
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        DtwDistance::new(prev[m])
    }

    /// Compute the DTW cost and the optimal warping path between `a` and `b`.
    ///
    /// Builds the full `(n+1) x (m+1)` cost matrix with `cost[0][0] = 0` and
    /// every other boundary cell at infinity, then backtracks from `(n, m)`.
    /// The path starts at `(0, 0)` and ends at `(n-1, m-1)`. If either input
    /// is empty the distance is [`DtwDistance::INFINITY`] and the path is empty.
    #[must_use]
    #[instrument(skip_all, fields(n = a.len(), m = b.len()))]
    pub fn align(&self, a: &[Frame], b: &[Frame]) -> Alignment {
        let n = a.len();
        let m = b.len();
        if n == 0 || m == 0 {
            return Alignment {
                distance: DtwDistance::INFINITY,
                path: WarpingPath::default(),
            };
        }

        let width = m + 1;
        let mut cost = vec![f64::INFINITY; (n + 1) * width];
        let mut moves = vec![Move::Diagonal; (n + 1) * width];
        cost[0] = 0.0;

        for i in 1..=n {
            for j in 1..=m {
                let idx = i * width + j;
                let (best, mv) = cheapest(
                    cost[idx - width],
                    cost[idx - 1],
                    cost[idx - width - 1],
                );
                cost[idx] = self.metric.distance(&a[i - 1], &b[j - 1]) + best;
                moves[idx] = mv;
            }
        }

        let mut steps = Vec::with_capacity(n + m);
        let (mut i, mut j) = (n, m);
        while i > 0 && j > 0 {
            steps.push(WarpingStep { a: i - 1, b: j - 1 });
            match moves[i * width + j] {
                Move::Left => i -= 1,
                Move::Up => j -= 1,
                Move::Diagonal => {
                    i -= 1;
                    j -= 1;
                }
            }
        }

        Alignment {
            distance: DtwDistance::new(cost[n * width + m]),
            path: WarpingPath::from_reversed(steps),
        }
    }
}
