//! DBA (DTW Barycenter Averaging) over frame sequences of differing length.

use tracing::{debug, instrument};

use crate::distance::{Euclidean, FrameDistance};
use crate::dtw::Dtw;
use crate::error::DbaError;
use crate::frame::Frame;
use crate::sequence::Sequence;

/// Configuration for DBA barycenter computation.
///
/// | Parameter | Default |
/// |---|---|
/// | `max_iter` | 10 |
/// | `tol` | 0.01 |
/// | metric | [`Euclidean`] |
#[derive(Debug, Clone)]
pub struct DbaConfig<D = Euclidean> {
    dtw: Dtw<D>,
    max_iter: usize,
    tol: f64,
}

impl DbaConfig<Euclidean> {
    /// Create a DBA configuration with default parameters and the Euclidean metric.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dtw: Dtw::euclidean(),
            max_iter: 10,
            tol: 0.01,
        }
    }
}

impl Default for DbaConfig<Euclidean> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: FrameDistance> DbaConfig<D> {
    /// Replace the frame metric used for alignment and convergence.
    #[must_use]
    pub fn with_metric<E: FrameDistance>(self, metric: E) -> DbaConfig<E> {
        DbaConfig {
            dtw: Dtw::new(metric),
            max_iter: self.max_iter,
            tol: self.tol,
        }
    }

    /// Set the maximum number of refinement iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance on the mean per-frame change.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Return the maximum number of iterations.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Return the convergence tolerance.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Return the frame metric.
    #[must_use]
    pub fn metric(&self) -> &D {
        self.dtw.metric()
    }

    /// Return the DTW calculator used for alignment.
    #[must_use]
    pub fn dtw(&self) -> &Dtw<D> {
        &self.dtw
    }

    /// Compute the DBA barycenter of `sequences`.
    ///
    /// The average starts as a verbatim copy of `sequences[0]` and keeps that
    /// length. Each iteration aligns every input against the current average,
    /// collects the frames mapped onto each average index, and replaces each
    /// index by the mean of its collected frames. Iteration stops early when the
    /// mean distance between the old and the new average drops below `tol`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DbaError::InsufficientData`] | `sequences` is empty |
    /// | [`DbaError::MalformedSequence`] | One of the sequences has no frames |
    /// | [`DbaError::Dtw`] | The inputs contain non-finite values |
    #[instrument(skip_all, fields(n = sequences.len(), max_iter = self.max_iter))]
    pub fn average<S: AsRef<[Frame]>>(&self, sequences: &[S]) -> Result<DbaResult, DbaError> {
        let Some(first) = sequences.first() else {
            return Err(DbaError::InsufficientData);
        };
        if let Some(index) = sequences.iter().position(|s| s.as_ref().is_empty()) {
            return Err(DbaError::MalformedSequence { index });
        }

        let mut average = first.as_ref().to_vec();
        let len = average.len();
        let mut change = f64::INFINITY;
        let mut iterations = 0;

        for iter in 0..self.max_iter {
            let mut sums = vec![Frame::ZERO; len];
            let mut counts = vec![0_usize; len];

            for s in sequences {
                let frames = s.as_ref();
                let alignment = self.dtw.align(&average, frames);
                for step in &alignment.path {
                    sums[step.a] = sums[step.a] + frames[step.b];
                    counts[step.a] += 1;
                }
            }

            let updated: Vec<Frame> = average
                .iter()
                .zip(sums.iter().zip(&counts))
                .map(|(&old, (&sum, &count))| {
                    if count > 0 { sum / count as f64 } else { old }
                })
                .collect();

            change = average
                .iter()
                .zip(&updated)
                .map(|(old, new)| self.metric().distance(old, new))
                .sum::<f64>()
                / len as f64;
            average = updated;

            iterations = iter + 1;
            debug!(iteration = iterations, change, "DBA iteration complete");

            if change < self.tol {
                break;
            }
        }

        Ok(DbaResult {
            average: Sequence::new(average)?,
            converged: change < self.tol,
            iterations,
            final_change: change,
        })
    }
}

/// Result of a DBA computation.
#[derive(Debug, Clone)]
pub struct DbaResult {
    /// The averaged sequence, same length as the first input.
    pub average: Sequence,
    /// Whether the last iteration's change fell below the tolerance.
    pub converged: bool,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Mean per-frame change in the final iteration. Infinite if no iteration ran.
    pub final_change: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(values: &[f64]) -> Vec<Frame> {
        values.iter().map(|&x| Frame::new(x, 0.0, 0.0)).collect()
    }

    #[test]
    fn identical_copies_are_a_fixed_point() {
        let s = vec![
            Frame::new(0.0, 0.0, 0.0),
            Frame::new(1.0, 2.0, 3.0),
            Frame::new(4.0, 5.0, 6.0),
            Frame::new(1.0, 1.0, 1.0),
        ];
        let result = DbaConfig::new().average(&[s.clone(), s.clone(), s.clone()]).unwrap();
        assert_eq!(result.average.as_slice(), s.as_slice());
        assert!(result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.final_change, 0.0);
    }

    #[test]
    fn warped_copies_collapse_to_base() {
        let base = xs(&[0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
        let slow_start = xs(&[0.0, 0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
        let long_peak = xs(&[0.0, 1.0, 2.0, 3.0, 3.0, 2.0, 1.0, 0.0]);
        let result = DbaConfig::new()
            .average(&[base.clone(), slow_start, long_peak])
            .unwrap();
        assert_eq!(result.average.len(), base.len());
        for (got, want) in result.average.as_slice().iter().zip(&base) {
            assert!((got.x - want.x).abs() < 1e-12);
        }
        assert!(result.converged);
    }

    #[test]
    fn shifted_pair_converges_in_two_iterations() {
        let s1 = xs(&[0.0, 2.0, 4.0]);
        let s2 = xs(&[2.0, 4.0, 6.0]);
        let result = DbaConfig::new().average(&[s1, s2]).unwrap();
        let got: Vec<f64> = result.average.as_slice().iter().map(|f| f.x).collect();
        assert!((got[0] - 1.0).abs() < 1e-9);
        assert!((got[1] - 2.0).abs() < 1e-9);
        assert!((got[2] - 14.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.iterations, 2);
        assert!(result.converged);
    }

    #[test]
    fn zero_iterations_returns_first_sequence() {
        let s1 = xs(&[0.0, 2.0, 4.0]);
        let s2 = xs(&[2.0, 4.0, 6.0]);
        let result = DbaConfig::new()
            .with_max_iter(0)
            .average(&[s1.clone(), s2])
            .unwrap();
        assert_eq!(result.average.as_slice(), s1.as_slice());
        assert_eq!(result.iterations, 0);
        assert!(!result.converged);
    }

    #[test]
    fn rejects_empty_input() {
        let empty: [Vec<Frame>; 0] = [];
        assert!(matches!(
            DbaConfig::new().average(&empty),
            Err(DbaError::InsufficientData)
        ));
    }

    #[test]
    fn rejects_empty_member() {
        let result = DbaConfig::new().average(&[xs(&[1.0]), vec![]]);
        assert!(matches!(result, Err(DbaError::MalformedSequence { index: 1 })));
    }

    #[test]
    fn accepts_validated_sequences() {
        let a = Sequence::new(xs(&[1.0, 2.0])).unwrap();
        let b = Sequence::new(xs(&[1.0, 2.0, 2.0])).unwrap();
        let result = DbaConfig::new().average(&[a, b]).unwrap();
        assert_eq!(result.average.len(), 2);
    }
}
