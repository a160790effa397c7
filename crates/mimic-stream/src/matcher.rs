//! Online subsequence DTW matcher with start-time tracking.

use serde::{Deserialize, Serialize};
use tracing::debug;

use mimic_dtw::{Euclidean, Frame, FrameDistance};

use crate::error::MatchError;
use crate::pool::ColumnPool;

/// A detected gesture occurrence in stream time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Accumulated warping cost of the matched window.
    pub distance: f64,
    /// Stream time of the first matched frame, including the start offset.
    pub start_time: u64,
    /// Stream time of the last matched frame, including the start offset.
    pub end_time: u64,
    /// Class of the matched prototype.
    pub class_id: u32,
}

impl Match {
    /// `end_time - start_time`.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }

    /// True unless both endpoints are exactly zero.
    ///
    /// A genuine match spanning `[0, 0]` is therefore reported invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.start_time > 0 || self.end_time > 0
    }
}

/// Matcher parameters.
///
/// | Parameter | Default |
/// |---|---|
/// | `threshold` | required |
/// | `avg_length` | required |
/// | `class_id` | 0 |
/// | `start_offset` | 0 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    threshold: f64,
    avg_length: usize,
    class_id: u32,
    start_offset: u64,
}

impl MatcherConfig {
    /// Create a configuration with the acceptance threshold and the average
    /// example length that sets the match length window.
    #[must_use]
    pub fn new(threshold: f64, avg_length: usize) -> Self {
        Self {
            threshold,
            avg_length,
            class_id: 0,
            start_offset: 0,
        }
    }

    /// Set the class id stamped on every emitted match.
    #[must_use]
    pub fn with_class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    /// Set the offset added to reported start and end times.
    #[must_use]
    pub fn with_start_offset(mut self, start_offset: u64) -> Self {
        self.start_offset = start_offset;
        self
    }

    /// Return the acceptance threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Return the average example length.
    #[must_use]
    pub fn avg_length(&self) -> usize {
        self.avg_length
    }

    /// Return the class id.
    #[must_use]
    pub fn class_id(&self) -> u32 {
        self.class_id
    }

    /// Return the reported time offset.
    #[must_use]
    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    start: u64,
    end: u64,
}

/// Streaming matcher for one prototype.
///
/// Feed frames in chronological order with [`feed`](Self::feed). Each call
/// does O(M) work for a prototype of length M and never allocates. A
/// matcher belongs to exactly one input stream; build a new one whenever the
/// prototype or threshold changes.
#[derive(Debug, Clone)]
pub struct StreamMatcher<D = Euclidean> {
    prototype: Vec<Frame>,
    metric: D,
    config: MatcherConfig,
    min_len: f64,
    max_len: f64,
    pool: ColumnPool,
    t: u64,
    candidate: Option<Candidate>,
}

impl StreamMatcher<Euclidean> {
    /// Create a matcher using the Euclidean frame distance.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::InvalidPrototype`] | `prototype` is empty or non-finite |
    pub fn new(prototype: Vec<Frame>, config: MatcherConfig) -> Result<Self, MatchError> {
        Self::with_metric(prototype, config, Euclidean)
    }
}

impl<D: FrameDistance> StreamMatcher<D> {
    /// Create a matcher over an arbitrary frame metric.
    ///
    /// The metric is probed on two canary pairs and must return finite,
    /// non-negative values.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::InvalidPrototype`] | `prototype` is empty or non-finite |
    /// | [`MatchError::InvalidDistance`] | The metric returns a negative, NaN or infinite value |
    pub fn with_metric(
        prototype: Vec<Frame>,
        config: MatcherConfig,
        metric: D,
    ) -> Result<Self, MatchError> {
        if prototype.is_empty() || prototype.iter().any(|f| f.first_non_finite_axis().is_some()) {
            return Err(MatchError::InvalidPrototype);
        }
        let canaries = [
            (prototype[0], prototype[0]),
            (Frame::ZERO, Frame::new(1.0, 1.0, 1.0)),
        ];
        for (a, b) in canaries {
            let value = metric.distance(&a, &b);
            if !(value.is_finite() && value >= 0.0) {
                return Err(MatchError::InvalidDistance { value });
            }
        }

        let avg = config.avg_length as f64;
        let pool = ColumnPool::new(prototype.len());
        Ok(Self {
            prototype,
            metric,
            config,
            min_len: 0.7 * avg,
            max_len: 1.3 * avg,
            pool,
            t: 0,
            candidate: None,
        })
    }

    /// Consume the next frame and return a match if one was confirmed.
    ///
    /// A candidate is reported only once no live alignment could still yield
    /// an equal or better match overlapping it, so a match is emitted some
    /// frames after its last matched frame.
    pub fn feed(&mut self, frame: Frame) -> Option<Match> {
        self.t += 1;
        let t = self.t;
        let m = self.prototype.len();
        let (prev, curr) = self.pool.split();

        curr.dist[0] = 0.0;
        curr.start[0] = t;

        for i in 1..=m {
            let cost = self.metric.distance(&self.prototype[i - 1], &frame);
            // Ties resolve horizontal, then vertical, then diagonal.
            let skip = curr.dist[i - 1];
            let repeat = prev.dist[i];
            let diagonal = prev.dist[i - 1];
            let (best, start) = if skip <= repeat && skip <= diagonal {
                (skip, curr.start[i - 1])
            } else if repeat <= diagonal {
                (repeat, prev.start[i])
            } else {
                (diagonal, prev.start[i - 1])
            };
            curr.dist[i] = cost + best;
            curr.start[i] = start;
        }

        let mut emitted = None;
        if let Some(best) = self.candidate {
            let len = (best.end - best.start) as f64;
            let in_window = self.min_len < len && len < self.max_len;
            if in_window
                && curr
                    .dist
                    .iter()
                    .zip(&curr.start)
                    .all(|(&d, &s)| d >= best.distance || s > best.end)
            {
                let offset = self.config.start_offset;
                let found = Match {
                    distance: best.distance,
                    start_time: (offset + best.start).saturating_sub(1),
                    end_time: (offset + best.end).saturating_sub(1),
                    class_id: self.config.class_id,
                };
                debug!(
                    distance = found.distance,
                    start = found.start_time,
                    end = found.end_time,
                    class_id = found.class_id,
                    "match emitted"
                );
                emitted = Some(found);
                self.candidate = None;
                for (d, &s) in curr.dist.iter_mut().zip(&curr.start).skip(1) {
                    if s <= best.end {
                        *d = f64::INFINITY;
                    }
                }
            }
        }

        let last = curr.dist[m];
        let to_beat = self.candidate.map_or(f64::INFINITY, |c| c.distance);
        if self.config.threshold > 0.0 && last <= self.config.threshold && last < to_beat {
            self.candidate = Some(Candidate {
                distance: last,
                start: curr.start[m],
                end: t,
            });
        }

        self.pool.rotate();
        emitted
    }

    /// Feed every frame of `frames` in order and collect the emitted matches.
    pub fn find_matches(&mut self, frames: &[Frame]) -> Vec<Match> {
        frames.iter().filter_map(|&f| self.feed(f)).collect()
    }

    /// Return the number of frames consumed so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.t
    }

    /// Return true while a candidate awaits confirmation.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.candidate.is_some()
    }

    /// Return the prototype.
    #[must_use]
    pub fn prototype(&self) -> &[Frame] {
        &self.prototype
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }
}
