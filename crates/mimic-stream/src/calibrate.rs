//! Detection threshold calibration against held-out examples.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument, warn};

use mimic_dtw::{Frame, FrameDistance};

use crate::error::CalibrationError;
use crate::matcher::{MatcherConfig, StreamMatcher};

/// Pooled per-axis population variance of every frame in `examples`,
/// collapsed to a scalar by the Euclidean norm of the three axis variances.
///
/// Returns 0 when there are no frames.
#[must_use]
pub fn signal_variance<S: AsRef<[Frame]>>(examples: &[S]) -> f64 {
    let mut sum = [0.0_f64; 3];
    let mut sum_sq = [0.0_f64; 3];
    let mut n = 0usize;
    for frame in examples.iter().flat_map(|e| e.as_ref()) {
        for (axis, v) in frame.axes().into_iter().enumerate() {
            sum[axis] += v;
            sum_sq[axis] += v * v;
        }
        n += 1;
    }
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    sum.iter()
        .zip(&sum_sq)
        .map(|(s, q)| {
            let var = (q - s * s / n) / n;
            var * var
        })
        .sum::<f64>()
        .sqrt()
}

/// Outcome of a threshold search.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    /// The first threshold that detected every example, or the last one tried.
    pub threshold: f64,
    /// Every threshold attempted, in increasing order.
    pub tried: Vec<f64>,
    /// Whether `threshold` detected every example.
    pub detected_all: bool,
    /// Scalar variance of the examples that scales the thresholds.
    pub variance: f64,
}

/// Configuration for threshold calibration.
///
/// # Defaults
///
/// | Parameter         | Default |
/// |-------------------|---------|
/// | `step`            | 0.1     |
/// | `max_iter`        | 5       |
/// | `padding`         | 10      |
/// | `noise_amplitude` | 1024.0  |
/// | `seed`            | 42      |
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    step: f64,
    max_iter: usize,
    padding: usize,
    noise_amplitude: f64,
    seed: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationConfig {
    /// Create a calibration configuration with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: 0.1,
            max_iter: 5,
            padding: 10,
            noise_amplitude: 1024.0,
            seed: 42,
        }
    }

    /// Set the threshold step, as a fraction of the example variance.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Set the number of thresholds to try.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the number of noise frames placed before and after each example.
    #[must_use]
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Set the per-axis amplitude of the uniform padding noise.
    #[must_use]
    pub fn with_noise_amplitude(mut self, noise_amplitude: f64) -> Self {
        self.noise_amplitude = noise_amplitude;
        self
    }

    /// Set the seed of the padding noise generator.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the threshold step.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Return the number of thresholds to try.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Return the padding length.
    #[must_use]
    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Return the noise amplitude.
    #[must_use]
    pub fn noise_amplitude(&self) -> f64 {
        self.noise_amplitude
    }

    /// Return the noise seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Search for the smallest tried threshold that detects every example.
    ///
    /// Attempt `i` (from 1 to `max_iter`) uses `i * step * variance`. Each
    /// example is wrapped in `padding` noise frames on both sides and fed to a
    /// fresh matcher. The first threshold under which every padded example
    /// yields at least one match is returned. When none succeeds the last
    /// threshold tried is returned with `detected_all == false`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CalibrationError::InsufficientData`] | `examples` is empty |
    /// | [`CalibrationError::MalformedSequence`] | An example is empty or non-finite |
    /// | [`CalibrationError::Match`] | The prototype or metric is rejected by the matcher |
    #[instrument(skip_all, fields(n = examples.len(), max_iter = self.max_iter))]
    pub fn calibrate<D, S>(
        &self,
        examples: &[S],
        prototype: &[Frame],
        avg_length: usize,
        metric: D,
    ) -> Result<Calibration, CalibrationError>
    where
        D: FrameDistance + Clone,
        S: AsRef<[Frame]>,
    {
        if examples.is_empty() {
            return Err(CalibrationError::InsufficientData);
        }
        for (index, e) in examples.iter().enumerate() {
            let frames = e.as_ref();
            if frames.is_empty() || frames.iter().any(|f| f.first_non_finite_axis().is_some()) {
                return Err(CalibrationError::MalformedSequence { index });
            }
        }

        let variance = signal_variance(examples);
        let signals = self.padded_signals(examples);

        let mut tried = Vec::with_capacity(self.max_iter);
        let mut threshold = 0.0;
        for attempt in 1..=self.max_iter {
            threshold = attempt as f64 * self.step * variance;
            tried.push(threshold);

            let trial = StreamMatcher::with_metric(
                prototype.to_vec(),
                MatcherConfig::new(threshold, avg_length),
                metric.clone(),
            )?;
            let detected = signals
                .iter()
                .filter(|signal| !trial.clone().find_matches(signal).is_empty())
                .count();
            debug!(attempt, threshold, detected, total = signals.len(), "calibration attempt");

            if detected == signals.len() {
                info!(threshold, attempt, "threshold calibrated");
                return Ok(Calibration {
                    threshold,
                    tried,
                    detected_all: true,
                    variance,
                });
            }
        }

        warn!(threshold, "no threshold detected every example, keeping the last one tried");
        Ok(Calibration {
            threshold,
            tried,
            detected_all: false,
            variance,
        })
    }

    /// Wrap each example in seeded uniform noise. Generated once per call.
    fn padded_signals<S: AsRef<[Frame]>>(&self, examples: &[S]) -> Vec<Vec<Frame>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let amp = self.noise_amplitude.abs();
        let mut noise = |n: usize| -> Vec<Frame> {
            (0..n)
                .map(|_| {
                    Frame::new(
                        rng.gen_range(-amp..=amp),
                        rng.gen_range(-amp..=amp),
                        rng.gen_range(-amp..=amp),
                    )
                })
                .collect()
        };
        examples
            .iter()
            .map(|e| {
                let mut signal = noise(self.padding);
                signal.extend_from_slice(e.as_ref());
                signal.extend(noise(self.padding));
                signal
            })
            .collect()
    }
}
