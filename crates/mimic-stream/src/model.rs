//! Per-gesture training driver: prototype learning, calibration and matching.

use tracing::{info, instrument, warn};

use mimic_cluster::KMeansConfig;
use mimic_dtw::{Euclidean, Frame};

use crate::calibrate::{Calibration, CalibrationConfig};
use crate::error::ModelError;
use crate::matcher::{Match, StreamMatcher};
use crate::template::GestureTemplate;

/// Training parameters for a [`GestureModel`].
///
/// The prototype is the centroid of the largest cluster found by `kmeans`
/// (a single cluster by default).
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    kmeans: KMeansConfig,
    calibration: CalibrationConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingConfig {
    /// Create a training configuration with single-cluster prototypes and
    /// default calibration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kmeans: KMeansConfig::single(),
            calibration: CalibrationConfig::new(),
        }
    }

    /// Replace the clustering configuration used to build the prototype.
    #[must_use]
    pub fn with_kmeans(mut self, kmeans: KMeansConfig) -> Self {
        self.kmeans = kmeans;
        self
    }

    /// Replace the calibration configuration.
    #[must_use]
    pub fn with_calibration(mut self, calibration: CalibrationConfig) -> Self {
        self.calibration = calibration;
        self
    }

    /// Return the clustering configuration.
    #[must_use]
    pub fn kmeans(&self) -> &KMeansConfig {
        &self.kmeans
    }

    /// Return the calibration configuration.
    #[must_use]
    pub fn calibration(&self) -> &CalibrationConfig {
        &self.calibration
    }
}

/// One gesture class: learns a template from examples and runs a matcher.
///
/// Every successful [`update`](Self::update) replaces the matcher with a new
/// instance. An update with no examples resets the model to the not-running
/// state.
#[derive(Debug, Clone)]
pub struct GestureModel {
    class_id: u32,
    config: TrainingConfig,
    template: Option<GestureTemplate>,
    calibration: Option<Calibration>,
    matcher: Option<StreamMatcher>,
}

impl GestureModel {
    /// Create an untrained model for `class_id`.
    #[must_use]
    pub fn new(class_id: u32, config: TrainingConfig) -> Self {
        Self {
            class_id,
            config,
            template: None,
            calibration: None,
            matcher: None,
        }
    }

    /// Retrain from `examples`.
    ///
    /// Even-indexed examples build the prototype and odd-indexed examples are
    /// held out for calibration. With a single example the training set is
    /// also used for calibration. The match length window comes from the
    /// rounded mean length of all examples. On error the previous state is
    /// kept.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ModelError::MalformedExample`] | An example is empty or non-finite |
    /// | [`ModelError::Cluster`] | Prototype clustering fails |
    /// | [`ModelError::Calibration`] | Threshold calibration fails |
    /// | [`ModelError::Match`] | The trained template is rejected by the matcher |
    #[instrument(skip_all, fields(class_id = self.class_id, n = examples.len()))]
    pub fn update<S: AsRef<[Frame]>>(&mut self, examples: &[S]) -> Result<(), ModelError> {
        if examples.is_empty() {
            self.reset();
            return Ok(());
        }
        for (index, e) in examples.iter().enumerate() {
            let frames = e.as_ref();
            if frames.is_empty() || frames.iter().any(|f| f.first_non_finite_axis().is_some()) {
                return Err(ModelError::MalformedExample { index });
            }
        }

        let training: Vec<&[Frame]> = examples.iter().step_by(2).map(AsRef::as_ref).collect();
        let holdout: Vec<&[Frame]> = examples.iter().skip(1).step_by(2).map(AsRef::as_ref).collect();
        let total: usize = examples.iter().map(|e| e.as_ref().len()).sum();
        let avg_length = (total as f64 / examples.len() as f64).round() as usize;

        let clusters = self.config.kmeans.fit(&training)?;
        let Some(largest) = clusters
            .into_iter()
            .reduce(|best, c| if c.len() > best.len() { c } else { best })
        else {
            return Err(ModelError::Cluster(mimic_cluster::ClusterError::InsufficientData));
        };
        let prototype = largest.centroid;

        let calibration_set = if holdout.is_empty() { &training } else { &holdout };
        let calibration = self.config.calibration.calibrate(
            calibration_set,
            prototype.as_slice(),
            avg_length,
            Euclidean,
        )?;

        let template = GestureTemplate {
            prototype,
            threshold: calibration.threshold,
            avg_length,
            class_id: self.class_id,
        };
        let matcher = template.matcher()?;

        info!(
            threshold = template.threshold,
            avg_length,
            prototype_len = template.prototype.len(),
            detected_all = calibration.detected_all,
            "gesture model trained"
        );
        self.template = Some(template);
        self.calibration = Some(calibration);
        self.matcher = Some(matcher);
        Ok(())
    }

    /// Drop the template and matcher. The model stops matching until the next update.
    pub fn reset(&mut self) {
        if self.matcher.is_some() {
            warn!(class_id = self.class_id, "gesture model reset");
        }
        self.template = None;
        self.calibration = None;
        self.matcher = None;
    }

    /// Feed one live frame. Returns `None` while the model is not running.
    pub fn feed(&mut self, frame: Frame) -> Option<Match> {
        self.matcher.as_mut().and_then(|m| m.feed(frame))
    }

    /// Return true if a trained matcher is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.matcher.is_some()
    }

    /// Return the trained template, if any.
    #[must_use]
    pub fn template(&self) -> Option<&GestureTemplate> {
        self.template.as_ref()
    }

    /// Return the calibration report of the last successful update, if any.
    #[must_use]
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Return the number of frames fed to the current matcher, 0 when not running.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.matcher.as_ref().map_or(0, StreamMatcher::tick)
    }

    /// Return the class id.
    #[must_use]
    pub fn class_id(&self) -> u32 {
        self.class_id
    }
}
