//! Configuration builder for k-means over DTW.

use mimic_dtw::{DbaConfig, Euclidean, Frame, FrameDistance};

use crate::error::ClusterError;
use crate::rc4::SeedInput;
use crate::result::Cluster;

/// Configuration for k-means clustering of frame sequences.
///
/// Construct via [`KMeansConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter      | Default                          |
/// |----------------|----------------------------------|
/// | `max_iter`     | 10                               |
/// | `dba_max_iter` | 10                               |
/// | `dba_tol`      | 0.01                             |
/// | `seed`         | `SeedInput::ByString("Labeling")` |
/// | metric         | [`Euclidean`]                    |
#[derive(Debug, Clone)]
pub struct KMeansConfig<D = Euclidean> {
    pub(crate) k: usize,
    pub(crate) max_iter: usize,
    pub(crate) seed: SeedInput,
    pub(crate) dba: DbaConfig<D>,
}

impl KMeansConfig<Euclidean> {
    /// Create a new k-means configuration with the given cluster count.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ClusterError::InvalidK`] | `k` is zero |
    pub fn new(k: usize) -> Result<Self, ClusterError> {
        if k == 0 {
            return Err(ClusterError::InvalidK { k });
        }
        Ok(Self { k, ..Self::single() })
    }

    /// Create a single-cluster (`k = 1`) configuration with default parameters.
    #[must_use]
    pub fn single() -> Self {
        Self {
            k: 1,
            max_iter: 10,
            seed: SeedInput::ByString("Labeling".to_owned()),
            dba: DbaConfig::new(),
        }
    }
}

impl<D: FrameDistance> KMeansConfig<D> {
    /// Replace the frame metric used for assignment, averaging and variance.
    #[must_use]
    pub fn with_metric<E: FrameDistance>(self, metric: E) -> KMeansConfig<E> {
        KMeansConfig {
            k: self.k,
            max_iter: self.max_iter,
            seed: self.seed,
            dba: self.dba.with_metric(metric),
        }
    }

    /// Set the number of update/reassign rounds. There is no early stop.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the maximum number of DBA iterations used when computing centroids.
    #[must_use]
    pub fn with_dba_max_iter(mut self, dba_max_iter: usize) -> Self {
        self.dba = self.dba.with_max_iter(dba_max_iter);
        self
    }

    /// Set the DBA convergence tolerance.
    #[must_use]
    pub fn with_dba_tol(mut self, dba_tol: f64) -> Self {
        self.dba = self.dba.with_tol(dba_tol);
        self
    }

    /// Set the seed used to draw the initial centroids.
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<SeedInput>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Return the number of clusters.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Return the number of update/reassign rounds.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Return the maximum number of DBA iterations.
    #[must_use]
    pub fn dba_max_iter(&self) -> usize {
        self.dba.max_iter()
    }

    /// Return the DBA convergence tolerance.
    #[must_use]
    pub fn dba_tol(&self) -> f64 {
        self.dba.tol()
    }

    /// Return the seed.
    #[must_use]
    pub fn seed(&self) -> &SeedInput {
        &self.seed
    }

    /// Return the DBA configuration used for centroid updates.
    #[must_use]
    pub fn dba(&self) -> &DbaConfig<D> {
        &self.dba
    }

    /// Cluster `sequences` using this configuration.
    ///
    /// | Case | Behavior |
    /// |---|---|
    /// | `k >= n` | every sequence is its own cluster, variance 0 |
    /// | `k == 1` | one DBA centroid over all sequences |
    /// | otherwise | seeded initial centroids, then `max_iter` update/reassign rounds |
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ClusterError::InsufficientData`] | `sequences` is empty |
    /// | [`ClusterError::MalformedSequence`] | A sequence is empty or non-finite |
    /// | [`ClusterError::Dba`] | A DBA centroid update fails |
    pub fn fit<S: AsRef<[Frame]>>(&self, sequences: &[S]) -> Result<Vec<Cluster>, ClusterError> {
        crate::kmeans::fit(sequences, self)
    }
}
