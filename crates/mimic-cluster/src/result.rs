//! Result type for k-means clustering.

use mimic_dtw::Sequence;

/// One cluster of input sequences.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Centroid sequence: a DBA barycenter, or the input itself for singletons.
    pub centroid: Sequence,
    /// Sample standard deviation of member-to-centroid DTW distances.
    /// Zero when the cluster has fewer than 3 members.
    pub variance: f64,
    /// Indices of the input sequences assigned to this cluster, ascending.
    pub members: Vec<usize>,
}

impl Cluster {
    /// Return the number of member sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Return true if no sequence is assigned to this cluster.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
