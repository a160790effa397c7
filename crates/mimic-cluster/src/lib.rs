//! K-means clustering of frame sequences under DTW distance.
//!
//! Centroids are DBA barycenters. Initial centroids are drawn with a
//! deterministic RC4 keystream generator so that clustering is reproducible
//! for a given seed.

mod config;
mod error;
mod kmeans;
mod rc4;
mod result;

pub use config::KMeansConfig;
pub use error::ClusterError;
pub use kmeans::cluster_variance;
pub use rc4::{Rc4Random, SeedInput};
pub use result::Cluster;
