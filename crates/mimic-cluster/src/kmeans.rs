//! Core k-means algorithm: seeded initialization, assign/update rounds, and
//! cluster variance.

use tracing::{debug, info, instrument, warn};

use mimic_dtw::{Dtw, Frame, FrameDistance, Sequence};

use crate::config::KMeansConfig;
use crate::error::ClusterError;
use crate::rc4::Rc4Random;
use crate::result::Cluster;

// ── validation ────────────────────────────────────────────────────────────────

fn validate<S: AsRef<[Frame]>>(sequences: &[S]) -> Result<(), ClusterError> {
    if sequences.is_empty() {
        return Err(ClusterError::InsufficientData);
    }
    for (index, s) in sequences.iter().enumerate() {
        let frames = s.as_ref();
        if frames.is_empty() || frames.iter().any(|f| f.first_non_finite_axis().is_some()) {
            return Err(ClusterError::MalformedSequence { index });
        }
    }
    Ok(())
}

fn to_sequence(frames: &[Frame], index: usize) -> Result<Sequence, ClusterError> {
    Sequence::new(frames.to_vec()).map_err(|_| ClusterError::MalformedSequence { index })
}

// ── variance ──────────────────────────────────────────────────────────────────

/// Sample standard deviation of the DTW distances from each member to `centroid`.
///
/// Returns 0 for fewer than 3 members, otherwise `sqrt(Σd² / (n - 1))`.
#[must_use]
pub fn cluster_variance<D, S>(dtw: &Dtw<D>, members: &[S], centroid: &[Frame]) -> f64
where
    D: FrameDistance,
    S: AsRef<[Frame]>,
{
    let n = members.len();
    if n < 3 {
        return 0.0;
    }
    let sum_sq: f64 = members
        .iter()
        .map(|m| dtw.distance(m.as_ref(), centroid).value().powi(2))
        .sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

// ── assign ────────────────────────────────────────────────────────────────────

/// Assign each sequence to its nearest centroid. The first centroid with a
/// strictly smaller distance wins.
fn assign<D, S>(dtw: &Dtw<D>, sequences: &[S], centroids: &[Sequence]) -> Vec<usize>
where
    D: FrameDistance,
    S: AsRef<[Frame]>,
{
    sequences
        .iter()
        .map(|s| {
            let mut best_label = 0usize;
            let mut best_dist = f64::INFINITY;
            for (c_idx, centroid) in centroids.iter().enumerate() {
                let d = dtw.distance(centroid.as_slice(), s.as_ref()).value();
                if d < best_dist {
                    best_dist = d;
                    best_label = c_idx;
                }
            }
            best_label
        })
        .collect()
}

fn members_of(assignments: &[usize], label: usize) -> Vec<usize> {
    assignments
        .iter()
        .enumerate()
        .filter_map(|(i, &l)| (l == label).then_some(i))
        .collect()
}

// ── fit ───────────────────────────────────────────────────────────────────────

#[instrument(skip_all, fields(n = sequences.len(), k = config.k))]
pub(crate) fn fit<D, S>(
    sequences: &[S],
    config: &KMeansConfig<D>,
) -> Result<Vec<Cluster>, ClusterError>
where
    D: FrameDistance,
    S: AsRef<[Frame]>,
{
    validate(sequences)?;
    let n = sequences.len();
    let k = config.k;
    let dtw = config.dba.dtw();

    if k >= n {
        debug!("k covers every sequence, returning singletons");
        return sequences
            .iter()
            .enumerate()
            .map(|(index, s)| -> Result<Cluster, ClusterError> {
                Ok(Cluster {
                    centroid: to_sequence(s.as_ref(), index)?,
                    variance: 0.0,
                    members: vec![index],
                })
            })
            .collect();
    }

    if k == 1 {
        let centroid = config.dba.average(sequences)?.average;
        let variance = cluster_variance(dtw, sequences, centroid.as_slice());
        info!(variance, "single cluster computed");
        return Ok(vec![Cluster {
            centroid,
            variance,
            members: (0..n).collect(),
        }]);
    }

    let mut rng = Rc4Random::new(&config.seed);
    let initial = rng.choose_indices(n, k);
    debug!(?initial, "initial centroids drawn");
    let mut centroids = initial
        .iter()
        .map(|&i| to_sequence(sequences[i].as_ref(), i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut assignments = assign(dtw, sequences, &centroids);

    for round in 0..config.max_iter {
        for (label, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&[Frame]> = members_of(&assignments, label)
                .into_iter()
                .map(|i| sequences[i].as_ref())
                .collect();
            if members.is_empty() {
                warn!(label, round, "cluster lost all members, keeping previous centroid");
                continue;
            }
            *centroid = config.dba.average(&members)?.average;
        }
        assignments = assign(dtw, sequences, &centroids);
        debug!(round = round + 1, "k-means round complete");
    }

    let clusters: Vec<Cluster> = centroids
        .into_iter()
        .enumerate()
        .map(|(label, centroid)| {
            let members = members_of(&assignments, label);
            let member_frames: Vec<&[Frame]> =
                members.iter().map(|&i| sequences[i].as_ref()).collect();
            let variance = cluster_variance(dtw, &member_frames, centroid.as_slice());
            Cluster {
                centroid,
                variance,
                members,
            }
        })
        .collect();

    info!(k, rounds = config.max_iter, "k-means complete");
    Ok(clusters)
}
