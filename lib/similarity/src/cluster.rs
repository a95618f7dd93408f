//! Acoustic clustering of a track batch.

use crate::kmeans::{ClusterAlgorithm, KMeans, KMeansConfig};
use crate::rank::RankedTrack;
use moodmix_core::{Error, FeatureExtractor, Result, StandardScaler, Track};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Cluster id to its member tracks, in input order, ids ascending
pub type Clusters<T> = BTreeMap<usize, Vec<T>>;

/// Anything that can be clustered and tagged with its cluster id
pub trait ClusterMember: AsRef<Track> {
    fn set_cluster(&mut self, id: usize);
}

impl ClusterMember for Track {
    fn set_cluster(&mut self, id: usize) {
        self.set_metadata("cluster", id.into());
    }
}

impl ClusterMember for RankedTrack {
    fn set_cluster(&mut self, id: usize) {
        self.cluster = Some(id);
    }
}

/// Groups tracks by acoustic similarity
#[derive(Debug, Clone)]
pub struct Clusterer<A = KMeans> {
    algorithm: A,
    extractor: FeatureExtractor,
}

impl Clusterer<KMeans> {
    pub fn new(config: KMeansConfig) -> Self {
        Self::with_algorithm(KMeans::new(config))
    }
}

impl Default for Clusterer<KMeans> {
    fn default() -> Self {
        Self::new(KMeansConfig::default())
    }
}

impl<A: ClusterAlgorithm> Clusterer<A> {
    pub fn with_algorithm(algorithm: A) -> Self {
        Self {
            algorithm,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Partition `tracks` into `k` clusters
    ///
    /// A batch smaller than `k` clusters into `max(2, n / 2)` groups instead;
    /// fewer than 2 tracks cannot be clustered that way and is an error.
    pub fn cluster<T: ClusterMember>(&self, tracks: Vec<T>, k: usize) -> Result<Clusters<T>> {
        if k == 0 {
            return Err(Error::InvalidClusterCount(k));
        }

        let n = tracks.len();
        let k = if n < k {
            let reduced = (n / 2).max(2);
            warn!("Only {} tracks for {} clusters, using k={}", n, k, reduced);
            reduced
        } else {
            k
        };
        if n < k {
            return Err(Error::TooFewTracks {
                required: k,
                actual: n,
            });
        }

        // Fresh standardization, independent of any ranking scaler
        let matrix: Vec<_> = tracks
            .iter()
            .map(|t| self.extractor.extract(t.as_ref()))
            .collect();
        let (_, standardized) = StandardScaler::fit_transform(&matrix)?;

        let assignment = self.algorithm.assign(&standardized, k)?;

        let mut clusters: Clusters<T> = BTreeMap::new();
        for (mut track, label) in tracks.into_iter().zip(assignment.labels) {
            track.set_cluster(label);
            clusters.entry(label).or_default().push(track);
        }

        debug!(
            "Clustered {} tracks into {} groups: {:?}",
            n,
            clusters.len(),
            clusters.values().map(Vec::len).collect::<Vec<_>>()
        );
        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| {
                let x = i as f64 / n as f64;
                Track::from_value(json!({
                    "id": i,
                    "valence": x,
                    "energy": 1.0 - x,
                    "danceability": (x * 7.0) % 1.0,
                    "acousticness": (x * 3.0) % 1.0,
                    "tempo": 60.0 + 120.0 * x,
                    "loudness": -30.0 + 25.0 * ((x * 5.0) % 1.0)
                }))
                .unwrap()
            })
            .collect()
    }

    fn ids<T: AsRef<Track>>(clusters: &Clusters<T>) -> Vec<i64> {
        let mut ids: Vec<i64> = clusters
            .values()
            .flatten()
            .filter_map(|t| t.as_ref().get("id").and_then(|v| v.as_i64()))
            .collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_partitions_input() {
        let clusters = Clusterer::new(KMeansConfig::default()).cluster(tracks(20), 5).unwrap();
        assert_eq!(clusters.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_eq!(ids(&clusters), (0..20).collect::<Vec<_>>());

        for (id, members) in &clusters {
            for t in members {
                assert_eq!(t.get("cluster"), Some(&json!(*id)));
            }
        }
    }

    #[test]
    fn test_reduces_k_for_small_batches() {
        let clusters = Clusterer::new(KMeansConfig::default()).cluster(tracks(3), 5).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(ids(&clusters), vec![0, 1, 2]);

        let clusters = Clusterer::new(KMeansConfig::default()).cluster(tracks(9), 10).unwrap();
        assert_eq!(clusters.len(), 4);
    }

    #[test]
    fn test_too_few_tracks() {
        let err = Clusterer::new(KMeansConfig::default()).cluster(tracks(1), 5).unwrap_err();
        assert!(matches!(err, Error::TooFewTracks { required: 2, actual: 1 }));
        assert!(Clusterer::new(KMeansConfig::default()).cluster(Vec::<Track>::new(), 2).is_err());
        assert!(matches!(
            Clusterer::new(KMeansConfig::default()).cluster(tracks(4), 0),
            Err(Error::InvalidClusterCount(0))
        ));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut batch = tracks(4);
        batch.extend(tracks(4));
        let clusters = Clusterer::new(KMeansConfig::default()).cluster(batch, 3).unwrap();
        assert_eq!(ids(&clusters), vec![0, 0, 1, 1, 2, 2, 3, 3]);
        assert_eq!(clusters.len(), 3);
    }

    #[test]
    fn test_deterministic() {
        let a = Clusterer::new(KMeansConfig::default()).cluster(tracks(25), 5).unwrap();
        let b = Clusterer::new(KMeansConfig::default()).cluster(tracks(25), 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_existing_cluster_field_is_replaced() {
        let batch: Vec<Track> = tracks(6)
            .into_iter()
            .map(|mut t| {
                t.set_metadata("cluster", json!("stale"));
                t
            })
            .collect();
        let clusters = Clusterer::new(KMeansConfig::default()).cluster(batch, 2).unwrap();
        for (id, members) in &clusters {
            for t in members {
                assert_eq!(t.get("cluster"), Some(&json!(*id)));
            }
        }
    }

    #[test]
    fn test_ranked_tracks_get_cluster_field() {
        let ranked: Vec<RankedTrack> = tracks(6)
            .into_iter()
            .map(|t| RankedTrack::new(t, 0.5))
            .collect();
        let clusters = Clusterer::new(KMeansConfig::default()).cluster(ranked, 2).unwrap();
        for (id, members) in clusters {
            assert!(members.iter().all(|t| t.cluster == Some(id)));
        }
    }
}
