//! Playlist assembly
//!
//! Ranks a candidate batch by mood, keeps the best-matching fraction, then
//! draws from acoustic clusters in proportion so no single cluster crowds
//! out the rest. The final list is ordered by mood match.

use crate::cluster::Clusterer;
use crate::kmeans::{ClusterAlgorithm, KMeans, KMeansConfig};
use crate::mood::Mood;
use crate::rank::{sort_by_similarity, RankedTrack, Ranker};
use moodmix_core::{Error, Result, Track};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tunables for [`PlaylistAssembler`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    /// Default playlist length
    pub size: usize,
    /// Share of the ranked batch kept as candidates
    pub candidate_fraction: f64,
    /// Upper bound on the number of clusters
    pub max_clusters: usize,
    /// Candidates needed per cluster before another cluster is added
    pub min_tracks_per_cluster: usize,
    pub kmeans: KMeansConfig,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            size: 30,
            candidate_fraction: 0.6,
            max_clusters: 5,
            min_tracks_per_cluster: 3,
            kmeans: KMeansConfig::default(),
        }
    }
}

impl PlaylistConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.candidate_fraction > 0.0 && self.candidate_fraction <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "candidate_fraction must be in (0, 1], got {}",
                self.candidate_fraction
            )));
        }
        if self.max_clusters == 0 {
            return Err(Error::InvalidConfig("max_clusters must be at least 1".to_string()));
        }
        if self.min_tracks_per_cluster == 0 {
            return Err(Error::InvalidConfig(
                "min_tracks_per_cluster must be at least 1".to_string(),
            ));
        }
        if self.kmeans.n_init == 0 {
            return Err(Error::InvalidConfig("kmeans.n_init must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Builds mood-matched, cluster-balanced playlists
#[derive(Debug, Clone)]
pub struct PlaylistAssembler<A = KMeans> {
    config: PlaylistConfig,
    ranker: Ranker,
    clusterer: Clusterer<A>,
}

impl PlaylistAssembler<KMeans> {
    pub fn new(config: PlaylistConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ranker: Ranker::new(),
            clusterer: Clusterer::new(config.kmeans),
            config,
        })
    }
}

impl Default for PlaylistAssembler<KMeans> {
    fn default() -> Self {
        Self {
            config: PlaylistConfig::default(),
            ranker: Ranker::new(),
            clusterer: Clusterer::default(),
        }
    }
}

impl<A: ClusterAlgorithm> PlaylistAssembler<A> {
    /// Use a different clustering algorithm
    pub fn with_algorithm(config: PlaylistConfig, algorithm: A) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ranker: Ranker::new(),
            clusterer: Clusterer::with_algorithm(algorithm),
        })
    }

    /// Build a playlist of the configured size
    pub fn build_playlist(&self, tracks: Vec<Track>, mood: &str) -> Result<Vec<RankedTrack>> {
        self.build_playlist_with_size(tracks, mood, self.config.size)
    }

    pub fn build_playlist_with_size(
        &self,
        tracks: Vec<Track>,
        mood: &str,
        size: usize,
    ) -> Result<Vec<RankedTrack>> {
        let mood = Mood::resolve(mood);
        let total = tracks.len();

        let mut candidates = self.ranker.rank_mood(tracks, mood, total)?;
        candidates.truncate(self.candidate_count(total));

        if size == 0 {
            return Ok(Vec::new());
        }
        if candidates.len() <= size {
            debug!(
                "{} candidates fit in a playlist of {}, skipping clustering",
                candidates.len(),
                size
            );
            return Ok(candidates);
        }

        let k = (candidates.len() / self.config.min_tracks_per_cluster)
            .min(self.config.max_clusters)
            .max(1);
        let clusters = self.clusterer.cluster(candidates, k)?;

        let base = size / clusters.len();
        let remainder = size % clusters.len();

        let mut playlist = Vec::with_capacity(size);
        let mut leftovers = Vec::new();
        for (index, (_, mut members)) in clusters.into_iter().enumerate() {
            sort_by_similarity(&mut members);
            let take = base + usize::from(index < remainder);
            let rest = members.split_off(take.min(members.len()));
            playlist.extend(members);
            leftovers.extend(rest);
        }

        // Clusters smaller than their share leave gaps; fill them with the
        // best remaining candidates
        if playlist.len() < size {
            sort_by_similarity(&mut leftovers);
            leftovers.truncate(size - playlist.len());
            debug!("Backfilling {} slots from other clusters", leftovers.len());
            playlist.extend(leftovers);
        }

        sort_by_similarity(&mut playlist);
        playlist.truncate(size);

        debug!(
            "Built playlist of {} from {} tracks for mood '{}' with {} clusters",
            playlist.len(),
            total,
            mood,
            k
        );
        Ok(playlist)
    }

    /// floor(total * candidate_fraction)
    fn candidate_count(&self, total: usize) -> usize {
        (total as f64 * self.config.candidate_fraction).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodmix_core::Result as CoreResult;
    use moodmix_core::FeatureVector;
    use crate::kmeans::ClusterAssignment;
    use serde_json::json;

    fn assembler() -> PlaylistAssembler {
        PlaylistAssembler::default()
    }

    fn synthetic(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| {
                let x = (i as f64 + 0.5) / n as f64;
                Track::from_value(json!({
                    "id": format!("track-{}", i),
                    "name": format!("Song {}", i),
                    "valence": x,
                    "energy": (x * 3.0) % 1.0,
                    "danceability": (x * 5.0) % 1.0,
                    "acousticness": 1.0 - x,
                    "instrumentalness": (x * 7.0) % 1.0,
                    "tempo": 60.0 + 130.0 * ((x * 2.0) % 1.0),
                    "loudness": -35.0 + 30.0 * x
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_small_batch_skips_clustering() {
        let assembler = assembler();
        let playlist = assembler.build_playlist_with_size(synthetic(20), "happy", 30).unwrap();

        // 60% of 20
        assert_eq!(playlist.len(), 12);
        assert!(playlist.iter().all(|t| t.cluster.is_none()));

        let ranked = Ranker::new().rank(synthetic(20), "happy", 12).unwrap();
        assert_eq!(playlist, ranked);
    }

    #[test]
    fn test_clustered_playlist() {
        let assembler = assembler();
        let playlist = assembler.build_playlist_with_size(synthetic(100), "sad", 20).unwrap();

        assert_eq!(playlist.len(), 20);
        assert!(playlist.iter().all(|t| t.cluster.is_some()));
        for pair in playlist.windows(2) {
            assert!(pair[0].similarity_score >= pair[1].similarity_score);
        }
    }

    #[test]
    fn test_default_size() {
        let playlist = assembler()
            .build_playlist(synthetic(200), "angry")
            .unwrap();
        assert_eq!(playlist.len(), 30);
    }

    #[test]
    fn test_empty_and_zero_size() {
        let assembler = assembler();
        assert!(assembler.build_playlist(Vec::new(), "calm").unwrap().is_empty());
        assert!(assembler
            .build_playlist_with_size(synthetic(50), "calm", 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_single_cluster_when_few_candidates() {
        // 4 tracks -> 2 candidates -> k = max(1, 2 / 3)
        let playlist = assembler()
            .build_playlist_with_size(synthetic(4), "happy", 1)
            .unwrap();
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0].cluster, Some(0));
    }

    #[test]
    fn test_deterministic() {
        let assembler = assembler();
        let a = assembler.build_playlist_with_size(synthetic(60), "energetic", 10).unwrap();
        let b = assembler.build_playlist_with_size(synthetic(60), "energetic", 10).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    /// Puts one track in cluster 0 and everything else in cluster 1
    struct Lopsided;

    impl ClusterAlgorithm for Lopsided {
        fn assign(&self, points: &[FeatureVector], _k: usize) -> CoreResult<ClusterAssignment> {
            let labels = (0..points.len()).map(|i| usize::from(i > 0)).collect();
            Ok(ClusterAssignment { labels, inertia: 0.0 })
        }
    }

    #[test]
    fn test_proportional_draw_with_backfill() {
        let assembler =
            PlaylistAssembler::with_algorithm(PlaylistConfig::default(), Lopsided).unwrap();
        let playlist = assembler.build_playlist_with_size(synthetic(50), "happy", 10).unwrap();

        // Cluster 0 can only give one of its five slots; the rest come from cluster 1
        assert_eq!(playlist.len(), 10);
        assert_eq!(playlist.iter().filter(|t| t.cluster == Some(0)).count(), 1);
        assert_eq!(playlist.iter().filter(|t| t.cluster == Some(1)).count(), 9);
    }

    #[test]
    fn test_invalid_config() {
        let config = PlaylistConfig {
            candidate_fraction: 0.0,
            ..PlaylistConfig::default()
        };
        assert!(matches!(
            PlaylistAssembler::new(config),
            Err(Error::InvalidConfig(_))
        ));

        let config = PlaylistConfig {
            max_clusters: 0,
            ..PlaylistConfig::default()
        };
        assert!(PlaylistAssembler::new(config).is_err());
    }
}
