//! # moodmix Similarity
//!
//! The playlist engine: mood ranking, acoustic clustering and balanced
//! playlist assembly over a batch of candidate tracks.
//!
//! ## Features
//!
//! - **Mood Profiles**: Fixed target feature vectors for six moods, unknown names fall back to calm
//! - **Ranking**: Cosine similarity to the mood profile in a per-batch standardized space
//! - **Clustering**: Seeded, multi-restart k-means behind a pluggable [`ClusterAlgorithm`]
//! - **Assembly**: Proportional per-cluster draws so one sonic cluster cannot dominate
//! - **Emotion Aggregation**: Folds a text model's emotion labels into the six moods
//!
//! ## Example
//!
//! ```rust
//! use moodmix_core::Track;
//! use moodmix_similarity::{PlaylistAssembler, PlaylistConfig};
//! use serde_json::json;
//!
//! let tracks: Vec<Track> = (0..50)
//!     .map(|i| {
//!         let x = i as f64 / 50.0;
//!         Track::from_value(json!({"id": i, "energy": x, "valence": 1.0 - x, "tempo": 80.0 + 100.0 * x}))
//!             .unwrap()
//!     })
//!     .collect();
//!
//! let assembler = PlaylistAssembler::new(PlaylistConfig::default()).unwrap();
//! let playlist = assembler.build_playlist_with_size(tracks, "energetic", 10).unwrap();
//! assert_eq!(playlist.len(), 10);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Tracks    │────>│   Ranker    │────>│ Top 60% of  │
//! │  (batch)    │     │ (mood sim)  │     │ candidates  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            ^                   │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │    Mood     │     │  Clusterer  │
//!                     │  Profiles   │     │  (k-means)  │
//!                     └─────────────┘     └─────────────┘
//!                                                │
//!                                         ┌─────────────┐
//!                                         │  Assembler  │
//!                                         │ (per-cluster│
//!                                         │    draw)    │
//!                                         └─────────────┘
//! ```

pub mod cluster;
pub mod emotion;
pub mod kmeans;
pub mod mood;
pub mod playlist;
pub mod rank;

// Re-export main types for convenience
pub use cluster::{ClusterMember, Clusterer, Clusters};
pub use emotion::{
    aggregate_emotions, mood_for_label, EmotionModel, EmotionScore, MoodClassifier,
    MoodConfidence, MoodPrediction,
};
pub use kmeans::{ClusterAlgorithm, ClusterAssignment, KMeans, KMeansConfig};
pub use mood::{mood_profile, Mood};
pub use playlist::{PlaylistAssembler, PlaylistConfig};
pub use rank::{sort_by_similarity, RankedTrack, Ranker};
