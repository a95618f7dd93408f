//! # moodmix
//!
//! Mood-matched, diversified playlists from a batch of candidate tracks.
//!
//! moodmix ranks tracks described by audio features (valence, energy,
//! danceability, acousticness, instrumentalness, tempo, loudness) against a
//! target mood, then re-balances the best matches across acoustic clusters so
//! the playlist is not a single sonic cluster.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! moodmix invoke energetic '[{"id": "a", "energy": 0.9, "tempo": 150}]'
//! moodmix invoke calm @tracks.json --size 20
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use moodmix::prelude::*;
//! use serde_json::json;
//!
//! let tracks = Track::parse_batch(r#"[
//!     {"id": "a", "energy": 0.9, "valence": 0.8, "tempo": 150},
//!     {"id": "b", "energy": 0.2, "valence": 0.3, "tempo": 70},
//!     {"id": "c", "energy": 0.6, "valence": 0.5, "tempo": 110}
//! ]"#).unwrap();
//!
//! let ranked = Ranker::new().rank(tracks, "energetic", 2).unwrap();
//! assert_eq!(ranked[0].track.get("id"), Some(&json!("a")));
//! ```
//!
//! ## Crate Structure
//!
//! - `moodmix-core` - Tracks, feature extraction, standardization
//! - `moodmix-similarity` - Mood profiles, ranking, k-means, playlist assembly

pub mod response;

// Re-export core types
pub use moodmix_core::{
    normalize_loudness, normalize_tempo, AudioFeatures, Error, FeatureExtractor, FeatureVector,
    Result, StandardScaler, Track, FEATURE_DIM,
};

// Re-export the engine
pub use moodmix_similarity::{
    aggregate_emotions, mood_profile, ClusterAlgorithm, Clusterer, EmotionScore, KMeans,
    KMeansConfig, Mood, MoodClassifier, MoodPrediction, PlaylistAssembler, PlaylistConfig,
    RankedTrack, Ranker,
};

pub use response::{recommend, ErrorResponse, PlaylistResponse};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Error, FeatureExtractor, KMeansConfig, Mood, PlaylistAssembler, PlaylistConfig,
        RankedTrack, Ranker, Result, Track,
    };
}
