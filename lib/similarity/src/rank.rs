//! Mood ranking
//!
//! Scores a batch of tracks against a mood profile by cosine similarity in a
//! standardized space fit on that batch, then orders them best match first.

use crate::mood::Mood;
use moodmix_core::{
    cosine_similarity, FeatureExtractor, FeatureVector, Result, StandardScaler, Track,
};
use ordered_float::OrderedFloat;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::cmp::Reverse;
use tracing::debug;

/// A track annotated with how well it matches the target mood
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTrack {
    /// The original track
    pub track: Track,
    /// Cosine similarity in standardized space, in [-1, 1]
    pub similarity_score: f64,
    /// `similarity_score * 100` clamped to [0, 100]
    pub mood_match_percentage: f64,
    /// Cluster id, set once the track has been through clustering
    pub cluster: Option<usize>,
}

impl RankedTrack {
    pub fn new(track: Track, similarity_score: f64) -> Self {
        Self {
            track,
            similarity_score,
            mood_match_percentage: (similarity_score * 100.0).clamp(0.0, 100.0),
            cluster: None,
        }
    }

    /// The output object: the track's own fields plus the ranking annotations
    pub fn to_value(&self) -> Value {
        let mut fields = self.track.fields().clone();
        fields.insert("similarity_score".to_string(), self.similarity_score.into());
        fields.insert(
            "mood_match_percentage".to_string(),
            self.mood_match_percentage.into(),
        );
        if let Some(cluster) = self.cluster {
            fields.insert("cluster".to_string(), cluster.into());
        }
        Value::Object(fields)
    }
}

impl Serialize for RankedTrack {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl AsRef<Track> for RankedTrack {
    fn as_ref(&self) -> &Track {
        &self.track
    }
}

/// Stable sort, highest similarity first; equal scores keep their order
pub fn sort_by_similarity(tracks: &mut [RankedTrack]) {
    tracks.sort_by_key(|t| Reverse(OrderedFloat(t.similarity_score)));
}

/// Ranks tracks against mood profiles
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    extractor: FeatureExtractor,
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank by mood name; unknown names rank against the calm profile
    pub fn rank(&self, tracks: Vec<Track>, mood: &str, top_n: usize) -> Result<Vec<RankedTrack>> {
        self.rank_mood(tracks, Mood::resolve(mood), top_n)
    }

    /// Rank against a mood and keep the best `top_n`
    pub fn rank_mood(&self, tracks: Vec<Track>, mood: Mood, top_n: usize) -> Result<Vec<RankedTrack>> {
        let scores = self.similarities(&tracks, mood.profile())?;

        let mut ranked: Vec<RankedTrack> = tracks
            .into_iter()
            .zip(scores)
            .map(|(track, score)| RankedTrack::new(track, score))
            .collect();

        sort_by_similarity(&mut ranked);
        ranked.truncate(top_n);

        debug!(
            "Ranked {} tracks for mood '{}' (best score {:?})",
            ranked.len(),
            mood,
            ranked.first().map(|t| t.similarity_score)
        );
        Ok(ranked)
    }

    /// Cosine similarity of every track to `target`, in input order
    ///
    /// The target goes through the scaler fit on this batch, never a
    /// separately fit one.
    pub fn similarities(&self, tracks: &[Track], target: &FeatureVector) -> Result<Vec<f64>> {
        if tracks.is_empty() {
            return Ok(Vec::new());
        }

        let matrix = self.extractor.extract_batch(tracks);
        let (scaler, standardized) = StandardScaler::fit_transform(&matrix)?;
        let target = scaler.transform(target);

        Ok(standardized
            .iter()
            .map(|row| cosine_similarity(row, &target))
            .collect())
    }
}
