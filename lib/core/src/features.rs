//! Feature extraction
//!
//! Turns tracks into fixed-order 7-dimensional feature vectors. Missing
//! fields fall back to neutral defaults; tempo and loudness are rescaled to a
//! nominal [0, 1] range so every dimension is comparable before
//! standardization.

use crate::track::{AudioFeatures, Track};

/// Number of dimensions in a [`FeatureVector`]
pub const FEATURE_DIM: usize = 7;

/// `[valence, energy, danceability, acousticness, instrumentalness,
/// normalized_tempo, normalized_loudness]`
pub type FeatureVector = [f64; FEATURE_DIM];

pub const DEFAULT_VALENCE: f64 = 0.5;
pub const DEFAULT_ENERGY: f64 = 0.5;
pub const DEFAULT_DANCEABILITY: f64 = 0.5;
pub const DEFAULT_ACOUSTICNESS: f64 = 0.5;
pub const DEFAULT_INSTRUMENTALNESS: f64 = 0.0;
pub const DEFAULT_TEMPO: f64 = 120.0;
pub const DEFAULT_LOUDNESS: f64 = -10.0;

const TEMPO_MIN_BPM: f64 = 40.0;
const TEMPO_SPAN_BPM: f64 = 160.0;
const LOUDNESS_FLOOR_DB: f64 = -60.0;

/// Map 40..200 BPM onto 0..1. Out-of-range tempos are not clamped.
#[inline]
pub fn normalize_tempo(tempo: f64) -> f64 {
    (tempo - TEMPO_MIN_BPM) / TEMPO_SPAN_BPM
}

/// Map -60..0 dB onto 0..1. Out-of-range values are not clamped.
#[inline]
pub fn normalize_loudness(loudness: f64) -> f64 {
    (loudness - LOUDNESS_FLOOR_DB) / -LOUDNESS_FLOOR_DB
}

/// Stateless converter from tracks to feature vectors
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Feature vector for raw audio features, applying defaults
    pub fn vectorize(&self, features: &AudioFeatures) -> FeatureVector {
        [
            features.valence.unwrap_or(DEFAULT_VALENCE),
            features.energy.unwrap_or(DEFAULT_ENERGY),
            features.danceability.unwrap_or(DEFAULT_DANCEABILITY),
            features.acousticness.unwrap_or(DEFAULT_ACOUSTICNESS),
            features.instrumentalness.unwrap_or(DEFAULT_INSTRUMENTALNESS),
            normalize_tempo(features.tempo.unwrap_or(DEFAULT_TEMPO)),
            normalize_loudness(features.loudness.unwrap_or(DEFAULT_LOUDNESS)),
        ]
    }

    #[inline]
    pub fn extract(&self, track: &Track) -> FeatureVector {
        self.vectorize(track.features())
    }

    /// N x 7 feature matrix, rows in input order
    pub fn extract_batch(&self, tracks: &[Track]) -> Vec<FeatureVector> {
        tracks.iter().map(|t| self.extract(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_tempo() {
        assert_eq!(normalize_tempo(40.0), 0.0);
        assert_eq!(normalize_tempo(200.0), 1.0);
        assert_eq!(normalize_tempo(120.0), 0.5);
        // No clamping outside the nominal range
        assert!(normalize_tempo(20.0) < 0.0);
        assert!(normalize_tempo(240.0) > 1.0);
    }

    #[test]
    fn test_normalize_loudness() {
        assert_eq!(normalize_loudness(-60.0), 0.0);
        assert_eq!(normalize_loudness(0.0), 1.0);
        assert!(normalize_loudness(3.0) > 1.0);
    }

    #[test]
    fn test_defaults_for_empty_track() {
        let track = Track::from_value(json!({"id": "empty"})).unwrap();
        let v = FeatureExtractor::new().extract(&track);
        assert_eq!(
            v,
            [
                0.5,
                0.5,
                0.5,
                0.5,
                0.0,
                normalize_tempo(120.0),
                normalize_loudness(-10.0)
            ]
        );
    }

    #[test]
    fn test_extract_uses_present_fields() {
        let track = Track::from_value(json!({
            "valence": 0.1,
            "energy": 0.9,
            "tempo": 200,
            "loudness": -60
        }))
        .unwrap();
        let v = FeatureExtractor::new().extract(&track);
        assert_eq!(v[0], 0.1);
        assert_eq!(v[1], 0.9);
        assert_eq!(v[2], DEFAULT_DANCEABILITY);
        assert_eq!(v[5], 1.0);
        assert_eq!(v[6], 0.0);
    }

    #[test]
    fn test_extract_batch_preserves_order() {
        let tracks: Vec<Track> = (0..4)
            .map(|i| Track::from_value(json!({"valence": i as f64 / 10.0})).unwrap())
            .collect();
        let matrix = FeatureExtractor::new().extract_batch(&tracks);
        assert_eq!(matrix.len(), 4);
        for (i, row) in matrix.iter().enumerate() {
            assert_eq!(row[0], i as f64 / 10.0);
        }
    }
}
