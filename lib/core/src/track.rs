//! Track records as they arrive from the caller.
//!
//! A track is a JSON object. The engine reads a handful of optional numeric
//! audio-feature fields and carries every other field through untouched, so
//! identifiers, titles and the like come back exactly as they went in.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Field names the engine reads, in feature-vector order
pub const FEATURE_FIELDS: [&str; 7] = [
    "valence",
    "energy",
    "danceability",
    "acousticness",
    "instrumentalness",
    "tempo",
    "loudness",
];

/// Audio features present on a track; absent fields stay `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub valence: Option<f64>,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    /// Beats per minute
    pub tempo: Option<f64>,
    /// Decibels, typically in [-60, 0]
    pub loudness: Option<f64>,
}

/// An opaque track record with optional audio features
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Track {
    fields: Map<String, Value>,
    features: AudioFeatures,
}

impl Track {
    /// Build a track from a JSON object
    ///
    /// Feature fields may be missing or `null`; any other non-numeric value
    /// is rejected.
    pub fn new(fields: Map<String, Value>) -> Result<Self> {
        let features = AudioFeatures {
            valence: read_feature(&fields, "valence")?,
            energy: read_feature(&fields, "energy")?,
            danceability: read_feature(&fields, "danceability")?,
            acousticness: read_feature(&fields, "acousticness")?,
            instrumentalness: read_feature(&fields, "instrumentalness")?,
            tempo: read_feature(&fields, "tempo")?,
            loudness: read_feature(&fields, "loudness")?,
        };
        Ok(Self { fields, features })
    }

    /// Build a track from any JSON value; only objects are accepted
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Self::new(fields),
            other => Err(Error::InvalidTrack(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    /// Build a track with just the given audio features set
    pub fn from_features(features: AudioFeatures) -> Self {
        let mut fields = Map::new();
        let values = [
            features.valence,
            features.energy,
            features.danceability,
            features.acousticness,
            features.instrumentalness,
            features.tempo,
            features.loudness,
        ];
        for (name, value) in FEATURE_FIELDS.iter().zip(values) {
            if let Some(v) = value.and_then(serde_json::Number::from_f64) {
                fields.insert((*name).to_string(), Value::Number(v));
            }
        }
        Self { fields, features }
    }

    /// Parse a JSON array of track objects
    pub fn parse_batch(json: &str) -> Result<Vec<Track>> {
        Ok(serde_json::from_str(json)?)
    }

    #[inline]
    pub fn features(&self) -> &AudioFeatures {
        &self.features
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    #[inline]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Attach a non-feature field such as a cluster label
    ///
    /// Audio features are fixed once the track is parsed, so a feature
    /// field name is ignored and `None` is returned.
    pub fn set_metadata(&mut self, key: &str, value: Value) -> Option<Value> {
        if FEATURE_FIELDS.contains(&key) {
            return None;
        }
        self.fields.insert(key.to_string(), value)
    }
}

impl TryFrom<Map<String, Value>> for Track {
    type Error = Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self> {
        Self::new(fields)
    }
}

impl AsRef<Track> for Track {
    fn as_ref(&self) -> &Track {
        self
    }
}

impl Serialize for Track {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

fn read_feature(fields: &Map<String, Value>, name: &str) -> Result<Option<f64>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(Error::InvalidFeature {
            field: name.to_string(),
            value: other.to_string(),
        }),
    }
}
