//! Mood profiles
//!
//! Each supported mood maps to a hand-tuned target point in the unscaled
//! feature space (same dimension order as [`FeatureVector`]). The table is a
//! fixed constant; lookups by name never fail and unknown names resolve to
//! [`Mood::Calm`].

use moodmix_core::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported moods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Calm,
    Angry,
    Anxious,
}

// [valence, energy, danceability, acousticness, instrumentalness, tempo, loudness]
const HAPPY: FeatureVector = [0.8, 0.7, 0.7, 0.3, 0.1, 0.65, 0.5];
const SAD: FeatureVector = [0.2, 0.3, 0.3, 0.7, 0.2, 0.4, 0.3];
const ENERGETIC: FeatureVector = [0.7, 0.9, 0.8, 0.2, 0.1, 0.8, 0.7];
const CALM: FeatureVector = [0.5, 0.3, 0.4, 0.7, 0.5, 0.4, 0.3];
const ANGRY: FeatureVector = [0.3, 0.9, 0.6, 0.2, 0.1, 0.7, 0.8];
const ANXIOUS: FeatureVector = [0.4, 0.6, 0.5, 0.4, 0.3, 0.6, 0.5];

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Calm,
        Mood::Angry,
        Mood::Anxious,
    ];

    /// Mood used for any name outside the table
    pub const FALLBACK: Mood = Mood::Calm;

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Angry => "angry",
            Mood::Anxious => "anxious",
        }
    }

    /// Exact, case-sensitive name match
    pub fn parse(name: &str) -> Option<Mood> {
        Self::ALL.iter().copied().find(|m| m.as_str() == name)
    }

    /// Like [`Mood::parse`], but unknown names become [`Mood::FALLBACK`]
    pub fn resolve(name: &str) -> Mood {
        Self::parse(name).unwrap_or(Self::FALLBACK)
    }

    /// Target feature vector for this mood
    pub fn profile(&self) -> &'static FeatureVector {
        match self {
            Mood::Happy => &HAPPY,
            Mood::Sad => &SAD,
            Mood::Energetic => &ENERGETIC,
            Mood::Calm => &CALM,
            Mood::Angry => &ANGRY,
            Mood::Anxious => &ANXIOUS,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile lookup by name, total over all strings
pub fn mood_profile(name: &str) -> &'static FeatureVector {
    Mood::resolve(name).profile()
}
