//! Text mood classification boundary
//!
//! The text classifier itself is an external model that scores fine-grained
//! emotion labels (the 28 GoEmotions labels). This module folds those scores
//! into the six playlist moods. A mood's confidence is the highest score of
//! any label mapped to it, not the sum, so it never exceeds 100%.

use crate::mood::Mood;
use moodmix_core::{Error, Result};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Longest input, in characters, handed to the model
pub const MAX_TEXT_CHARS: usize = 512;

/// One label scored by an emotion model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    /// Probability in [0, 1]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodConfidence {
    pub mood: Mood,
    /// Percentage, rounded to two decimals
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodPrediction {
    pub mood: Mood,
    pub confidence: f64,
    pub all_predictions: Vec<MoodConfidence>,
}

/// Playlist mood for an emotion label; unknown labels are calm
pub fn mood_for_label(label: &str) -> Mood {
    match label {
        "joy" | "amusement" | "excitement" | "love" | "gratitude" | "approval" | "admiration"
        | "pride" | "relief" | "optimism" => Mood::Happy,
        "sadness" | "grief" | "remorse" | "disappointment" | "embarrassment" => Mood::Sad,
        "anger" | "annoyance" | "disapproval" | "disgust" => Mood::Angry,
        "fear" | "nervousness" | "confusion" => Mood::Anxious,
        "desire" | "caring" | "curiosity" => Mood::Energetic,
        _ => Mood::Calm,
    }
}

/// Fold label scores into per-mood confidences, best first
pub fn aggregate_emotions(scores: &[EmotionScore]) -> Result<MoodPrediction> {
    let mut sorted: Vec<&EmotionScore> = scores.iter().collect();
    sorted.sort_by_key(|s| Reverse(OrderedFloat(s.score)));

    let mut by_mood: Vec<(Mood, f64)> = Vec::new();
    for emotion in sorted {
        let mood = mood_for_label(&emotion.label);
        match by_mood.iter_mut().find(|(m, _)| *m == mood) {
            Some((_, best)) => *best = best.max(emotion.score),
            None => by_mood.push((mood, emotion.score)),
        }
    }

    let mut all_predictions: Vec<MoodConfidence> = by_mood
        .into_iter()
        .map(|(mood, score)| MoodConfidence {
            mood,
            confidence: round_percent(score),
        })
        .collect();
    all_predictions.sort_by_key(|p| Reverse(OrderedFloat(p.confidence)));

    let primary = all_predictions
        .first()
        .ok_or_else(|| Error::Classification("model returned no emotion scores".to_string()))?;

    Ok(MoodPrediction {
        mood: primary.mood,
        confidence: primary.confidence,
        all_predictions,
    })
}

fn round_percent(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}

/// A pretrained emotion model, loaded once and reused across calls
pub trait EmotionModel: Send + Sync {
    fn predict(&self, text: &str) -> Result<Vec<EmotionScore>>;
}

/// Classifies free text into a playlist mood
#[derive(Debug, Clone)]
pub struct MoodClassifier<M> {
    model: M,
}

impl<M: EmotionModel> MoodClassifier<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn classify(&self, text: &str) -> Result<MoodPrediction> {
        let text: String = text.chars().take(MAX_TEXT_CHARS).collect();
        let scores = self.model.predict(&text)?;
        aggregate_emotions(&scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn score(label: &str, score: f64) -> EmotionScore {
        EmotionScore {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(mood_for_label("joy"), Mood::Happy);
        assert_eq!(mood_for_label("grief"), Mood::Sad);
        assert_eq!(mood_for_label("annoyance"), Mood::Angry);
        assert_eq!(mood_for_label("nervousness"), Mood::Anxious);
        assert_eq!(mood_for_label("curiosity"), Mood::Energetic);
        assert_eq!(mood_for_label("neutral"), Mood::Calm);
        assert_eq!(mood_for_label("something-else"), Mood::Calm);
    }

    #[test]
    fn test_max_not_sum() {
        let prediction = aggregate_emotions(&[
            score("joy", 0.3),
            score("amusement", 0.25),
            score("excitement", 0.2),
            score("sadness", 0.4),
        ])
        .unwrap();

        // Happy labels sum to 0.75 but only the max counts
        assert_eq!(prediction.mood, Mood::Sad);
        assert_eq!(prediction.confidence, 40.0);
        assert_eq!(prediction.all_predictions.len(), 2);
        assert_eq!(prediction.all_predictions[1].mood, Mood::Happy);
        assert_eq!(prediction.all_predictions[1].confidence, 30.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let prediction = aggregate_emotions(&[score("fear", 0.123456)]).unwrap();
        assert_eq!(prediction.mood, Mood::Anxious);
        assert_eq!(prediction.confidence, 12.35);
    }

    #[test]
    fn test_empty_scores() {
        assert!(matches!(aggregate_emotions(&[]), Err(Error::Classification(_))));
    }

    struct RecordingModel {
        seen: Mutex<Vec<usize>>,
    }

    impl EmotionModel for RecordingModel {
        fn predict(&self, text: &str) -> Result<Vec<EmotionScore>> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(text.chars().count());
            }
            Ok(vec![score("desire", 0.9), score("neutral", 0.1)])
        }
    }

    #[test]
    fn test_classifier_truncates_input() {
        let classifier = MoodClassifier::new(RecordingModel {
            seen: Mutex::new(Vec::new()),
        });
        let prediction = classifier.classify(&"é".repeat(600)).unwrap();
        assert_eq!(prediction.mood, Mood::Energetic);
        assert_eq!(prediction.confidence, 90.0);
        assert_eq!(*classifier.model.seen.lock().unwrap(), vec![MAX_TEXT_CHARS]);
    }
}
