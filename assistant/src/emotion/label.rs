//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Canonical emotion labels and detections

use chrono::{DateTime, Utc};
use docent_common::emotion::EmotionResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of emotions the assistant reacts to
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Fear,
    Surprise,
    Disgust,
    #[default]
    Neutral,
}

impl Emotion {
    /// Every label, in reporting order
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
        }
    }

    /// Map a raw classifier label onto the canonical set
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Empty labels are neutral; unknown labels are neutral with a warning.
    pub fn normalize(raw: &str) -> Emotion {
        let label = raw.trim().to_lowercase();
        match label.as_str() {
            "" => Emotion::Neutral,
            "happy" | "joyful" | "pleased" | "glad" | "cheerful" => Emotion::Happy,
            "sad" | "upset" | "depressed" | "disappointed" => Emotion::Sad,
            "angry" | "furious" | "mad" | "irritated" => Emotion::Angry,
            "fear" | "fearful" | "afraid" | "scared" => Emotion::Fear,
            "surprise" | "shocked" | "amazed" | "astonished" => Emotion::Surprise,
            "disgust" | "revolted" | "repulsed" | "sickened" => Emotion::Disgust,
            "neutral" | "calm" | "peaceful" | "relaxed" => Emotion::Neutral,
            _ => {
                tracing::warn!("Unknown emotion '{}', defaulting to neutral", label);
                Emotion::Neutral
            }
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized classifier result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionDetection {
    pub emotion: Emotion,
    /// Always within [0, 1]
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}

impl EmotionDetection {
    pub fn new(emotion: Emotion, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            emotion,
            confidence,
            timestamp: Utc::now(),
        }
    }

    pub fn from_result(result: &EmotionResult) -> Self {
        let detection = Self::new(Emotion::normalize(&result.emotion), result.confidence);
        if detection.emotion.as_str() != result.emotion {
            tracing::debug!(
                "Emotion detected: {} (was: {}, confidence {:.2})",
                detection.emotion,
                result.emotion,
                detection.confidence
            );
        } else {
            tracing::debug!(
                "Emotion detected: {} (confidence {:.2})",
                detection.emotion,
                detection.confidence
            );
        }
        detection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_synonyms() {
        assert_eq!(Emotion::normalize("fearful"), Emotion::Fear);
        assert_eq!(Emotion::normalize("Scared"), Emotion::Fear);
        assert_eq!(Emotion::normalize("  JOYFUL "), Emotion::Happy);
        assert_eq!(Emotion::normalize("disappointed"), Emotion::Sad);
        assert_eq!(Emotion::normalize("irritated"), Emotion::Angry);
        assert_eq!(Emotion::normalize("astonished"), Emotion::Surprise);
        assert_eq!(Emotion::normalize("sickened"), Emotion::Disgust);
        assert_eq!(Emotion::normalize("relaxed"), Emotion::Neutral);
    }

    #[test]
    fn test_normalize_canonical_labels_are_identity() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::normalize(emotion.as_str()), emotion);
        }
    }

    #[test]
    fn test_normalize_unknown_and_empty() {
        assert_eq!(Emotion::normalize(""), Emotion::Neutral);
        assert_eq!(Emotion::normalize("   "), Emotion::Neutral);
        assert_eq!(Emotion::normalize("bored"), Emotion::Neutral);
    }

    #[test]
    fn test_detection_clamps_confidence() {
        assert_eq!(EmotionDetection::new(Emotion::Happy, 1.7).confidence, 1.0);
        assert_eq!(EmotionDetection::new(Emotion::Happy, -0.2).confidence, 0.0);
        assert_eq!(EmotionDetection::new(Emotion::Happy, f32::NAN).confidence, 0.0);
    }

    #[test]
    fn test_detection_from_result() {
        let result = EmotionResult {
            emotion: "Afraid".to_string(),
            confidence: 0.64,
            probabilities: None,
        };
        let detection = EmotionDetection::from_result(&result);
        assert_eq!(detection.emotion, Emotion::Fear);
        assert!((detection.confidence - 0.64).abs() < f32::EPSILON);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Emotion::Surprise).unwrap(), "\"surprise\"");
        assert_eq!(
            serde_json::from_str::<Emotion>("\"disgust\"").unwrap(),
            Emotion::Disgust
        );
    }
}
