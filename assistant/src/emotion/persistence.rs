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

//! Emotion persistence tracking
//!
//! A label seen on enough consecutive detections becomes persistent. A
//! persistent emotion holds for a fixed duration and then fades to neutral.

use super::label::{Emotion, EmotionDetection};
use crate::config::PersistenceConfig;
use docent_common::dialogue::EmotionalStateSnapshot;

/// Current persisted emotional state
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionalState {
    pub emotion: Emotion,
    pub intensity: f32,
    pub consecutive_count: u32,
    pub is_persistent: bool,
    /// Seconds since the emotion became persistent
    pub duration: f32,
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self {
            emotion: Emotion::Neutral,
            intensity: 0.0,
            consecutive_count: 0,
            is_persistent: false,
            duration: 0.0,
        }
    }
}

pub struct PersistenceTracker {
    config: PersistenceConfig,
    state: EmotionalState,
}

impl PersistenceTracker {
    pub fn new(config: PersistenceConfig) -> Self {
        Self {
            config,
            state: EmotionalState::default(),
        }
    }

    pub fn state(&self) -> &EmotionalState {
        &self.state
    }

    pub fn snapshot(&self) -> EmotionalStateSnapshot {
        EmotionalStateSnapshot {
            current_emotion: self.state.emotion.as_str().to_string(),
            intensity: self.state.intensity,
            consecutive_count: self.state.consecutive_count,
            is_persistent: self.state.is_persistent,
        }
    }

    /// Fold a detection into the state
    ///
    /// Returns true when this detection made the emotion persistent.
    pub fn ingest(&mut self, detection: &EmotionDetection) -> bool {
        let state = &mut self.state;
        if detection.emotion == state.emotion {
            state.consecutive_count += 1;
            state.intensity = state.intensity.max(detection.confidence);
        } else {
            state.emotion = detection.emotion;
            state.consecutive_count = 1;
            state.intensity = detection.confidence;
            state.duration = 0.0;
            state.is_persistent = false;
        }

        if self.config.enabled
            && state.consecutive_count >= self.config.consecutive_threshold
            && !state.is_persistent
        {
            state.is_persistent = true;
            state.duration = 0.0;
            tracing::info!("Emotion '{}' is now persistent", state.emotion);
            return true;
        }
        false
    }

    /// Advance the persistence timer
    ///
    /// Returns true exactly once when a persistent emotion fades to neutral.
    pub fn tick(&mut self, delta_time: f32) -> bool {
        if !self.config.enabled || !self.state.is_persistent {
            return false;
        }

        self.state.duration += delta_time;
        if self.state.duration < self.config.persistent_duration_secs {
            return false;
        }

        tracing::info!("Persistent emotion '{}' has faded", self.state.emotion);
        self.state = EmotionalState::default();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(emotion: Emotion, confidence: f32) -> EmotionDetection {
        EmotionDetection::new(emotion, confidence)
    }

    fn tracker(threshold: u32) -> PersistenceTracker {
        PersistenceTracker::new(PersistenceConfig {
            consecutive_threshold: threshold,
            ..Default::default()
        })
    }

    #[test]
    fn test_persistent_exactly_at_threshold() {
        let mut tracker = tracker(3);
        assert!(!tracker.ingest(&detection(Emotion::Sad, 0.5)));
        assert!(!tracker.ingest(&detection(Emotion::Sad, 0.5)));
        assert!(!tracker.state().is_persistent);
        assert!(tracker.ingest(&detection(Emotion::Sad, 0.5)));
        assert!(tracker.state().is_persistent);
        // No second notification while it stays persistent
        assert!(!tracker.ingest(&detection(Emotion::Sad, 0.5)));
        assert_eq!(tracker.state().consecutive_count, 4);
    }

    #[test]
    fn test_intensity_keeps_the_maximum() {
        let mut tracker = tracker(5);
        tracker.ingest(&detection(Emotion::Angry, 0.4));
        tracker.ingest(&detection(Emotion::Angry, 0.9));
        tracker.ingest(&detection(Emotion::Angry, 0.6));
        assert!((tracker.state().intensity - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_persistent_emotion_holds_its_peak() {
        let mut tracker = tracker(2);
        assert!(!tracker.ingest(&detection(Emotion::Happy, 0.9)));
        assert!(!tracker.state().is_persistent);

        assert!(tracker.ingest(&detection(Emotion::Happy, 0.8)));
        let state = tracker.state();
        assert!(state.is_persistent);
        assert_eq!(state.consecutive_count, 2);
        assert!((state.intensity - 0.9).abs() < f32::EPSILON);

        assert!(!tracker.ingest(&detection(Emotion::Happy, 0.7)));
        let state = tracker.state();
        assert!(state.is_persistent);
        assert_eq!(state.consecutive_count, 3);
        assert!((state.intensity - 0.9).abs() < f32::EPSILON);
        assert!((tracker.snapshot().intensity - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_label_change_resets() {
        let mut tracker = tracker(2);
        tracker.ingest(&detection(Emotion::Happy, 0.8));
        tracker.ingest(&detection(Emotion::Happy, 0.8));
        assert!(tracker.state().is_persistent);

        tracker.ingest(&detection(Emotion::Fear, 0.3));
        let state = tracker.state();
        assert_eq!(state.emotion, Emotion::Fear);
        assert_eq!(state.consecutive_count, 1);
        assert!((state.intensity - 0.3).abs() < f32::EPSILON);
        assert!(!state.is_persistent);
        assert_eq!(state.duration, 0.0);
    }

    #[test]
    fn test_decay_reverts_once() {
        let mut tracker = tracker(2);
        tracker.ingest(&detection(Emotion::Happy, 0.8));
        tracker.ingest(&detection(Emotion::Happy, 0.8));

        assert!(!tracker.tick(4.0));
        assert!(!tracker.tick(3.9));
        assert!(tracker.tick(0.2));
        assert_eq!(tracker.state(), &EmotionalState::default());
        assert!(!tracker.tick(10.0));
        assert!(!tracker.tick(10.0));
    }

    #[test]
    fn test_disabled_never_persists() {
        let mut tracker = PersistenceTracker::new(PersistenceConfig {
            enabled: false,
            ..Default::default()
        });
        for _ in 0..5 {
            assert!(!tracker.ingest(&detection(Emotion::Sad, 0.7)));
        }
        assert!(!tracker.state().is_persistent);
        assert_eq!(tracker.state().consecutive_count, 5);
        assert!(!tracker.tick(100.0));
    }

    #[test]
    fn test_snapshot() {
        let mut tracker = tracker(2);
        tracker.ingest(&detection(Emotion::Surprise, 0.5));
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.current_emotion, "surprise");
        assert_eq!(snapshot.consecutive_count, 1);
        assert!(!snapshot.is_persistent);
    }
}
