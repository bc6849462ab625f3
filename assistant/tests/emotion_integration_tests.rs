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

//! Integration tests for the emotion pipeline: detection, persistence and expression

use docent_assistant::Configuration;
use docent_assistant::emotion::{Emotion, EmotionDetection};
use docent_assistant::events::AssistantEvent;
use docent_assistant::testing::{ScriptedClassifier, StaticMusic, TestHarness, gallery_scene};
use docent_common::emotion::EmotionResult;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn harness() -> (TestHarness, Arc<Mutex<Vec<AssistantEvent>>>) {
    let h = TestHarness::new(&Configuration::default(), &gallery_scene());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    h.assistant
        .bus()
        .subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    (h, events)
}

fn emotion_events(events: &Arc<Mutex<Vec<AssistantEvent>>>) -> Vec<(Emotion, bool)> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|event| match event {
            AssistantEvent::EmotionStateChanged {
                emotion,
                persistent,
                ..
            } => Some((*emotion, *persistent)),
            _ => None,
        })
        .collect()
}

fn joyful(confidence: f32) -> EmotionResult {
    EmotionResult {
        emotion: "joyful".to_string(),
        confidence,
        probabilities: None,
    }
}

#[test]
fn test_repeated_emotion_persists_then_fades() {
    let (mut h, events) = harness();

    h.assistant
        .submit_detection(EmotionDetection::new(Emotion::Happy, 0.5));
    assert!(!h.assistant.persistence().state().is_persistent);
    let smile = h.assistant.expression().target_face().mouth_smile_left;
    assert!((smile - 0.5).abs() < 1e-5);

    h.assistant
        .submit_detection(EmotionDetection::new(Emotion::Happy, 0.5));
    assert!(h.assistant.persistence().state().is_persistent);
    let smile = h.assistant.expression().target_face().mouth_smile_left;
    assert!((smile - 0.6).abs() < 1e-5, "persistent smile was {smile}");

    h.assistant
        .submit_detection(EmotionDetection::new(Emotion::Happy, 0.4));
    h.assistant.tick(0.1);
    assert_eq!(emotion_events(&events), vec![(Emotion::Happy, true)]);
    assert_eq!(
        h.assistant.snapshot().assistant.emotional_state.consecutive_count,
        3
    );

    h.run(9.0, 0.1);
    assert_eq!(
        emotion_events(&events),
        vec![(Emotion::Happy, true), (Emotion::Neutral, false)]
    );
    assert!(!h.assistant.persistence().state().is_persistent);
    assert_eq!(h.assistant.expression().target_face().mouth_smile_left, 0.0);
    assert!(h.assistant.expression().face().mouth_smile_left < 0.01);

    let snapshot = h.assistant.snapshot();
    assert_eq!(snapshot.assistant.emotional_state.current_emotion, "neutral");
    // Statistics outlive the persisted state
    assert_eq!(h.assistant.statistics().count(Emotion::Happy), 3);
}

#[test]
fn test_interrupted_streak_never_persists() {
    let (mut h, events) = harness();
    for emotion in [Emotion::Happy, Emotion::Sad, Emotion::Happy, Emotion::Angry] {
        h.assistant
            .submit_detection(EmotionDetection::new(emotion, 0.7));
    }
    h.run(1.0, 0.1);

    assert!(emotion_events(&events).is_empty());
    assert_eq!(h.assistant.persistence().state().emotion, Emotion::Angry);
    assert_eq!(h.assistant.persistence().state().consecutive_count, 1);

    let percentages = h.assistant.snapshot().assistant.face_percentages;
    assert_eq!(percentages.get("happy"), Some(&50.0));
    assert_eq!(percentages.get("sad"), Some(&25.0));
}

#[test]
fn test_expression_blends_toward_target() {
    let (mut h, _events) = harness();
    h.assistant
        .submit_detection(EmotionDetection::new(Emotion::Happy, 0.8));

    h.assistant.tick(0.05);
    let early = h.assistant.expression().face().mouth_smile_left;
    assert!(early > 0.0 && early < 0.8);

    h.run(2.0, 0.05);
    let settled = h.assistant.expression().face().mouth_smile_left;
    assert!((settled - 0.8).abs() < 0.01);
}

#[tokio::test(start_paused = true)]
async fn test_analysis_loop_feeds_detections() {
    let classifier = ScriptedClassifier::new([joyful(0.9), joyful(0.9)]);
    let mut h = TestHarness::with_services(
        &Configuration::default(),
        &gallery_scene(),
        classifier.clone(),
        StaticMusic::default(),
    );
    assert!(h.assistant.start_analysis());

    h.assistant.inject_audio(&[0.5; 1600], 1, 16000);
    tokio::time::sleep(Duration::from_millis(1100)).await;
    h.assistant.tick(0.016);
    assert_eq!(classifier.calls(), 1);
    assert_eq!(h.assistant.statistics().count(Emotion::Happy), 1);

    // Quiet audio is dropped before it reaches the classifier
    h.assistant.inject_audio(&[0.001; 1600], 1, 16000);
    tokio::time::sleep(Duration::from_secs(1)).await;
    h.assistant.tick(0.016);
    assert_eq!(classifier.calls(), 1);
    assert_eq!(h.assistant.statistics().total_detections(), 1);

    h.assistant.stop_analysis();
    assert!(!h.assistant.analyzer().is_analyzing());
}
