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

//! Test utilities: recording sinks, canned services and a sample gallery

use crate::assistant::{Assistant, AssistantServices};
use crate::config::Configuration;
use crate::dialogue::{DialogueSink, SpeechSink};
use crate::emotion::EmotionClassifier;
use crate::error::{ClassifierError, MusicError};
use crate::music::{MusicService, Playlist};
use crate::world::SceneDescription;
use async_trait::async_trait;
use docent_common::dialogue::{ClientMessage, ServerMessage};
use docent_common::emotion::EmotionResult;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Two rooms, three artworks and a visitor standing out of reach
pub const GALLERY_SCENE: &str = r#"
name: Test Gallery
agent:
  position: [0.0, 0.0, 0.0]
  facing: [0.0, 0.0, 1.0]
visitor:
  name: visitor
  position: [0.0, 0.0, 15.0]
  facing: [0.0, 0.0, -1.0]
  center_height: 1.5
walkable:
  min: [-40.0, 0.0, -40.0]
  max: [40.0, 0.0, 40.0]
zones:
  - name: Lower Gallery
    position: [0.0, 0.0, 0.0]
    radius: 20.0
  - name: Sculpture Hall
    position: [0.0, 0.0, 32.0]
    radius: 10.0
objects:
  - name: Sunflowers
    position: [3.0, 1.5, 0.0]
    radius: 0.5
    asset: true
    waypoint: painting
  - name: Night Watch
    position: [-5.0, 1.5, 6.0]
    radius: 0.5
    asset: true
    waypoint: painting
  - name: Glass Vase
    position: [0.0, 1.0, 32.0]
    radius: 0.4
    asset: true
    waypoint: display_case
"#;

pub fn gallery_scene() -> SceneDescription {
    SceneDescription::from_yaml(GALLERY_SCENE).expect("Invalid gallery scene")
}

/// Dialogue sink that keeps every message
#[derive(Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<ClientMessage>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<ClientMessage> {
        let mut messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *messages)
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DialogueSink for RecordingSink {
    fn send(&self, message: ClientMessage) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
    }
}

#[derive(Clone, Default)]
pub struct RecordingSpeech {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<String> {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *lines)
    }
}

impl SpeechSink for RecordingSpeech {
    fn speak(&self, text: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(text.to_string());
    }
}

/// Classifier answering from a script, then failing once it runs dry
#[derive(Clone, Default)]
pub struct ScriptedClassifier {
    results: Arc<Mutex<VecDeque<EmotionResult>>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedClassifier {
    pub fn new(results: impl IntoIterator<Item = EmotionResult>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results.into_iter().collect())),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl EmotionClassifier for ScriptedClassifier {
    async fn classify(&self, _wav: Vec<u8>) -> Result<EmotionResult, ClassifierError> {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        self.results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| ClassifierError::Parse("script exhausted".to_string()))
    }
}

/// Music service returning the same tracks for every query
#[derive(Clone, Default)]
pub struct StaticMusic {
    tracks: Vec<String>,
}

impl StaticMusic {
    pub fn new(tracks: &[&str]) -> Self {
        Self {
            tracks: tracks.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[async_trait]
impl MusicService for StaticMusic {
    async fn search(&self, query: &str) -> Result<Playlist, MusicError> {
        Ok(Playlist {
            title: query.to_string(),
            kind: "playlist".to_string(),
            tracks: self.tracks.clone(),
        })
    }
}

/// An assistant wired to recording sinks
pub struct TestHarness {
    pub assistant: Assistant,
    pub dialogue: RecordingSink,
    pub speech: RecordingSpeech,
    pub classifier: ScriptedClassifier,
    server: mpsc::UnboundedSender<ServerMessage>,
}

impl TestHarness {
    pub fn new(config: &Configuration, scene: &SceneDescription) -> Self {
        Self::with_services(config, scene, ScriptedClassifier::default(), StaticMusic::default())
    }

    pub fn with_services(
        config: &Configuration,
        scene: &SceneDescription,
        classifier: ScriptedClassifier,
        music: StaticMusic,
    ) -> Self {
        let dialogue = RecordingSink::new();
        let speech = RecordingSpeech::new();
        let (server, inbound) = mpsc::unbounded_channel();
        let services = AssistantServices {
            dialogue: Arc::new(dialogue.clone()),
            inbound,
            speech: Arc::new(speech.clone()),
            classifier: Arc::new(classifier.clone()),
            music: Arc::new(music),
        };
        let assistant =
            Assistant::new_seeded(config, scene, services, 7).expect("Failed to build assistant");
        Self {
            assistant,
            dialogue,
            speech,
            classifier,
            server,
        }
    }

    /// Queue a message as if the dialogue server sent it
    pub fn server(&self, msg: ServerMessage) {
        let _ = self.server.send(msg);
    }

    /// Tick repeatedly with a fixed frame time
    pub fn run(&mut self, seconds: f32, delta_time: f32) {
        let frames = (seconds / delta_time).ceil() as usize;
        for _ in 0..frames {
            self.assistant.tick(delta_time);
        }
    }
}
