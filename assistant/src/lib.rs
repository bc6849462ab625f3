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

//! Docent Museum Assistant Coordination Core
//!
//! The behaviour layer of a virtual-museum assistant character:
//! - Scene world and perception (visibility, conversation engagement, gaze)
//! - Movement state machine with a deferred command queue
//! - Emotion pipeline (audio buffering, classification, persistence, expression)
//! - Dialogue context builder and multi-stage action dispatcher
//! - Network clients for the dialogue, TTS, classifier and music services

pub mod assistant;
pub mod config;
pub mod dialogue;
pub mod emotion;
pub mod error;
pub mod events;
pub mod movement;
pub mod music;
pub mod navigation;
pub mod perception;
pub mod scheduler;
pub mod testing;
pub mod tts;
pub mod world;

pub use assistant::Assistant;
pub use config::Configuration;
