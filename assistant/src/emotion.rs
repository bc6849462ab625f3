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

//! Emotion pipeline
//!
//! Audio injected by the host is buffered, gated by loudness and sent to a
//! remote classifier at a fixed interval. Detections are normalized to seven
//! canonical labels, tracked for persistence and turned into facial and body
//! expression targets that the tick loop interpolates toward.

mod analyzer;
mod buffer;
mod channels;
mod classifier;
mod expression;
mod label;
mod persistence;
mod statistics;
pub mod wav;

pub use self::analyzer::{AudioInjector, EmotionAnalyzer};
pub use self::buffer::{AudioBuffer, AudioChunk, rms};
pub use self::channels::{BodyPose, FacialWeights};
pub use self::classifier::{EmotionClassifier, HttpEmotionClassifier};
pub use self::expression::ExpressionEngine;
pub use self::label::{Emotion, EmotionDetection};
pub use self::persistence::{EmotionalState, PersistenceTracker};
pub use self::statistics::EmotionStatistics;

#[cfg(test)]
pub use self::classifier::MockEmotionClassifier;
