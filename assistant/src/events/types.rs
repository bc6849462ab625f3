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

//! Assistant event types

use crate::emotion::Emotion;
use crate::movement::MovementState;
use serde::{Deserialize, Serialize};

/// Notable changes in the assistant's state, published once per occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssistantEvent {
    /// Persisted emotion became sticky or decayed back to neutral
    EmotionStateChanged {
        emotion: Emotion,
        intensity: f32,
        persistent: bool,
    },

    ConversationStarted,
    ConversationEnded,

    VisibilityChanged {
        visible: bool,
    },

    MovementStateChanged {
        from: MovementState,
        to: MovementState,
    },

    /// Something in the scene broke and was queued for repair
    ObjectBroken {
        object: String,
        location: String,
        in_view: bool,
    },

    /// A multi-stage action reached its terminal stage
    ActionCompleted {
        action: String,
        token: String,
    },
}

/// Discriminant of an [`AssistantEvent`], used to filter subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    EmotionStateChanged,
    ConversationStarted,
    ConversationEnded,
    VisibilityChanged,
    MovementStateChanged,
    ObjectBroken,
    ActionCompleted,
}

impl AssistantEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AssistantEvent::EmotionStateChanged { .. } => EventKind::EmotionStateChanged,
            AssistantEvent::ConversationStarted => EventKind::ConversationStarted,
            AssistantEvent::ConversationEnded => EventKind::ConversationEnded,
            AssistantEvent::VisibilityChanged { .. } => EventKind::VisibilityChanged,
            AssistantEvent::MovementStateChanged { .. } => EventKind::MovementStateChanged,
            AssistantEvent::ObjectBroken { .. } => EventKind::ObjectBroken,
            AssistantEvent::ActionCompleted { .. } => EventKind::ActionCompleted,
        }
    }
}
