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

//! Dialogue server protocol
//!
//! Client messages are tagged by `messageType` and always carry a snapshot of
//! the assistant and the visitor. Server messages are tagged by `type`, which
//! is either `speech`, `actionSelection` or the bare name of an action.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of an outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    InitializePlayer,
    Speech,
    PlayerHistoryUpdate,
    ActionUpdate,
    EnvEvent,
    InnerThoughtEvent,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::InitializePlayer => write!(f, "initializePlayer"),
            MessageType::Speech => write!(f, "speech"),
            MessageType::PlayerHistoryUpdate => write!(f, "playerHistoryUpdate"),
            MessageType::ActionUpdate => write!(f, "actionUpdate"),
            MessageType::EnvEvent => write!(f, "envEvent"),
            MessageType::InnerThoughtEvent => write!(f, "innerThoughtEvent"),
        }
    }
}

/// Snapshot of the assistant's persisted emotional state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalStateSnapshot {
    pub current_emotion: String,
    pub intensity: f32,
    pub consecutive_count: u32,
    pub is_persistent: bool,
}

impl Default for EmotionalStateSnapshot {
    fn default() -> Self {
        Self {
            current_emotion: "neutral".to_string(),
            intensity: 0.0,
            consecutive_count: 0,
            is_persistent: false,
        }
    }
}

/// What the assistant perceives and can do right now
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantContext {
    pub location: String,
    pub player_visible: bool,
    pub player_audible: bool,
    pub assets_in_view: Vec<String>,
    pub available_actions: Vec<String>,
    pub walking_state: String,
    pub focused_asset: String,
    pub selected_base_prompt: String,
    pub emotional_state: EmotionalStateSnapshot,
    /// Share of each detected visitor emotion, in percent
    pub face_percentages: BTreeMap<String, f32>,
}

/// What the assistant knows about the visitor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerContext {
    pub location: String,
    pub assets_in_view: Vec<String>,
    pub in_conversation: bool,
    pub player_username: String,
}

/// Correlation data of a multi-stage action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionContext {
    pub action_name: String,
    pub token: String,
    pub stage: u32,
    pub permission: bool,
}

/// Details of an environment event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    pub relevant_objects: Vec<String>,
    pub event_location: String,
}

/// Message sent from the assistant to the dialogue server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessage {
    pub message_type: MessageType,
    pub player_action_type: String,
    pub speech: String,
    pub assistant_context: AssistantContext,
    pub player_context: PlayerContext,
    pub action_context: ActionContext,
    pub event_context: EventContext,
}

impl ClientMessage {
    /// Create a message of the given type with empty contexts
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            player_action_type: String::new(),
            speech: String::new(),
            assistant_context: AssistantContext::default(),
            player_context: PlayerContext::default(),
            action_context: ActionContext::default(),
            event_context: EventContext::default(),
        }
    }

    /// The greeting sent once the channel opens
    pub fn initialize_player(username: impl Into<String>) -> Self {
        let mut msg = Self::new(MessageType::InitializePlayer);
        msg.player_context.player_username = username.into();
        msg
    }

    pub fn with_speech(mut self, speech: impl Into<String>) -> Self {
        self.speech = speech.into();
        self
    }

    pub fn with_player_action_type(mut self, action_type: impl Into<String>) -> Self {
        self.player_action_type = action_type.into();
        self
    }

    pub fn with_assistant_context(mut self, context: AssistantContext) -> Self {
        self.assistant_context = context;
        self
    }

    pub fn with_player_context(mut self, context: PlayerContext) -> Self {
        self.player_context = context;
        self
    }

    pub fn with_action_context(mut self, context: ActionContext) -> Self {
        self.action_context = context;
        self
    }

    pub fn with_event_context(mut self, context: EventContext) -> Self {
        self.event_context = context;
        self
    }

    /// Serialize to the JSON text frame sent over the socket
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Classification of a server message's `type` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMessageKind {
    /// Text the assistant should speak
    Speech,
    /// Primary action in `actionName`, fallback action in `text`
    ActionSelection,
    /// A single action instruction
    Action,
}

/// Message received from the dialogue server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub action_name: String,
    pub token: String,
    pub stage: u32,
}

impl ServerMessage {
    /// Parse a JSON text frame
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create an action instruction
    pub fn action(
        action_name: impl Into<String>,
        token: impl Into<String>,
        stage: u32,
        text: impl Into<String>,
    ) -> Self {
        let action_name = action_name.into();
        Self {
            kind: action_name.clone(),
            text: text.into(),
            action_name,
            token: token.into(),
            stage,
        }
    }

    pub fn message_kind(&self) -> ServerMessageKind {
        match self.kind.as_str() {
            "speech" => ServerMessageKind::Speech,
            "actionSelection" => ServerMessageKind::ActionSelection,
            _ => ServerMessageKind::Action,
        }
    }
}

/// Grade returned for the `evaluateShownEmotions` action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub grade: String,
    pub justification: String,
}
