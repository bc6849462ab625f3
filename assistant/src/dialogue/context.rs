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

//! Outbound dialogue message construction
//!
//! Every message carries a fresh view of the assistant and the visitor. The
//! set of actions offered to the dialogue server depends on why the message
//! is sent and on what the assistant is currently doing.

use super::dispatcher::ActionReply;
use super::repair::BreakReport;
use crate::movement::MovementState;
use docent_common::dialogue::{
    ActionContext, AssistantContext, ClientMessage, EmotionalStateSnapshot, MessageType,
    PlayerContext,
};
use std::collections::BTreeMap;

/// Location reported when the visitor cannot be perceived
pub const UNKNOWN_LOCATION: &str = "unknown";

/// Why a context is being assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextPurpose {
    /// Answering visitor speech
    Speech,
    /// Idle ideation while bored
    InnerThought,
    /// History, action and event updates
    Update,
}

/// Facts that decide which actions are offered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionAvailability {
    pub following: bool,
    pub music_playing: bool,
    pub repair_pending: bool,
    pub has_emotion_history: bool,
}

/// Actions the dialogue server may choose from
pub fn available_actions(purpose: ContextPurpose, availability: &ActionAvailability) -> Vec<String> {
    let mut actions: Vec<&str> = Vec::new();

    if availability.following {
        actions.push("stopFollowingVisitor");
    } else {
        actions.push("followVisitor");
    }

    match purpose {
        ContextPurpose::Speech => {
            actions.push("explainWhatYouCanDo");
            actions.push("continueConversation");
        }
        ContextPurpose::InnerThought => {
            actions.extend(["standIdle", "patrol", "admireArt"]);
        }
        ContextPurpose::Update => {}
    }

    if availability.music_playing {
        actions.push("stopMusic");
    } else {
        actions.push("playMusic");
    }

    if availability.repair_pending {
        actions.push("repair");
    }

    if purpose == ContextPurpose::Speech && availability.has_emotion_history {
        actions.push("evaluateShownEmotions");
    }

    actions.into_iter().map(str::to_string).collect()
}

/// What the assistant perceives at the moment a message is built
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantView {
    pub location: String,
    pub visitor_visible: bool,
    pub visitor_audible: bool,
    pub assets_in_view: Vec<String>,
    pub walking_state: MovementState,
    /// Name of the object the visitor is looking at during a conversation
    pub focused_asset: Option<String>,
    pub emotional_state: EmotionalStateSnapshot,
    pub face_percentages: BTreeMap<String, f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorView {
    pub location: String,
    pub assets_in_view: Vec<String>,
    pub in_conversation: bool,
}

/// Everything a message needs about the current frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextSnapshot {
    pub assistant: AssistantView,
    pub visitor: VisitorView,
    pub availability: ActionAvailability,
}

/// Builds client messages for one visitor session
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    username: String,
    base_prompt: String,
}

impl ContextBuilder {
    pub fn new(username: impl Into<String>, base_prompt: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            base_prompt: base_prompt.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn assistant_context(
        &self,
        snapshot: &ContextSnapshot,
        purpose: ContextPurpose,
    ) -> AssistantContext {
        let view = &snapshot.assistant;
        AssistantContext {
            location: view.location.clone(),
            player_visible: view.visitor_visible,
            player_audible: view.visitor_audible,
            assets_in_view: view.assets_in_view.clone(),
            available_actions: available_actions(purpose, &snapshot.availability),
            walking_state: view.walking_state.label().to_string(),
            focused_asset: view.focused_asset.clone().unwrap_or_default(),
            selected_base_prompt: self.base_prompt.clone(),
            emotional_state: view.emotional_state.clone(),
            face_percentages: view.face_percentages.clone(),
        }
    }

    pub fn player_context(&self, snapshot: &ContextSnapshot) -> PlayerContext {
        let perceived = snapshot.assistant.visitor_visible || snapshot.assistant.visitor_audible;
        let location = if perceived && !snapshot.visitor.location.is_empty() {
            snapshot.visitor.location.clone()
        } else {
            UNKNOWN_LOCATION.to_string()
        };
        PlayerContext {
            location,
            assets_in_view: snapshot.visitor.assets_in_view.clone(),
            in_conversation: snapshot.visitor.in_conversation,
            player_username: self.username.clone(),
        }
    }

    fn message(
        &self,
        message_type: MessageType,
        snapshot: &ContextSnapshot,
        purpose: ContextPurpose,
    ) -> ClientMessage {
        ClientMessage::new(message_type)
            .with_assistant_context(self.assistant_context(snapshot, purpose))
            .with_player_context(self.player_context(snapshot))
    }

    pub fn initialize_player(&self) -> ClientMessage {
        ClientMessage::initialize_player(self.username.clone())
    }

    /// Visitor speech to be answered
    pub fn speech(&self, text: &str, snapshot: &ContextSnapshot) -> ClientMessage {
        self.message(MessageType::Speech, snapshot, ContextPurpose::Speech)
            .with_player_action_type("speech")
            .with_speech(text)
    }

    /// Line appended to the conversation history
    pub fn history_update(&self, text: &str, snapshot: &ContextSnapshot) -> ClientMessage {
        self.message(MessageType::PlayerHistoryUpdate, snapshot, ContextPurpose::Update)
            .with_speech(text)
    }

    /// Reply to a multi-stage action; focus and options override the context
    pub fn action_update(&self, reply: &ActionReply, snapshot: &ContextSnapshot) -> ClientMessage {
        let mut msg = self
            .message(MessageType::ActionUpdate, snapshot, ContextPurpose::Update)
            .with_speech(reply.speech.clone())
            .with_action_context(ActionContext {
                action_name: reply.action_name.clone(),
                token: reply.token.clone(),
                stage: reply.stage,
                permission: reply.permission,
            });
        if let Some(focus) = &reply.focus {
            msg.assistant_context.focused_asset = focus.clone();
        }
        if let Some(options) = &reply.options {
            msg.assistant_context.available_actions = options.clone();
        }
        msg
    }

    /// Something happened in the museum that the assistant should react to
    pub fn env_event(&self, report: &BreakReport, snapshot: &ContextSnapshot) -> ClientMessage {
        let mut msg = self
            .message(MessageType::EnvEvent, snapshot, ContextPurpose::Update)
            .with_speech(report.description.clone())
            .with_event_context(report.event.clone());
        msg.assistant_context.available_actions = report.options.clone();
        msg
    }

    /// Prompt the dialogue server to come up with something to do
    pub fn inner_thought(&self, snapshot: &ContextSnapshot) -> ClientMessage {
        self.message(
            MessageType::InnerThoughtEvent,
            snapshot,
            ContextPurpose::InnerThought,
        )
    }
}
