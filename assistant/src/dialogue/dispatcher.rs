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

//! Inbound dialogue message dispatch
//!
//! The dispatcher turns server messages into [`Directive`]s for the owner to
//! carry out. It never touches movement, audio or the socket directly, which
//! keeps every stage table testable against a plain `World`.
//!
//! Multi-stage actions are correlated by token. Each reply the assistant
//! sends carries the next stage number, and the server answers with that
//! stage once it agrees to continue.

use super::ledger::{ActionLedger, ActionPhase};
use super::repair::RepairQueue;
use crate::error::LedgerError;
use crate::music::MusicFeedback;
use docent_common::dialogue::{EvaluationResult, ServerMessage, ServerMessageKind};
use hecs::{Entity, World};

/// Movement the dialogue server asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementCommand {
    Idle,
    Patrol,
    FollowVisitor,
    WalkTo(Entity),
    WalkToLocation(String),
    WalkToVisitor,
}

/// Reply sent back to the server for a multi-stage action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReply {
    pub token: String,
    pub action_name: String,
    pub stage: u32,
    pub permission: bool,
    pub speech: String,
    /// Replaces the focused asset of the outbound context
    pub focus: Option<String>,
    /// Replaces the available actions of the outbound context
    pub options: Option<Vec<String>>,
}

impl ActionReply {
    pub fn new(token: &str, action_name: &str, stage: u32, permission: bool) -> Self {
        Self {
            token: token.to_string(),
            action_name: action_name.to_string(),
            stage,
            permission,
            ..Default::default()
        }
    }

    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = Some(options.iter().map(|o| o.to_string()).collect());
        self
    }
}

/// Work produced by a dispatched message
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Send text to speech synthesis
    Speak(String),
    /// Append a line to the conversation history
    HistoryUpdate(String),
    ActionUpdate(ActionReply),
    Move(MovementCommand),
    /// Re-arm the boredom countdown
    ResetBoredom,
    PlayMusic { query: String, token: String },
    StopMusic,
    Evaluation(EvaluationResult),
    Completed { action: String, token: String },
}

const STOP_SPEAK: &str = "stopSpeak";

/// Routes server messages through the speech bookkeeping and stage tables
#[derive(Debug, Default)]
pub struct ActionDispatcher {
    ledger: ActionLedger,
    speaking: bool,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between the first chunk of an utterance and its `stopSpeak` chunk
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn ledger(&self) -> &ActionLedger {
        &self.ledger
    }

    pub fn handle(
        &mut self,
        msg: &ServerMessage,
        world: &World,
        repairs: &mut RepairQueue,
    ) -> Vec<Directive> {
        match msg.message_kind() {
            ServerMessageKind::Speech => self.speech(msg),
            ServerMessageKind::ActionSelection => {
                let mut directives = Vec::new();
                for name in [&msg.action_name, &msg.text] {
                    if name.is_empty() {
                        continue;
                    }
                    let mut selected = msg.clone();
                    selected.action_name = name.clone();
                    directives.extend(self.dispatch(&selected, world, repairs));
                }
                directives
            }
            ServerMessageKind::Action => self.dispatch(msg, world, repairs),
        }
    }

    fn speech(&mut self, msg: &ServerMessage) -> Vec<Directive> {
        let closing = msg.action_name == STOP_SPEAK;
        let history = if !self.speaking {
            if closing {
                format!("ASSISTANT: '{}'", msg.text)
            } else {
                self.speaking = true;
                format!("ASSISTANT: '{}", msg.text)
            }
        } else if closing {
            self.speaking = false;
            format!("{}'", msg.text)
        } else {
            msg.text.clone()
        };

        vec![
            Directive::HistoryUpdate(history),
            Directive::Speak(msg.text.clone()),
        ]
    }

    fn dispatch(
        &mut self,
        msg: &ServerMessage,
        world: &World,
        repairs: &mut RepairQueue,
    ) -> Vec<Directive> {
        tracing::debug!(
            "Action {} stage {} token '{}'",
            msg.action_name,
            msg.stage,
            msg.token
        );
        let single = |command: MovementCommand| vec![Directive::Move(command), Directive::ResetBoredom];

        match msg.action_name.as_str() {
            "followVisitor" => single(MovementCommand::FollowVisitor),
            "stopFollowingVisitor" | "standIdle" => single(MovementCommand::Idle),
            "patrol" => single(MovementCommand::Patrol),
            "walkToVisitor" => single(MovementCommand::WalkToVisitor),
            "stopMusic" => vec![Directive::StopMusic, Directive::ResetBoredom],
            "repair" => self.repair(msg, world, repairs),
            "playMusic" => self.play_music(msg),
            "admireArt" | "walkToObject" => self.walk_to_object(msg),
            "investigate" => self.investigate(msg, world, repairs),
            "evaluateShownEmotions" => self.evaluate(msg),
            other => {
                tracing::debug!("Ignoring action '{}'", other);
                Vec::new()
            }
        }
    }

    fn accept(result: Result<(), LedgerError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dropping action message: {}", e);
                false
            }
        }
    }

    fn register(&mut self, msg: &ServerMessage) -> bool {
        Self::accept(self.ledger.register(&msg.token, &msg.action_name))
    }

    fn advance(&mut self, msg: &ServerMessage, phase: ActionPhase) -> bool {
        Self::accept(
            self.ledger
                .advance(&msg.token, &msg.action_name, msg.stage, phase),
        )
    }

    fn complete(&mut self, msg: &ServerMessage) -> Option<Directive> {
        match self.ledger.complete(&msg.token, &msg.action_name, msg.stage) {
            Ok(entry) => Some(Directive::Completed {
                action: entry.action,
                token: msg.token.clone(),
            }),
            Err(e) => {
                tracing::warn!("Dropping action message: {}", e);
                None
            }
        }
    }

    fn unexpected_stage(msg: &ServerMessage) -> Vec<Directive> {
        tracing::debug!(
            "No handling for {} stage {}",
            msg.action_name,
            msg.stage
        );
        Vec::new()
    }

    fn repair(
        &mut self,
        msg: &ServerMessage,
        world: &World,
        repairs: &mut RepairQueue,
    ) -> Vec<Directive> {
        match msg.stage {
            1 => {
                if !self.register(msg) {
                    return Vec::new();
                }
                match repairs.peek_name(world) {
                    Some(name) => vec![Directive::ActionUpdate(
                        ActionReply::new(&msg.token, &msg.action_name, 2, true)
                            .with_focus(name)
                            .with_options(&[]),
                    )],
                    None => {
                        tracing::warn!("Repair selected with nothing to repair");
                        Vec::new()
                    }
                }
            }
            2 => {
                if !self.advance(msg, ActionPhase::Confirmed) {
                    return Vec::new();
                }
                match repairs.dequeue(world) {
                    Some(object) => vec![
                        Directive::Move(MovementCommand::WalkTo(object)),
                        Directive::ActionUpdate(
                            ActionReply::new(&msg.token, &msg.action_name, 3, true)
                                .with_options(&["walkToVisitor"]),
                        ),
                    ],
                    None => {
                        tracing::warn!("Repair confirmed but the repair queue is empty");
                        Vec::new()
                    }
                }
            }
            3 => {
                self.advance(msg, ActionPhase::InProgress);
                Vec::new()
            }
            4 => {
                if !self.advance(msg, ActionPhase::Completing) {
                    return Vec::new();
                }
                vec![Directive::ActionUpdate(
                    ActionReply::new(&msg.token, &msg.action_name, 5, true)
                        .with_options(&["standIdle"]),
                )]
            }
            5 => self.complete(msg).into_iter().collect(),
            _ => Self::unexpected_stage(msg),
        }
    }

    fn play_music(&mut self, msg: &ServerMessage) -> Vec<Directive> {
        match msg.stage {
            1 => {
                self.register(msg);
                Vec::new()
            }
            2 => {
                if !self.advance(msg, ActionPhase::InProgress) {
                    return Vec::new();
                }
                vec![Directive::PlayMusic {
                    query: msg.text.clone(),
                    token: msg.token.clone(),
                }]
            }
            3 => self.complete(msg).into_iter().collect(),
            _ => Self::unexpected_stage(msg),
        }
    }

    /// Result of a music search started by `playMusic` stage 2
    pub fn music_feedback(&mut self, feedback: &MusicFeedback) -> Vec<Directive> {
        if !Self::accept(self.ledger.mark(&feedback.token, ActionPhase::Completing)) {
            return Vec::new();
        }

        let mut directives = Vec::new();
        if feedback.found {
            directives.push(Directive::HistoryUpdate(format!(
                "NARRATOR: {} music starts playing.",
                feedback.query
            )));
        }
        directives.push(Directive::ActionUpdate(ActionReply::new(
            &feedback.token,
            "playMusic",
            3,
            !feedback.found,
        )));
        directives
    }

    fn walk_to_object(&mut self, msg: &ServerMessage) -> Vec<Directive> {
        match msg.stage {
            1 => {
                self.register(msg);
                Vec::new()
            }
            2 => {
                if !self.advance(msg, ActionPhase::InProgress) {
                    return Vec::new();
                }
                vec![
                    Directive::Move(MovementCommand::WalkToLocation(msg.text.clone())),
                    Directive::ActionUpdate(
                        ActionReply::new(&msg.token, &msg.action_name, 3, true)
                            .with_options(&["standIdle", "patrol"]),
                    ),
                ]
            }
            3 => self.complete(msg).into_iter().collect(),
            _ => Self::unexpected_stage(msg),
        }
    }

    fn investigate(
        &mut self,
        msg: &ServerMessage,
        world: &World,
        repairs: &mut RepairQueue,
    ) -> Vec<Directive> {
        match msg.stage {
            1 => {
                self.register(msg);
                Vec::new()
            }
            2 => {
                if !self.advance(msg, ActionPhase::InProgress) {
                    return Vec::new();
                }
                let mut directives = Vec::new();
                match repairs.last_break_location() {
                    Some(location) => directives.push(Directive::Move(
                        MovementCommand::WalkToLocation(location.to_string()),
                    )),
                    None => tracing::warn!("Nothing was heard breaking, investigating in place"),
                }
                let mut reply = ActionReply::new(&msg.token, &msg.action_name, 3, true)
                    .with_options(&["ignore", "repair"]);
                if let Some(name) = repairs.peek_name(world) {
                    reply = reply.with_focus(name);
                }
                directives.push(Directive::ActionUpdate(reply));
                directives
            }
            3 => self.complete(msg).into_iter().collect(),
            _ => Self::unexpected_stage(msg),
        }
    }

    fn evaluate(&mut self, msg: &ServerMessage) -> Vec<Directive> {
        match msg.stage {
            1 => {
                self.register(msg);
                Vec::new()
            }
            2 => {
                let Some(completed) = self.complete(msg) else {
                    return Vec::new();
                };
                let mut directives = Vec::new();
                match serde_json::from_str::<EvaluationResult>(&msg.text) {
                    Ok(result) => {
                        tracing::info!(
                            "Shown emotions graded '{}': {}",
                            result.grade,
                            result.justification
                        );
                        directives.push(Directive::Evaluation(result));
                    }
                    Err(e) => tracing::warn!("Malformed emotion evaluation: {}", e),
                }
                directives.push(completed);
                directives
            }
            _ => Self::unexpected_stage(msg),
        }
    }
}
