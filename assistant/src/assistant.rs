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

//! The assistant's coordination core
//!
//! [`Assistant`] owns every component and is driven by a single tick. Network
//! work runs in spawned tasks and reports back over channels that the tick
//! drains, so all state changes happen on the tick's caller.

use crate::config::Configuration;
use crate::dialogue::{
    ActionAvailability, ActionDispatcher, AssistantView, BoredomTimer, ContextBuilder,
    ContextSnapshot, DialogueSink, Directive, MovementCommand, RepairQueue, SpeechSink,
    UNKNOWN_LOCATION, VisitorView,
};
use crate::emotion::{
    AudioInjector, Emotion, EmotionAnalyzer, EmotionClassifier, EmotionDetection,
    EmotionStatistics, ExpressionEngine, PersistenceTracker,
};
use crate::error::SceneError;
use crate::events::{AssistantEvent, EventBus};
use crate::movement::{MovementController, MovementState};
use crate::music::{MusicFeedback, MusicPlayer, MusicService};
use crate::navigation::StraightLineNavigator;
use crate::perception::{Perception, PerceptionChange};
use crate::scheduler::Scheduler;
use crate::world::{
    ColliderScene, SceneDescription, entity_position, find_by_name, find_waypoint, locate,
};
use docent_common::dialogue::{EvaluationResult, ServerMessage};
use hecs::{Entity, World};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Periodic work run from the tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Perception,
    StatisticsLog,
}

/// External collaborators handed to the assistant
pub struct AssistantServices {
    pub dialogue: Arc<dyn DialogueSink>,
    /// Decoded messages from the dialogue server
    pub inbound: mpsc::UnboundedReceiver<ServerMessage>,
    pub speech: Arc<dyn SpeechSink>,
    pub classifier: Arc<dyn EmotionClassifier>,
    pub music: Arc<dyn MusicService>,
}

pub struct Assistant {
    world: World,
    visitor: Entity,
    movement: MovementController,
    last_movement_state: MovementState,
    perception: Perception,
    scheduler: Scheduler<Task>,
    context: ContextBuilder,
    dispatcher: ActionDispatcher,
    repairs: RepairQueue,
    boredom: BoredomTimer,
    music: MusicPlayer,
    analyzer: EmotionAnalyzer,
    analyze_on_start: bool,
    statistics: EmotionStatistics,
    persistence: PersistenceTracker,
    expression: ExpressionEngine,
    bus: EventBus,
    dialogue: Arc<dyn DialogueSink>,
    speech: Arc<dyn SpeechSink>,
    inbound: mpsc::UnboundedReceiver<ServerMessage>,
    detections_tx: mpsc::UnboundedSender<EmotionDetection>,
    detections: mpsc::UnboundedReceiver<EmotionDetection>,
    music_feedback: mpsc::UnboundedReceiver<MusicFeedback>,
    last_evaluation: Option<EvaluationResult>,
}

impl Assistant {
    pub fn new(
        config: &Configuration,
        scene: &SceneDescription,
        services: AssistantServices,
    ) -> Result<Self, SceneError> {
        Self::build(config, scene, services, None)
    }

    /// Like [`Assistant::new`] with deterministic patrol and boredom timing
    pub fn new_seeded(
        config: &Configuration,
        scene: &SceneDescription,
        services: AssistantServices,
        seed: u64,
    ) -> Result<Self, SceneError> {
        Self::build(config, scene, services, Some(seed))
    }

    fn build(
        config: &Configuration,
        scene: &SceneDescription,
        services: AssistantServices,
        seed: Option<u64>,
    ) -> Result<Self, SceneError> {
        let mut world = World::new();
        let handles = scene.spawn(&mut world)?;

        let navigator = StraightLineNavigator::new(scene.agent.position, scene.walkable);
        let mut movement = MovementController::new(
            Box::new(navigator),
            config.movement.clone(),
            config.perception.head_height,
            scene.patrol_anchor(),
            handles.visitor,
        )
        .with_heading(scene.agent.facing);
        let boredom = match seed {
            Some(seed) => {
                movement = movement.with_seed(seed);
                BoredomTimer::with_seed(&config.boredom, seed)
            }
            None => BoredomTimer::new(&config.boredom),
        };

        let perception = Perception::new(config.perception.clone(), Box::new(ColliderScene::new()));
        let mut scheduler = Scheduler::new();
        scheduler.register(Task::Perception, perception.interval_secs());
        if config.persistence.statistics_log_interval_secs > 0.0 {
            scheduler.register(
                Task::StatisticsLog,
                config.persistence.statistics_log_interval_secs,
            );
        }

        let (detections_tx, detections) = mpsc::unbounded_channel();
        let (music_tx, music_feedback) = mpsc::unbounded_channel();

        Ok(Self {
            world,
            visitor: handles.visitor,
            movement,
            last_movement_state: MovementState::Idle,
            perception,
            scheduler,
            context: ContextBuilder::new(
                config.dialogue.username.as_str(),
                config.dialogue.base_prompt.clone(),
            ),
            dispatcher: ActionDispatcher::new(),
            repairs: RepairQueue::new(),
            boredom,
            music: MusicPlayer::new(services.music, music_tx),
            analyzer: EmotionAnalyzer::new(&config.classifier, services.classifier),
            analyze_on_start: config.classifier.analyze_on_start,
            statistics: EmotionStatistics::new(config.persistence.max_history),
            persistence: PersistenceTracker::new(config.persistence.clone()),
            expression: ExpressionEngine::new(config.expression.clone()),
            bus: EventBus::new(),
            dialogue: services.dialogue,
            speech: services.speech,
            inbound: services.inbound,
            detections_tx,
            detections,
            music_feedback,
            last_evaluation: None,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Scene access for the host, e.g. to move the visitor
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn visitor(&self) -> Entity {
        self.visitor
    }

    pub fn movement(&self) -> &MovementController {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut MovementController {
        &mut self.movement
    }

    pub fn perception(&self) -> &Perception {
        &self.perception
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn repairs(&self) -> &RepairQueue {
        &self.repairs
    }

    pub fn music(&self) -> &MusicPlayer {
        &self.music
    }

    pub fn analyzer(&self) -> &EmotionAnalyzer {
        &self.analyzer
    }

    pub fn statistics(&self) -> &EmotionStatistics {
        &self.statistics
    }

    pub fn persistence(&self) -> &PersistenceTracker {
        &self.persistence
    }

    pub fn expression(&self) -> &ExpressionEngine {
        &self.expression
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn boredom(&self) -> &BoredomTimer {
        &self.boredom
    }

    /// Most recent grade returned by `evaluateShownEmotions`
    pub fn last_evaluation(&self) -> Option<&EvaluationResult> {
        self.last_evaluation.as_ref()
    }

    /// Start background audio analysis when configured to do so
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if self.analyze_on_start {
            self.start_analysis();
        }
    }

    pub fn start_analysis(&mut self) -> bool {
        self.analyzer.start(self.detections_tx.clone())
    }

    pub fn stop_analysis(&mut self) {
        self.analyzer.stop();
    }

    /// Handle for feeding microphone audio from another thread
    pub fn audio_injector(&self) -> AudioInjector {
        self.analyzer.injector()
    }

    pub fn inject_audio(&self, samples: &[f32], channels: u16, sample_rate: u32) {
        self.analyzer.inject_audio(samples, channels, sample_rate);
    }

    /// Hand a detection to the pipeline as if the classifier produced it
    pub fn submit_detection(&mut self, detection: EmotionDetection) {
        self.on_detection(&detection);
    }

    /// Forward transcribed visitor speech to the dialogue server
    pub fn visitor_speech(&mut self, text: &str) {
        self.statistics.log_statistics();
        let msg = self.context.speech(text, &self.snapshot());
        self.dialogue.send(msg);
        self.boredom.reset();
    }

    /// The host finished playing the current music track
    pub fn music_track_finished(&mut self) {
        if self.music.track_finished().is_none() {
            tracing::debug!("No more music queued");
        }
    }

    /// Record that `object` broke in `event_location` and tell the dialogue server
    pub fn report_break(&mut self, object: Entity, event_location: &str) {
        let report = self.repairs.report_break(
            &self.world,
            object,
            event_location,
            self.perception.assets_in_view(),
        );
        self.bus.publish(AssistantEvent::ObjectBroken {
            object: report.object.clone(),
            location: event_location.to_string(),
            in_view: report.in_view,
        });

        let history = self.context.history_update(&report.description, &self.snapshot());
        self.dialogue.send(history);
        let event = self.context.env_event(&report, &self.snapshot());
        self.dialogue.send(event);
    }

    /// [`Assistant::report_break`] by object name; false when there is no such object
    pub fn report_break_by_name(&mut self, name: &str, event_location: &str) -> bool {
        match find_by_name(&self.world, name) {
            Some(object) => {
                self.report_break(object, event_location);
                true
            }
            None => {
                tracing::warn!("Cannot report break of unknown object '{}'", name);
                false
            }
        }
    }

    /// Current view of the assistant and visitor for outbound messages
    pub fn snapshot(&self) -> ContextSnapshot {
        let position = self.movement.position();
        let in_conversation = self.perception.in_conversation();
        let focused_asset = if in_conversation {
            self.perception.gaze().object_name(&self.world)
        } else {
            None
        };
        let visitor_location = entity_position(&self.world, self.visitor)
            .and_then(|p| locate(&self.world, p))
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

        ContextSnapshot {
            assistant: AssistantView {
                location: locate(&self.world, position)
                    .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
                visitor_visible: self.perception.is_visible(),
                visitor_audible: self.perception.is_audible(),
                assets_in_view: self.perception.assets_in_view().to_vec(),
                walking_state: self.movement.state(),
                focused_asset,
                emotional_state: self.persistence.snapshot(),
                face_percentages: self.statistics.summary_percentages(),
            },
            visitor: VisitorView {
                location: visitor_location,
                assets_in_view: self.perception.visitor_assets_in_view().to_vec(),
                in_conversation,
            },
            availability: ActionAvailability {
                following: self.movement.state() == MovementState::Follow,
                music_playing: self.music.is_playing(),
                repair_pending: !self.repairs.is_empty(),
                has_emotion_history: self.statistics.has_history(),
            },
        }
    }

    /// Advance the whole assistant by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32) {
        self.drain_channels();

        for task in self.scheduler.advance(delta_time) {
            match task {
                Task::Perception => self.update_perception(),
                Task::StatisticsLog => self.statistics.log_statistics(),
            }
        }

        let idle = !self.perception.in_conversation() && !self.dispatcher.is_speaking();
        if self.boredom.tick(delta_time, idle) {
            let msg = self.context.inner_thought(&self.snapshot());
            self.dialogue.send(msg);
        }

        self.movement.tick(&self.world, delta_time);
        let state = self.movement.state();
        if state != self.last_movement_state {
            self.bus.publish(AssistantEvent::MovementStateChanged {
                from: self.last_movement_state,
                to: state,
            });
            self.last_movement_state = state;
        }
        self.movement
            .late_tick(&self.world, self.perception.gaze(), delta_time);

        if self.persistence.tick(delta_time) {
            self.expression.reset_to_neutral();
            self.bus.publish(AssistantEvent::EmotionStateChanged {
                emotion: Emotion::Neutral,
                intensity: 0.0,
                persistent: false,
            });
        }
        self.expression.tick(delta_time);

        self.bus.process_events();
    }

    fn drain_channels(&mut self) {
        while let Ok(msg) = self.inbound.try_recv() {
            let directives = self.dispatcher.handle(&msg, &self.world, &mut self.repairs);
            self.apply(directives);
        }

        while let Ok(detection) = self.detections.try_recv() {
            self.on_detection(&detection);
        }

        while let Ok(feedback) = self.music_feedback.try_recv() {
            self.music.accept(&feedback);
            let directives = self.dispatcher.music_feedback(&feedback);
            self.apply(directives);
        }
    }

    fn update_perception(&mut self) {
        let elapsed = self.perception.interval_secs();
        let changes = self.perception.update(
            &self.world,
            self.movement.position(),
            self.movement.head_forward(),
            self.visitor,
            elapsed,
        );
        for change in changes {
            match change {
                PerceptionChange::VisibilityChanged(visible) => {
                    self.bus.publish(AssistantEvent::VisibilityChanged { visible });
                }
                PerceptionChange::ConversationStarted => {
                    self.movement.enable_face_visitor();
                    self.bus.publish(AssistantEvent::ConversationStarted);
                }
                PerceptionChange::ConversationEnded => {
                    self.movement.disable_face_visitor();
                    self.bus.publish(AssistantEvent::ConversationEnded);
                }
            }
        }
    }

    fn on_detection(&mut self, detection: &EmotionDetection) {
        self.statistics.record(detection);
        let became_persistent = self.persistence.ingest(detection);
        let state = self.persistence.state();
        let persistent = state.is_persistent && state.emotion == detection.emotion;
        self.expression
            .apply(detection.emotion, detection.confidence, persistent);

        if became_persistent {
            self.bus.publish(AssistantEvent::EmotionStateChanged {
                emotion: state.emotion,
                intensity: state.intensity,
                persistent: true,
            });
        }
    }

    fn apply(&mut self, directives: Vec<Directive>) {
        for directive in directives {
            match directive {
                Directive::Speak(text) => self.speech.speak(&text),
                Directive::HistoryUpdate(text) => {
                    let msg = self.context.history_update(&text, &self.snapshot());
                    self.dialogue.send(msg);
                }
                Directive::ActionUpdate(reply) => {
                    let msg = self.context.action_update(&reply, &self.snapshot());
                    self.dialogue.send(msg);
                }
                Directive::Move(command) => self.apply_movement(command),
                Directive::ResetBoredom => self.boredom.reset(),
                Directive::PlayMusic { query, token } => self.music.request(&query, &token),
                Directive::StopMusic => self.music.stop(),
                Directive::Evaluation(result) => self.last_evaluation = Some(result),
                Directive::Completed { action, token } => {
                    self.bus
                        .publish(AssistantEvent::ActionCompleted { action, token });
                }
            }
        }
    }

    fn apply_movement(&mut self, command: MovementCommand) {
        match command {
            MovementCommand::Idle => self.movement.idle(),
            MovementCommand::Patrol => self.movement.patrol(),
            MovementCommand::FollowVisitor => self.movement.follow_visitor(),
            MovementCommand::WalkTo(target) => self.movement.walk_to(&self.world, target),
            MovementCommand::WalkToVisitor => self.movement.walk_to_visitor(&self.world),
            MovementCommand::WalkToLocation(name) => {
                if find_waypoint(&self.world, &name).is_some() {
                    self.movement.walk_to_location(&self.world, &name);
                } else if let Some(target) = find_by_name(&self.world, &name) {
                    self.movement.walk_to(&self.world, target);
                } else {
                    tracing::warn!("Nowhere called '{}' to walk to", name);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestHarness, gallery_scene};
    use docent_common::dialogue::MessageType;

    fn harness() -> TestHarness {
        TestHarness::new(&Configuration::default(), &gallery_scene())
    }

    #[test]
    fn test_snapshot_defaults() {
        let h = harness();
        let snapshot = h.assistant.snapshot();
        assert_eq!(snapshot.assistant.walking_state, MovementState::Idle);
        assert_eq!(snapshot.assistant.location, "Lower Gallery");
        assert!(!snapshot.availability.repair_pending);
        assert!(!snapshot.visitor.in_conversation);
    }

    #[test]
    fn test_visitor_speech_is_forwarded() {
        let mut h = harness();
        h.assistant.visitor_speech("Tell me about this painting");
        let sent = h.dialogue.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message_type, MessageType::Speech);
        assert_eq!(sent[0].speech, "Tell me about this painting");
    }

    #[test]
    fn test_speech_reaches_tts_and_history() {
        let mut h = harness();
        h.server(ServerMessage {
            kind: "speech".to_string(),
            text: "Good morning.".to_string(),
            ..Default::default()
        });
        h.assistant.tick(0.016);

        assert_eq!(h.speech.take(), vec!["Good morning.".to_string()]);
        let sent = h.dialogue.take();
        assert_eq!(sent[0].message_type, MessageType::PlayerHistoryUpdate);
        assert_eq!(sent[0].speech, "ASSISTANT: 'Good morning.");
        assert!(h.assistant.dispatcher().is_speaking());
    }

    #[test]
    fn test_follow_action_changes_movement() {
        let mut h = harness();
        h.server(ServerMessage::action("followVisitor", "", 0, ""));
        h.assistant.tick(0.016);
        assert_eq!(h.assistant.movement().state(), MovementState::Follow);
        assert!(
            h.assistant
                .snapshot()
                .assistant
                .walking_state
                .label()
                .contains("follow")
        );
    }

    #[test]
    fn test_detection_drives_expression() {
        let mut h = harness();
        h.assistant
            .submit_detection(EmotionDetection::new(Emotion::Happy, 0.8));
        assert!(h.assistant.expression().target_face().mouth_smile_left > 0.0);
        assert!(h.assistant.statistics().has_history());
        assert!(
            h.assistant
                .snapshot()
                .assistant
                .face_percentages
                .contains_key("happy")
        );
    }

    #[test]
    fn test_boredom_sends_inner_thought() {
        let config = Configuration {
            boredom: crate::config::BoredomConfig {
                min_secs: 1.0,
                max_secs: 1.0,
            },
            ..Default::default()
        };
        let mut h = TestHarness::new(&config, &gallery_scene());
        h.assistant.tick(0.6);
        h.assistant.tick(0.6);
        let sent = h.dialogue.take();
        assert!(
            sent.iter()
                .any(|m| m.message_type == MessageType::InnerThoughtEvent)
        );
    }
}
