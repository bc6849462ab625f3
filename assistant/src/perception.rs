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

//! Perception
//!
//! Runs at a low fixed rate. Each update recomputes whether the visitor can
//! be seen and heard, what the visitor is looking at, which assets are in
//! view, and whether the two are in conversation.

mod conversation;
mod gaze;

pub use self::conversation::{ConversationChange, ConversationState};
pub use self::gaze::{GazeObservation, assets_in_view, check_visibility, resolve_gaze};

use crate::config::PerceptionConfig;
use crate::world::{Facing, SceneQuery, entity_position};
use glam::Vec3;
use hecs::{Entity, World};

/// Something perception noticed that the rest of the assistant reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerceptionChange {
    VisibilityChanged(bool),
    ConversationStarted,
    ConversationEnded,
}

pub struct Perception {
    config: PerceptionConfig,
    scene: Box<dyn SceneQuery>,
    visible: bool,
    audible: bool,
    conversation: ConversationState,
    gaze: GazeObservation,
    assets_in_view: Vec<String>,
    visitor_assets_in_view: Vec<String>,
}

impl Perception {
    pub fn new(config: PerceptionConfig, scene: Box<dyn SceneQuery>) -> Self {
        Self {
            config,
            scene,
            visible: false,
            audible: false,
            conversation: ConversationState::default(),
            gaze: GazeObservation::default(),
            assets_in_view: Vec::new(),
            visitor_assets_in_view: Vec::new(),
        }
    }

    pub fn interval_secs(&self) -> f32 {
        self.config.interval_secs
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_audible(&self) -> bool {
        self.audible
    }

    pub fn in_conversation(&self) -> bool {
        self.conversation.in_conversation()
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn gaze(&self) -> &GazeObservation {
        &self.gaze
    }

    pub fn assets_in_view(&self) -> &[String] {
        &self.assets_in_view
    }

    pub fn visitor_assets_in_view(&self) -> &[String] {
        &self.visitor_assets_in_view
    }

    /// Recompute perception; `elapsed` is the time since the previous update
    pub fn update(
        &mut self,
        world: &World,
        agent_position: Vec3,
        head_forward: Vec3,
        visitor: Entity,
        elapsed: f32,
    ) -> Vec<PerceptionChange> {
        let mut changes = Vec::new();
        let head_offset = Vec3::Y * self.config.head_height;
        let agent_head = agent_position + head_offset;

        self.assets_in_view = assets_in_view(
            self.scene.as_ref(),
            world,
            agent_position,
            self.config.view_radius,
        );

        let Some(visitor_position) = entity_position(world, visitor) else {
            tracing::warn!("Visitor entity {:?} is missing", visitor);
            self.gaze = GazeObservation::default();
            self.audible = false;
            if self.visible {
                self.visible = false;
                changes.push(PerceptionChange::VisibilityChanged(false));
            }
            return changes;
        };
        let visitor_head = visitor_position + head_offset;
        let visitor_forward = world
            .get::<&Facing>(visitor)
            .map(|facing| facing.forward())
            .unwrap_or(Vec3::Z);

        self.audible = agent_head.distance(visitor_head) <= self.config.audible_distance;
        self.visitor_assets_in_view = assets_in_view(
            self.scene.as_ref(),
            world,
            visitor_position,
            self.config.view_radius,
        );

        if let Some(visible) =
            check_visibility(self.scene.as_ref(), world, agent_head, visitor_head, visitor)
            && visible != self.visible
        {
            tracing::debug!("Visitor visibility changed to {}", visible);
            self.visible = visible;
            changes.push(PerceptionChange::VisibilityChanged(visible));
        }

        let mut qualifies = false;
        if self.visible {
            self.gaze = resolve_gaze(
                self.scene.as_ref(),
                world,
                visitor,
                visitor_position,
                visitor_head,
                visitor_forward,
                &self.config,
            );
            qualifies = self.engaged(agent_head, visitor_head, head_forward, visitor_forward);
        } else {
            self.gaze = GazeObservation::default();
        }

        match self.conversation.update(
            qualifies,
            elapsed,
            self.config.conversation_timeout_secs,
        ) {
            Some(ConversationChange::Started) => changes.push(PerceptionChange::ConversationStarted),
            Some(ConversationChange::Ended) => changes.push(PerceptionChange::ConversationEnded),
            None => {}
        }

        changes
    }

    /// Engagement needs eye contact within range; once engaged, range alone keeps it
    fn engaged(
        &self,
        agent_head: Vec3,
        visitor_head: Vec3,
        head_forward: Vec3,
        visitor_forward: Vec3,
    ) -> bool {
        let distance = agent_head.distance(visitor_head);
        if self.conversation.in_conversation() {
            return distance < self.config.upkeep_distance;
        }

        let head_right = Facing(head_forward).right();
        let angle = head_right.angle_between(visitor_forward).to_degrees();
        (self.config.gaze_angle_min..=self.config.gaze_angle_max).contains(&angle)
            && distance < self.config.engage_distance
    }
}
