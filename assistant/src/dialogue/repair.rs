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

//! Queue of broken scene objects awaiting repair

use crate::world::entity_name;
use docent_common::dialogue::EventContext;
use hecs::{Entity, World};
use std::collections::VecDeque;

/// What to tell the dialogue server about a break
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakReport {
    pub object: String,
    pub in_view: bool,
    /// Narrator line, sent both as history and as the event text
    pub description: String,
    pub event: EventContext,
    pub options: Vec<String>,
}

/// FIFO of damaged objects; an object is queued at most once
#[derive(Debug, Default)]
pub struct RepairQueue {
    queue: VecDeque<Entity>,
    last_break_location: Option<String>,
}

impl RepairQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, object: Entity) -> bool {
        self.queue.contains(&object)
    }

    /// Location of the most recent break the assistant did not see
    pub fn last_break_location(&self) -> Option<&str> {
        self.last_break_location.as_deref()
    }

    /// Queue a broken object and describe the event
    ///
    /// The description depends on whether the object is among the names in
    /// `assets_in_view`.
    pub fn report_break(
        &mut self,
        world: &World,
        object: Entity,
        event_location: &str,
        assets_in_view: &[String],
    ) -> BreakReport {
        let name = entity_name(world, object).unwrap_or_else(|| "object".to_string());
        if self.queue.contains(&object) {
            tracing::debug!("{} is already queued for repair", name);
        } else {
            self.queue.push_back(object);
        }

        let in_view = assets_in_view.iter().any(|asset| *asset == name);
        tracing::info!(
            "{} broke in {} ({})",
            name,
            event_location,
            if in_view { "seen" } else { "heard" }
        );

        if in_view {
            BreakReport {
                object: name.clone(),
                in_view,
                description:
                    "NARRATOR: Visitor bumped into a sculpture, breaking the glass around it."
                        .to_string(),
                event: EventContext {
                    relevant_objects: vec![name],
                    event_location: event_location.to_string(),
                },
                options: vec!["ignore".to_string(), "repair".to_string()],
            }
        } else {
            self.last_break_location = Some(event_location.to_string());
            BreakReport {
                object: name,
                in_view,
                description: format!(
                    "NARRATOR: The Assistant hears the sound of glass breaking, somewhere in the {}",
                    event_location
                ),
                event: EventContext {
                    relevant_objects: Vec::new(),
                    event_location: event_location.to_string(),
                },
                options: vec!["ignore".to_string(), "investigate".to_string()],
            }
        }
    }

    fn prune(&mut self, world: &World) {
        while let Some(head) = self.queue.front() {
            if world.contains(*head) {
                break;
            }
            tracing::debug!("Dropping despawned object {:?} from repair queue", head);
            self.queue.pop_front();
        }
    }

    /// First live object in the queue
    pub fn peek(&mut self, world: &World) -> Option<Entity> {
        self.prune(world);
        self.queue.front().copied()
    }

    pub fn peek_name(&mut self, world: &World) -> Option<String> {
        self.peek(world).and_then(|e| entity_name(world, e))
    }

    /// Remove and return the first live object in the queue
    pub fn dequeue(&mut self, world: &World) -> Option<Entity> {
        self.prune(world);
        self.queue.pop_front()
    }
}
