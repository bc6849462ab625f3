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

//! Movement state types

use hecs::Entity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// High-level locomotion mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementState {
    #[default]
    Idle,
    Patrol,
    Follow,
    GotoTarget,
}

impl MovementState {
    /// Label reported to the dialogue server as `walkingState`
    pub fn label(&self) -> &'static str {
        match self {
            MovementState::Idle => "idle",
            MovementState::Patrol => "patrolling",
            MovementState::Follow => "followPlayer",
            MovementState::GotoTarget => "walkingToTarget",
        }
    }
}

impl fmt::Display for MovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Animation intent handed to presentation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocomotionIntent {
    #[default]
    Idle,
    Walk,
    Run,
}

/// A command deferred while the assistant walks to a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandQueueEntry {
    pub state: MovementState,
    /// Walk target, resolved to a position when the entry is consumed
    pub target: Option<Entity>,
}

impl CommandQueueEntry {
    pub fn state(state: MovementState) -> Self {
        Self {
            state,
            target: None,
        }
    }

    pub fn walk_to(target: Entity) -> Self {
        Self {
            state: MovementState::GotoTarget,
            target: Some(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walking_state_labels() {
        assert_eq!(MovementState::Idle.label(), "idle");
        assert_eq!(MovementState::Patrol.label(), "patrolling");
        assert_eq!(MovementState::Follow.label(), "followPlayer");
        assert_eq!(MovementState::default(), MovementState::Idle);
    }
}
