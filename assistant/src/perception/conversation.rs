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

//! Conversation engagement with a disengagement countdown

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationChange {
    Started,
    Ended,
}

/// Whether the visitor is in conversation with the assistant.
///
/// Every qualifying observation refreshes the countdown to the timeout.
/// Without one, the countdown runs down while in conversation and the
/// conversation ends once it reaches zero, so brief look-aways are tolerated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConversationState {
    in_conversation: bool,
    countdown: f32,
}

impl ConversationState {
    pub fn in_conversation(&self) -> bool {
        self.in_conversation
    }

    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    pub fn update(&mut self, qualifies: bool, elapsed: f32, timeout: f32) -> Option<ConversationChange> {
        if qualifies {
            self.countdown = timeout;
            if !self.in_conversation {
                self.in_conversation = true;
                tracing::info!("Visitor engaged in conversation");
                return Some(ConversationChange::Started);
            }
            return None;
        }

        if !self.in_conversation || self.countdown <= 0.0 {
            return None;
        }

        self.countdown -= elapsed;
        if self.countdown <= 0.0 {
            self.countdown = 0.0;
            self.in_conversation = false;
            tracing::info!("Visitor left conversation");
            return Some(ConversationChange::Ended);
        }
        None
    }
}
