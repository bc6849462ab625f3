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

//! Dialogue server integration
//!
//! Outbound messages are assembled by the [`ContextBuilder`], inbound ones
//! are routed by the [`ActionDispatcher`]. Transport sits behind
//! [`DialogueSink`] and [`SpeechSink`] so the core never blocks on I/O.

mod boredom;
mod channel;
mod context;
mod dispatcher;
mod ledger;
mod repair;

pub use self::boredom::BoredomTimer;
pub use self::channel::{DialogueClient, WebSocketChannel};
pub use self::context::{
    ActionAvailability, AssistantView, ContextBuilder, ContextPurpose, ContextSnapshot,
    UNKNOWN_LOCATION, VisitorView, available_actions,
};
pub use self::dispatcher::{ActionDispatcher, ActionReply, Directive, MovementCommand};
pub use self::ledger::{ActionLedger, ActionPhase, LedgerEntry};
pub use self::repair::{BreakReport, RepairQueue};

use docent_common::dialogue::ClientMessage;

/// Fire-and-forget outbound dialogue messages
pub trait DialogueSink: Send + Sync {
    fn send(&self, message: ClientMessage);
}

/// Text to be spoken by the assistant
pub trait SpeechSink: Send + Sync {
    fn speak(&self, text: &str);
}
