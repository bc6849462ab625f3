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

//! Tick-synchronous event fan-out
//!
//! Components publish while the tick runs; subscribers only see the events
//! once [`EventBus::process_events`] drains the queue at the end of the tick,
//! so a handler never observes a half-updated assistant.

use super::types::{AssistantEvent, EventKind};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

pub type EventHandler = Arc<dyn Fn(&AssistantEvent) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    /// `None` receives every event
    kinds: Option<Vec<EventKind>>,
    handler: EventHandler,
}

impl Subscriber {
    fn wants(&self, kind: EventKind) -> bool {
        self.kinds.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    pending: VecDeque<AssistantEvent>,
}

#[derive(Clone, Default)]
pub struct EventBus {
    state: Arc<Mutex<BusState>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Receive every event
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&AssistantEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(handler))
    }

    /// Receive only events of the listed kinds
    pub fn subscribe_to<F>(&self, kinds: &[EventKind], handler: F) -> SubscriptionId
    where
        F: Fn(&AssistantEvent) + Send + Sync + 'static,
    {
        self.register(Some(kinds.to_vec()), Arc::new(handler))
    }

    fn register(&self, kinds: Option<Vec<EventKind>>, handler: EventHandler) -> SubscriptionId {
        let mut state = self.lock();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscribers.push(Subscriber { id, kinds, handler });
        id
    }

    /// Returns false when the subscription was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|s| s.id != id);
        state.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    pub fn publish(&self, event: AssistantEvent) {
        tracing::trace!("Queued event {:?}", event);
        self.lock().pending.push_back(event);
    }

    /// Deliver queued events in publish order; returns the number of deliveries
    ///
    /// Handlers run without the bus locked, so they may publish or subscribe.
    /// Events they publish wait for the next call.
    pub fn process_events(&self) -> usize {
        let (events, subscribers): (Vec<AssistantEvent>, Vec<Subscriber>) = {
            let mut state = self.lock();
            (state.pending.drain(..).collect(), state.subscribers.clone())
        };

        let mut delivered = 0;
        for event in &events {
            let kind = event.kind();
            for subscriber in subscribers.iter().filter(|s| s.wants(kind)) {
                (subscriber.handler)(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Drop queued events without delivering them
    pub fn clear(&self) {
        self.lock().pending.clear();
    }

    pub fn queue_len(&self) -> usize {
        self.lock().pending.len()
    }
}
