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

//! Token ledger for multi-stage actions

use crate::error::LedgerError;
use std::collections::HashMap;

/// Where a multi-stage action stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionPhase {
    /// The server picked the action
    Proposed,
    /// The server confirmed the action should run
    Confirmed,
    /// Work is underway
    InProgress,
    /// Waiting for the server to close the action
    Completing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub action: String,
    pub stage: u32,
    pub phase: ActionPhase,
}

/// Open multi-stage actions, keyed by correlation token
///
/// Stages for a token must strictly increase. A completed token is removed.
#[derive(Debug, Default)]
pub struct ActionLedger {
    entries: HashMap<String, LedgerEntry>,
}

impl ActionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<&LedgerEntry> {
        self.entries.get(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Open a new action at stage 1
    pub fn register(&mut self, token: &str, action: &str) -> Result<(), LedgerError> {
        if self.entries.contains_key(token) {
            return Err(LedgerError::Duplicate(token.to_string()));
        }
        self.entries.insert(
            token.to_string(),
            LedgerEntry {
                action: action.to_string(),
                stage: 1,
                phase: ActionPhase::Proposed,
            },
        );
        tracing::debug!("Registered {} action {}", action, token);
        Ok(())
    }

    fn validate(&self, token: &str, action: &str, stage: u32) -> Result<&LedgerEntry, LedgerError> {
        let entry = self
            .entries
            .get(token)
            .ok_or_else(|| LedgerError::UnknownToken(token.to_string()))?;
        if entry.action != action {
            return Err(LedgerError::ActionMismatch {
                token: token.to_string(),
                expected: entry.action.clone(),
                actual: action.to_string(),
            });
        }
        if stage <= entry.stage {
            return Err(LedgerError::StaleStage {
                token: token.to_string(),
                stage,
                current: entry.stage,
            });
        }
        Ok(entry)
    }

    /// Move an open action to `stage`
    pub fn advance(
        &mut self,
        token: &str,
        action: &str,
        stage: u32,
        phase: ActionPhase,
    ) -> Result<(), LedgerError> {
        self.validate(token, action, stage)?;
        if let Some(entry) = self.entries.get_mut(token) {
            entry.stage = stage;
            entry.phase = phase;
        }
        Ok(())
    }

    /// Change the phase of an open action without moving its stage
    pub fn mark(&mut self, token: &str, phase: ActionPhase) -> Result<(), LedgerError> {
        let entry = self
            .entries
            .get_mut(token)
            .ok_or_else(|| LedgerError::UnknownToken(token.to_string()))?;
        entry.phase = phase;
        Ok(())
    }

    /// Close an action at its terminal `stage`
    pub fn complete(
        &mut self,
        token: &str,
        action: &str,
        stage: u32,
    ) -> Result<LedgerEntry, LedgerError> {
        self.validate(token, action, stage)?;
        let mut entry = self
            .entries
            .remove(token)
            .ok_or_else(|| LedgerError::UnknownToken(token.to_string()))?;
        entry.stage = stage;
        entry.phase = ActionPhase::Done;
        tracing::debug!("Completed {} action {}", action, token);
        Ok(entry)
    }
}
